use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::{Insertable, Queryable, Selectable};
use serde::Serialize;
use uuid::Uuid;

use crate::user;

use super::Id;

#[derive(Queryable, Selectable, Clone, Debug)]
#[diesel(table_name = crate::schema::groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GroupRow {
    id: Uuid,
    name: String,
    owner: Uuid,
    created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::groups)]
pub struct NewGroup<'a> {
    id: &'a Uuid,
    name: &'a str,
    owner: &'a Uuid,
}

impl<'a> NewGroup<'a> {
    pub fn new(id: &'a Id, name: &'a str, owner: &'a user::Id) -> Self {
        Self {
            id: id.get(),
            name,
            owner: owner.get(),
        }
    }
}

/// A named chat room. The message list lives in the message store.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Group {
    id: Id,
    name: String,
    owner: user::Id,
    created_at: DateTime<Utc>,
}

impl Group {
    pub fn new(id: Id, name: impl Into<String>, owner: user::Id, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            owner,
            created_at,
        }
    }

    pub const fn id(&self) -> &Id {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn owner(&self) -> &user::Id {
        &self.owner
    }
}

impl From<GroupRow> for Group {
    fn from(row: GroupRow) -> Self {
        Self {
            id: Id(row.id),
            name: row.name,
            owner: user::Id(row.owner),
            created_at: row.created_at.and_utc(),
        }
    }
}
