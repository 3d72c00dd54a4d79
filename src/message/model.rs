use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::{Insertable, Queryable, Selectable};
use serde::Serialize;
use uuid::Uuid;

use crate::{group, user};

use super::Id;

#[derive(Queryable, Selectable, Clone, Debug)]
#[diesel(table_name = crate::schema::messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Message {
    id: Uuid,
    group_id: Uuid,
    text: String,
    created_at: NaiveDateTime,
}

#[derive(Insertable, Clone, Debug)]
#[diesel(table_name = crate::schema::messages)]
pub struct NewMessage {
    id: Uuid,
    group_id: Uuid,
    sender: Uuid,
    text: String,
    created_at: NaiveDateTime,
}

impl NewMessage {
    pub fn new(
        id: Id,
        group_id: group::Id,
        sender: user::Id,
        text: &str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.0,
            group_id: group_id.0,
            sender: sender.0,
            text: text.to_string(),
            created_at: timestamp.naive_utc(),
        }
    }

    pub const fn id(&self) -> Id {
        Id(self.id)
    }

    pub const fn group_id(&self) -> group::Id {
        group::Id(self.group_id)
    }

    pub const fn sender(&self) -> user::Id {
        user::Id(self.sender)
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Author of a stored message, as joined from the user table.
#[derive(Queryable, Selectable, Serialize, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Sender {
    id: Uuid,
    first_name: String,
    last_name: String,
    photo: Option<String>,
}

impl Sender {
    pub fn new(
        id: user::Id,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        photo: Option<String>,
    ) -> Self {
        Self {
            id: id.0,
            first_name: first_name.into(),
            last_name: last_name.into(),
            photo,
        }
    }

    pub const fn id(&self) -> user::Id {
        user::Id(self.id)
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn photo(&self) -> Option<&str> {
        self.photo.as_deref()
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct MessageDto {
    pub id: Id,
    pub group_id: group::Id,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl MessageDto {
    pub fn new(message: Message, sender: Sender) -> Self {
        Self {
            id: Id(message.id),
            group_id: group::Id(message.group_id),
            sender,
            text: message.text,
            timestamp: message.created_at.and_utc(),
        }
    }
}

impl From<(NewMessage, Sender)> for MessageDto {
    fn from((m, sender): (NewMessage, Sender)) -> Self {
        Self {
            id: Id(m.id),
            group_id: group::Id(m.group_id),
            sender,
            text: m.text,
            timestamp: m.created_at.and_utc(),
        }
    }
}
