use diesel::ExpressionMethods;
use diesel::OptionalExtension;
use diesel::QueryDsl;
use diesel::RunQueryDsl;
use diesel::SelectableHelper;

use crate::integration::db;
use crate::schema::groups;
use crate::user;

use super::Id;
use super::model::{Group, GroupRow, NewGroup};

pub trait GroupRepository {
    fn insert(&self, name: &str, owner: &user::Id) -> super::Result<Group>;

    fn find_all(&self) -> super::Result<Vec<Group>>;

    fn find_by_id(&self, id: &Id) -> super::Result<Option<Group>>;
}

pub struct PgGroupRepository {
    pool: db::Pool,
}

impl PgGroupRepository {
    pub fn new(pool: db::Pool) -> Self {
        Self { pool }
    }
}

impl GroupRepository for PgGroupRepository {
    fn insert(&self, name: &str, owner: &user::Id) -> super::Result<Group> {
        let mut conn = self.pool.get()?;

        let id = Id::random();
        let row = diesel::insert_into(groups::table)
            .values(&NewGroup::new(&id, name, owner))
            .returning(GroupRow::as_returning())
            .get_result(&mut conn)?;

        Ok(Group::from(row))
    }

    fn find_all(&self) -> super::Result<Vec<Group>> {
        let mut conn = self.pool.get()?;

        let rows = groups::table
            .order(groups::created_at.asc())
            .select(GroupRow::as_select())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Group::from).collect())
    }

    fn find_by_id(&self, id: &Id) -> super::Result<Option<Group>> {
        let mut conn = self.pool.get()?;

        let row = groups::table
            .find(id.get())
            .select(GroupRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(Group::from))
    }
}
