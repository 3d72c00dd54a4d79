use diesel::ExpressionMethods;
use diesel::OptionalExtension;
use diesel::QueryDsl;
use diesel::RunQueryDsl;
use diesel::SelectableHelper;

use crate::integration::db;
use crate::schema::users;

use super::Id;
use super::model::{NewUser, ProfileUpdate, User};

pub trait UserRepository {
    fn insert(&self, user: &NewUser) -> super::Result<Id>;

    fn find_by_email(&self, email: &str) -> super::Result<Option<User>>;

    fn update_profile(&self, id: &Id, update: &ProfileUpdate) -> super::Result<User>;
}

pub struct PgUserRepository {
    pool: db::Pool,
}

impl PgUserRepository {
    pub fn new(pool: db::Pool) -> Self {
        Self { pool }
    }
}

impl UserRepository for PgUserRepository {
    fn insert(&self, u: &NewUser) -> super::Result<Id> {
        let mut conn = self.pool.get()?;

        let id = diesel::insert_into(users::table)
            .values(u)
            .returning(users::id)
            .get_result::<uuid::Uuid>(&mut conn)?;

        Ok(Id(id))
    }

    fn find_by_email(&self, email: &str) -> super::Result<Option<User>> {
        let mut conn = self.pool.get()?;

        let u = users::table
            .filter(users::email.eq(email))
            .select(User::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(u)
    }

    fn update_profile(&self, id: &Id, update: &ProfileUpdate) -> super::Result<User> {
        let mut conn = self.pool.get()?;

        let u = diesel::update(users::table.find(id.get()))
            .set(update)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .optional()?;

        u.ok_or(super::Error::NotFound(*id))
    }
}
