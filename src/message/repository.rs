use diesel::ExpressionMethods;
use diesel::QueryDsl;
use diesel::RunQueryDsl;
use diesel::SelectableHelper;

use crate::group;
use crate::integration::db;
use crate::schema::{messages, users};

use super::Id;
use super::model::{Message, MessageDto, NewMessage, Sender};

pub trait MessageRepository {
    fn insert(&self, message: &NewMessage) -> super::Result<Id>;

    /// Messages of a group, oldest first.
    fn find_by_group_id(&self, group_id: &group::Id) -> super::Result<Vec<MessageDto>>;
}

pub struct PgMessageRepository {
    pool: db::Pool,
}

impl PgMessageRepository {
    pub fn new(pool: db::Pool) -> Self {
        Self { pool }
    }
}

impl MessageRepository for PgMessageRepository {
    fn insert(&self, m: &NewMessage) -> super::Result<Id> {
        if m.text().trim().is_empty() {
            return Err(super::Error::EmptyText);
        }

        let mut conn = self.pool.get()?;

        let id = diesel::insert_into(messages::table)
            .values(m)
            .returning(messages::id)
            .get_result::<uuid::Uuid>(&mut conn)?;

        Ok(Id(id))
    }

    fn find_by_group_id(&self, group_id: &group::Id) -> super::Result<Vec<MessageDto>> {
        let mut conn = self.pool.get()?;

        let rows = messages::table
            .inner_join(users::table)
            .filter(messages::group_id.eq(group_id.get()))
            .order((messages::created_at.asc(), messages::seq.asc()))
            .select((Message::as_select(), Sender::as_select()))
            .load::<(Message, Sender)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(m, s)| MessageDto::new(m, s))
            .collect())
    }
}
