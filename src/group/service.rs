use async_trait::async_trait;
use log::debug;

use crate::message::{self, model::MessageDto, model::NewMessage};
use crate::user;

use super::model::Group;
use super::{Id, Repository};

#[async_trait]
pub trait GroupService {
    async fn create(&self, name: &str, owner: &user::Id) -> super::Result<Group>;

    async fn find_all(&self) -> super::Result<Vec<Group>>;

    async fn find_by_id(&self, id: &Id) -> super::Result<Group>;

    async fn add_message(&self, message: &NewMessage) -> super::Result<message::Id>;

    async fn find_messages(&self, group_id: &Id) -> super::Result<Vec<MessageDto>>;
}

#[derive(Clone)]
pub struct GroupServiceImpl {
    repo: Repository,
    message_repo: message::Repository,
}

impl GroupServiceImpl {
    pub fn new(repo: Repository, message_repo: message::Repository) -> Self {
        Self { repo, message_repo }
    }
}

#[async_trait]
impl GroupService for GroupServiceImpl {
    async fn create(&self, name: &str, owner: &user::Id) -> super::Result<Group> {
        if name.trim().is_empty() {
            return Err(super::Error::EmptyName);
        }

        let group = self.repo.insert(name, owner)?;
        debug!("group {} created by {owner}", group.id());
        Ok(group)
    }

    async fn find_all(&self) -> super::Result<Vec<Group>> {
        self.repo.find_all()
    }

    async fn find_by_id(&self, id: &Id) -> super::Result<Group> {
        self.repo.find_by_id(id)?.ok_or(super::Error::NotFound(*id))
    }

    async fn add_message(&self, message: &NewMessage) -> super::Result<message::Id> {
        let id = self.message_repo.insert(message)?;
        debug!("message {id} appended to group {}", message.group_id());
        Ok(id)
    }

    async fn find_messages(&self, group_id: &Id) -> super::Result<Vec<MessageDto>> {
        self.message_repo
            .find_by_group_id(group_id)
            .map_err(super::Error::from)
    }
}
