use async_trait::async_trait;
use log::debug;

use super::model::{Profile, ProfileUpdate};
use super::{Id, Repository};

#[async_trait]
pub trait UserService {
    async fn find_by_email(&self, email: &str) -> super::Result<Profile>;

    async fn update_profile(&self, id: &Id, update: &ProfileUpdate) -> super::Result<Profile>;
}

#[derive(Clone)]
pub struct UserServiceImpl {
    repo: Repository,
}

impl UserServiceImpl {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn find_by_email(&self, email: &str) -> super::Result<Profile> {
        self.repo
            .find_by_email(email)?
            .map(Profile::from)
            .ok_or(super::Error::Unauthorized)
    }

    async fn update_profile(&self, id: &Id, update: &ProfileUpdate) -> super::Result<Profile> {
        if update.is_empty() {
            debug!("nothing to update for user {id}");
            return Err(super::Error::EmptyUpdate);
        }

        self.repo.update_profile(id, update).map(Profile::from)
    }
}
