use std::sync::Arc;

use axum::extract::FromRef;

use crate::group::repository::PgGroupRepository;
use crate::group::service::GroupServiceImpl;
use crate::integration::{self, Config};
use crate::message::repository::PgMessageRepository;
use crate::molecule::service::MoleculeServiceImpl;
use crate::user::repository::PgUserRepository;
use crate::user::service::UserServiceImpl;
use crate::{group, molecule, user};

#[derive(Clone)]
pub struct AppState {
    pub user_service: user::Service,
    pub group_service: group::Service,
    pub molecule_service: molecule::Service,

    pub pubsub: async_nats::Client,
}

impl AppState {
    pub async fn init(config: &Config) -> Self {
        let pg = config.postgres.connect();
        let pubsub = config.pubsub.connect().await;
        let http = integration::init_http_client();

        let user_repo = Arc::new(PgUserRepository::new(pg.clone()));
        let group_repo = Arc::new(PgGroupRepository::new(pg.clone()));
        let message_repo = Arc::new(PgMessageRepository::new(pg));

        let user_service = Arc::new(UserServiceImpl::new(user_repo));
        let group_service = Arc::new(GroupServiceImpl::new(group_repo, message_repo));
        let molecule_service = Arc::new(MoleculeServiceImpl::new(config.api.clone(), http));

        Self {
            user_service,
            group_service,
            molecule_service,
            pubsub,
        }
    }
}

impl FromRef<AppState> for user::Service {
    fn from_ref(s: &AppState) -> Self {
        s.user_service.clone()
    }
}

impl FromRef<AppState> for group::Service {
    fn from_ref(s: &AppState) -> Self {
        s.group_service.clone()
    }
}

impl FromRef<AppState> for molecule::Service {
    fn from_ref(s: &AppState) -> Self {
        s.molecule_service.clone()
    }
}

impl FromRef<AppState> for async_nats::Client {
    fn from_ref(s: &AppState) -> Self {
        s.pubsub.clone()
    }
}
