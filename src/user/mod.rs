use std::fmt::Display;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, put},
};
use repository::UserRepository;
use serde::{Deserialize, Serialize};
use service::UserService;
use uuid::Uuid;

use crate::state::AppState;

pub mod avatar;
mod handler;
pub mod markup;
pub mod middleware;
pub mod model;
pub mod repository;
pub mod service;

type Result<T> = std::result::Result<T, Error>;
pub type Repository = Arc<dyn UserRepository + Send + Sync>;
pub type Service = Arc<dyn UserService + Send + Sync>;

/// Placeholder shown for users without a photo.
pub const DEFAULT_AVATAR: &str = "/static/default-avatar.svg";

/// Cookie carrying the email of the signed-in user.
pub const SESSION_COOKIE: &str = "email";

pub fn pages<S>(s: AppState) -> Router<S> {
    Router::new()
        .route("/settings", get(handler::pages::settings))
        .with_state(s)
}

pub fn api<S>(s: AppState) -> Router<S> {
    Router::new()
        .route("/users/me", put(handler::api::update_profile))
        .with_state(s)
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, Hash, PartialEq, Eq)]
pub struct Id(pub Uuid);

impl Id {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn get(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for Id {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("user not found: {0}")]
    NotFound(Id),
    #[error("missing or invalid user session")]
    Unauthorized,
    #[error("nothing to update")]
    EmptyUpdate,
    #[error("invalid avatar: {0}")]
    InvalidAvatar(String),

    #[error(transparent)]
    _Image(#[from] image::ImageError),
    #[error(transparent)]
    _Base64(#[from] base64::DecodeError),
    #[error(transparent)]
    _R2d2(#[from] r2d2::Error),
    #[error(transparent)]
    _Diesel(#[from] diesel::result::Error),
}
