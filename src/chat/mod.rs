use axum::{Router, routing::get};

use crate::state::AppState;
use crate::{event, group, message};

pub mod coordinator;
mod handler;
pub mod markup;

pub use coordinator::{Coordinator, DisplayMessage};

type Result<T> = std::result::Result<T, Error>;

pub fn pages<S>(s: AppState) -> Router<S> {
    Router::new()
        .route("/chat", get(handler::pages::chat))
        .with_state(s)
}

pub fn endpoints<S>(s: AppState) -> Router<S> {
    Router::new()
        .route("/ws", get(handler::ws::upgrade))
        .with_state(s)
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("group name is required")]
    MissingName,
    #[error("group \"{0}\" already exists")]
    AlreadyExists(String),
    #[error("message was not sent: {0}")]
    PublishFailed(#[source] event::Error),
    #[error("message {0} was sent but not saved: {1}")]
    AppendFailed(message::Id, #[source] group::Error),

    #[error(transparent)]
    _Group(#[from] group::Error),
    #[error(transparent)]
    _Event(#[from] event::Error),
}
