use std::pin::Pin;
use std::sync::Arc;

use futures::Stream;

pub use channel::{Channel, NatsChannel};
pub use model::{ChatEvent, ConnectionId, Envelope};

pub mod channel;
pub mod model;

type Result<T> = std::result::Result<T, Error>;
pub type Connection = Arc<dyn Channel + Send + Sync>;
pub type EventStream = Pin<Box<dyn Stream<Item = ChatEvent> + Send>>;

/// Realtime channel shared by every chat session.
pub const CHAT_CHANNEL: &str = "chat-demo1";

/// Name of the event carrying a sent chat message.
pub const CHAT_EVENT: &str = "chat-message";

pub enum Subject<'a> {
    Chat(&'a str),
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("channel is not connected")]
    Unavailable,

    #[error(transparent)]
    _Subscribe(#[from] async_nats::SubscribeError),
    #[error(transparent)]
    _Publish(#[from] async_nats::PublishError),
}
