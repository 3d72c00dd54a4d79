use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{group, message};

/// Identifies the session a chat event originates from.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Hash, PartialEq, Eq)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payload broadcast on the realtime channel for a single sent message.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatEvent {
    pub id: message::Id,
    pub group: group::Id,
    pub name: String,
    pub image: String,
    pub data: String,
    pub timestamp: DateTime<Utc>,
    pub connection_id: ConnectionId,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Envelope {
    pub name: String,
    pub data: ChatEvent,
}

impl Envelope {
    pub fn new(name: &str, data: ChatEvent) -> Self {
        Self {
            name: name.to_string(),
            data,
        }
    }
}
