use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, error};

use super::{ChatEvent, ConnectionId, Envelope, EventStream, Subject};

/// A connection to the realtime channel, owned by a single chat session.
#[async_trait]
pub trait Channel {
    /// Stable for the lifetime of the connection.
    fn connection_id(&self) -> &ConnectionId;

    fn is_available(&self) -> bool;

    /// Events named `event_name` published on `channel_name`, in delivery order.
    async fn subscribe(&self, channel_name: &str, event_name: &str) -> super::Result<EventStream>;

    async fn publish(
        &self,
        channel_name: &str,
        event_name: &str,
        event: &ChatEvent,
    ) -> super::Result<()>;
}

pub struct NatsChannel {
    pubsub: async_nats::Client,
    connection_id: ConnectionId,
}

impl NatsChannel {
    pub fn new(pubsub: async_nats::Client) -> Self {
        Self {
            pubsub,
            connection_id: ConnectionId::random(),
        }
    }
}

#[async_trait]
impl Channel for NatsChannel {
    fn connection_id(&self) -> &ConnectionId {
        &self.connection_id
    }

    fn is_available(&self) -> bool {
        matches!(
            self.pubsub.connection_state(),
            async_nats::connection::State::Connected
        )
    }

    async fn subscribe(&self, channel_name: &str, event_name: &str) -> super::Result<EventStream> {
        let subscriber = self.pubsub.subscribe(&Subject::Chat(channel_name)).await?;
        debug!("{} subscribed to {channel_name}", self.connection_id);

        let event_name = event_name.to_string();
        let stream = subscriber.filter_map(move |msg| {
            let event_name = event_name.clone();
            async move {
                match serde_json::from_slice::<Envelope>(&msg.payload) {
                    Ok(envelope) if envelope.name == event_name => Some(envelope.data),
                    Ok(envelope) => {
                        debug!("skipping event: {}", envelope.name);
                        None
                    }
                    Err(e) => {
                        error!("failed to deserialize chat event: {e:?}");
                        None
                    }
                }
            }
        });

        Ok(Box::pin(stream))
    }

    async fn publish(
        &self,
        channel_name: &str,
        event_name: &str,
        event: &ChatEvent,
    ) -> super::Result<()> {
        if !self.is_available() {
            return Err(super::Error::Unavailable);
        }

        let envelope = Envelope::new(event_name, event.clone());
        self.pubsub
            .publish(&Subject::Chat(channel_name), envelope.into())
            .await?;
        Ok(())
    }
}

/// Broadcast-backed channel for exercising sessions without a NATS server.
#[cfg(test)]
pub mod test {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use tokio::sync::broadcast;

    use crate::event::{self, ChatEvent, ConnectionId, Envelope, EventStream};

    use super::Channel;

    pub type Hub = broadcast::Sender<(String, Envelope)>;

    pub fn hub() -> Hub {
        broadcast::channel(64).0
    }

    pub struct BroadcastChannel {
        hub: Hub,
        connection_id: ConnectionId,
        pub available: AtomicBool,
        pub fail_publish: AtomicBool,
        pub published: Mutex<Vec<ChatEvent>>,
    }

    impl BroadcastChannel {
        pub fn connect(hub: &Hub) -> Self {
            Self {
                hub: hub.clone(),
                connection_id: ConnectionId::random(),
                available: AtomicBool::new(true),
                fail_publish: AtomicBool::new(false),
                published: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Channel for BroadcastChannel {
        fn connection_id(&self) -> &ConnectionId {
            &self.connection_id
        }

        fn is_available(&self) -> bool {
            self.available.load(Ordering::SeqCst)
        }

        async fn subscribe(
            &self,
            channel_name: &str,
            event_name: &str,
        ) -> Result<EventStream, event::Error> {
            let rx = self.hub.subscribe();
            let channel_name = channel_name.to_string();
            let event_name = event_name.to_string();

            let stream = futures::stream::unfold(rx, move |mut rx| {
                let channel_name = channel_name.clone();
                let event_name = event_name.clone();
                async move {
                    loop {
                        match rx.recv().await {
                            Ok((c, e)) if c == channel_name && e.name == event_name => {
                                return Some((e.data, rx));
                            }
                            Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                            Err(broadcast::error::RecvError::Closed) => return None,
                        }
                    }
                }
            });

            Ok(Box::pin(stream))
        }

        async fn publish(
            &self,
            channel_name: &str,
            event_name: &str,
            event: &ChatEvent,
        ) -> Result<(), event::Error> {
            if self.fail_publish.load(Ordering::SeqCst) {
                return Err(event::Error::Unavailable);
            }

            self.published.lock().unwrap().push(event.clone());
            // no subscribers is not an error for a pub/sub channel
            let _ = self.hub.send((
                channel_name.to_string(),
                Envelope::new(event_name, event.clone()),
            ));
            Ok(())
        }
    }
}
