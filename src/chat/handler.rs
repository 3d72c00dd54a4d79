pub(super) mod pages {
    use axum::Extension;

    use crate::chat::markup;
    use crate::markup::Wrappable;
    use crate::user::model::Profile;

    pub async fn chat(profile: Extension<Profile>) -> Wrappable {
        Wrappable::new(markup::ChatWindow(&profile))
    }
}

pub(super) mod ws {
    use std::sync::Arc;

    use axum::Extension;
    use axum::extract::{State, WebSocketUpgrade};
    use axum::response::Response;

    use crate::chat::Coordinator;
    use crate::event::NatsChannel;
    use crate::group;
    use crate::user::model::Profile;

    use super::session;

    pub async fn upgrade(
        Extension(profile): Extension<Profile>,
        ws: WebSocketUpgrade,
        State(group_service): State<group::Service>,
        State(pubsub): State<async_nats::Client>,
    ) -> Response {
        ws.on_upgrade(move |socket| {
            let channel = Arc::new(NatsChannel::new(pubsub));
            session::run(socket, Coordinator::new(group_service, channel, profile))
        })
    }
}

mod session {
    use axum::extract::ws::Message::{Binary, Close, Text};
    use axum::extract::ws::WebSocket;
    use futures::{SinkExt, StreamExt};
    use log::{debug, error, warn};
    use maud::{Markup, Render, html};
    use serde::Deserialize;

    use crate::chat::markup::{
        ActiveGroup, GroupList, MessageItem, MessageList, NewMessageItem, SendForm,
    };
    use crate::chat::{self, Coordinator};
    use crate::group;
    use crate::markup::ErrorBanner;

    #[derive(Deserialize, Debug)]
    #[serde(tag = "type", rename_all = "snake_case")]
    enum Command {
        CreateGroup { name: String },
        SelectGroup { group_id: group::Id },
        SendMessage { text: String },
    }

    pub async fn run(ws: WebSocket, mut coordinator: Coordinator) {
        let conn = *coordinator.connection_id();
        debug!("chat session {conn} opened");

        let (mut sender, mut receiver) = ws.split();

        let mut events = match coordinator.subscribe().await {
            Ok(events) => events,
            Err(e) => {
                error!("Failed to subscribe to chat events. Aborting session {conn}: {e}");
                let _ = sender.send(Close(None)).await;
                return;
            }
        };

        let loaded = coordinator.load_groups().await.map(|_| ());
        let groups = match loaded {
            Ok(()) => view(&coordinator, ""),
            Err(e) => {
                error!("Failed to load groups: {e}");
                ErrorBanner(&e.to_string()).render()
            }
        };
        if let Err(e) = sender.send(Text(groups.into_string().into())).await {
            error!("Failed to send groups to client: {e}");
            return;
        }

        loop {
            // one input at a time, live events wait on the subscription while a command runs
            let markup = tokio::select! {
                frame = receiver.next() => match frame {
                    None => break,
                    Some(Err(e)) => {
                        error!("Failed to read WS frame: {e}");
                        break;
                    }
                    Some(Ok(Close(frame))) => {
                        debug!("WS connection closed by client: {frame:?}");
                        break;
                    }
                    Some(Ok(Text(content))) => {
                        match serde_json::from_str::<Command>(content.as_str()) {
                            Ok(command) => handle_command(&mut coordinator, command).await,
                            Err(e) => {
                                warn!("Skipping text frame, content is malformed: {e}");
                                None
                            }
                        }
                    }
                    Some(Ok(Binary(content))) => {
                        warn!("Received binary WS frame: {content:?}");
                        None
                    }
                    Some(Ok(_)) => None,
                },

                event = events.next() => match event {
                    None => {
                        warn!("chat subscription of session {conn} ended");
                        break;
                    }
                    Some(event) => coordinator.handle_event(event).cloned().map(|m| {
                        NewMessageItem(MessageItem::new(&m, coordinator.is_own(&m))).render()
                    }),
                },
            };

            if let Some(markup) = markup {
                if let Err(e) = sender.send(Text(markup.into_string().into())).await {
                    error!("Failed to send markup to client: {e}");
                    break;
                }
            }
        }

        debug!("chat session {conn} closed");
    }

    async fn handle_command(c: &mut Coordinator, command: Command) -> Option<Markup> {
        debug!("handling command: {command:?}");

        let res = match command {
            Command::CreateGroup { name } => {
                let created = c.create_group(&name).await.map(|_| ());
                created.map(|()| Some(view(c, "")))
            }
            Command::SelectGroup { group_id } => c
                .select_group(&group_id)
                .await
                .map(|selected| selected.then(|| view(c, ""))),
            Command::SendMessage { text } => c
                .send_message(&text)
                .await
                .map(|sent| sent.map(|_| sent_markup())),
        };

        match res {
            Ok(markup) => markup,
            Err(e) => {
                log_error(&e);
                // redraw the view the coordinator kept, the banner rides along
                Some(view(c, &e.to_string()))
            }
        }
    }

    fn log_error(e: &chat::Error) {
        match e {
            chat::Error::MissingName | chat::Error::AlreadyExists(_) => debug!("{e}"),
            _ => error!("{e}"),
        }
    }

    fn view(c: &Coordinator, error: &str) -> Markup {
        let view = c.view();
        let is_own = |m: &chat::DisplayMessage| c.is_own(m);

        html! {
            (GroupList::new(&view.groups, view.active.as_ref()))
            (ActiveGroup(view.active.as_ref()))
            (MessageList::new(&view.messages, &is_own))
            (ErrorBanner(error))
        }
    }

    // a fresh form clears the input, only done once the message is sent and stored
    fn sent_markup() -> Markup {
        html! {
            (SendForm)
            (ErrorBanner(""))
        }
    }

}
