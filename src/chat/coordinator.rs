//! Per-session chat state.
//!
//! A [`Coordinator`] keeps the view of one chat session in sync with the group
//! store and the realtime channel. It is owned by the session task, so every
//! operation takes `&mut self` and no locking is involved.
//!
//! Own messages are never appended locally on send: they come back through the
//! channel subscription like everybody else's and are told apart by
//! [`Coordinator::is_own`].

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::event::{self, CHAT_CHANNEL, CHAT_EVENT, ChatEvent, ConnectionId, EventStream};
use crate::group::{self, model::Group};
use crate::message::{self, model::MessageDto, model::NewMessage};
use crate::user::{self, avatar, model::Profile};

/// A message as rendered in the message list.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayMessage {
    pub id: message::Id,
    pub connection_id: ConnectionId,
    pub name: String,
    pub image: String,
    pub data: String,
    pub timestamp: DateTime<Utc>,
}

impl From<MessageDto> for DisplayMessage {
    fn from(m: MessageDto) -> Self {
        let image = m
            .sender
            .photo()
            .filter(|p| !p.is_empty())
            .unwrap_or(user::DEFAULT_AVATAR)
            .to_string();

        Self {
            id: m.id,
            // history carries no connection, the sender id stands in for it
            connection_id: ConnectionId(m.sender.id().0),
            name: m.sender.display_name(),
            image,
            data: m.text,
            timestamp: m.timestamp,
        }
    }
}

impl From<ChatEvent> for DisplayMessage {
    fn from(e: ChatEvent) -> Self {
        Self {
            id: e.id,
            connection_id: e.connection_id,
            name: e.name,
            image: e.image,
            data: e.data,
            timestamp: e.timestamp,
        }
    }
}

#[derive(Default, Debug)]
pub struct ViewState {
    pub groups: Vec<Group>,
    pub active: Option<Group>,
    pub messages: Vec<DisplayMessage>,
}

pub struct Coordinator {
    store: group::Service,
    channel: event::Connection,
    profile: Profile,
    view: ViewState,
    // ids of listed messages, a replayed live event may already be in the history
    listed: HashSet<message::Id>,
}

impl Coordinator {
    pub fn new(store: group::Service, channel: event::Connection, profile: Profile) -> Self {
        Self {
            store,
            channel,
            profile,
            view: ViewState::default(),
            listed: HashSet::new(),
        }
    }

    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn connection_id(&self) -> &ConnectionId {
        self.channel.connection_id()
    }

    /// Live chat events, to be fed back through [`Coordinator::handle_event`].
    pub async fn subscribe(&self) -> super::Result<EventStream> {
        let events = self.channel.subscribe(CHAT_CHANNEL, CHAT_EVENT).await?;
        Ok(events)
    }

    pub async fn load_groups(&mut self) -> super::Result<&[Group]> {
        self.view.groups = self.store.find_all().await?;
        debug!("loaded {} groups", self.view.groups.len());
        Ok(&self.view.groups)
    }

    pub async fn create_group(&mut self, name: &str) -> super::Result<&Group> {
        if name.trim().is_empty() {
            return Err(super::Error::MissingName);
        }
        if self.view.groups.iter().any(|g| g.name() == name) {
            return Err(super::Error::AlreadyExists(name.to_string()));
        }

        let group = self.store.create(name, self.profile.id()).await?;

        self.view.groups.push(group.clone());
        self.clear_messages();
        Ok(&*self.view.active.insert(group))
    }

    /// Returns `false` when the group is not in the loaded list.
    pub async fn select_group(&mut self, id: &group::Id) -> super::Result<bool> {
        let Some(group) = self.view.groups.iter().find(|g| g.id() == id).cloned() else {
            debug!("ignoring selection of unknown group {id}");
            return Ok(false);
        };

        // the previous group stays active when its history cannot be loaded
        let history = self.store.find_messages(id).await?;

        self.view.active = Some(group);
        self.clear_messages();
        for m in history {
            self.listed.insert(m.id);
            self.view.messages.push(DisplayMessage::from(m));
        }
        debug!("loaded {} messages of group {id}", self.view.messages.len());

        Ok(true)
    }

    /// Publishes the message on the channel, then appends it to the store.
    ///
    /// Returns `Ok(None)` without side effects for blank text, no active group
    /// or an unavailable channel.
    pub async fn send_message(&mut self, text: &str) -> super::Result<Option<ChatEvent>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let Some(group) = &self.view.active else {
            return Ok(None);
        };
        if !self.channel.is_available() {
            warn!("channel is unavailable, message is not sent");
            return Ok(None);
        }

        let event = ChatEvent {
            id: message::Id::random(),
            group: *group.id(),
            name: self.profile.display_name(),
            image: self.avatar(),
            data: text.to_string(),
            timestamp: Utc::now(),
            connection_id: *self.channel.connection_id(),
        };

        self.channel
            .publish(CHAT_CHANNEL, CHAT_EVENT, &event)
            .await
            .map_err(super::Error::PublishFailed)?;

        let message = NewMessage::new(
            event.id,
            event.group,
            *self.profile.id(),
            &event.data,
            event.timestamp,
        );
        self.store
            .add_message(&message)
            .await
            .map_err(|e| super::Error::AppendFailed(event.id, e))?;

        Ok(Some(event))
    }

    /// Appends an event of the active group to the message list.
    pub fn handle_event(&mut self, event: ChatEvent) -> Option<&DisplayMessage> {
        let active = self.view.active.as_ref()?;
        if active.id() != &event.group {
            return None;
        }
        if !self.listed.insert(event.id) {
            debug!("dropping already listed message {}", event.id);
            return None;
        }

        self.view.messages.push(DisplayMessage::from(event));
        self.view.messages.last()
    }

    pub fn is_own(&self, m: &DisplayMessage) -> bool {
        &m.connection_id == self.channel.connection_id()
    }

    fn clear_messages(&mut self) {
        self.view.messages.clear();
        self.listed.clear();
    }

    fn avatar(&self) -> String {
        avatar::thumbnail(self.profile.picture()).unwrap_or_else(|e| {
            warn!("could not resize avatar of {}: {e}", self.profile.id());
            user::DEFAULT_AVATAR.to_string()
        })
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    use futures::StreamExt;

    use crate::event::Channel;
    use crate::event::channel::test::{BroadcastChannel, Hub, hub};
    use crate::group::service::test::Store;
    use crate::message::model::Sender;
    use crate::user::Id;

    use super::*;

    fn profile() -> Profile {
        Profile::new(Id::random(), "Katalin", "Kariko", None)
    }

    fn session(store: &Store, hub: &Hub, profile: &Profile) -> (Coordinator, Arc<BroadcastChannel>) {
        let channel = Arc::new(BroadcastChannel::connect(hub));
        store.messages.register(Sender::new(
            *profile.id(),
            profile.first_name(),
            profile.last_name(),
            profile.photo().map(String::from),
        ));
        let c = Coordinator::new(store.service(), channel.clone(), profile.clone());
        (c, channel)
    }

    fn event(group: &group::Id, text: &str) -> ChatEvent {
        ChatEvent {
            id: message::Id::random(),
            group: *group,
            name: "Drew Weissman".into(),
            image: user::DEFAULT_AVATAR.into(),
            data: text.into(),
            timestamp: Utc::now(),
            connection_id: ConnectionId::random(),
        }
    }

    async fn persist(store: &Store, group: &group::Id, sender: &Profile, text: &str) -> message::Id {
        let m = NewMessage::new(message::Id::random(), *group, *sender.id(), text, Utc::now());
        store.service().add_message(&m).await.unwrap()
    }

    #[tokio::test]
    async fn should_select_created_group_with_empty_list() {
        let (store, hub) = (Store::new(), hub());
        let (mut c, _) = session(&store, &hub, &profile());

        let created = c.create_group("Research").await.unwrap().clone();
        let selected = c.select_group(created.id()).await.unwrap();

        assert!(selected);
        assert_eq!(c.view().active.as_ref(), Some(&created));
        assert!(c.view().messages.is_empty());
        assert_eq!(c.view().groups, vec![created]);
    }

    #[tokio::test]
    async fn should_reject_blank_group_name() {
        let (store, hub) = (Store::new(), hub());
        let (mut c, _) = session(&store, &hub, &profile());

        let res = c.create_group("   ").await;

        assert!(matches!(res, Err(super::super::Error::MissingName)));
        assert!(store.service().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_reject_duplicate_group_name() {
        let (store, hub) = (Store::new(), hub());
        let (mut c, _) = session(&store, &hub, &profile());
        c.create_group("Research").await.unwrap();

        let res = c.create_group("Research").await;

        assert!(matches!(res, Err(super::super::Error::AlreadyExists(name)) if name == "Research"));
        assert_eq!(store.service().find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_compare_group_names_case_sensitively() {
        let (store, hub) = (Store::new(), hub());
        let (mut c, _) = session(&store, &hub, &profile());
        c.create_group("Research").await.unwrap();

        c.create_group("research").await.unwrap();

        assert_eq!(c.view().groups.len(), 2);
        assert_eq!(c.view().active.as_ref().map(Group::name), Some("research"));
    }

    #[tokio::test]
    async fn should_compare_untrimmed_group_names() {
        let (store, hub) = (Store::new(), hub());
        let (mut c, _) = session(&store, &hub, &profile());
        c.create_group("Research").await.unwrap();

        c.create_group("Research ").await.unwrap();

        let names = c.view().groups.iter().map(Group::name).collect::<Vec<_>>();
        assert_eq!(names, vec!["Research", "Research "]);
    }

    #[tokio::test]
    async fn should_clear_messages_when_creating_group() {
        let (store, hub) = (Store::new(), hub());
        let (mut c, _) = session(&store, &hub, &profile());
        let first = c.create_group("Kinases").await.unwrap().clone();
        c.handle_event(event(first.id(), "hi"));

        c.create_group("Proteases").await.unwrap();

        assert!(c.view().messages.is_empty());
    }

    #[tokio::test]
    async fn should_ignore_selection_of_unknown_group() {
        let (store, hub) = (Store::new(), hub());
        let (mut c, _) = session(&store, &hub, &profile());
        let created = c.create_group("Research").await.unwrap().clone();

        let selected = c.select_group(&group::Id::random()).await.unwrap();

        assert!(!selected);
        assert_eq!(c.view().active.as_ref(), Some(&created));
    }

    #[tokio::test]
    async fn should_keep_previous_group_when_history_fails_to_load() {
        let (store, hub) = (Store::new(), hub());
        let (mut c, _) = session(&store, &hub, &profile());
        let a = c.create_group("A").await.unwrap().clone();
        let b = c.create_group("B").await.unwrap().clone();
        c.select_group(a.id()).await.unwrap();
        c.handle_event(event(a.id(), "on a"));
        store.messages.fail_reads.store(true, Ordering::SeqCst);

        let res = c.select_group(b.id()).await;

        assert!(matches!(res, Err(super::super::Error::_Group(_))));
        assert_eq!(c.view().active.as_ref(), Some(&a));
        assert!(c.handle_event(event(b.id(), "on b")).is_none());
        let texts = c.view().messages.iter().map(|m| m.data.as_str()).collect::<Vec<_>>();
        assert_eq!(texts, vec!["on a"]);
    }

    #[tokio::test]
    async fn should_load_groups_from_store() {
        let (store, hub) = (Store::new(), hub());
        let owner = profile();
        store.service().create("Antibiotics", owner.id()).await.unwrap();
        store.service().create("Antivirals", owner.id()).await.unwrap();
        let (mut c, _) = session(&store, &hub, &owner);

        let names = c
            .load_groups()
            .await
            .unwrap()
            .iter()
            .map(|g| g.name().to_string())
            .collect::<Vec<_>>();

        assert_eq!(names, vec!["Antibiotics", "Antivirals"]);
    }

    #[tokio::test]
    async fn should_load_history_in_store_order_with_resolved_senders() {
        let (store, hub) = (Store::new(), hub());
        let me = profile();
        let other = Profile::new(Id::random(), "Drew", "Weissman", Some("pic://drew".into()));
        let (mut c, _) = session(&store, &hub, &me);
        store.messages.register(Sender::new(
            *other.id(),
            "Drew",
            "Weissman",
            Some("pic://drew".into()),
        ));
        let g = store.service().create("mRNA", me.id()).await.unwrap();
        persist(&store, g.id(), &me, "first").await;
        persist(&store, g.id(), &other, "second").await;
        persist(&store, g.id(), &me, "third").await;
        c.load_groups().await.unwrap();

        c.select_group(g.id()).await.unwrap();

        let listed = c
            .view()
            .messages
            .iter()
            .map(|m| (m.name.as_str(), m.image.as_str(), m.data.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            listed,
            vec![
                ("Katalin Kariko", user::DEFAULT_AVATAR, "first"),
                ("Drew Weissman", "pic://drew", "second"),
                ("Katalin Kariko", user::DEFAULT_AVATAR, "third"),
            ]
        );
    }

    #[tokio::test]
    async fn should_append_events_of_active_group_in_receipt_order() {
        let (store, hub) = (Store::new(), hub());
        let (mut c, _) = session(&store, &hub, &profile());
        let g = c.create_group("Research").await.unwrap().clone();
        let other = group::Id::random();

        c.handle_event(event(g.id(), "one"));
        c.handle_event(event(&other, "elsewhere"));
        c.handle_event(event(g.id(), "two"));

        let texts = c
            .view()
            .messages
            .iter()
            .map(|m| m.data.as_str())
            .collect::<Vec<_>>();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn should_discard_events_without_active_group() {
        let (store, hub) = (Store::new(), hub());
        let (mut c, _) = session(&store, &hub, &profile());

        let appended = c.handle_event(event(&group::Id::random(), "lost"));

        assert!(appended.is_none());
        assert!(c.view().messages.is_empty());
    }

    #[tokio::test]
    async fn should_drop_replayed_event_already_in_history() {
        let (store, hub) = (Store::new(), hub());
        let me = profile();
        let (mut c, _) = session(&store, &hub, &me);
        let g = c.create_group("Research").await.unwrap().clone();
        let id = persist(&store, g.id(), &me, "raced").await;
        c.select_group(g.id()).await.unwrap();

        let mut replayed = event(g.id(), "raced");
        replayed.id = id;
        let appended = c.handle_event(replayed).is_some();

        assert!(!appended);
        assert_eq!(c.view().messages.len(), 1);
    }

    #[tokio::test]
    async fn should_not_send_blank_text() {
        let (store, hub) = (Store::new(), hub());
        let (mut c, channel) = session(&store, &hub, &profile());
        let g = c.create_group("Research").await.unwrap().clone();

        let sent = c.send_message(" \n\t").await.unwrap();

        assert!(sent.is_none());
        assert!(channel.published.lock().unwrap().is_empty());
        assert!(store.service().find_messages(g.id()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_not_send_without_active_group() {
        let (store, hub) = (Store::new(), hub());
        let (mut c, channel) = session(&store, &hub, &profile());

        let sent = c.send_message("hello").await.unwrap();

        assert!(sent.is_none());
        assert!(channel.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_not_send_when_channel_is_unavailable() {
        let (store, hub) = (Store::new(), hub());
        let (mut c, channel) = session(&store, &hub, &profile());
        let g = c.create_group("Research").await.unwrap().clone();
        channel.available.store(false, Ordering::SeqCst);

        let sent = c.send_message("hello").await.unwrap();

        assert!(sent.is_none());
        assert!(channel.published.lock().unwrap().is_empty());
        assert!(store.service().find_messages(g.id()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_publish_once_and_append_once() {
        let (store, hub) = (Store::new(), hub());
        let me = profile();
        let (mut c, channel) = session(&store, &hub, &me);
        let g = c.create_group("Research").await.unwrap().clone();

        let sent = c.send_message("hello").await.unwrap().unwrap();

        let published = channel.published.lock().unwrap().clone();
        assert_eq!(published, vec![sent.clone()]);
        assert_eq!(sent.group, *g.id());
        assert_eq!(sent.name, "Katalin Kariko");
        assert_eq!(sent.image, user::DEFAULT_AVATAR);
        assert_eq!(&sent.connection_id, channel.connection_id());

        let stored = store.service().find_messages(g.id()).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, sent.id);
        assert_eq!(stored[0].text, "hello");
        assert_eq!(stored[0].sender.id(), *me.id());
    }

    #[tokio::test]
    async fn should_fall_back_to_default_avatar_when_resize_fails() {
        let (store, hub) = (Store::new(), hub());
        let me = Profile::new(
            Id::random(),
            "Katalin",
            "Kariko",
            Some("data:image/png;base64,bm90IGFuIGltYWdl".into()),
        );
        let (mut c, _) = session(&store, &hub, &me);
        c.create_group("Research").await.unwrap();

        let sent = c.send_message("hello").await.unwrap().unwrap();

        assert_eq!(sent.image, user::DEFAULT_AVATAR);
    }

    #[tokio::test]
    async fn should_not_append_when_publish_fails() {
        let (store, hub) = (Store::new(), hub());
        let (mut c, channel) = session(&store, &hub, &profile());
        let g = c.create_group("Research").await.unwrap().clone();
        channel.fail_publish.store(true, Ordering::SeqCst);

        let res = c.send_message("hello").await;

        assert!(matches!(res, Err(super::super::Error::PublishFailed(_))));
        assert!(store.service().find_messages(g.id()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_report_published_message_that_was_not_stored() {
        let (store, hub) = (Store::new(), hub());
        let (mut c, channel) = session(&store, &hub, &profile());
        c.create_group("Research").await.unwrap();
        store.messages.fail_inserts.store(true, Ordering::SeqCst);

        let res = c.send_message("hello").await;

        let published = channel.published.lock().unwrap().clone();
        assert_eq!(published.len(), 1);
        assert!(
            matches!(res, Err(super::super::Error::AppendFailed(id, _)) if id == published[0].id)
        );
    }

    #[tokio::test]
    async fn should_deliver_sent_message_to_second_client() {
        let (store, hub) = (Store::new(), hub());
        let (mut alice, _) = session(&store, &hub, &profile());
        let bob_profile = Profile::new(Id::random(), "Drew", "Weissman", None);
        let (bob, _) = session(&store, &hub, &bob_profile);
        let mut bob_events = bob.subscribe().await.unwrap();

        let g = alice.create_group("Research").await.unwrap().clone();
        alice.send_message("hello").await.unwrap();

        let received = bob_events.next().await.unwrap();
        assert_eq!(received.data, "hello");
        assert_eq!(received.group, *g.id());
    }

    #[tokio::test]
    async fn should_tell_own_messages_by_connection() {
        let (store, hub) = (Store::new(), hub());
        let (mut alice, _) = session(&store, &hub, &profile());
        let bob_profile = Profile::new(Id::random(), "Drew", "Weissman", None);
        let (mut bob, _) = session(&store, &hub, &bob_profile);
        let mut alice_events = alice.subscribe().await.unwrap();

        let g = alice.create_group("Research").await.unwrap().clone();
        bob.load_groups().await.unwrap();
        bob.select_group(g.id()).await.unwrap();
        let sent = alice.send_message("hello").await.unwrap().unwrap();

        let echoed = alice_events.next().await.unwrap();
        let own = alice.handle_event(echoed).cloned().unwrap();
        let foreign = bob.handle_event(sent).cloned().unwrap();

        assert!(alice.is_own(&own));
        assert!(!bob.is_own(&foreign));
    }
}
