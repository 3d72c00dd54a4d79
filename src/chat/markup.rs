use maud::{Markup, Render, html};

use crate::group::model::Group;
use crate::user::{markup::Header, model::Profile};

use super::DisplayMessage;

const MESSAGES_ID: &str = "messages";

pub struct ChatWindow<'a>(pub &'a Profile);

impl Render for ChatWindow<'_> {
    fn render(&self) -> Markup {
        html! {
            div #chat-window ."flex h-full" hx-ext="ws" ws-connect="/ws" {
                aside ."w-64 mr-4 flex flex-col" {
                    (Header(self.0))
                    (CreateGroupForm)
                    (GroupList::new(&[], None))
                }
                section ."flex-1 flex flex-col bg-white rounded-lg shadow p-4" {
                    div #errors {}
                    (ActiveGroup(None))
                    (MessageList::new(&[], &|_| false))
                    (SendForm)
                }
            }
        }
    }
}

struct CreateGroupForm;

impl Render for CreateGroupForm {
    fn render(&self) -> Markup {
        html! {
            form #create-group ."flex mb-4" ws-send {
                input type="hidden" name="type" value="create_group" {}
                input ."flex-1 px-3 py-2 border border-gray-300 rounded-l-md focus:outline-none"
                    type="text"
                    name="name"
                    placeholder="New group name"
                    autocomplete="off" {}
                input ."px-3 py-2 text-white bg-green-700 hover:bg-green-800 rounded-r-md"
                    type="submit"
                    value="Create" {}
            }
        }
    }
}

pub struct GroupList<'a> {
    groups: &'a [Group],
    active: Option<&'a Group>,
}

impl<'a> GroupList<'a> {
    pub const fn new(groups: &'a [Group], active: Option<&'a Group>) -> Self {
        Self { groups, active }
    }
}

impl Render for GroupList<'_> {
    fn render(&self) -> Markup {
        html! {
            ul #groups ."flex flex-col space-y-1" hx-swap-oob="true" {
                @for group in self.groups {
                    @let active = self.active.is_some_and(|a| a.id() == group.id());
                    li {
                        form ws-send {
                            input type="hidden" name="type" value="select_group" {}
                            input type="hidden" name="group_id" value=(group.id()) {}
                            button ."w-full text-left px-3 py-2 rounded-md hover:bg-gray-200"
                                .bg-gray-300[active]
                                type="submit"
                            {
                                (group.name())
                            }
                        }
                    }
                }
            }
        }
    }
}

pub struct ActiveGroup<'a>(pub Option<&'a Group>);

impl Render for ActiveGroup<'_> {
    fn render(&self) -> Markup {
        html! {
            header #active-group ."text-2xl mb-4" hx-swap-oob="true" {
                @match self.0 {
                    Some(group) => (group.name()),
                    None => "Select or create a group",
                }
            }
        }
    }
}

pub struct MessageList<'a> {
    messages: &'a [DisplayMessage],
    is_own: &'a dyn Fn(&DisplayMessage) -> bool,
}

impl<'a> MessageList<'a> {
    pub fn new(messages: &'a [DisplayMessage], is_own: &'a dyn Fn(&DisplayMessage) -> bool) -> Self {
        Self { messages, is_own }
    }
}

impl Render for MessageList<'_> {
    fn render(&self) -> Markup {
        html! {
            div #(MESSAGES_ID) ."flex-1 overflow-y-auto flex flex-col space-y-2 mb-4" hx-swap-oob="true" {
                @for m in self.messages {
                    (MessageItem::new(m, (self.is_own)(m)))
                }
            }
        }
    }
}

/// A single message appended to the end of the list.
pub struct NewMessageItem<'a>(pub MessageItem<'a>);

impl Render for NewMessageItem<'_> {
    fn render(&self) -> Markup {
        html! {
            div #(MESSAGES_ID) hx-swap-oob="beforeend" {
                (self.0)
            }
        }
    }
}

pub struct MessageItem<'a> {
    message: &'a DisplayMessage,
    own: bool,
}

impl<'a> MessageItem<'a> {
    pub const fn new(message: &'a DisplayMessage, own: bool) -> Self {
        Self { message, own }
    }
}

impl Render for MessageItem<'_> {
    fn render(&self) -> Markup {
        let m = self.message;
        let (row_class, bubble_class) = if self.own {
            ("sent flex justify-end", "bg-blue-600 text-white")
        } else {
            ("received flex justify-start", "bg-gray-200 text-gray-900")
        };

        html! {
            div .(row_class) id={"m-" (m.id)} {
                img ."w-8 h-8 rounded-full mr-2" src=(m.image) alt="User avatar" {}
                div ."max-w-md px-3 py-2 rounded-lg" .(bubble_class) {
                    div ."text-xs font-bold" { (m.name) }
                    p { (m.data) }
                    span ."text-xs opacity-75" { (m.timestamp.format("%H:%M")) }
                }
            }
        }
    }
}

pub struct SendForm;

impl Render for SendForm {
    fn render(&self) -> Markup {
        html! {
            form #send-form ."flex" ws-send hx-swap-oob="true" {
                input type="hidden" name="type" value="send_message" {}
                input ."flex-1 px-3 py-2 border border-gray-300 rounded-l-md focus:outline-none"
                    type="text"
                    name="text"
                    placeholder="Type your message..."
                    autocomplete="off" {}
                input ."px-4 py-2 text-white bg-blue-600 hover:bg-blue-700 rounded-r-md"
                    type="submit"
                    value="Send" {}
            }
        }
    }
}
