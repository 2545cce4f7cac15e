//! Message model shared by both notification variants
//!
//! A message is built once from a finished build, encoded into an ordered
//! `application/x-www-form-urlencoded` body, pushed, and discarded.

use url::form_urlencoded;

use crate::chat::ChatMessage;
use crate::inbox::InboxMessage;

/// A notification payload ready for delivery, one of the two Flowdock
/// message kinds. The delivery client dispatches on the variant to pick the
/// API path and wire fields.
#[derive(Debug, Clone)]
pub enum FlowdockMessage {
    Chat(ChatMessage),
    Inbox(InboxMessage),
}

impl FlowdockMessage {
    /// API path this message is POSTed to, relative to the API base URL.
    pub fn api_path(&self) -> &'static str {
        match self {
            FlowdockMessage::Chat(_) => "/messages/chat/",
            FlowdockMessage::Inbox(_) => "/messages/team_inbox/",
        }
    }

    /// Wire fields in their fixed transmission order.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            FlowdockMessage::Chat(msg) => msg.form_fields(),
            FlowdockMessage::Inbox(msg) => msg.form_fields(),
        }
    }

    /// Form-encoded POST body, each field percent-encoded individually.
    pub fn as_post_data(&self) -> String {
        let mut body = form_urlencoded::Serializer::new(String::new());
        for (name, value) in self.form_fields() {
            body.append_pair(name, &value);
        }
        body.finish()
    }
}

impl From<ChatMessage> for FlowdockMessage {
    fn from(msg: ChatMessage) -> Self {
        FlowdockMessage::Chat(msg)
    }
}

impl From<InboxMessage> for FlowdockMessage {
    fn from(msg: InboxMessage) -> Self {
        FlowdockMessage::Inbox(msg)
    }
}

/// Drops every whitespace character; tags must not carry any on the wire.
pub(crate) fn remove_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
