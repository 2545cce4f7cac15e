//! Compose and deliver CI build notifications to the Flowdock push API.
//!
//! The surrounding build system hands this crate a [`BuildOutcome`], the
//! build's changeset and environment variables, and a [`DeliveryConfig`].
//! The builders turn those into one of two immutable payloads — a one-line
//! [`ChatMessage`] or an HTML-bodied [`InboxMessage`] — and
//! [`FlowdockClient`] pushes each as a single form-encoded HTTP POST.
//! Failures come back as a typed [`DeliveryError`]; a failed notification
//! is the caller's to log, never to retry here.

pub mod chat;
pub mod client;
pub mod error;
pub mod inbox;
pub mod message;
pub mod outcome;

pub use chat::ChatMessage;
pub use client::FlowdockClient;
pub use error::{DeliveryError, Result};
pub use inbox::InboxMessage;
pub use message::FlowdockMessage;
pub use outcome::{BuildOutcome, BuildResult, ChangesetEntry, EnvVars};

use serde::Deserialize;

/// Where and how notifications are delivered.
#[derive(Debug, Deserialize, Clone)]
pub struct DeliveryConfig {
    /// Base URL of the Flowdock API, e.g. `https://api.flowdock.com/v1`.
    pub api_url: String,
    /// Flow token appended to the message path. Whitespace is tolerated
    /// here and stripped before use.
    pub flow_token: String,
    pub proxy_host: Option<String>,
    pub proxy_port: Option<u16>,
    pub proxy_username: Option<String>,
    pub proxy_password: Option<String>,
}

impl DeliveryConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Flow token with all whitespace removed.
    pub fn trimmed_flow_token(&self) -> String {
        message::remove_whitespace(&self.flow_token)
    }

    /// Proxy URL when both host and port are configured.
    pub fn proxy_url(&self) -> Option<String> {
        match (&self.proxy_host, self.proxy_port) {
            (Some(host), Some(port)) if !host.is_empty() => {
                Some(format!("http://{}:{}", host, port))
            }
            _ => None,
        }
    }

    /// Proxy credentials, present only when a username is set and non-empty.
    pub fn proxy_auth(&self) -> Option<(&str, &str)> {
        match &self.proxy_username {
            Some(user) if !user.is_empty() => {
                Some((user.as_str(), self.proxy_password.as_deref().unwrap_or("")))
            }
            _ => None,
        }
    }
}
