//! Short-form chat notification
//!
//! One status line with a result glyph, plus the build URL on its own line
//! when the server has one. The URL is sent as plain text; Flowdock links
//! it client-side, so no markdown wrapping is applied.

use crate::message::remove_whitespace;
use crate::outcome::BuildOutcome;

/// Identity shown as the chat message sender.
pub const DEFAULT_EXTERNAL_USER_NAME: &str = "Jenkins";

/// Payload for the `/messages/chat/` endpoint.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub content: String,
    pub external_user_name: String,
    /// Comma-separated tags; whitespace is stripped on encode.
    pub tags: String,
}

impl Default for ChatMessage {
    fn default() -> Self {
        Self {
            content: String::new(),
            external_user_name: DEFAULT_EXTERNAL_USER_NAME.to_string(),
            tags: String::new(),
        }
    }
}

impl ChatMessage {
    /// Compose the one-line status message for a finished build.
    ///
    /// Pure function of the outcome; delivery failures surface later, at
    /// push time.
    pub fn from_build(build: &BuildOutcome) -> Self {
        let (project_name, configuration) = build.project_and_config();

        let mut content = String::new();
        content.push_str(build.result.glyph());
        content.push_str(project_name);
        if let Some(config) = configuration {
            content.push_str(" on ");
            content.push_str(config);
        }
        content.push_str(" build ");
        content.push_str(&build.build_number());
        content.push(' ');
        content.push_str(build.result.human_result());
        if let Some(url) = &build.build_url {
            content.push('\n');
            content.push_str(url);
        }

        Self {
            content,
            ..Self::default()
        }
    }

    pub(crate) fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("content", self.content.clone()),
            ("external_user_name", self.external_user_name.clone()),
            ("tags", remove_whitespace(&self.tags)),
        ]
    }
}
