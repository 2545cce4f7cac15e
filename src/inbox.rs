//! Long-form team inbox notification
//!
//! HTML-bodied message with the build result, a link, a version control
//! summary pulled from build environment variables, and the commit history
//! of the run, most recent commit first.

use crate::message::remove_whitespace;
use crate::outcome::{BuildOutcome, ChangesetEntry, EnvVars};

/// Sender address for successful builds. Flowdock renders a Gravatar icon
/// per address, so ok and fail builds get distinct icons.
pub const BUILD_OK_ADDRESS: &str = "build+ok@flowdock.com";
/// Sender address for builds that ended worse than success.
pub const BUILD_FAIL_ADDRESS: &str = "build+fail@flowdock.com";

/// Identity shown as the inbox message source.
pub const DEFAULT_SOURCE: &str = "Jenkins";
/// Display name attached to the sender address.
pub const DEFAULT_FROM_NAME: &str = "CI";

/// Commit ids are shortened to this many characters in the commit list.
const SHORT_COMMIT_ID_LEN: usize = 7;

/// Environment variables contributing to the version control summary,
/// paired with their display labels.
const VCS_ENV_VARS: [(&str, &str); 4] = [
    ("GIT_BRANCH", "Git branch"),
    ("GIT_URL", "Git URL"),
    ("SVN_REVISION", "SVN revision"),
    ("SVN_URL", "SVN URL"),
];

/// Payload for the `/messages/team_inbox/` endpoint.
#[derive(Debug, Clone)]
pub struct InboxMessage {
    pub source: String,
    /// Project label, restricted to `[A-Za-z0-9-_ ]` by the API.
    pub project: String,
    pub subject: String,
    pub content: String,
    pub link: Option<String>,
    pub from_address: String,
    pub from_name: String,
    /// Comma-separated tags; whitespace is stripped on encode.
    pub tags: String,
}

impl Default for InboxMessage {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            project: String::new(),
            subject: String::new(),
            content: String::new(),
            link: None,
            from_address: BUILD_OK_ADDRESS.to_string(),
            from_name: DEFAULT_FROM_NAME.to_string(),
            tags: String::new(),
        }
    }
}

impl InboxMessage {
    /// Compose the inbox notification for a finished build.
    ///
    /// Pure function of its inputs. Missing data (no link, no recognized
    /// environment variables, empty changeset, commit without an id) is
    /// rendered as an omission, never an error.
    pub fn from_build(build: &BuildOutcome, changeset: &[ChangesetEntry], env: &EnvVars) -> Self {
        let (project_name, configuration) = build.project_and_config();

        let mut subject = format!("{} build {}", project_name, build.build_number());
        if let Some(config) = configuration {
            subject.push_str(" on ");
            subject.push_str(config);
        }
        subject.push(' ');
        subject.push_str(build.result.human_result());

        let from_address = if build.result.is_worse_than_success() {
            BUILD_FAIL_ADDRESS
        } else {
            BUILD_OK_ADDRESS
        };

        let mut content = String::new();
        content.push_str(&format!("<h3>{}</h3>", project_name));
        content.push_str(&format!("Build: {}<br />", build.display_number));
        content.push_str(&format!("Result: {}<br />", build.result));
        if let Some(url) = &build.build_url {
            content.push_str(&format!("URL: <a href=\"{}\">{}</a><br />", url, url));
        }

        let vcs_info = version_control_summary(env);
        if !vcs_info.is_empty() {
            content.push_str("<br /><strong>Version control:</strong><br />");
            content.push_str(&vcs_info);
            content.push_str("<br/>");
        }

        if !changeset.is_empty() {
            content.push_str("<h3>Changes</h3>");
            content.push_str("<div class=\"commits\"><ul class=\"commit-list clean\">");
            // recent commits first
            for commit in changeset.iter().rev() {
                content.push_str(&commit_list_item(commit));
            }
            content.push_str("</ul></div>");
        }

        Self {
            project: sanitize_project_name(project_name),
            subject,
            content,
            link: build.build_url.clone(),
            from_address: from_address.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("subject", self.subject.clone()),
            ("content", self.content.clone()),
            ("from_address", self.from_address.clone()),
            ("from_name", self.from_name.clone()),
            ("source", self.source.clone()),
            ("project", self.project.clone()),
            ("link", self.link.clone().unwrap_or_default()),
            ("tags", remove_whitespace(&self.tags)),
        ]
    }
}

/// Strips every character the inbox API rejects in a project label.
fn sanitize_project_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ' '))
        .collect()
}

/// One `<li>` for the commit list: author, short id with the full id as
/// hover detail, and the escaped commit message.
fn commit_list_item(commit: &ChangesetEntry) -> String {
    format!(
        "<li class=\"commit\"><span class=\"commit-details\">\
         <span class=\"author-info\"><span>{}</span></span> &nbsp;\
         <span title=\"{}\" class=\"commit-sha\">{}</span> &nbsp;\
         <span class=\"commit-message\">{}</span>\
         </span></li>",
        commit.author,
        commit.commit_id_or_unknown(),
        commit.short_commit_id(SHORT_COMMIT_ID_LEN),
        escape_html(&commit.message),
    )
}

/// Labeled lines for each recognized VCS environment variable; empty when
/// none of them are set.
fn version_control_summary(env: &EnvVars) -> String {
    let mut summary = String::new();
    for (key, label) in VCS_ENV_VARS {
        if let Some(value) = env.get(key) {
            summary.push_str(&format!("{}: {}<br/>", label, value));
        }
    }
    summary
}

/// Escapes text for embedding in the HTML body.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
