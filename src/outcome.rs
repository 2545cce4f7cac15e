//! Build outcome and changeset structures
//!
//! Data handed in by the surrounding build system when a run completes.
//! Everything here is read-only input to the message builders.

use std::collections::HashMap;
use std::fmt;

/// Environment variables captured from the finished build.
pub type EnvVars = HashMap<String, String>;

/// Terminal status of a CI run, ordered best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BuildResult {
    Success,
    Unstable,
    Failure,
    NotBuilt,
    Aborted,
}

impl BuildResult {
    /// Status glyph shown at the start of a chat message.
    pub fn glyph(&self) -> &'static str {
        match self {
            BuildResult::Success => ":white_check_mark:",
            BuildResult::Unstable => ":heavy_exclamation_mark:",
            BuildResult::Failure => ":x:",
            BuildResult::Aborted => ":no_entry_sign:",
            BuildResult::NotBuilt => ":o:",
        }
    }

    /// Past-tense phrase for use inside a sentence ("build 12 failed").
    pub fn human_result(&self) -> &'static str {
        match self {
            BuildResult::Success => "was successful",
            BuildResult::Unstable => "was unstable",
            BuildResult::Failure => "failed",
            BuildResult::Aborted => "was aborted",
            BuildResult::NotBuilt => "was not built",
        }
    }

    /// Returns true for any result other than a clean success.
    pub fn is_worse_than_success(&self) -> bool {
        *self > BuildResult::Success
    }
}

impl fmt::Display for BuildResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BuildResult::Success => "Success",
            BuildResult::Unstable => "Unstable",
            BuildResult::Failure => "Failure",
            BuildResult::Aborted => "Aborted",
            BuildResult::NotBuilt => "Not built",
        };
        write!(f, "{}", label)
    }
}

/// Identity and result of one finished build.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// Display name of the project that ran.
    pub project_name: String,
    /// Display name of the parent project, set only when this build is one
    /// sub-configuration of a multi-configuration matrix.
    pub parent_name: Option<String>,
    /// Build display number as reported by the server, e.g. "#42".
    pub display_number: String,
    pub result: BuildResult,
    /// Canonical build URL; absent when the server has no public URL configured.
    pub build_url: Option<String>,
}

impl BuildOutcome {
    /// Splits the outcome into the root project name and, for a matrix
    /// sub-configuration, the child configuration name.
    pub fn project_and_config(&self) -> (&str, Option<&str>) {
        match &self.parent_name {
            Some(parent) => (parent.as_str(), Some(self.project_name.as_str())),
            None => (self.project_name.as_str(), None),
        }
    }

    /// Build number with the leading `#` stripped.
    pub fn build_number(&self) -> String {
        self.display_number.replace('#', "")
    }
}

/// One version-control commit associated with a build.
#[derive(Debug, Clone)]
pub struct ChangesetEntry {
    pub author: String,
    /// Commit identifier; some SCMs do not report one.
    pub commit_id: Option<String>,
    pub message: String,
}

impl ChangesetEntry {
    /// Full commit id, or "unknown" when the SCM reported none.
    pub fn commit_id_or_unknown(&self) -> &str {
        self.commit_id.as_deref().unwrap_or("unknown")
    }

    /// Commit id truncated for display; shorter ids pass through whole.
    pub fn short_commit_id(&self, length: usize) -> &str {
        let id = self.commit_id_or_unknown();
        match id.char_indices().nth(length) {
            Some((idx, _)) => &id[..idx],
            None => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_ordering() {
        assert!(!BuildResult::Success.is_worse_than_success());
        assert!(BuildResult::Unstable.is_worse_than_success());
        assert!(BuildResult::Failure.is_worse_than_success());
        assert!(BuildResult::Aborted.is_worse_than_success());
        assert!(BuildResult::NotBuilt.is_worse_than_success());
    }

    #[test]
    fn test_build_number_strips_hash() {
        let outcome = BuildOutcome {
            project_name: "app".into(),
            parent_name: None,
            display_number: "#17".into(),
            result: BuildResult::Success,
            build_url: None,
        };
        assert_eq!(outcome.build_number(), "17");
    }

    #[test]
    fn test_matrix_build_splits_parent_and_config() {
        let outcome = BuildOutcome {
            project_name: "linux-x86".into(),
            parent_name: Some("app".into()),
            display_number: "3".into(),
            result: BuildResult::Success,
            build_url: None,
        };
        assert_eq!(outcome.project_and_config(), ("app", Some("linux-x86")));
    }

    #[test]
    fn test_short_commit_id_handles_missing_and_short_ids() {
        let entry = ChangesetEntry {
            author: "dev".into(),
            commit_id: None,
            message: "fix".into(),
        };
        assert_eq!(entry.commit_id_or_unknown(), "unknown");
        assert_eq!(entry.short_commit_id(7), "unknown");

        let entry = ChangesetEntry {
            author: "dev".into(),
            commit_id: Some("ab12".into()),
            message: "fix".into(),
        };
        assert_eq!(entry.short_commit_id(7), "ab12");
    }
}
