//! Triggering workflow event.
//!
//! Only the fields the gate needs are read from the payload at
//! `GITHUB_EVENT_PATH`: the event action, the pull request number and the
//! pull request's base branch.

use serde::Deserialize;
use std::path::Path;

use crate::error::AppError;

/// Action that triggered the workflow run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerAction {
    /// A review was submitted (`pull_request_review`).
    Submitted,
    /// A reviewer was requested (`pull_request`).
    ReviewRequested,
    Other(String),
}

impl TriggerAction {
    /// Whether this action can change the approvals verdict.
    pub fn is_review_activity(&self) -> bool {
        matches!(self, Self::Submitted | Self::ReviewRequested)
    }
}

impl From<&str> for TriggerAction {
    fn from(s: &str) -> Self {
        match s {
            "submitted" => Self::Submitted,
            "review_requested" => Self::ReviewRequested,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for TriggerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Submitted => write!(f, "submitted"),
            Self::ReviewRequested => write!(f, "review_requested"),
            Self::Other(action) => write!(f, "{}", action),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    action: Option<String>,
    pull_request: Option<RawPullRequest>,
}

#[derive(Debug, Deserialize)]
struct RawPullRequest {
    number: u64,
    base: Option<RawBranch>,
}

#[derive(Debug, Deserialize)]
struct RawBranch {
    #[serde(rename = "ref")]
    ref_name: String,
}

/// The pull request a workflow run was triggered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    pub action: TriggerAction,

    /// Pull request number within the repository.
    pub number: u64,

    /// Base branch name, used as the ref for repository file lookups.
    pub base_ref: Option<String>,
}

impl PullRequestEvent {
    /// Parse an event payload.
    pub fn from_json(payload: &str) -> Result<Self, AppError> {
        let raw: RawEvent = serde_json::from_str(payload)?;

        let pull_request = raw.pull_request.ok_or_else(|| {
            AppError::unsupported_event("Event payload does not contain a pull request")
        })?;

        Ok(Self {
            action: TriggerAction::from(raw.action.as_deref().unwrap_or_default()),
            number: pull_request.number,
            base_ref: pull_request.base.map(|b| b.ref_name),
        })
    }

    /// Read and parse the event payload file.
    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let payload = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::io(
                format!("Failed to read event payload: {}", e),
                path.display().to_string(),
            )
        })?;
        Self::from_json(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_submitted_payload() {
        let payload = r#"{
            "action": "submitted",
            "review": {"state": "approved"},
            "pull_request": {"number": 42, "base": {"ref": "main", "sha": "abc"}}
        }"#;
        let event = PullRequestEvent::from_json(payload).unwrap();
        assert_eq!(event.action, TriggerAction::Submitted);
        assert_eq!(event.number, 42);
        assert_eq!(event.base_ref.as_deref(), Some("main"));
    }

    #[test]
    fn test_payload_without_pull_request() {
        let payload = r#"{"action": "opened", "issue": {"number": 3}}"#;
        let err = PullRequestEvent::from_json(payload).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedEvent { .. }));
    }

    #[test]
    fn test_missing_action_is_other() {
        let payload = r#"{"pull_request": {"number": 7}}"#;
        let event = PullRequestEvent::from_json(payload).unwrap();
        assert_eq!(event.action, TriggerAction::Other(String::new()));
        assert!(!event.action.is_review_activity());
        assert_eq!(event.base_ref, None);
    }

    #[test]
    fn test_trigger_action_classification() {
        assert!(TriggerAction::from("submitted").is_review_activity());
        assert!(TriggerAction::from("review_requested").is_review_activity());
        assert!(!TriggerAction::from("synchronize").is_review_activity());
        assert_eq!(TriggerAction::from("edited").to_string(), "edited");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = PullRequestEvent::load(Path::new("/nonexistent/event.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
    }
}
