//! Posted reviews and open review requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// State of a review as reported by GitHub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    /// Review requested but not yet submitted.
    Pending,
    Commented,
    Dismissed,
    /// Any state GitHub adds later. Kept in the aggregate, ignored by policies.
    #[serde(other)]
    Other,
}

impl From<&str> for ReviewState {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "approved" => Self::Approved,
            "changes_requested" => Self::ChangesRequested,
            "pending" => Self::Pending,
            "commented" => Self::Commented,
            "dismissed" => Self::Dismissed,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for ReviewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approved => write!(f, "approved"),
            Self::ChangesRequested => write!(f, "changes_requested"),
            Self::Pending => write!(f, "pending"),
            Self::Commented => write!(f, "commented"),
            Self::Dismissed => write!(f, "dismissed"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// One posted review, in the order GitHub returned it (oldest first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEvent {
    /// Reviewer login. `None` when the account has been deleted.
    pub reviewer: Option<String>,

    pub state: ReviewState,

    /// Submission time, informational only; ordering comes from the API.
    pub submitted_at: Option<DateTime<Utc>>,
}

impl ReviewEvent {
    pub fn new(reviewer: impl Into<String>, state: ReviewState) -> Self {
        Self {
            reviewer: Some(reviewer.into()),
            state,
            submitted_at: None,
        }
    }
}

/// A reviewer with an open, unanswered review request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PendingReviewRequest {
    pub reviewer: String,
}

impl PendingReviewRequest {
    pub fn new(reviewer: impl Into<String>) -> Self {
        Self {
            reviewer: reviewer.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_state_deserialize() {
        let states: Vec<ReviewState> = serde_json::from_str(
            r#"["APPROVED", "CHANGES_REQUESTED", "COMMENTED", "DISMISSED", "PENDING"]"#,
        )
        .unwrap();
        assert_eq!(
            states,
            vec![
                ReviewState::Approved,
                ReviewState::ChangesRequested,
                ReviewState::Commented,
                ReviewState::Dismissed,
                ReviewState::Pending,
            ]
        );
    }

    #[test]
    fn test_unknown_state_is_other() {
        let state: ReviewState = serde_json::from_str(r#""SOMETHING_NEW""#).unwrap();
        assert_eq!(state, ReviewState::Other);
        assert_eq!(ReviewState::from("something_new"), ReviewState::Other);
    }

    #[test]
    fn test_state_from_str_ignores_case() {
        assert_eq!(ReviewState::from("APPROVED"), ReviewState::Approved);
        assert_eq!(
            ReviewState::from("Changes_Requested"),
            ReviewState::ChangesRequested
        );
        assert_eq!(ReviewState::ChangesRequested.to_string(), "changes_requested");
    }
}
