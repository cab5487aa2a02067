//! Per-reviewer current review status for a single pull request.
//!
//! The aggregate folds every posted review (oldest first) and then every open
//! review request into one state per reviewer login. A later write for the
//! same login always replaces the earlier one, and an open request always
//! ends as [`ReviewState::Pending`]: GitHub only lists a reviewer as requested
//! when their previous review is no longer current (e.g. re-requested after
//! new commits).

use std::collections::{BTreeMap, BTreeSet};

use super::review::{PendingReviewRequest, ReviewEvent, ReviewState};

/// Mapping from reviewer login to current review state.
///
/// Logins are compared exactly as GitHub returns them (case-sensitive).
/// Iteration is ordered by login.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewerStatus {
    states: BTreeMap<String, ReviewState>,
}

impl ReviewerStatus {
    /// Build the aggregate from posted reviews and open review requests.
    pub fn aggregate(reviews: &[ReviewEvent], pending: &[PendingReviewRequest]) -> Self {
        let mut states = BTreeMap::new();

        for review in reviews {
            // Reviews from deleted accounts come back without a user.
            let Some(reviewer) = review.reviewer.as_deref() else {
                log::debug!("Skipping {} review without a reviewer", review.state);
                continue;
            };
            states.insert(reviewer.to_string(), review.state);
        }

        for request in pending {
            states.insert(request.reviewer.clone(), ReviewState::Pending);
        }

        Self { states }
    }

    /// Current state for a reviewer, if they appear at all.
    pub fn get(&self, reviewer: &str) -> Option<ReviewState> {
        self.states.get(reviewer).copied()
    }

    /// Whether the reviewer has been asked for a review or has responded.
    pub fn contains(&self, reviewer: &str) -> bool {
        self.states.contains_key(reviewer)
    }

    /// Number of reviewers whose current state equals `state`.
    pub fn count(&self, state: ReviewState) -> usize {
        self.states.values().filter(|s| **s == state).count()
    }

    /// All reviewer logins present in the aggregate.
    pub fn identities(&self) -> BTreeSet<&str> {
        self.states.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ReviewState)> {
        self.states.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl FromIterator<(String, ReviewState)> for ReviewerStatus {
    fn from_iter<T: IntoIterator<Item = (String, ReviewState)>>(iter: T) -> Self {
        Self {
            states: iter.into_iter().collect(),
        }
    }
}
