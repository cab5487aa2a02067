//! Approval count policy.

use crate::models::{ReviewState, ReviewerStatus};

/// Approval counts relevant to the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalTally {
    pub approved: usize,
    pub changes_requested: usize,
    pub required: u32,
}

impl ApprovalTally {
    pub fn from_status(status: &ReviewerStatus, required: u32) -> Self {
        Self {
            approved: status.count(ReviewState::Approved),
            changes_requested: status.count(ReviewState::ChangesRequested),
            required,
        }
    }

    /// Enough approvals and no outstanding change requests.
    pub fn passes(&self) -> bool {
        self.approved >= self.required as usize && self.changes_requested == 0
    }
}

/// Whether `status` has at least `required` approvals and no change requests.
pub fn decide(status: &ReviewerStatus, required: u32) -> bool {
    ApprovalTally::from_status(status, required).passes()
}
