//! Review policies.
//!
//! Each policy is a pure predicate over a [`ReviewerStatus`] aggregate.
//!
//! [`ReviewerStatus`]: crate::models::ReviewerStatus

pub mod approval;
pub mod lead_reviewers;

pub use approval::ApprovalTally;
pub use lead_reviewers::LeadCoverage;

/// Policy a verdict was computed under, with the inputs needed to explain it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyContext {
    Approvals(ApprovalTally),
    LeadReviewers(Vec<LeadCoverage>),
}

/// Step output carrying the approvals verdict.
pub const APPROVALS_OUTPUT: &str = "approved";

/// Step output carrying the lead reviewer verdict.
pub const LEAD_REVIEWERS_OUTPUT: &str = "lead-reviewers-added";

impl PolicyContext {
    /// Name of the step output the verdict is published under.
    pub fn output_name(&self) -> &'static str {
        match self {
            Self::Approvals(_) => APPROVALS_OUTPUT,
            Self::LeadReviewers(_) => LEAD_REVIEWERS_OUTPUT,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Approvals(_) => "Approval policy",
            Self::LeadReviewers(_) => "Lead reviewer policy",
        }
    }
}
