//! Gate pipelines.
//!
//! Each command runs one linear pipeline: fetch review data, aggregate it per
//! reviewer, apply one policy and report the verdict. Any error aborts the
//! remaining work and is returned to the caller.

pub mod approvals;
pub mod lead_reviewers;

pub use approvals::{run_approval_gate, ApprovalGateInput};
pub use lead_reviewers::{run_lead_reviewer_gate, LeadReviewerGateInput};

/// Result of one gate invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// A verdict was computed and published.
    Verdict(bool),
    /// The trigger does not concern reviews; nothing was published.
    Skipped,
}

/// Which gate to run, with its inputs.
#[derive(Debug, Clone)]
pub enum Gate {
    Approvals(ApprovalGateInput),
    LeadReviewers(LeadReviewerGateInput),
}
