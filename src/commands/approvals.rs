//! Approval count gate.

use crate::config::parse_required_approvals;
use crate::error::AppError;
use crate::models::{PullRequestEvent, ReviewerStatus};
use crate::services::policy::{approval, ApprovalTally, PolicyContext};
use crate::services::reporter::{publish, render, Reporter};
use crate::services::source::PullRequestSource;

use super::GateOutcome;

/// Inputs for the approvals gate.
#[derive(Debug, Clone, Default)]
pub struct ApprovalGateInput {
    /// Raw `required_approvals` input; unset means the default threshold.
    pub required_approvals: Option<String>,
}

/// Check that the pull request has enough approvals and no change requests.
///
/// Only `submitted` and `review_requested` triggers are evaluated; any other
/// action is reported and skipped without publishing an output.
pub async fn run_approval_gate(
    source: &dyn PullRequestSource,
    event: &PullRequestEvent,
    input: &ApprovalGateInput,
    reporter: &mut dyn Reporter,
) -> Result<GateOutcome, AppError> {
    let required = parse_required_approvals(input.required_approvals.as_deref())?;

    if !event.action.is_review_activity() {
        reporter.info(&format!(
            "Action '{}' does not affect reviews, skipping",
            event.action
        ));
        return Ok(GateOutcome::Skipped);
    }

    log::info!(
        "Checking #{} for {} approval(s) (trigger: {})",
        event.number,
        required,
        event.action
    );

    let (reviews, pending) = futures::try_join!(
        source.reviews(event.number),
        source.pending_requests(event.number)
    )?;

    let status = ReviewerStatus::aggregate(&reviews, &pending);
    let verdict = approval::decide(&status, required);

    let context = PolicyContext::Approvals(ApprovalTally::from_status(&status, required));
    let summary = render(&status, verdict, &context);
    publish(reporter, &summary, verdict, context.output_name())?;

    Ok(GateOutcome::Verdict(verdict))
}
