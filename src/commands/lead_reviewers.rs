//! Lead reviewer gate.

use crate::error::AppError;
use crate::models::{PullRequestEvent, ReviewerStatus};
use crate::services::lead_reviewer_config::load_lead_reviewers;
use crate::services::policy::{lead_reviewers, PolicyContext};
use crate::services::reporter::{publish, render, Reporter};
use crate::services::source::PullRequestSource;

use super::GateOutcome;

/// Inputs for the lead reviewer gate.
#[derive(Debug, Clone)]
pub struct LeadReviewerGateInput {
    /// Repository path of the reviewer config file.
    pub config_path: String,
}

/// Check that every lead reviewer has been requested or has reviewed.
///
/// The config file is read from the pull request's base branch so a pull
/// request cannot change its own lead reviewers.
pub async fn run_lead_reviewer_gate(
    source: &dyn PullRequestSource,
    event: &PullRequestEvent,
    input: &LeadReviewerGateInput,
    reporter: &mut dyn Reporter,
) -> Result<GateOutcome, AppError> {
    if input.config_path.trim().is_empty() {
        return Err(AppError::configuration_field(
            "config_path is required",
            "config_path",
        ));
    }

    log::info!(
        "Checking lead reviewers for #{} from {}",
        event.number,
        input.config_path
    );

    let (reviews, pending, file) = futures::try_join!(
        source.reviews(event.number),
        source.pending_requests(event.number),
        source.file_content(&input.config_path, event.base_ref.as_deref())
    )?;

    let leads = load_lead_reviewers(&file)?;

    let status = ReviewerStatus::aggregate(&reviews, &pending);
    let invited = status.identities();
    let verdict = lead_reviewers::decide(&invited, &leads);

    let context = PolicyContext::LeadReviewers(lead_reviewers::coverage(&invited, &leads));
    let summary = render(&status, verdict, &context);
    publish(reporter, &summary, verdict, context.output_name())?;

    Ok(GateOutcome::Verdict(verdict))
}
