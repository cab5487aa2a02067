//! PR Review Gate - pull request review policies for GitHub Actions.
//!
//! The gate reads the reviews and open review requests of one pull request,
//! folds them into a current state per reviewer and applies one of two
//! policies:
//!
//! - **approvals**: at least N approvals and no outstanding change requests;
//! - **lead reviewers**: every reviewer listed in a repository config file has
//!   been requested or has reviewed.
//!
//! The verdict is published as a step output for a later job to act on. The
//! gate never modifies the pull request.

pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

use commands::{run_approval_gate, run_lead_reviewer_gate, Gate, GateOutcome};
use config::ActionEnvironment;
use error::AppError;
use models::PullRequestEvent;
use services::{GitHubClient, GitHubClientConfig, Reporter};

/// Run one gate invocation against the GitHub API.
pub async fn run(
    gate: &Gate,
    env: &ActionEnvironment,
    reporter: &mut dyn Reporter,
) -> Result<GateOutcome, AppError> {
    let event = PullRequestEvent::load(&env.event_path).await?;

    let client = GitHubClient::new(
        GitHubClientConfig {
            base_url: env.api_url.clone(),
            token: env.token.clone(),
            ..Default::default()
        },
        env.repository.clone(),
    )?;

    log::debug!("Evaluating {}#{}", env.repository, event.number);

    match gate {
        Gate::Approvals(input) => run_approval_gate(&client, &event, input, reporter).await,
        Gate::LeadReviewers(input) => run_lead_reviewer_gate(&client, &event, input, reporter).await,
    }
}
