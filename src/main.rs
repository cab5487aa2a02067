use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pr_review_gate::commands::{ApprovalGateInput, Gate, GateOutcome, LeadReviewerGateInput};
use pr_review_gate::config::ActionEnvironment;
use pr_review_gate::services::{ActionsReporter, Reporter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pr-review-gate")]
#[command(version, about = "Evaluate pull request reviews against a policy")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Require a number of approvals and no outstanding change requests
    Approvals {
        /// Minimum number of approving reviewers (default 1)
        #[arg(long, env = "INPUT_REQUIRED_APPROVALS")]
        required_approvals: Option<String>,
    },
    /// Require every configured lead reviewer to be added as a reviewer
    LeadReviewers {
        /// Repository path of the YAML file listing reviewers.defaults
        #[arg(long, env = "INPUT_CONFIG_PATH")]
        config_path: Option<String>,
    },
}

impl From<Commands> for Gate {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Approvals { required_approvals } => {
                Gate::Approvals(ApprovalGateInput { required_approvals })
            }
            Commands::LeadReviewers { config_path } => {
                Gate::LeadReviewers(LeadReviewerGateInput {
                config_path: config_path.unwrap_or_default(),
            })
            }
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout is reserved for workflow commands
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let env = match ActionEnvironment::from_env() {
        Ok(env) => env,
        Err(e) => {
            log::error!("{}", e);
            ActionsReporter::new(None, None).fail(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    let mut reporter = ActionsReporter::new(env.output_path.clone(), env.step_summary_path.clone());
    let gate = Gate::from(cli.command);

    match pr_review_gate::run(&gate, &env, &mut reporter).await {
        Ok(GateOutcome::Verdict(verdict)) => {
            log::info!("Verdict: {}", verdict);
            ExitCode::SUCCESS
        }
        Ok(GateOutcome::Skipped) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            reporter.fail(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
