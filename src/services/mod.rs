//! Business logic services.
//!
//! This module contains the GitHub client, the review policies and verdict
//! reporting. Services are independent of the process environment so they
//! can be exercised directly in tests.

pub mod github_client;
pub mod lead_reviewer_config;
pub mod policy;
pub mod reporter;
pub mod source;

pub use github_client::{GitHubClient, GitHubClientConfig};
pub use reporter::{ActionsReporter, MemoryReporter, Reporter};
pub use source::{FileContent, PullRequestSource};
