//! Read-only view of a pull request's review data.
//!
//! The gate pipelines depend on this trait rather than on the HTTP client so
//! they can be driven by canned data in tests.

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{PendingReviewRequest, ReviewEvent};

/// Raw repository file as returned by the contents API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub path: String,
    /// Encoded file body; absent for directories and oversized files.
    pub content: Option<String>,
    /// Encoding of `content`, e.g. `base64`.
    pub encoding: Option<String>,
}

/// Source of reviews, review requests and repository files.
#[async_trait]
pub trait PullRequestSource: Send + Sync {
    /// Posted reviews, oldest first.
    async fn reviews(&self, number: u64) -> Result<Vec<ReviewEvent>, AppError>;

    /// Users with an open review request.
    async fn pending_requests(&self, number: u64) -> Result<Vec<PendingReviewRequest>, AppError>;

    /// A file from the repository at `git_ref` (default branch when `None`).
    async fn file_content(
        &self,
        path: &str,
        git_ref: Option<&str>,
    ) -> Result<FileContent, AppError>;
}
