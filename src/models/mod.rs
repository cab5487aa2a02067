//! Data models for the review gate.
//!
//! These models represent the review state of a single pull request and the
//! workflow event the gate was invoked for. They are built fresh on every
//! invocation and never persisted.

pub mod event;
pub mod review;
pub mod reviewer_status;

// Re-exports for convenient access
pub use event::{PullRequestEvent, TriggerAction};
pub use review::{PendingReviewRequest, ReviewEvent, ReviewState};
pub use reviewer_status::ReviewerStatus;
