//! Suppression outcomes for the notification pipeline
//!
//! Every abort point in the pipeline is a silent suppression: nothing is
//! surfaced to the user, nothing is retried, nothing is fatal. The typed
//! outcome exists so handlers are testable and so suppressions can be
//! logged at debug level.

use thiserror::Error;

/// Why a checks-failed event produced no notification
///
/// Suppressing a notification is always safe; false negatives are
/// acceptable, false positives are not. Collaborator failures map onto
/// the same variants as genuinely missing data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Suppression {
    /// No repository is selected, the selection has no linked remote,
    /// or the selection changed while the event was in flight
    #[error("no active repository for the event")]
    NoActiveRepository,

    /// The event's pull request is not in the local cache, so it did
    /// not originate from a local action
    #[error("pull request #{0} is not in the local cache")]
    PullRequestNotFound(u64),

    /// No signed-in account is authorized for the repository's endpoint
    #[error("no authorized account for {0}")]
    NoAuthorizedAccount(String),

    /// The commit could not be resolved, or was already marked as a
    /// known dead end
    #[error("commit {0} could not be resolved")]
    CommitUnresolvable(String),

    /// The commit was not authored by the current user
    #[error("commit {0} was not authored by the current user")]
    AuthorMismatch(String),

    /// Check state for the ref could not be aggregated
    #[error("check state for ref {0} is unavailable")]
    ChecksUnavailable(String),

    /// Aggregation succeeded but nothing actually failed
    #[error("no failed checks")]
    NoFailedChecks,
}
