//! GitHub API data transfer objects
//!
//! These types represent the data returned from the GitHub API.
//! They are intentionally separate from application domain models
//! to keep this crate pure and reusable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A signed-in account on a GitHub endpoint
///
/// `emails` holds the verified addresses associated with the account.
/// Verification happens at sign-in time; this crate treats the list
/// as authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// API endpoint the account is signed in against
    /// (e.g., "https://api.github.com")
    pub endpoint: String,

    /// Verified email addresses for the account
    pub emails: Vec<String>,
}

impl Account {
    /// Whether the given address belongs to this account
    ///
    /// Email comparison is ASCII-case-insensitive, matching how
    /// GitHub treats addresses.
    pub fn has_email(&self, email: &str) -> bool {
        self.emails.iter().any(|e| e.eq_ignore_ascii_case(email))
    }
}

/// Combined commit status for a git ref (legacy Status API)
///
/// Some CI systems still report through the Status API rather than
/// the newer Checks API; both must be fetched for full coverage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedRefStatus {
    /// Overall state combining all statuses
    pub state: StatusState,

    /// Total number of status entries
    pub total_count: u64,

    /// Individual status entries
    pub statuses: Vec<ApiRefStatusItem>,
}

/// A single entry from the combined status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiRefStatusItem {
    /// Status context (e.g., "ci/circleci")
    pub context: String,

    /// Current state
    pub state: StatusState,

    /// Description of the status
    pub description: Option<String>,

    /// URL for more details
    pub target_url: Option<String>,

    /// When the status was created
    pub created_at: Option<DateTime<Utc>>,

    /// When the status was last updated
    pub updated_at: Option<DateTime<Utc>>,
}

/// State of a commit status (Status API, not Checks API)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusState {
    /// All checks passed
    Success,
    /// At least one check is pending
    Pending,
    /// At least one check failed
    Failure,
    /// Error retrieving status
    Error,
}

/// Check runs for a git ref (Checks API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRunList {
    /// Total number of check runs
    pub total_count: u64,

    /// Check runs, most recent first as returned by the API
    pub check_runs: Vec<ApiCheckRun>,
}

/// A CI check run from the GitHub API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCheckRun {
    /// Check run ID; re-runs of the same check get a higher ID
    pub id: u64,

    /// Name of the check (e.g., "build", "test")
    pub name: String,

    /// Current status
    pub status: CheckRunStatus,

    /// Conclusion (only set when status is Completed)
    pub conclusion: Option<CheckConclusion>,

    /// URL to the check run details
    pub details_url: Option<String>,

    /// When the check started
    pub started_at: Option<DateTime<Utc>>,

    /// When the check completed
    pub completed_at: Option<DateTime<Utc>>,
}

/// Status of a check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckRunStatus {
    /// Check is queued
    Queued,
    /// Check is in progress
    InProgress,
    /// Check has completed
    Completed,
}

/// Conclusion of a completed check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    /// Check passed
    Success,
    /// Check failed
    Failure,
    /// Check was neutral (neither success nor failure)
    Neutral,
    /// Check was cancelled
    Cancelled,
    /// Check was skipped
    Skipped,
    /// Check timed out
    TimedOut,
    /// Action is required from the user
    ActionRequired,
    /// Check is stale (superseded by newer run)
    Stale,
}

/// A commit from the GitHub API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCommit {
    /// Full commit SHA
    pub sha: String,

    /// Commit author identity; may be absent for commits with
    /// unmapped or missing author information
    pub author: Option<CommitIdentity>,

    /// Full commit message
    pub message: String,
}

/// Author or committer identity on a commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitIdentity {
    /// Author name
    pub name: Option<String>,

    /// Author email
    pub email: Option<String>,
}
