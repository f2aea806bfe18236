//! Domain models for the notification pipeline
//!
//! These types are deliberately separate from the API DTOs in
//! `gh-checks-client`; the pipeline normalizes heterogeneous API payloads
//! into them before making any decision.

use gh_checks_client::{
    ApiCheckRun, ApiCommit, ApiRefStatusItem, CheckConclusion, CheckRunStatus, StatusState,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A local repository, optionally linked to a remote GitHub repository
///
/// Only repositories with a linked remote are eligible for check-failure
/// notifications; a repository without one is treated as "no selection".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    /// Local working directory of the repository
    pub path: PathBuf,

    /// Linked remote repository, if the local repository has one
    pub github_repository: Option<GitHubRepository>,
}

/// Identity of a remote GitHub repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubRepository {
    /// Repository owner (user or organization)
    pub owner: String,

    /// Repository name
    pub name: String,

    /// API endpoint the repository lives on
    /// (e.g., "https://api.github.com")
    pub endpoint: String,
}

/// A pull request from the local pull-request cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number (e.g., 123)
    pub number: u64,

    /// HEAD branch name (e.g., "feature/foo")
    pub head_ref: String,

    /// PR title
    pub title: String,
}

/// Commit metadata, immutable once fetched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    /// Full commit SHA
    pub sha: String,

    /// Author email, used for the relevance filter
    pub author_email: String,

    /// Summary line of the commit message
    pub summary: String,
}

impl Commit {
    /// Build a commit from the API payload
    ///
    /// Returns `None` when the payload carries no author email, since a
    /// commit without one can never pass the relevance filter.
    pub fn from_api(api: ApiCommit) -> Option<Self> {
        let author_email = api.author.and_then(|a| a.email)?;
        let summary = api.message.lines().next().unwrap_or_default().to_string();

        Some(Self {
            sha: api.sha,
            author_email,
            summary,
        })
    }
}

/// Normalized check state for a ref
///
/// Produced by merging two heterogeneous sources (commit statuses and
/// check runs) into one shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefCheck {
    /// Name of the check (status context or check-run name)
    pub name: String,

    /// Current status
    pub status: CheckRunStatus,

    /// Conclusion (only set when the check has completed)
    pub conclusion: Option<CheckConclusion>,

    /// When the check started
    pub started_at: Option<DateTime<Utc>>,

    /// When the check completed
    pub completed_at: Option<DateTime<Utc>>,
}

impl RefCheck {
    /// Normalize a legacy Status API entry
    ///
    /// Pending statuses map to an in-progress check without conclusion;
    /// error states count as failures, there is no finer-grained signal
    /// in the legacy model.
    pub fn from_status(item: ApiRefStatusItem) -> Self {
        let (status, conclusion) = match item.state {
            StatusState::Success => (CheckRunStatus::Completed, Some(CheckConclusion::Success)),
            StatusState::Pending => (CheckRunStatus::InProgress, None),
            StatusState::Failure | StatusState::Error => {
                (CheckRunStatus::Completed, Some(CheckConclusion::Failure))
            }
        };

        Self {
            name: item.context,
            status,
            conclusion,
            started_at: item.created_at,
            completed_at: item.updated_at,
        }
    }

    /// Normalize a Checks API run
    pub fn from_check_run(run: ApiCheckRun) -> Self {
        Self {
            name: run.name,
            status: run.status,
            conclusion: run.conclusion,
            started_at: run.started_at,
            completed_at: run.completed_at,
        }
    }

    /// Whether this check concluded with an exact failure
    ///
    /// Other non-success conclusions (cancelled, skipped, neutral, ...)
    /// are not failures for notification purposes.
    pub fn is_failure(&self) -> bool {
        self.conclusion == Some(CheckConclusion::Failure)
    }
}

/// The aggregate of all checks for a ref
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedCheckResult {
    /// All checks for the ref: statuses first, then check runs
    pub checks: Vec<RefCheck>,
}

impl CombinedCheckResult {
    /// Number of checks that concluded with an exact failure
    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.is_failure()).count()
    }

    /// Overall conclusion, derived from the worst individual conclusion
    ///
    /// `None` when the worst entry is still running.
    pub fn conclusion(&self) -> Option<CheckConclusion> {
        self.checks
            .iter()
            .max_by_key(|c| conclusion_severity(c.conclusion))
            .and_then(|c| c.conclusion)
    }
}

/// Severity ranking for the worst-conclusion aggregation
///
/// A still-running check (no conclusion) outranks benign conclusions but
/// never a failure.
fn conclusion_severity(conclusion: Option<CheckConclusion>) -> u8 {
    match conclusion {
        Some(CheckConclusion::Failure) => 7,
        Some(CheckConclusion::TimedOut) => 6,
        Some(CheckConclusion::ActionRequired) => 5,
        Some(CheckConclusion::Cancelled) => 4,
        None => 3,
        Some(CheckConclusion::Neutral) => 2,
        Some(CheckConclusion::Stale) => 2,
        Some(CheckConclusion::Skipped) => 1,
        Some(CheckConclusion::Success) => 0,
    }
}
