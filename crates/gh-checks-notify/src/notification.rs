//! Notification composition and dispatch seam
//!
//! Builds the user-visible payload for a checks-failed notification and
//! defines the OS notification collaborator. Rendering and click delivery
//! belong to the platform layer; display failures are not reported back
//! and not retried.

use crate::types::{PullRequest, RefCheck, Repository};

/// Fixed title for checks-failed notifications
pub const CHECKS_FAILED_TITLE: &str = "Pull Request checks failed";

/// Number of SHA characters shown in the notification body
const SHORT_SHA_LEN: usize = 9;

/// A user-facing OS notification payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Notification title
    pub title: String,

    /// Notification body
    pub body: String,
}

/// OS notification collaborator
///
/// Constructs the platform notification, attaches the click handler and
/// shows it. The handler fires at most once.
pub trait NotificationDispatcher: Send + Sync {
    /// Show a notification with a click-interaction handler
    fn show(&self, notification: Notification, on_click: Box<dyn FnOnce() + Send>);
}

/// Everything a click observer needs to replay the context
#[derive(Debug, Clone)]
pub struct ChecksFailedPayload {
    /// Repository the checks ran in
    pub repository: Repository,

    /// The pull request whose checks failed
    pub pull_request: PullRequest,

    /// Summary line of the commit the checks ran against
    pub commit_message: String,

    /// Full SHA of that commit
    pub sha: String,

    /// The combined check list at dispatch time
    pub checks: Vec<RefCheck>,
}

/// Observer invoked when the user clicks a checks-failed notification
pub type ChecksFailedCallback = Box<dyn Fn(ChecksFailedPayload) + Send + Sync>;

/// Compose the checks-failed notification for a pull request
///
/// Returns `None` when no check actually failed; this covers the race
/// where checks were restarted between the push event firing and the
/// state fetch completing.
pub fn checks_failed_notification(
    pull_request: &PullRequest,
    checks: &[RefCheck],
    sha: &str,
) -> Option<Notification> {
    let failed = checks.iter().filter(|c| c.is_failure()).count();
    if failed == 0 {
        return None;
    }

    let short_sha = sha.get(..SHORT_SHA_LEN).unwrap_or(sha);
    let phrase = if failed == 1 {
        "check was"
    } else {
        "checks were"
    };

    Some(Notification {
        title: CHECKS_FAILED_TITLE.to_string(),
        body: format!(
            "{} #{} ({})\n{} {} not successful.",
            pull_request.title, pull_request.number, short_sha, failed, phrase
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gh_checks_client::{CheckConclusion, CheckRunStatus};

    fn pull_request() -> PullRequest {
        PullRequest {
            number: 42,
            head_ref: "feature/caching".to_string(),
            title: "Add caching".to_string(),
        }
    }

    fn check(name: &str, conclusion: CheckConclusion) -> RefCheck {
        RefCheck {
            name: name.to_string(),
            status: CheckRunStatus::Completed,
            conclusion: Some(conclusion),
            started_at: None,
            completed_at: None,
        }
    }

    #[test]
    fn test_singular_body() {
        let checks = vec![
            check("build", CheckConclusion::Failure),
            check("lint", CheckConclusion::Success),
        ];

        let notification =
            checks_failed_notification(&pull_request(), &checks, "abc1234567890").unwrap();
        assert_eq!(notification.title, "Pull Request checks failed");
        assert_eq!(
            notification.body,
            "Add caching #42 (abc123456)\n1 check was not successful."
        );
    }

    #[test]
    fn test_plural_body() {
        let checks = vec![
            check("build", CheckConclusion::Failure),
            check("test", CheckConclusion::Failure),
        ];

        let notification =
            checks_failed_notification(&pull_request(), &checks, "abc1234567890").unwrap();
        assert_eq!(
            notification.body,
            "Add caching #42 (abc123456)\n2 checks were not successful."
        );
    }

    #[test]
    fn test_zero_failures_composes_nothing() {
        let checks = vec![
            check("build", CheckConclusion::Success),
            check("lint", CheckConclusion::Cancelled),
        ];

        assert!(checks_failed_notification(&pull_request(), &checks, "abc1234567890").is_none());
    }

    #[test]
    fn test_short_sha_tolerates_short_input() {
        let checks = vec![check("build", CheckConclusion::Failure)];

        let notification = checks_failed_notification(&pull_request(), &checks, "abc").unwrap();
        assert!(notification.body.contains("(abc)"));
    }
}
