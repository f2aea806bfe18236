//! Failed-check notification pipeline
//!
//! Consumes coarse-grained "a check run finished" events from the Alive
//! push channel, decides whether the event is relevant and actionable for
//! the active repository and user, reconstructs the authoritative check
//! state through the REST API, and emits a single OS notification with a
//! replay callback.
//!
//! # Architecture
//!
//! ```text
//!  Alive channel ──► NotificationsStore ──► NotificationDispatcher
//!   (AliveStore)            │                  (OS notification)
//!                           │
//!          ┌────────────────┼──────────────────┐
//!          ▼                ▼                  ▼
//!    CommitCache      check aggregator    SettingsStore
//!    (+ skip set)    (status + checks)    (enabled flag)
//! ```
//!
//! Every abort in the pipeline is a silent suppression: a missing pull
//! request, an unauthorized endpoint, a teammate's commit, or unavailable
//! check data all simply produce no notification. Suppressing is always
//! safe; false positives are not.
//!
//! # Example
//!
//! ```rust,ignore
//! use gh_checks_notify::{NotificationsStore, TomlSettings};
//! use std::sync::Arc;
//!
//! let store = Arc::new(NotificationsStore::new(
//!     Arc::new(TomlSettings::load()),
//!     accounts,
//!     pull_requests,
//!     commits,
//!     Arc::new(gh_checks_client::ClientManager::new()),
//!     alive,
//!     notifier,
//! ));
//!
//! store.select_repository(repository);
//! store.on_checks_failed_notification(|payload| {
//!     println!("checks failed on PR #{}", payload.pull_request.number);
//! });
//! Arc::clone(&store).start();
//! ```

pub mod accounts;
pub mod aggregator;
pub mod alive;
pub mod cache;
pub mod error;
pub mod notification;
pub mod settings;
pub mod store;
pub mod types;

pub use accounts::{find_account_for_endpoint, AccountsStore};
pub use aggregator::checks_for_ref;
pub use alive::{AliveEvent, AliveStore};
pub use cache::CommitCache;
pub use error::Suppression;
pub use notification::{
    checks_failed_notification, ChecksFailedCallback, ChecksFailedPayload, Notification,
    NotificationDispatcher, CHECKS_FAILED_TITLE,
};
pub use settings::{SettingsStore, TomlSettings, NOTIFICATIONS_ENABLED_KEY};
pub use store::{CommitLookup, NotificationsStore, PullRequestCoordinator};
pub use types::{
    Commit, CombinedCheckResult, GitHubRepository, PullRequest, RefCheck, Repository,
};

// Re-export the client crate so hosts don't need to depend on it directly
pub use gh_checks_client;
pub use gh_checks_client::{Account, ApiProvider, ChecksApiClient};
