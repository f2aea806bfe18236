//! Alive push-channel events
//!
//! "Alive" is the real-time channel that pushes coarse-grained remote
//! state changes. The transport itself is a collaborator behind the
//! `AliveStore` trait; this module only defines the typed events and the
//! subscription seam.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedReceiver;

/// A typed event from the Alive push channel
///
/// The enum is non-exhaustive on purpose: the channel grows new kinds
/// over time, and consumers must ignore the ones they don't handle
/// rather than erroring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
#[non_exhaustive]
pub enum AliveEvent {
    /// A check run for one of the user's pull requests finished with
    /// failures
    ChecksFailed {
        /// Number of the pull request the checks ran for
        pull_request_number: u64,
        /// SHA of the commit the checks ran against
        commit_sha: String,
    },

    /// A review was submitted on one of the user's pull requests
    PullRequestReviewSubmitted {
        /// Number of the reviewed pull request
        pull_request_number: u64,
    },
}

/// The Alive transport collaborator
///
/// Owns the connection to the push channel. Enabling/disabling is
/// synchronous; subscriptions deliver events in arrival order.
pub trait AliveStore: Send + Sync {
    /// Enable or disable delivery of events to subscribers
    fn set_enabled(&self, enabled: bool);

    /// Subscribe to the event stream
    ///
    /// Events arrive in the order the channel delivered them. Each call
    /// returns an independent receiver.
    fn subscribe(&self) -> UnboundedReceiver<AliveEvent>;
}
