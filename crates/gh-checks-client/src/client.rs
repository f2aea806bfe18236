//! GitHub checks client trait
//!
//! This module defines the core `ChecksApiClient` trait that all client
//! implementations must satisfy, and the `ApiProvider` trait used to
//! obtain a client for a signed-in account.

use crate::types::{Account, ApiCommit, CheckRunList, CombinedRefStatus};
use async_trait::async_trait;
use std::sync::Arc;

/// GitHub checks/status API client trait
///
/// Defines the read-only surface the notification pipeline needs:
/// combined ref status, check runs, and commit lookup. Implementations
/// can be direct (hitting the API) or decorated with caching, rate
/// limiting, retry logic, etc.
///
/// Consumers treat an `Err` from any of these calls the same as missing
/// data; no error is surfaced past the call site.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks and threads.
#[async_trait]
pub trait ChecksApiClient: Send + Sync {
    /// Fetch the combined commit status for a git ref
    ///
    /// This uses the legacy Status API which some CI systems still use
    /// (as opposed to the newer Checks API).
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner (user or organization)
    /// * `name` - Repository name
    /// * `git_ref` - Branch name or commit SHA
    async fn fetch_combined_ref_status(
        &self,
        owner: &str,
        name: &str,
        git_ref: &str,
    ) -> anyhow::Result<CombinedRefStatus>;

    /// Fetch check runs for a git ref
    ///
    /// Runs are returned most recent first, as ordered by the API.
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `name` - Repository name
    /// * `git_ref` - Branch name or commit SHA
    async fn fetch_ref_check_runs(
        &self,
        owner: &str,
        name: &str,
        git_ref: &str,
    ) -> anyhow::Result<CheckRunList>;

    /// Fetch a single commit by SHA
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the commit does not exist in the repository;
    /// `Err` for transport or authentication failures.
    async fn fetch_commit(
        &self,
        owner: &str,
        name: &str,
        sha: &str,
    ) -> anyhow::Result<Option<ApiCommit>>;
}

/// Provides an API client authorized for a given account
///
/// Mirrors the "client per signed-in account" model: the provider owns
/// authentication and client construction, callers just ask for a
/// client matching the account's endpoint.
#[async_trait]
pub trait ApiProvider: Send + Sync {
    /// Get a client authenticated for the account's endpoint
    ///
    /// Returns `None` when no usable credentials can be resolved for
    /// the endpoint; callers are expected to treat that as "cannot
    /// authenticate" and back off.
    async fn client_for_account(&self, account: &Account) -> Option<Arc<dyn ChecksApiClient>>;
}
