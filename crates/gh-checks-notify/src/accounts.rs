//! Account resolution
//!
//! Accounts are persisted elsewhere; the pipeline only needs to map a
//! remote repository's endpoint to a signed-in account authorized for it.

use async_trait::async_trait;
use gh_checks_client::Account;

/// Account persistence collaborator
#[async_trait]
pub trait AccountsStore: Send + Sync {
    /// All currently signed-in accounts
    async fn get_all(&self) -> Vec<Account>;
}

/// Resolve an account authorized for the given endpoint
///
/// The first signed-in account on the endpoint wins; there is no notion
/// of a preferred account per repository.
pub async fn find_account_for_endpoint(
    store: &dyn AccountsStore,
    endpoint: &str,
) -> Option<Account> {
    store
        .get_all()
        .await
        .into_iter()
        .find(|account| account.endpoint == endpoint)
}
