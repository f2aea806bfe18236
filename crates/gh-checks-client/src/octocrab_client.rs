//! Octocrab-based GitHub checks client
//!
//! Direct implementation of the `ChecksApiClient` trait using the octocrab
//! library. This client makes real API calls without any caching.

use crate::client::ChecksApiClient;
use crate::types::{ApiCommit, CheckRunList, CombinedRefStatus, CommitIdentity};
use async_trait::async_trait;
use log::debug;
use octocrab::Octocrab;
use serde::Deserialize;
use std::sync::Arc;

/// Direct GitHub API client using octocrab
///
/// This is the base implementation that makes actual API calls. All three
/// endpoints go through raw GET routes because octocrab's typed surface
/// does not cover commit-SHA refs for the combined-status endpoint.
#[derive(Debug, Clone)]
pub struct OctocrabChecksClient {
    octocrab: Arc<Octocrab>,
}

/// Shape of `/repos/{owner}/{repo}/commits/{sha}` we care about
#[derive(Debug, Deserialize)]
struct RawRepoCommit {
    sha: String,
    commit: RawGitCommit,
}

#[derive(Debug, Deserialize)]
struct RawGitCommit {
    message: String,
    author: Option<CommitIdentity>,
}

impl OctocrabChecksClient {
    /// Create a new client with the given octocrab instance
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self { octocrab }
    }

    /// Get a reference to the underlying octocrab instance
    pub fn octocrab(&self) -> &Octocrab {
        &self.octocrab
    }
}

#[async_trait]
impl ChecksApiClient for OctocrabChecksClient {
    async fn fetch_combined_ref_status(
        &self,
        owner: &str,
        name: &str,
        git_ref: &str,
    ) -> anyhow::Result<CombinedRefStatus> {
        debug!(
            "Fetching combined status for {}/{} @ {}",
            owner, name, git_ref
        );

        let route = format!("/repos/{}/{}/commits/{}/status", owner, name, git_ref);
        let status: CombinedRefStatus = self.octocrab.get(route, None::<&()>).await?;

        debug!(
            "Combined status for {}/{} @ {}: {:?} ({} statuses)",
            owner,
            name,
            git_ref,
            status.state,
            status.statuses.len()
        );
        Ok(status)
    }

    async fn fetch_ref_check_runs(
        &self,
        owner: &str,
        name: &str,
        git_ref: &str,
    ) -> anyhow::Result<CheckRunList> {
        debug!("Fetching check runs for {}/{} @ {}", owner, name, git_ref);

        let route = format!("/repos/{}/{}/commits/{}/check-runs", owner, name, git_ref);
        let runs: CheckRunList = self.octocrab.get(route, None::<&()>).await?;

        debug!(
            "Fetched {} check runs for {}/{} @ {}",
            runs.check_runs.len(),
            owner,
            name,
            git_ref
        );
        Ok(runs)
    }

    async fn fetch_commit(
        &self,
        owner: &str,
        name: &str,
        sha: &str,
    ) -> anyhow::Result<Option<ApiCommit>> {
        debug!("Fetching commit {}/{} @ {}", owner, name, sha);

        let route = format!("/repos/{}/{}/commits/{}", owner, name, sha);
        match self
            .octocrab
            .get::<RawRepoCommit, _, ()>(route, None)
            .await
        {
            Ok(raw) => Ok(Some(ApiCommit {
                sha: raw.sha,
                author: raw.commit.author,
                message: raw.commit.message,
            })),
            Err(octocrab::Error::GitHub { source, .. })
                if source.status_code.as_u16() == 404 =>
            {
                debug!("Commit {} not found in {}/{}", sha, owner, name);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
