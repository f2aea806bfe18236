//! GitHub checks/status API client
//!
//! This crate provides the trait-based API surface the failed-check
//! notification pipeline consumes: combined ref status, check runs, and
//! commit lookup, plus per-endpoint client management with token
//! resolution.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              ChecksApiClient trait               │
//! │  - fetch_combined_ref_status()                   │
//! │  - fetch_ref_check_runs()                        │
//! │  - fetch_commit()                                │
//! └─────────────────────────────────────────────────┘
//!                        ▲
//!                        │ implements
//!              ┌─────────────────────┐
//!              │ OctocrabChecksClient│
//!              │ (direct API)        │
//!              └─────────────────────┘
//!                        ▲
//!                        │ creates per endpoint
//!              ┌─────────────────────┐
//!              │    ClientManager    │──── ApiProvider trait
//!              │ (token resolution)  │
//!              └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_checks_client::{ChecksApiClient, OctocrabChecksClient};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let octocrab = octocrab::Octocrab::builder()
//!     .personal_token("token".to_string())
//!     .build()?;
//!
//! let client = OctocrabChecksClient::new(Arc::new(octocrab));
//! let status = client
//!     .fetch_combined_ref_status("owner", "repo", "feature/branch")
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod client_manager;
pub mod octocrab_client;
pub mod types;

/// Default GitHub API endpoint (public GitHub)
pub const DEFAULT_ENDPOINT: &str = "https://api.github.com";

pub use client::{ApiProvider, ChecksApiClient};
pub use client_manager::{ClientManager, TokenResolver};
pub use octocrab_client::OctocrabChecksClient;
pub use types::{
    Account, ApiCheckRun, ApiCommit, ApiRefStatusItem, CheckConclusion, CheckRunList,
    CheckRunStatus, CombinedRefStatus, CommitIdentity, StatusState,
};

// Re-export octocrab so consumers don't need to depend on it directly
pub use octocrab;
