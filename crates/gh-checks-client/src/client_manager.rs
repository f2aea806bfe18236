//! Per-endpoint GitHub client manager
//!
//! Manages GitHub API clients for different endpoints (github.com,
//! GitHub Enterprise). Clients are lazily initialized and cached per
//! endpoint.

use crate::client::{ApiProvider, ChecksApiClient};
use crate::types::Account;
use crate::{OctocrabChecksClient, DEFAULT_ENDPOINT};
use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use octocrab::Octocrab;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Resolves GitHub tokens for different endpoints
///
/// Tries multiple sources in order:
/// 1. Host-specific env var (e.g., `GITHUB_TOKEN_GHE_EXAMPLE_COM`)
/// 2. `gh auth token --hostname {host}` command
/// 3. Generic `GITHUB_TOKEN` or `GH_TOKEN` (github.com only)
#[derive(Debug, Clone)]
pub struct TokenResolver {
    /// Cached default token from GITHUB_TOKEN/GH_TOKEN
    default_token: Option<String>,
}

impl Default for TokenResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenResolver {
    /// Create a new token resolver
    pub fn new() -> Self {
        let default_token = std::env::var("GITHUB_TOKEN")
            .or_else(|_| std::env::var("GH_TOKEN"))
            .ok();

        Self { default_token }
    }

    /// Get a token for the given endpoint
    pub async fn get_token(&self, endpoint: &str) -> Result<String> {
        let host = endpoint_host(endpoint);

        // Try host-specific env var
        let env_key = format!(
            "GITHUB_TOKEN_{}",
            host.replace(['.', '-'], "_").to_uppercase()
        );
        if let Ok(token) = std::env::var(&env_key) {
            debug!("Using token from env var {} for host {}", env_key, host);
            return Ok(token);
        }

        // Try gh CLI with hostname
        debug!("Trying gh auth token for host {}", host);
        let output = tokio::process::Command::new("gh")
            .args(["auth", "token", "--hostname", &host])
            .output()
            .await
            .context("Failed to run 'gh auth token'")?;

        if output.status.success() {
            let token = String::from_utf8(output.stdout)
                .context("Invalid UTF-8 in gh auth token output")?
                .trim()
                .to_string();
            if !token.is_empty() {
                debug!("Using token from gh CLI for host {}", host);
                return Ok(token);
            }
        }

        // Fallback to default token (for github.com only)
        if endpoint == DEFAULT_ENDPOINT {
            if let Some(ref token) = self.default_token {
                debug!("Using default token (GITHUB_TOKEN/GH_TOKEN) for github.com");
                return Ok(token.clone());
            }
        }

        Err(anyhow::anyhow!(
            "No token found for host '{}'. \
             Set {} or run 'gh auth login --hostname {}'",
            host,
            env_key,
            host
        ))
    }
}

/// Extract the sign-in host from an API endpoint URL
///
/// "https://api.github.com" maps back to "github.com"; enterprise
/// endpoints ("https://ghe.example.com/api/v3") keep their host.
fn endpoint_host(endpoint: &str) -> String {
    let stripped = endpoint
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let host = stripped.split('/').next().unwrap_or(stripped);

    if host == "api.github.com" {
        "github.com".to_string()
    } else {
        host.to_string()
    }
}

/// Manages GitHub API clients for multiple endpoints
///
/// Lazily creates and caches one client per endpoint. Each client is
/// configured with the appropriate base URL and authentication token.
pub struct ClientManager {
    /// Cached clients per endpoint
    clients: Mutex<HashMap<String, Arc<OctocrabChecksClient>>>,
    /// Token resolver
    tokens: TokenResolver,
}

impl Default for ClientManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientManager {
    /// Create a new client manager
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
            tokens: TokenResolver::new(),
        }
    }

    /// Check if a client exists for the given endpoint (without creating one)
    pub fn has_client(&self, endpoint: &str) -> bool {
        self.clients.lock().unwrap().contains_key(endpoint)
    }

    /// Create a new client for the given endpoint
    async fn create_client(&self, endpoint: &str) -> Result<OctocrabChecksClient> {
        info!("Creating GitHub client for endpoint: {}", endpoint);

        let token = self.tokens.get_token(endpoint).await?;

        let mut builder = Octocrab::builder().personal_token(token);
        if endpoint != DEFAULT_ENDPOINT {
            builder = builder
                .base_uri(endpoint)
                .context("Failed to set base URI")?;
        }

        let octocrab = builder.build().context("Failed to build Octocrab client")?;

        info!("GitHub client created for endpoint: {}", endpoint);
        Ok(OctocrabChecksClient::new(Arc::new(octocrab)))
    }
}

#[async_trait]
impl ApiProvider for ClientManager {
    async fn client_for_account(&self, account: &Account) -> Option<Arc<dyn ChecksApiClient>> {
        if let Some(client) = self.clients.lock().unwrap().get(&account.endpoint) {
            return Some(Arc::clone(client) as Arc<dyn ChecksApiClient>);
        }

        match self.create_client(&account.endpoint).await {
            Ok(client) => {
                let client = Arc::new(client);
                self.clients
                    .lock()
                    .unwrap()
                    .insert(account.endpoint.clone(), Arc::clone(&client));
                Some(client as Arc<dyn ChecksApiClient>)
            }
            Err(e) => {
                debug!("No client for endpoint {}: {}", account.endpoint, e);
                None
            }
        }
    }
}
