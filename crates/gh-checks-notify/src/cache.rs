//! Process-lifetime commit cache
//!
//! Memoizes fetched commit metadata by SHA, and separately tracks a
//! "do not retry" set of SHAs known to be irrelevant or unfetchable.
//! Neither table evicts: both are scoped to one process lifetime and
//! bounded by realistic event volume. A long-lived deployment would want
//! an LRU here instead.

use crate::types::Commit;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// In-memory commit cache with a skip set
///
/// A SHA ends up in exactly one of the two tables once handled: the
/// cache if the commit resolved, the skip set if it was a dead end
/// (not found, or authored by someone else). Skip-set entries are never
/// removed.
#[derive(Debug, Default)]
pub struct CommitCache {
    commits: Mutex<HashMap<String, Commit>>,
    skipped: Mutex<HashSet<String>>,
}

impl CommitCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached commit by SHA
    pub fn get(&self, sha: &str) -> Option<Commit> {
        self.commits.lock().unwrap().get(sha).cloned()
    }

    /// Cache a resolved commit
    ///
    /// Last write wins; the same SHA always maps to the same fetched
    /// value, so overwrites are idempotent.
    pub fn insert(&self, commit: Commit) {
        self.commits
            .lock()
            .unwrap()
            .insert(commit.sha.clone(), commit);
    }

    /// Whether processing for this SHA was already abandoned
    pub fn is_skipped(&self, sha: &str) -> bool {
        self.skipped.lock().unwrap().contains(sha)
    }

    /// Mark a SHA as a known dead end
    pub fn skip(&self, sha: &str) {
        self.skipped.lock().unwrap().insert(sha.to_string());
    }
}
