//! Check aggregation
//!
//! Normalizes the two heterogeneous check sources — legacy combined
//! commit status and Checks API runs — into one ordered list of
//! `RefCheck`s. Both sources must be available; partial data is treated
//! as unreliable rather than best-effort.

use crate::types::{CombinedCheckResult, RefCheck};
use gh_checks_client::{ApiCheckRun, ChecksApiClient};
use log::debug;
use std::collections::HashMap;

/// Fetch and merge the full check state for a ref
///
/// Issues the two fetches concurrently and joins them. Returns `None`
/// when either source is unavailable or when the combined list is empty
/// (no signal). Statuses map 1:1 and come first; check runs are
/// deduplicated by name before being appended.
pub async fn checks_for_ref(
    client: &dyn ChecksApiClient,
    owner: &str,
    name: &str,
    git_ref: &str,
) -> Option<CombinedCheckResult> {
    let (status, runs) = tokio::join!(
        client.fetch_combined_ref_status(owner, name, git_ref),
        client.fetch_ref_check_runs(owner, name, git_ref),
    );

    let status = match status {
        Ok(status) => status,
        Err(e) => {
            debug!(
                "Combined status unavailable for {}/{} @ {}: {}",
                owner, name, git_ref, e
            );
            return None;
        }
    };
    let runs = match runs {
        Ok(runs) => runs,
        Err(e) => {
            debug!(
                "Check runs unavailable for {}/{} @ {}: {}",
                owner, name, git_ref, e
            );
            return None;
        }
    };

    let mut checks: Vec<RefCheck> = status
        .statuses
        .into_iter()
        .map(RefCheck::from_status)
        .collect();
    checks.extend(
        latest_check_runs(runs.check_runs)
            .into_iter()
            .map(RefCheck::from_check_run),
    );

    if checks.is_empty() {
        debug!("No checks for {}/{} @ {}", owner, name, git_ref);
        return None;
    }

    Some(CombinedCheckResult { checks })
}

/// Keep only the most recent run per check name
///
/// A check can be re-run; only the latest attempt is meaningful. Recency
/// is judged by run id (re-runs get higher ids); on equal ids the earlier
/// source position wins, the upstream list being reverse-chronological.
/// First-seen name order is preserved.
fn latest_check_runs(runs: Vec<ApiCheckRun>) -> Vec<ApiCheckRun> {
    let mut index_by_name: HashMap<String, usize> = HashMap::new();
    let mut latest: Vec<ApiCheckRun> = Vec::new();

    for run in runs {
        match index_by_name.get(run.name.as_str()) {
            Some(&idx) => {
                if run.id > latest[idx].id {
                    latest[idx] = run;
                }
            }
            None => {
                index_by_name.insert(run.name.clone(), latest.len());
                latest.push(run);
            }
        }
    }

    latest
}
