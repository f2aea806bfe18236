//! The notifications store
//!
//! Owns the active-repository selection and coordinates the whole
//! pipeline for a checks-failed push event: relevance filtering, account
//! resolution, commit caching, check aggregation, and notification
//! dispatch. Every abort is a silent `Suppression`; the store never
//! raises an error path that could reach the host application.

use crate::accounts::{find_account_for_endpoint, AccountsStore};
use crate::aggregator::checks_for_ref;
use crate::alive::{AliveEvent, AliveStore};
use crate::cache::CommitCache;
use crate::error::Suppression;
use crate::notification::{
    checks_failed_notification, ChecksFailedCallback, ChecksFailedPayload, NotificationDispatcher,
};
use crate::settings::{SettingsStore, NOTIFICATIONS_ENABLED_KEY};
use crate::types::{Commit, CombinedCheckResult, GitHubRepository, PullRequest, Repository};
use async_trait::async_trait;
use gh_checks_client::ApiProvider;
use log::{debug, info};
use std::sync::{Arc, Mutex};

/// Pull-request persistence collaborator
///
/// The pull-request cache is owned elsewhere; the store only looks up
/// what is already known locally for a repository.
#[async_trait]
pub trait PullRequestCoordinator: Send + Sync {
    /// All locally known pull requests for the repository
    async fn get_all_pull_requests(&self, repository: &Repository) -> Vec<PullRequest>;
}

/// Commit lookup collaborator
#[async_trait]
pub trait CommitLookup: Send + Sync {
    /// Resolve a commit by SHA, `None` when it cannot be found
    async fn get_commit(&self, repository: &Repository, sha: &str) -> Option<Commit>;
}

/// Coordinates failed-check notifications for the active repository
///
/// The store consumes checks-failed events from the Alive channel,
/// rebuilds the authoritative check state through the API, filters out
/// anything that is not high-signal for the current user, and emits a
/// single OS notification with a replay callback.
///
/// Handlers for distinct events may interleave at any await point. The
/// mutable state involved (commit cache, skip set, selection) tolerates
/// that: the worst outcome is a duplicate fetch or, rarely, a duplicate
/// notification, never a corrupted cache.
pub struct NotificationsStore {
    settings: Arc<dyn SettingsStore>,
    accounts: Arc<dyn AccountsStore>,
    pull_requests: Arc<dyn PullRequestCoordinator>,
    commits: Arc<dyn CommitLookup>,
    api: Arc<dyn ApiProvider>,
    alive: Arc<dyn AliveStore>,
    notifier: Arc<dyn NotificationDispatcher>,

    /// At most one active repository, last write wins
    selection: Mutex<Option<Repository>>,
    commit_cache: CommitCache,

    /// Single-slot click observer; a later registration replaces the
    /// earlier one
    callback: Arc<Mutex<Option<ChecksFailedCallback>>>,
}

impl NotificationsStore {
    /// Create a store wired to its collaborators
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        accounts: Arc<dyn AccountsStore>,
        pull_requests: Arc<dyn PullRequestCoordinator>,
        commits: Arc<dyn CommitLookup>,
        api: Arc<dyn ApiProvider>,
        alive: Arc<dyn AliveStore>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            settings,
            accounts,
            pull_requests,
            commits,
            api,
            alive,
            notifier,
            selection: Mutex::new(None),
            commit_cache: CommitCache::new(),
            callback: Arc::new(Mutex::new(None)),
        }
    }

    /// Subscribe to the Alive channel and process events until it closes
    ///
    /// Applies the persisted enabled flag to the transport, then drains
    /// the subscription on a spawned task. Events are handled one at a
    /// time in arrival order.
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        self.alive.set_enabled(self.notifications_enabled());

        let mut events = self.alive.subscribe();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                self.on_alive_event(event).await;
            }
            debug!("Alive subscription closed");
        })
    }

    /// Whether check-failure notifications are enabled
    pub fn notifications_enabled(&self) -> bool {
        self.settings.get_boolean(NOTIFICATIONS_ENABLED_KEY, true)
    }

    /// Enable or disable the whole pipeline
    ///
    /// Setting the value already in effect is a no-op. A new value is
    /// persisted and propagated to the Alive subscription synchronously.
    pub fn set_notifications_enabled(&self, enabled: bool) {
        if enabled == self.notifications_enabled() {
            return;
        }

        info!("Check-failure notifications enabled: {}", enabled);
        self.settings.set_boolean(NOTIFICATIONS_ENABLED_KEY, enabled);
        self.alive.set_enabled(enabled);
    }

    /// Select the active repository
    ///
    /// Overwrites any previous selection. A repository without a linked
    /// remote is accepted but treated as "no selection" by the pipeline.
    pub fn select_repository(&self, repository: Repository) {
        debug!("Selected repository {}", repository.path.display());
        *self.selection.lock().unwrap() = Some(repository);
    }

    /// Register the click observer for checks-failed notifications
    ///
    /// A later registration replaces the earlier one; there is no
    /// multi-subscriber fan-out.
    pub fn on_checks_failed_notification<F>(&self, callback: F)
    where
        F: Fn(ChecksFailedPayload) + Send + Sync + 'static,
    {
        *self.callback.lock().unwrap() = Some(Box::new(callback));
    }

    /// Route an incoming Alive event
    ///
    /// Only checks-failed events are handled; all other kinds, including
    /// ones this build does not know about, are ignored.
    pub async fn on_alive_event(&self, event: AliveEvent) {
        match event {
            AliveEvent::ChecksFailed {
                pull_request_number,
                commit_sha,
            } => {
                if let Err(reason) = self
                    .handle_checks_failed(pull_request_number, &commit_sha)
                    .await
                {
                    debug!(
                        "Suppressed checks-failed notification for {}: {}",
                        commit_sha, reason
                    );
                }
            }
            _ => {}
        }
    }

    /// Handle a checks-failed event end to end
    ///
    /// Short-circuits at each step with the suppression reason; no step
    /// surfaces an error to the user.
    pub async fn handle_checks_failed(
        &self,
        pull_request_number: u64,
        commit_sha: &str,
    ) -> Result<(), Suppression> {
        let (repository, remote) = self
            .selected_remote()
            .ok_or(Suppression::NoActiveRepository)?;

        // A check failure for a PR we don't know locally didn't come
        // from a local action, so it isn't high-signal for this user.
        let pull_request = self
            .pull_requests
            .get_all_pull_requests(&repository)
            .await
            .into_iter()
            .find(|pr| pr.number == pull_request_number)
            .ok_or(Suppression::PullRequestNotFound(pull_request_number))?;

        let account = find_account_for_endpoint(self.accounts.as_ref(), &remote.endpoint)
            .await
            .ok_or_else(|| Suppression::NoAuthorizedAccount(remote.endpoint.clone()))?;

        if self.commit_cache.is_skipped(commit_sha) {
            return Err(Suppression::CommitUnresolvable(commit_sha.to_string()));
        }

        let commit = match self.commit_cache.get(commit_sha) {
            Some(commit) => commit,
            None => match self.commits.get_commit(&repository, commit_sha).await {
                Some(commit) => {
                    // Cached even when the author filter rejects it
                    // below, so the next identical event is cheap.
                    self.commit_cache.insert(commit.clone());
                    commit
                }
                None => {
                    self.commit_cache.skip(commit_sha);
                    return Err(Suppression::CommitUnresolvable(commit_sha.to_string()));
                }
            },
        };

        // Only notify for commits the current user authored; failures
        // on teammates' pushes are noise.
        if !account.has_email(&commit.author_email) {
            self.commit_cache.skip(commit_sha);
            return Err(Suppression::AuthorMismatch(commit_sha.to_string()));
        }

        let client = self
            .api
            .client_for_account(&account)
            .await
            .ok_or_else(|| Suppression::NoAuthorizedAccount(remote.endpoint.clone()))?;

        let result = checks_for_ref(
            client.as_ref(),
            &remote.owner,
            &remote.name,
            &pull_request.head_ref,
        )
        .await
        .ok_or_else(|| Suppression::ChecksUnavailable(pull_request.head_ref.clone()))?;

        // The user may have switched repositories across the awaits
        // above. The live selection decides: a switch suppresses the
        // notification, it never redirects it.
        let (live_repository, live_remote) = self
            .selected_remote()
            .ok_or(Suppression::NoActiveRepository)?;
        if live_remote != remote {
            return Err(Suppression::NoActiveRepository);
        }

        self.dispatch_checks_failed(live_repository, pull_request, commit, result)
    }

    /// The current selection, if it carries a linked remote
    fn selected_remote(&self) -> Option<(Repository, GitHubRepository)> {
        let selection = self.selection.lock().unwrap();
        let repository = selection.as_ref()?;
        let remote = repository.github_repository.clone()?;
        Some((repository.clone(), remote))
    }

    /// Compose and show the notification, wiring the click observer
    fn dispatch_checks_failed(
        &self,
        repository: Repository,
        pull_request: PullRequest,
        commit: Commit,
        result: CombinedCheckResult,
    ) -> Result<(), Suppression> {
        let notification = checks_failed_notification(&pull_request, &result.checks, &commit.sha)
            .ok_or(Suppression::NoFailedChecks)?;

        info!(
            "Showing checks-failed notification for PR #{} @ {}",
            pull_request.number, commit.sha
        );

        let payload = ChecksFailedPayload {
            repository,
            pull_request,
            commit_message: commit.summary,
            sha: commit.sha,
            checks: result.checks,
        };

        // The observer slot is read at click time, not capture time, so
        // a callback registered after dispatch still receives the click.
        let observer = Arc::clone(&self.callback);
        self.notifier.show(
            notification,
            Box::new(move || {
                if let Some(callback) = observer.lock().unwrap().as_ref() {
                    callback(payload);
                }
            }),
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::Notification;
    use gh_checks_client::{
        Account, ApiCheckRun, ApiCommit, CheckConclusion, CheckRunList, CheckRunStatus,
        ChecksApiClient, CombinedRefStatus, StatusState, DEFAULT_ENDPOINT,
    };
    use std::collections::HashMap;
    use std::path::PathBuf;
    use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
    use tokio::sync::Notify;

    struct MemorySettings {
        values: Mutex<HashMap<String, bool>>,
        writes: Mutex<usize>,
    }

    impl MemorySettings {
        fn new() -> Self {
            Self {
                values: Mutex::new(HashMap::new()),
                writes: Mutex::new(0),
            }
        }

        fn write_count(&self) -> usize {
            *self.writes.lock().unwrap()
        }
    }

    impl SettingsStore for MemorySettings {
        fn get_boolean(&self, key: &str, default: bool) -> bool {
            self.values
                .lock()
                .unwrap()
                .get(key)
                .copied()
                .unwrap_or(default)
        }

        fn set_boolean(&self, key: &str, value: bool) {
            self.values.lock().unwrap().insert(key.to_string(), value);
            *self.writes.lock().unwrap() += 1;
        }
    }

    struct MockAccounts {
        accounts: Mutex<Vec<Account>>,
    }

    #[async_trait]
    impl AccountsStore for MockAccounts {
        async fn get_all(&self) -> Vec<Account> {
            self.accounts.lock().unwrap().clone()
        }
    }

    struct MockPullRequests {
        prs: Mutex<Vec<PullRequest>>,
        calls: Mutex<usize>,
    }

    impl MockPullRequests {
        fn call_count(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl PullRequestCoordinator for MockPullRequests {
        async fn get_all_pull_requests(&self, _repository: &Repository) -> Vec<PullRequest> {
            *self.calls.lock().unwrap() += 1;
            self.prs.lock().unwrap().clone()
        }
    }

    struct MockCommits {
        commit: Mutex<Option<Commit>>,
        calls: Mutex<usize>,
        /// Signalled when a lookup enters; used to coordinate races
        entered: Notify,
        /// When set, lookups block until the gate is released
        gate: Mutex<Option<Arc<Notify>>>,
    }

    impl MockCommits {
        fn new(commit: Option<Commit>) -> Self {
            Self {
                commit: Mutex::new(commit),
                calls: Mutex::new(0),
                entered: Notify::new(),
                gate: Mutex::new(None),
            }
        }

        fn call_count(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl CommitLookup for MockCommits {
        async fn get_commit(&self, _repository: &Repository, _sha: &str) -> Option<Commit> {
            *self.calls.lock().unwrap() += 1;
            self.entered.notify_one();

            let gate = self.gate.lock().unwrap().clone();
            if let Some(gate) = gate {
                gate.notified().await;
            }

            self.commit.lock().unwrap().clone()
        }
    }

    struct MockChecksClient {
        status: Mutex<Option<CombinedRefStatus>>,
        runs: Mutex<Option<CheckRunList>>,
    }

    #[async_trait]
    impl ChecksApiClient for MockChecksClient {
        async fn fetch_combined_ref_status(
            &self,
            _owner: &str,
            _name: &str,
            _git_ref: &str,
        ) -> anyhow::Result<CombinedRefStatus> {
            self.status
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| anyhow::anyhow!("status endpoint down"))
        }

        async fn fetch_ref_check_runs(
            &self,
            _owner: &str,
            _name: &str,
            _git_ref: &str,
        ) -> anyhow::Result<CheckRunList> {
            self.runs
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| anyhow::anyhow!("checks endpoint down"))
        }

        async fn fetch_commit(
            &self,
            _owner: &str,
            _name: &str,
            _sha: &str,
        ) -> anyhow::Result<Option<ApiCommit>> {
            Ok(None)
        }
    }

    struct MockApi {
        client: Arc<MockChecksClient>,
    }

    #[async_trait]
    impl ApiProvider for MockApi {
        async fn client_for_account(
            &self,
            _account: &Account,
        ) -> Option<Arc<dyn ChecksApiClient>> {
            Some(Arc::clone(&self.client) as Arc<dyn ChecksApiClient>)
        }
    }

    struct MockAlive {
        enabled_calls: Mutex<Vec<bool>>,
        sender: Mutex<Option<UnboundedSender<AliveEvent>>>,
    }

    impl MockAlive {
        fn new() -> Self {
            Self {
                enabled_calls: Mutex::new(Vec::new()),
                sender: Mutex::new(None),
            }
        }
    }

    impl AliveStore for MockAlive {
        fn set_enabled(&self, enabled: bool) {
            self.enabled_calls.lock().unwrap().push(enabled);
        }

        fn subscribe(&self) -> tokio::sync::mpsc::UnboundedReceiver<AliveEvent> {
            let (tx, rx) = unbounded_channel();
            *self.sender.lock().unwrap() = Some(tx);
            rx
        }
    }

    struct MockNotifier {
        shown: Mutex<Vec<Notification>>,
        clicks: Mutex<Vec<Box<dyn FnOnce() + Send>>>,
    }

    impl MockNotifier {
        fn new() -> Self {
            Self {
                shown: Mutex::new(Vec::new()),
                clicks: Mutex::new(Vec::new()),
            }
        }

        fn shown_count(&self) -> usize {
            self.shown.lock().unwrap().len()
        }

        fn click_latest(&self) {
            let handler = self.clicks.lock().unwrap().pop().unwrap();
            handler();
        }
    }

    impl NotificationDispatcher for MockNotifier {
        fn show(&self, notification: Notification, on_click: Box<dyn FnOnce() + Send>) {
            self.shown.lock().unwrap().push(notification);
            self.clicks.lock().unwrap().push(on_click);
        }
    }

    const SHA: &str = "abc1234567890def";

    fn repository() -> Repository {
        Repository {
            path: PathBuf::from("/home/dev/widget"),
            github_repository: Some(GitHubRepository {
                owner: "octo".to_string(),
                name: "widget".to_string(),
                endpoint: DEFAULT_ENDPOINT.to_string(),
            }),
        }
    }

    fn other_repository() -> Repository {
        Repository {
            path: PathBuf::from("/home/dev/gadget"),
            github_repository: Some(GitHubRepository {
                owner: "octo".to_string(),
                name: "gadget".to_string(),
                endpoint: DEFAULT_ENDPOINT.to_string(),
            }),
        }
    }

    fn failing_run(id: u64, name: &str) -> ApiCheckRun {
        ApiCheckRun {
            id,
            name: name.to_string(),
            status: CheckRunStatus::Completed,
            conclusion: Some(CheckConclusion::Failure),
            details_url: None,
            started_at: None,
            completed_at: None,
        }
    }

    /// Happy-path collaborators; individual tests poke the mocks they
    /// care about before building the store.
    struct Fixture {
        settings: Arc<MemorySettings>,
        accounts: Arc<MockAccounts>,
        pull_requests: Arc<MockPullRequests>,
        commits: Arc<MockCommits>,
        client: Arc<MockChecksClient>,
        alive: Arc<MockAlive>,
        notifier: Arc<MockNotifier>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                settings: Arc::new(MemorySettings::new()),
                accounts: Arc::new(MockAccounts {
                    accounts: Mutex::new(vec![Account {
                        endpoint: DEFAULT_ENDPOINT.to_string(),
                        emails: vec!["dev@example.com".to_string()],
                    }]),
                }),
                pull_requests: Arc::new(MockPullRequests {
                    prs: Mutex::new(vec![PullRequest {
                        number: 42,
                        head_ref: "feature/caching".to_string(),
                        title: "Add caching".to_string(),
                    }]),
                    calls: Mutex::new(0),
                }),
                commits: Arc::new(MockCommits::new(Some(Commit {
                    sha: SHA.to_string(),
                    author_email: "dev@example.com".to_string(),
                    summary: "Fix the cache".to_string(),
                }))),
                client: Arc::new(MockChecksClient {
                    status: Mutex::new(Some(CombinedRefStatus {
                        state: StatusState::Failure,
                        total_count: 0,
                        statuses: vec![],
                    })),
                    runs: Mutex::new(Some(CheckRunList {
                        total_count: 1,
                        check_runs: vec![failing_run(2, "build")],
                    })),
                }),
                alive: Arc::new(MockAlive::new()),
                notifier: Arc::new(MockNotifier::new()),
            }
        }

        fn store(&self) -> NotificationsStore {
            NotificationsStore::new(
                Arc::clone(&self.settings) as Arc<dyn SettingsStore>,
                Arc::clone(&self.accounts) as Arc<dyn AccountsStore>,
                Arc::clone(&self.pull_requests) as Arc<dyn PullRequestCoordinator>,
                Arc::clone(&self.commits) as Arc<dyn CommitLookup>,
                Arc::new(MockApi {
                    client: Arc::clone(&self.client),
                }) as Arc<dyn ApiProvider>,
                Arc::clone(&self.alive) as Arc<dyn AliveStore>,
                Arc::clone(&self.notifier) as Arc<dyn NotificationDispatcher>,
            )
        }
    }

    #[tokio::test]
    async fn test_other_event_kinds_have_no_side_effects() {
        let fixture = Fixture::new();
        let store = fixture.store();
        store.select_repository(repository());

        store
            .on_alive_event(AliveEvent::PullRequestReviewSubmitted {
                pull_request_number: 42,
            })
            .await;

        assert_eq!(fixture.pull_requests.call_count(), 0);
        assert_eq!(fixture.commits.call_count(), 0);
        assert_eq!(fixture.notifier.shown_count(), 0);
    }

    #[tokio::test]
    async fn test_no_selection_suppresses() {
        let fixture = Fixture::new();
        let store = fixture.store();

        let outcome = store.handle_checks_failed(42, SHA).await;
        assert_eq!(outcome, Err(Suppression::NoActiveRepository));
        assert_eq!(fixture.pull_requests.call_count(), 0);
    }

    #[tokio::test]
    async fn test_repository_without_remote_is_no_selection() {
        let fixture = Fixture::new();
        let store = fixture.store();
        store.select_repository(Repository {
            path: PathBuf::from("/home/dev/local-only"),
            github_repository: None,
        });

        let outcome = store.handle_checks_failed(42, SHA).await;
        assert_eq!(outcome, Err(Suppression::NoActiveRepository));
    }

    #[tokio::test]
    async fn test_unknown_pull_request_suppresses() {
        let fixture = Fixture::new();
        let store = fixture.store();
        store.select_repository(repository());

        let outcome = store.handle_checks_failed(999, SHA).await;
        assert_eq!(outcome, Err(Suppression::PullRequestNotFound(999)));
        assert_eq!(fixture.commits.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_account_suppresses() {
        let fixture = Fixture::new();
        fixture.accounts.accounts.lock().unwrap().clear();
        let store = fixture.store();
        store.select_repository(repository());

        let outcome = store.handle_checks_failed(42, SHA).await;
        assert_eq!(
            outcome,
            Err(Suppression::NoAuthorizedAccount(
                DEFAULT_ENDPOINT.to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_unresolvable_commit_lands_in_skip_set() {
        let fixture = Fixture::new();
        *fixture.commits.commit.lock().unwrap() = None;
        let store = fixture.store();
        store.select_repository(repository());

        let outcome = store.handle_checks_failed(42, SHA).await;
        assert_eq!(
            outcome,
            Err(Suppression::CommitUnresolvable(SHA.to_string()))
        );
        assert_eq!(fixture.commits.call_count(), 1);

        // A second identical event short-circuits before any lookup.
        let outcome = store.handle_checks_failed(42, SHA).await;
        assert_eq!(
            outcome,
            Err(Suppression::CommitUnresolvable(SHA.to_string()))
        );
        assert_eq!(fixture.commits.call_count(), 1);
    }

    #[tokio::test]
    async fn test_author_mismatch_skips_and_short_circuits() {
        let fixture = Fixture::new();
        fixture.commits.commit.lock().unwrap().as_mut().unwrap().author_email =
            "teammate@example.com".to_string();
        let store = fixture.store();
        store.select_repository(repository());

        let outcome = store.handle_checks_failed(42, SHA).await;
        assert_eq!(outcome, Err(Suppression::AuthorMismatch(SHA.to_string())));

        // The SHA is now a known dead end; no further network calls.
        let outcome = store.handle_checks_failed(42, SHA).await;
        assert_eq!(
            outcome,
            Err(Suppression::CommitUnresolvable(SHA.to_string()))
        );
        assert_eq!(fixture.commits.call_count(), 1);
        assert_eq!(fixture.notifier.shown_count(), 0);
    }

    #[tokio::test]
    async fn test_happy_path_shows_exactly_one_notification() {
        let fixture = Fixture::new();
        let store = fixture.store();
        store.select_repository(repository());

        let outcome = store.handle_checks_failed(42, SHA).await;
        assert_eq!(outcome, Ok(()));
        assert_eq!(fixture.notifier.shown_count(), 1);

        let shown = fixture.notifier.shown.lock().unwrap();
        assert_eq!(shown[0].title, "Pull Request checks failed");
        assert_eq!(
            shown[0].body,
            "Add caching #42 (abc123456)\n1 check was not successful."
        );
    }

    #[tokio::test]
    async fn test_cached_commit_avoids_refetch() {
        let fixture = Fixture::new();
        let store = fixture.store();
        store.select_repository(repository());

        assert_eq!(store.handle_checks_failed(42, SHA).await, Ok(()));
        assert_eq!(store.handle_checks_failed(42, SHA).await, Ok(()));

        assert_eq!(fixture.commits.call_count(), 1);
        assert_eq!(fixture.notifier.shown_count(), 2);
    }

    #[tokio::test]
    async fn test_zero_failed_checks_suppresses() {
        let fixture = Fixture::new();
        *fixture.client.runs.lock().unwrap() = Some(CheckRunList {
            total_count: 1,
            check_runs: vec![ApiCheckRun {
                conclusion: Some(CheckConclusion::Success),
                ..failing_run(2, "build")
            }],
        });
        let store = fixture.store();
        store.select_repository(repository());

        let outcome = store.handle_checks_failed(42, SHA).await;
        assert_eq!(outcome, Err(Suppression::NoFailedChecks));
        assert_eq!(fixture.notifier.shown_count(), 0);
    }

    #[tokio::test]
    async fn test_unavailable_checks_suppress() {
        let fixture = Fixture::new();
        *fixture.client.status.lock().unwrap() = None;
        let store = fixture.store();
        store.select_repository(repository());

        let outcome = store.handle_checks_failed(42, SHA).await;
        assert_eq!(
            outcome,
            Err(Suppression::ChecksUnavailable(
                "feature/caching".to_string()
            ))
        );
        assert_eq!(fixture.notifier.shown_count(), 0);
    }

    #[tokio::test]
    async fn test_repository_switch_mid_flight_suppresses() {
        let fixture = Fixture::new();
        let gate = Arc::new(Notify::new());
        *fixture.commits.gate.lock().unwrap() = Some(Arc::clone(&gate));

        let store = Arc::new(fixture.store());
        store.select_repository(repository());

        let handler = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.handle_checks_failed(42, SHA).await })
        };

        // Wait until the handler is parked inside the commit lookup,
        // then switch repositories under it.
        fixture.commits.entered.notified().await;
        store.select_repository(other_repository());
        gate.notify_one();

        let outcome = handler.await.unwrap();
        assert_eq!(outcome, Err(Suppression::NoActiveRepository));
        assert_eq!(fixture.notifier.shown_count(), 0);
    }

    #[tokio::test]
    async fn test_click_invokes_registered_callback() {
        let fixture = Fixture::new();
        let store = fixture.store();
        store.select_repository(repository());

        let received: Arc<Mutex<Vec<ChecksFailedPayload>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        store.on_checks_failed_notification(move |payload| {
            sink.lock().unwrap().push(payload);
        });

        assert_eq!(store.handle_checks_failed(42, SHA).await, Ok(()));
        fixture.notifier.click_latest();

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].pull_request.number, 42);
        assert_eq!(received[0].sha, SHA);
        assert_eq!(received[0].commit_message, "Fix the cache");
        assert_eq!(received[0].checks.len(), 1);
    }

    #[tokio::test]
    async fn test_later_registration_replaces_earlier() {
        let fixture = Fixture::new();
        let store = fixture.store();
        store.select_repository(repository());

        let first: Arc<Mutex<usize>> = Arc::new(Mutex::new(0));
        let second: Arc<Mutex<usize>> = Arc::new(Mutex::new(0));

        let counter = Arc::clone(&first);
        store.on_checks_failed_notification(move |_| *counter.lock().unwrap() += 1);
        let counter = Arc::clone(&second);
        store.on_checks_failed_notification(move |_| *counter.lock().unwrap() += 1);

        assert_eq!(store.handle_checks_failed(42, SHA).await, Ok(()));
        fixture.notifier.click_latest();

        assert_eq!(*first.lock().unwrap(), 0);
        assert_eq!(*second.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_click_without_callback_is_noop() {
        let fixture = Fixture::new();
        let store = fixture.store();
        store.select_repository(repository());

        assert_eq!(store.handle_checks_failed(42, SHA).await, Ok(()));
        fixture.notifier.click_latest();
    }

    #[tokio::test]
    async fn test_setting_same_value_is_noop() {
        let fixture = Fixture::new();
        let store = fixture.store();

        // Default is enabled; enabling again must not touch anything.
        store.set_notifications_enabled(true);

        assert_eq!(fixture.settings.write_count(), 0);
        assert!(fixture.alive.enabled_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_setting_new_value_persists_and_propagates() {
        let fixture = Fixture::new();
        let store = fixture.store();

        store.set_notifications_enabled(false);

        assert!(!store.notifications_enabled());
        assert_eq!(fixture.settings.write_count(), 1);
        assert_eq!(*fixture.alive.enabled_calls.lock().unwrap(), vec![false]);
    }

    #[tokio::test]
    async fn test_start_drains_subscription_end_to_end() {
        let fixture = Fixture::new();
        let store = Arc::new(fixture.store());
        store.select_repository(repository());

        let handle = Arc::clone(&store).start();
        assert_eq!(*fixture.alive.enabled_calls.lock().unwrap(), vec![true]);

        let sender = fixture.alive.sender.lock().unwrap().take().unwrap();
        sender
            .send(AliveEvent::ChecksFailed {
                pull_request_number: 42,
                commit_sha: SHA.to_string(),
            })
            .unwrap();
        sender
            .send(AliveEvent::PullRequestReviewSubmitted {
                pull_request_number: 42,
            })
            .unwrap();
        drop(sender);

        handle.await.unwrap();
        assert_eq!(fixture.notifier.shown_count(), 1);
    }
}
