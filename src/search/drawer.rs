//! Search drawer event loop
//!
//! One task owns the coordinator, its debounce timer and every in-flight
//! request. Requests are polled as futures inside that task, so input keeps
//! flowing while they are outstanding.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::coordinator::{PendingSearch, SearchCoordinator};
use super::state::SearchSnapshot;
use crate::backend::types::SearchResponse;
use crate::backend::SearchApi;
use crate::error::SearchError;
use crate::store::AppStore;
use crate::telemetry::TelemetrySink;

type InFlight = BoxFuture<'static, (u64, Result<SearchResponse, SearchError>)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawerCommand {
    SetQuery(String),
    SelectKeyword(String),
    Clear,
}

/// Handle used by the view to feed input and watch the drawer state
#[derive(Debug, Clone)]
pub struct DrawerHandle {
    commands: mpsc::UnboundedSender<DrawerCommand>,
    snapshots: watch::Receiver<SearchSnapshot>,
}

impl DrawerHandle {
    pub fn set_query(&self, text: impl Into<String>) {
        self.send(DrawerCommand::SetQuery(text.into()));
    }

    pub fn select_keyword(&self, keyword: impl Into<String>) {
        self.send(DrawerCommand::SelectKeyword(keyword.into()));
    }

    pub fn clear(&self) {
        self.send(DrawerCommand::Clear);
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.snapshots.clone()
    }

    fn send(&self, command: DrawerCommand) {
        if self.commands.send(command).is_err() {
            tracing::warn!("search drawer is no longer running");
        }
    }
}

pub struct SearchDrawer<A: SearchApi> {
    api: Arc<A>,
    store: AppStore,
    coordinator: SearchCoordinator,
    commands: mpsc::UnboundedReceiver<DrawerCommand>,
    snapshots: watch::Sender<SearchSnapshot>,
    // Subscribed at construction so changes made before the task first runs are seen
    translations: watch::Receiver<Vec<u32>>,
    drawer_open: watch::Receiver<bool>,
    in_flight: FuturesUnordered<InFlight>,
}

impl<A: SearchApi> SearchDrawer<A> {
    pub fn new(
        api: Arc<A>,
        store: AppStore,
        telemetry: Arc<dyn TelemetrySink>,
        debounce: Duration,
    ) -> (Self, DrawerHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(SearchSnapshot {
            is_open: store.is_search_drawer_open(),
            ..SearchSnapshot::default()
        });

        let translations = store.subscribe_translations();
        let drawer_open = store.subscribe_drawer_open();
        let coordinator = SearchCoordinator::new(
            debounce,
            translations.borrow().clone(),
            Arc::new(store.history().clone()),
            telemetry,
        );

        let drawer = Self {
            api,
            store,
            coordinator,
            commands: command_rx,
            snapshots: snapshot_tx,
            translations,
            drawer_open,
            in_flight: FuturesUnordered::new(),
        };
        let handle = DrawerHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
        };
        (drawer, handle)
    }

    /// Build the drawer and run it on its own task
    pub fn spawn(
        api: Arc<A>,
        store: AppStore,
        telemetry: Arc<dyn TelemetrySink>,
        debounce: Duration,
    ) -> (DrawerHandle, JoinHandle<()>) {
        let (drawer, handle) = Self::new(api, store, telemetry, debounce);
        (handle, tokio::spawn(drawer.run()))
    }

    /// Runs until every [`DrawerHandle`] is dropped
    pub async fn run(mut self) {
        let ids = self.translations.borrow_and_update().clone();
        if let Some(pending) = self.coordinator.set_translations(ids) {
            self.dispatch(pending);
        }
        self.publish();

        tracing::info!("search drawer started");

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                query = self.coordinator.next_settled() => {
                    if let Some(pending) = self.coordinator.on_settled(query) {
                        self.dispatch(pending);
                    }
                }
                Some((seq, outcome)) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    self.coordinator.complete(seq, outcome);
                }
                Ok(()) = self.translations.changed() => {
                    let ids = self.translations.borrow_and_update().clone();
                    if let Some(pending) = self.coordinator.set_translations(ids) {
                        self.dispatch(pending);
                    }
                }
                Ok(()) = self.drawer_open.changed() => {}
            }
            self.publish();
        }

        tracing::info!("search drawer stopped");
    }

    fn handle_command(&mut self, command: DrawerCommand) {
        match command {
            DrawerCommand::SetQuery(text) => self.coordinator.set_query(text),
            DrawerCommand::SelectKeyword(keyword) => self.coordinator.select_keyword(keyword),
            DrawerCommand::Clear => self.coordinator.reset(),
        }
    }

    fn dispatch(&mut self, pending: PendingSearch) {
        let PendingSearch { seq, request } = pending;
        tracing::info!(seq, query = %request.query, "issuing search");

        let api = Arc::clone(&self.api);
        self.in_flight.push(Box::pin(async move {
            let outcome = api.search(request).await;
            (seq, outcome)
        }));
    }

    fn publish(&self) {
        let snapshot = self.coordinator.snapshot(self.store.is_search_drawer_open());
        self.snapshots.send_if_modified(|current| {
            if *current == snapshot {
                return false;
            }
            *current = snapshot;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::future::Future;
    use std::sync::Mutex;

    use tokio::sync::oneshot;
    use tokio::time::{self, Instant};

    use super::*;
    use crate::backend::types::{SearchRequest, SearchService};
    use crate::history::SearchHistory;
    use crate::search::state::SearchRequestState;
    use crate::store::AudioPlayerSettings;
    use crate::telemetry::testing::RecordingTelemetry;

    const WINDOW: Duration = Duration::from_millis(1000);

    type Reply = Result<SearchResponse, SearchError>;

    /// Search API whose responses are released by the test
    #[derive(Default)]
    struct ScriptedApi {
        requests: Mutex<Vec<(SearchRequest, Instant)>>,
        replies: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
    }

    impl ScriptedApi {
        fn expect(&self) -> oneshot::Sender<Reply> {
            let (tx, rx) = oneshot::channel();
            self.replies.lock().unwrap().push_back(rx);
            tx
        }

        fn queries(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|(request, _)| request.query.clone())
                .collect()
        }

        fn issued_at(&self) -> Vec<Instant> {
            self.requests.lock().unwrap().iter().map(|(_, at)| *at).collect()
        }
    }

    impl SearchApi for ScriptedApi {
        fn search(&self, request: SearchRequest) -> impl Future<Output = Reply> + Send {
            self.requests.lock().unwrap().push((request, Instant::now()));
            let reply = self.replies.lock().unwrap().pop_front();
            async move {
                match reply {
                    Some(reply) => reply
                        .await
                        .unwrap_or_else(|_| Err(SearchError::Status(reqwest::StatusCode::GONE))),
                    None => std::future::pending().await,
                }
            }
        }
    }

    struct Harness {
        api: Arc<ScriptedApi>,
        store: AppStore,
        telemetry: Arc<RecordingTelemetry>,
        handle: DrawerHandle,
    }

    fn harness() -> Harness {
        let api = Arc::new(ScriptedApi::default());
        let store = AppStore::new(
            vec![131],
            AudioPlayerSettings::default(),
            SearchHistory::with_limit(10),
        );
        let telemetry = Arc::new(RecordingTelemetry::default());
        let (handle, _task) = SearchDrawer::spawn(api.clone(), store.clone(), telemetry.clone(), WINDOW);
        Harness {
            api,
            store,
            telemetry,
            handle,
        }
    }

    fn verses(verse_key: &str) -> SearchResponse {
        serde_json::from_value(serde_json::json!({
            "result": { "verses": [{ "verse_key": verse_key, "text": "" }] }
        }))
        .unwrap()
    }

    async fn wait_for(
        rx: &mut watch::Receiver<SearchSnapshot>,
        predicate: impl Fn(&SearchSnapshot) -> bool,
    ) -> SearchSnapshot {
        rx.wait_for(|snapshot| predicate(snapshot)).await.unwrap().clone()
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_keystrokes_issues_one_request() {
        let h = harness();
        let _reply = h.api.expect();
        let start = Instant::now();

        h.handle.set_query("f");
        time::sleep(Duration::from_millis(200)).await;
        h.handle.set_query("fa");
        time::sleep(Duration::from_millis(200)).await;
        h.handle.set_query("fat");

        time::sleep(Duration::from_millis(999)).await;
        assert!(h.api.queries().is_empty());

        time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(h.api.queries(), vec!["fat"]);
        assert_eq!(h.api.issued_at(), vec![start + Duration::from_millis(1400)]);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_same_value_issues_one_request() {
        let h = harness();
        let _reply = h.api.expect();

        for _ in 0..3 {
            h.handle.set_query("yasin");
            time::sleep(Duration::from_millis(300)).await;
        }
        time::sleep(WINDOW * 3).await;

        assert_eq!(h.api.queries(), vec!["yasin"]);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_query_resets_without_request() {
        let h = harness();
        let mut rx = h.handle.subscribe();

        h.handle.set_query("kahf");
        wait_for(&mut rx, |s| s.query == "kahf").await;
        time::sleep(Duration::from_millis(500)).await;
        h.handle.set_query("");

        let snapshot = wait_for(&mut rx, |s| s.query.is_empty()).await;
        assert_eq!(snapshot.state, SearchRequestState::Idle);

        time::sleep(WINDOW * 3).await;
        assert!(h.api.queries().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_response_never_overwrites_newer_state() {
        let h = harness();
        let mut rx = h.handle.subscribe();
        let reply_a = h.api.expect();
        let reply_b = h.api.expect();

        h.handle.set_query("A");
        time::sleep(WINDOW + Duration::from_millis(10)).await;
        h.handle.set_query("B");
        time::sleep(WINDOW + Duration::from_millis(10)).await;
        assert_eq!(h.api.queries(), vec!["A", "B"]);

        reply_b.send(Ok(verses("2:255"))).unwrap();
        wait_for(&mut rx, |s| s.state.result().is_some()).await;

        reply_a.send(Ok(verses("1:1"))).unwrap();
        time::sleep(Duration::from_millis(10)).await;

        let snapshot = h.handle.snapshot();
        assert_eq!(snapshot.query, "B");
        let result = snapshot.state.result().unwrap();
        assert_eq!(result.result.verses[0].verse_key, "2:255");
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_request_shows_error_only() {
        let h = harness();
        let mut rx = h.handle.subscribe();
        let reply = h.api.expect();

        h.handle.set_query("nur");
        wait_for(&mut rx, |s| s.state.is_loading()).await;

        reply
            .send(Err(SearchError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR)))
            .unwrap();
        let snapshot = wait_for(&mut rx, |s| !s.state.is_loading()).await;
        assert_eq!(snapshot.state, SearchRequestState::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn typing_fat_end_to_end() {
        let h = harness();
        let mut rx = h.handle.subscribe();
        let reply = h.api.expect();

        h.handle.set_query("f");
        time::sleep(Duration::from_millis(100)).await;
        h.handle.set_query("fa");
        time::sleep(Duration::from_millis(100)).await;
        h.handle.set_query("fat");

        wait_for(&mut rx, |s| s.state.is_loading()).await;
        reply.send(Ok(verses("1:2"))).unwrap();
        let snapshot = wait_for(&mut rx, |s| s.state.result().is_some()).await;

        assert_eq!(h.api.queries(), vec!["fat"]);
        let history: Vec<String> = h.store.history().entries().into_iter().map(|e| e.query).collect();
        assert_eq!(history, vec!["fat"]);
        assert_eq!(h.telemetry.names(), vec!["search_query"]);
        assert_eq!(snapshot.state.result().unwrap().service, Some(SearchService::Kalimat));
    }

    #[tokio::test(start_paused = true)]
    async fn translation_change_searches_again() {
        let h = harness();
        let mut rx = h.handle.subscribe();
        let first = h.api.expect();
        let _second = h.api.expect();

        h.handle.set_query("light");
        wait_for(&mut rx, |s| s.state.is_loading()).await;
        first.send(Ok(verses("24:35"))).unwrap();
        wait_for(&mut rx, |s| s.state.result().is_some()).await;

        h.store.set_selected_translations(vec![131]);
        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(h.api.queries().len(), 1);

        h.store.set_selected_translations(vec![20]);
        wait_for(&mut rx, |s| s.state.is_loading()).await;
        assert_eq!(h.api.queries(), vec!["light", "light"]);
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_follows_drawer_flag() {
        let h = harness();
        let mut rx = h.handle.subscribe();
        assert!(!h.handle.snapshot().is_open);

        h.store.set_search_drawer_open(true);
        wait_for(&mut rx, |s| s.is_open).await;

        h.store.set_search_drawer_open(false);
        wait_for(&mut rx, |s| !s.is_open).await;
    }

    #[tokio::test(start_paused = true)]
    async fn flag_set_before_first_poll_is_published() {
        let h = harness();
        // The drawer task has not run yet
        h.store.set_search_drawer_open(true);

        time::sleep(Duration::from_secs(30)).await;
        assert!(h.handle.snapshot().is_open);
    }

    #[tokio::test(start_paused = true)]
    async fn translations_set_before_first_poll_are_used() {
        let h = harness();
        let _reply = h.api.expect();
        h.store.set_selected_translations(vec![20, 85]);

        h.handle.set_query("rahma");
        time::sleep(WINDOW * 2).await;

        let requests = h.api.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0.translation_ids, vec![20, 85]);
    }
}
