//! Session driver for the query state machine.
//!
//! User events are applied synchronously: the parameters are updated before
//! `dispatch` returns. Fetches run as separate tasks and may complete in any
//! order; their outcomes are folded in by [`QuerySession::next_outcome`].

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error};

use super::effect::Effect;
use super::event::Event;
use super::interpreter::{execute_effect, log_message};
use super::state::QueryState;
use super::transition::transition;
use crate::api::DirectoryApi;

pub struct QuerySession {
    state: QueryState,
    api: Arc<dyn DirectoryApi>,
    in_flight: JoinSet<Vec<Event>>,
}

impl QuerySession {
    pub fn new(api: Arc<dyn DirectoryApi>) -> Self {
        Self::with_state(api, QueryState::default())
    }

    pub fn with_state(api: Arc<dyn DirectoryApi>, state: QueryState) -> Self {
        Self {
            state,
            api,
            in_flight: JoinSet::new(),
        }
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Number of fetches dispatched but not yet folded in.
    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }

    /// Apply an event and start any fetches it requests.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, event: Event) {
        debug!("Dispatch: {}", event.log_summary());
        let state = std::mem::take(&mut self.state);
        let result = transition(state, event);
        self.state = result.state;

        for effect in result.effects {
            self.run(effect);
        }
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::Log { level, message } => log_message(level, &message),
            fetch => {
                let Some((kind, generation)) = fetch.fetch_target() else {
                    return;
                };
                let api = Arc::clone(&self.api);
                // The fetch runs in its own task so a panic still settles the feed.
                self.in_flight.spawn(async move {
                    let task =
                        tokio::spawn(async move { execute_effect(api.as_ref(), fetch).await });
                    match task.await {
                        Ok(events) => events,
                        Err(e) => vec![Event::fetch_failed(
                            kind,
                            generation,
                            format!("fetch task failed: {}", e),
                        )],
                    }
                });
            }
        }
    }

    /// Wait for the next fetch to finish and apply its outcome.
    ///
    /// Returns `false` when nothing is in flight.
    pub async fn next_outcome(&mut self) -> bool {
        match self.in_flight.join_next().await {
            Some(Ok(events)) => {
                for event in events {
                    self.dispatch(event);
                }
                true
            }
            Some(Err(e)) => {
                error!("Fetch task failed: {}", e);
                true
            }
            None => false,
        }
    }

    /// Fold in outcomes until no fetch is in flight.
    pub async fn settle(&mut self) {
        while self.next_outcome().await {}
    }

    /// Dispatch `event`, then settle. `show` sees the state once while fetches
    /// are in flight (if any were started) and once more when they are done.
    pub async fn dispatch_and_settle(
        &mut self,
        event: Event,
        mut show: impl FnMut(&QueryState),
    ) {
        self.dispatch(event);
        if self.pending() > 0 {
            show(&self.state);
            self.settle().await;
        }
        show(&self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClientError;
    use crate::state_machine::state::{FeedStatus, Generation, ViewMode};
    use async_trait::async_trait;
    use directory_core::{
        evaluate, Company, CompanyPage, Facets, HealthResponse, QueryDescriptor, RecordStore,
        Stats,
    };
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use tokio::sync::Notify;

    fn company(id: u64, name: &str, industry: &str) -> Company {
        Company {
            id,
            name: name.to_string(),
            description: format!("{} does things", name),
            industry: industry.to_string(),
            location: "Denver, USA".to_string(),
            employees: id * 10,
            founded: 2000,
            revenue: "$1M".to_string(),
            ceo: "C".to_string(),
        }
    }

    /// In-process API backed by the real engine. Searches listed in `gates`
    /// block until their `Notify` fires.
    struct FakeApi {
        store: RecordStore,
        gates: Mutex<HashMap<String, Arc<Notify>>>,
        fail_stats: AtomicBool,
        panic_facets: AtomicBool,
        queries: Mutex<Vec<QueryDescriptor>>,
    }

    impl FakeApi {
        fn new() -> Self {
            Self {
                store: RecordStore::new(vec![
                    company(1, "Alpha", "Tech"),
                    company(2, "Bravo", "Tech"),
                    company(3, "Charlie", "Finance"),
                    company(4, "Delta", "Finance"),
                    company(5, "Echo", "Media"),
                ]),
                gates: Mutex::new(HashMap::new()),
                fail_stats: AtomicBool::new(false),
                panic_facets: AtomicBool::new(false),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn gate(&self, search: &str) -> Arc<Notify> {
            let notify = Arc::new(Notify::new());
            self.gates
                .lock()
                .unwrap()
                .insert(search.to_string(), Arc::clone(&notify));
            notify
        }
    }

    #[async_trait]
    impl DirectoryApi for FakeApi {
        async fn fetch_companies(
            &self,
            query: &QueryDescriptor,
        ) -> Result<CompanyPage, ApiClientError> {
            self.queries.lock().unwrap().push(query.clone());
            let gate = self.gates.lock().unwrap().get(&query.search).cloned();
            if let Some(gate) = gate {
                gate.notified().await;
            }
            Ok(evaluate(&self.store, query))
        }

        async fn fetch_facets(&self) -> Result<Facets, ApiClientError> {
            if self.panic_facets.load(Ordering::SeqCst) {
                panic!("facet extraction blew up");
            }
            Ok(directory_core::extract_facets(&self.store))
        }

        async fn fetch_stats(&self) -> Result<Stats, ApiClientError> {
            if self.fail_stats.load(Ordering::SeqCst) {
                return Err(ApiClientError::Server {
                    status: 500,
                    message: "Internal server error".to_string(),
                    error: "stats unavailable".to_string(),
                });
            }
            Ok(directory_core::compute_stats(&self.store))
        }

        async fn health(&self) -> Result<HealthResponse, ApiClientError> {
            Ok(HealthResponse {
                status: "OK".to_string(),
                message: "Server is running".to_string(),
                version: None,
                timestamp: None,
            })
        }
    }

    fn names(state: &QueryState) -> Vec<&str> {
        state
            .companies
            .data
            .data
            .iter()
            .map(|c| c.name.as_str())
            .collect()
    }

    #[tokio::test]
    async fn test_mount_loads_all_feeds() {
        let api = Arc::new(FakeApi::new());
        let mut session = QuerySession::new(api);

        session.dispatch(Event::Mounted);
        assert_eq!(session.pending(), 3);
        assert!(session.state().any_loading());

        session.settle().await;

        let state = session.state();
        assert_eq!(state.companies.status, FeedStatus::Success);
        assert_eq!(state.facets.status, FeedStatus::Success);
        assert_eq!(state.stats.status, FeedStatus::Success);
        assert_eq!(state.stats.data.total_companies, 5);
        assert_eq!(state.facets.data.industries, vec!["Finance", "Media", "Tech"]);
        assert_eq!(names(state), vec!["Alpha", "Bravo", "Charlie", "Delta", "Echo"]);
    }

    #[tokio::test]
    async fn test_params_update_before_fetch_completes() {
        let api = Arc::new(FakeApi::new());
        let gate = api.gate("alp");
        let mut session = QuerySession::new(api.clone());
        session.dispatch(Event::PageChanged(3));
        session.settle().await;

        session.dispatch(Event::SearchChanged("alp".to_string()));

        // Synchronous update: the new search and the page reset are visible at once.
        assert_eq!(session.state().params.search, "alp");
        assert_eq!(session.state().params.page, 1);
        assert!(session.state().companies.is_loading());

        gate.notify_one();
        session.settle().await;
        assert_eq!(names(session.state()), vec!["Alpha"]);

        let queries = api.queries.lock().unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[1].search, "alp");
        assert_eq!(queries[1].page, 1);
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let api = Arc::new(FakeApi::new());
        let slow = api.gate("a");
        let mut session = QuerySession::new(api);

        session.dispatch(Event::SearchChanged("a".to_string()));
        session.dispatch(Event::SearchChanged("echo".to_string()));
        assert_eq!(session.state().companies.generation, Generation(2));

        // The newer fetch finishes first.
        assert!(session.next_outcome().await);
        assert_eq!(names(session.state()), vec!["Echo"]);

        // Then the older one arrives and must not overwrite it.
        slow.notify_one();
        assert!(session.next_outcome().await);
        assert_eq!(names(session.state()), vec!["Echo"]);
        assert_eq!(session.state().companies.status, FeedStatus::Success);
        assert!(!session.next_outcome().await);
    }

    #[tokio::test]
    async fn test_failed_feed_keeps_previous_data() {
        let api = Arc::new(FakeApi::new());
        let mut session = QuerySession::new(api.clone());
        session.dispatch(Event::Mounted);
        session.settle().await;

        api.fail_stats.store(true, Ordering::SeqCst);
        session.dispatch(Event::Refreshed);
        session.settle().await;

        let state = session.state();
        assert_eq!(state.stats.status, FeedStatus::Error);
        assert_eq!(state.stats.data.total_companies, 5);
        assert!(state.stats.error.as_deref().unwrap().contains("stats unavailable"));
        assert_eq!(state.companies.status, FeedStatus::Success);

        session.dispatch(Event::ErrorCleared);
        assert!(session.state().errors().is_empty());
    }

    #[tokio::test]
    async fn test_panicking_fetch_settles_feed_as_error() {
        let api = Arc::new(FakeApi::new());
        api.panic_facets.store(true, Ordering::SeqCst);
        let mut session = QuerySession::new(api.clone());

        session.dispatch(Event::Mounted);
        session.settle().await;

        let state = session.state();
        assert_eq!(state.facets.status, FeedStatus::Error);
        assert!(!state.facets.is_loading());
        assert!(state
            .facets
            .error
            .as_deref()
            .unwrap()
            .contains("fetch task failed"));
        // The other feeds are unaffected.
        assert_eq!(state.companies.status, FeedStatus::Success);
        assert_eq!(state.stats.status, FeedStatus::Success);
        assert_eq!(session.pending(), 0);
    }

    #[tokio::test]
    async fn test_dispatch_and_settle_shows_loading_then_result() {
        let api = Arc::new(FakeApi::new());
        let mut session = QuerySession::new(api);

        let mut seen = Vec::new();
        session
            .dispatch_and_settle(Event::SearchChanged("echo".to_string()), |s| {
                seen.push((s.companies.is_loading(), s.companies.data.data.len()))
            })
            .await;
        assert_eq!(seen, vec![(true, 0), (false, 1)]);

        let mut seen = Vec::new();
        session
            .dispatch_and_settle(Event::ViewModeToggled, |s| seen.push(s.view_mode))
            .await;
        assert_eq!(seen, vec![ViewMode::Card]);
    }

    #[tokio::test]
    async fn test_pagination_walk() {
        let api = Arc::new(FakeApi::new());
        let mut session = QuerySession::new(api);
        session.dispatch(Event::LimitChanged(2));
        session.settle().await;
        assert_eq!(session.state().companies.data.pagination.total_pages, 3);

        session.dispatch(Event::PageChanged(3));
        session.settle().await;
        let pagination = &session.state().companies.data.pagination;
        assert_eq!(names(session.state()), vec!["Echo"]);
        assert!(!pagination.has_next_page);
        assert!(pagination.has_prev_page);
    }

    #[tokio::test]
    async fn test_view_toggle_is_not_a_fetch() {
        let api = Arc::new(FakeApi::new());
        let mut session = QuerySession::new(api);
        session.dispatch(Event::ViewModeToggled);
        assert_eq!(session.pending(), 0);
        assert!(!session.next_outcome().await);
    }
}
