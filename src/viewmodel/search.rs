//! Artist search screen
//!
//! Typed text lands in a single-slot query holder. A pipeline task waits for
//! the text to settle, skips repeats and runs one search per settled value,
//! aborting whichever search was still running.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinSet;

use super::messages::{StringId, TextResourceProvider};
use super::state_holder::{launch, Store, StoreHandle, ViewModel};
use crate::config::SEARCH_DEBOUNCE;
use crate::model::{Artist, PagingData, Reason, UseCase};

pub type SearchUseCase = dyn UseCase<String, Output = PagingData<Artist>>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchAction {
    Search(String),
    Retry,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum SearchState {
    #[default]
    Idle,
    Loading,
    Success,
    Empty,
    Error(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchEvent {
    ShowError(String),
}

/// Publication gate: only work started under the latest generation may
/// touch the screen.
#[derive(Clone, Default)]
struct LatestOnly(Arc<Mutex<u64>>);

impl LatestOnly {
    fn current(&self) -> u64 {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn advance(&self) -> u64 {
        let mut generation = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        *generation += 1;
        *generation
    }

    /// Run `publish` only if `generation` is still the latest.
    fn publish(&self, generation: u64, publish: impl FnOnce()) -> bool {
        let latest = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if *latest != generation {
            return false;
        }
        publish();
        true
    }
}

/// Everything a search run needs, cloned into each task
#[derive(Clone)]
struct SearchContext {
    handle: StoreHandle<SearchState, SearchEvent>,
    results: Arc<watch::Sender<PagingData<Artist>>>,
    use_case: Arc<SearchUseCase>,
    text: Arc<dyn TextResourceProvider>,
    latest: LatestOnly,
}

impl SearchContext {
    async fn run(self, generation: u64, query: String) {
        if query.trim().is_empty() {
            self.latest.publish(generation, || {
                self.results.send_replace(PagingData::empty());
                self.handle.set_state(SearchState::Idle);
            });
            return;
        }

        tracing::info!(query, "Searching artists");
        let published = self.latest.publish(generation, || {
            self.handle.set_state(SearchState::Loading);
        });
        if !published {
            return;
        }

        let data = self.use_case.execute(query.clone()).await;
        self.latest.publish(generation, || {
            self.results.send_replace(data.clone());
        });

        let outcome = data.refresh().await;
        self.settle(generation, &data, outcome.map_err(Reason::from));
    }

    fn settle(&self, generation: u64, data: &PagingData<Artist>, outcome: Result<(), Reason>) {
        self.latest.publish(generation, || match outcome {
            Ok(()) if data.snapshot().is_empty() => {
                report_empty(&self.handle, self.text.get_string(StringId::ArtistsNotFound, &[]));
            }
            Ok(()) => self.handle.set_state(SearchState::Success),
            Err(reason) => {
                let message = reason.to_ui_message(self.text.as_ref());
                tracing::warn!(%reason, "Artist search failed");
                self.handle.set_state(SearchState::Error(message.clone()));
                self.handle.emit(SearchEvent::ShowError(message));
            }
        });
    }
}

fn report_empty(handle: &StoreHandle<SearchState, SearchEvent>, message: String) {
    handle.set_state(SearchState::Empty);
    handle.emit(SearchEvent::ShowError(message));
}

/// Debounce, drop repeats, switch to the latest query.
async fn run_pipeline(mut query: watch::Receiver<String>, context: SearchContext, debounce: Duration) {
    let mut last = query.borrow_and_update().clone();
    let mut searches = JoinSet::new();

    while query.changed().await.is_ok() {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(debounce) => break,
                changed = query.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }
        }

        let settled = query.borrow_and_update().clone();
        if settled == last {
            continue;
        }
        last = settled.clone();

        let generation = context.latest.advance();
        searches.abort_all();
        while searches.try_join_next().is_some() {}
        searches.spawn(context.clone().run(generation, settled));
    }
}

pub struct SearchViewModel {
    store: Store<SearchAction, SearchState, SearchEvent>,
    query: watch::Sender<String>,
    context: SearchContext,
}

impl SearchViewModel {
    pub fn new(use_case: Arc<SearchUseCase>, text: Arc<dyn TextResourceProvider>) -> Arc<Self> {
        Self::with_debounce(use_case, text, SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(
        use_case: Arc<SearchUseCase>,
        text: Arc<dyn TextResourceProvider>,
        debounce: Duration,
    ) -> Arc<Self> {
        let store = Store::new(SearchState::Idle);
        let (results, _) = watch::channel(PagingData::empty());
        let (query, query_rx) = watch::channel(String::new());
        let context = SearchContext {
            handle: store.handle(),
            results: Arc::new(results),
            use_case,
            text,
            latest: LatestOnly::default(),
        };

        store
            .scope()
            .spawn(run_pipeline(query_rx, context.clone(), debounce));

        let vm = Arc::new(Self {
            store,
            query,
            context,
        });
        launch(&vm);
        vm
    }

    /// The artists of the latest search, cached until the screen goes away
    pub fn paged_artists(&self) -> PagingData<Artist> {
        self.context.results.borrow().clone()
    }

    pub fn query(&self) -> String {
        self.query.borrow().clone()
    }

    /// The list finished loading without producing a single row
    pub fn on_paging_error(&self, message: &str) {
        report_empty(&self.context.handle, self.context.text.get_literal(message));
    }
}

#[async_trait]
impl ViewModel for SearchViewModel {
    type Action = SearchAction;
    type State = SearchState;
    type Event = SearchEvent;

    fn store(&self) -> &Store<SearchAction, SearchState, SearchEvent> {
        &self.store
    }

    async fn handle_action(&self, action: SearchAction) {
        match action {
            SearchAction::Search(query) => {
                self.query.send_replace(query);
            }
            SearchAction::Retry => {
                let generation = self.context.latest.current();
                let data = self.paged_artists();
                let retried_refresh = data.snapshot().load_states.refresh.error().is_some();
                let outcome = data.retry().await;
                if retried_refresh {
                    self.context
                        .settle(generation, &data, outcome.map_err(Reason::from));
                }
            }
        }
    }
}
