//! An artist's releases, or only its albums

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use super::messages::{StringId, TextResourceProvider};
use super::state_holder::{launch, Store, ViewModel};
use crate::model::{PagingData, Reason, Release, ReleaseScope, UseCase};

pub type ReleasesLoader = dyn UseCase<(u64, ReleaseScope), Output = PagingData<Release>>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReleaseListAction {
    LoadReleases(u64),
    LoadAlbums(u64),
    Retry,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum ReleaseListState {
    #[default]
    Idle,
    Loading,
    Success,
    Empty,
    Error(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReleaseListEvent {
    ShowError(String),
}

pub struct ReleaseListViewModel {
    store: Store<ReleaseListAction, ReleaseListState, ReleaseListEvent>,
    use_case: Arc<ReleasesLoader>,
    text: Arc<dyn TextResourceProvider>,
    releases: Mutex<PagingData<Release>>,
    scope: Mutex<ReleaseScope>,
}

impl ReleaseListViewModel {
    pub fn new(use_case: Arc<ReleasesLoader>, text: Arc<dyn TextResourceProvider>) -> Arc<Self> {
        let vm = Arc::new(Self {
            store: Store::new(ReleaseListState::Idle),
            use_case,
            text,
            releases: Mutex::new(PagingData::empty()),
            scope: Mutex::new(ReleaseScope::All),
        });
        launch(&vm);
        vm
    }

    pub fn paged_releases(&self) -> PagingData<Release> {
        self.releases
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn release_scope(&self) -> ReleaseScope {
        *self.scope.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The list finished loading without producing a single row
    pub fn on_paging_error(&self, message: &str) {
        let message = self.text.get_literal(message);
        self.store.set_state(ReleaseListState::Empty);
        self.store.emit(ReleaseListEvent::ShowError(message));
    }

    async fn load(&self, artist_id: u64, scope: ReleaseScope) {
        tracing::info!(artist_id, ?scope, "Loading releases");
        self.store.set_state(ReleaseListState::Loading);
        *self.scope.lock().unwrap_or_else(PoisonError::into_inner) = scope;

        let data = self.use_case.execute((artist_id, scope)).await;
        *self.releases.lock().unwrap_or_else(PoisonError::into_inner) = data.clone();

        let outcome = data.refresh().await;
        self.settle(&data, outcome.map_err(Reason::from));
    }

    fn settle(&self, data: &PagingData<Release>, outcome: Result<(), Reason>) {
        match outcome {
            Ok(()) if data.snapshot().is_empty() => {
                let id = match self.release_scope() {
                    ReleaseScope::All => StringId::ReleasesNotFound,
                    ReleaseScope::Albums => StringId::AlbumsNotFound,
                };
                self.on_paging_error(&self.text.get_string(id, &[]));
            }
            Ok(()) => self.store.set_state(ReleaseListState::Success),
            Err(reason) => {
                tracing::warn!(%reason, "Releases failed to load");
                let message = reason.to_ui_message(self.text.as_ref());
                self.store.set_state(ReleaseListState::Error(message.clone()));
                self.store.emit(ReleaseListEvent::ShowError(message));
            }
        }
    }
}

#[async_trait]
impl ViewModel for ReleaseListViewModel {
    type Action = ReleaseListAction;
    type State = ReleaseListState;
    type Event = ReleaseListEvent;

    fn store(&self) -> &Store<ReleaseListAction, ReleaseListState, ReleaseListEvent> {
        &self.store
    }

    async fn handle_action(&self, action: ReleaseListAction) {
        match action {
            ReleaseListAction::LoadReleases(artist_id) => {
                self.load(artist_id, ReleaseScope::All).await
            }
            ReleaseListAction::LoadAlbums(artist_id) => {
                self.load(artist_id, ReleaseScope::Albums).await
            }
            ReleaseListAction::Retry => {
                let data = self.paged_releases();
                let retried_refresh = data.snapshot().load_states.refresh.error().is_some();
                let outcome = data.retry().await;
                if retried_refresh {
                    self.settle(&data, outcome.map_err(Reason::from));
                }
            }
        }
    }
}
