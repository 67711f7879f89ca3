//! Release detail screen: tracklist, labels, genres

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use super::messages::TextResourceProvider;
use super::state_holder::{launch, Store, ViewModel};
use crate::model::{ReleaseDetail, UseCase, UseCaseResult};

pub type ReleaseDetailLoader = dyn UseCase<u64, Output = UseCaseResult<ReleaseDetail>>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReleaseDetailAction {
    LoadRelease(u64),
    Retry,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum ReleaseDetailState {
    #[default]
    Loading,
    Success(ReleaseDetail),
    Error(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReleaseDetailEvent {
    ShowError(String),
}

pub struct ReleaseDetailViewModel {
    store: Store<ReleaseDetailAction, ReleaseDetailState, ReleaseDetailEvent>,
    use_case: Arc<ReleaseDetailLoader>,
    text: Arc<dyn TextResourceProvider>,
    release_id: Mutex<Option<u64>>,
}

impl ReleaseDetailViewModel {
    pub fn new(use_case: Arc<ReleaseDetailLoader>, text: Arc<dyn TextResourceProvider>) -> Arc<Self> {
        let vm = Arc::new(Self {
            store: Store::new(ReleaseDetailState::Loading),
            use_case,
            text,
            release_id: Mutex::new(None),
        });
        launch(&vm);
        vm
    }

    async fn load(&self, release_id: u64) {
        *self.release_id.lock().unwrap_or_else(PoisonError::into_inner) = Some(release_id);
        self.store.set_state(ReleaseDetailState::Loading);

        let state = match self.use_case.execute(release_id).await {
            Ok(detail) => ReleaseDetailState::Success(detail),
            Err(reason) => {
                tracing::warn!(release_id, %reason, "Release failed to load");
                let message = reason.to_ui_message(self.text.as_ref());
                self.store.emit(ReleaseDetailEvent::ShowError(message.clone()));
                ReleaseDetailState::Error(message)
            }
        };
        self.store.set_state(state);
    }
}

#[async_trait]
impl ViewModel for ReleaseDetailViewModel {
    type Action = ReleaseDetailAction;
    type State = ReleaseDetailState;
    type Event = ReleaseDetailEvent;

    fn store(&self) -> &Store<ReleaseDetailAction, ReleaseDetailState, ReleaseDetailEvent> {
        &self.store
    }

    async fn handle_action(&self, action: ReleaseDetailAction) {
        let release_id = match action {
            ReleaseDetailAction::LoadRelease(release_id) => Some(release_id),
            ReleaseDetailAction::Retry => {
                *self.release_id.lock().unwrap_or_else(PoisonError::into_inner)
            }
        };
        if let Some(release_id) = release_id {
            self.load(release_id).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::testing::FakeDiscogsApi;
    use crate::model::{ApiError, DiscogsRepository, ReleaseDetailUseCase};
    use crate::viewmodel::messages::EnglishText;

    fn release_vm(api: &FakeDiscogsApi) -> Arc<ReleaseDetailViewModel> {
        let repository = Arc::new(DiscogsRepository::new(Arc::new(api.clone())));
        ReleaseDetailViewModel::new(
            Arc::new(ReleaseDetailUseCase::new(repository)),
            Arc::new(EnglishText),
        )
    }

    async fn settled(vm: &ReleaseDetailViewModel) -> ReleaseDetailState {
        let mut states = vm.subscribe();
        while *states.borrow_and_update() == ReleaseDetailState::Loading {
            states.changed().await.unwrap();
        }
        vm.state()
    }

    #[tokio::test]
    async fn release_detail_loads() {
        let api = FakeDiscogsApi::new();
        api.push_release(Ok(FakeDiscogsApi::release_detail(21491, "OK Computer")));
        let vm = release_vm(&api);

        vm.send_action(ReleaseDetailAction::LoadRelease(21491));

        match settled(&vm).await {
            ReleaseDetailState::Success(detail) => {
                assert_eq!(detail.title, "OK Computer");
                assert_eq!(detail.genres, vec!["Rock".to_string()]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn timeout_is_reported_once() {
        let api = FakeDiscogsApi::new();
        api.push_release(Err(ApiError::Timeout));
        let vm = release_vm(&api);

        vm.send_action(ReleaseDetailAction::LoadRelease(1));

        let message = "Taking too long. Try again".to_string();
        assert_eq!(settled(&vm).await, ReleaseDetailState::Error(message.clone()));
        assert_eq!(vm.next_event().await, Some(ReleaseDetailEvent::ShowError(message)));
        assert_eq!(vm.try_next_event(), None);
    }
}
