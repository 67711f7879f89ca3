//! Artist detail screen

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use super::messages::TextResourceProvider;
use super::state_holder::{launch, Store, ViewModel};
use crate::model::{ArtistDetail, UseCase, UseCaseResult};

pub type ArtistDetailLoader = dyn UseCase<u64, Output = UseCaseResult<ArtistDetail>>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArtistDetailAction {
    LoadArtist(u64),
    Retry,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum ArtistDetailState {
    #[default]
    Loading,
    Success(ArtistDetail),
    Error(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArtistDetailEvent {
    ShowError(String),
}

pub struct ArtistDetailViewModel {
    store: Store<ArtistDetailAction, ArtistDetailState, ArtistDetailEvent>,
    use_case: Arc<ArtistDetailLoader>,
    text: Arc<dyn TextResourceProvider>,
    artist_id: Mutex<Option<u64>>,
}

impl ArtistDetailViewModel {
    pub fn new(use_case: Arc<ArtistDetailLoader>, text: Arc<dyn TextResourceProvider>) -> Arc<Self> {
        let vm = Arc::new(Self {
            store: Store::new(ArtistDetailState::Loading),
            use_case,
            text,
            artist_id: Mutex::new(None),
        });
        launch(&vm);
        vm
    }

    async fn load(&self, artist_id: u64) {
        *self.artist_id.lock().unwrap_or_else(PoisonError::into_inner) = Some(artist_id);
        self.store.set_state(ArtistDetailState::Loading);

        match self.use_case.execute(artist_id).await {
            Ok(detail) => {
                tracing::info!(artist_id, name = %detail.name, "Artist loaded");
                self.store.set_state(ArtistDetailState::Success(detail));
            }
            Err(reason) => {
                tracing::warn!(artist_id, %reason, "Artist failed to load");
                let message = reason.to_ui_message(self.text.as_ref());
                self.store.set_state(ArtistDetailState::Error(message.clone()));
                self.store.emit(ArtistDetailEvent::ShowError(message));
            }
        }
    }
}

#[async_trait]
impl ViewModel for ArtistDetailViewModel {
    type Action = ArtistDetailAction;
    type State = ArtistDetailState;
    type Event = ArtistDetailEvent;

    fn store(&self) -> &Store<ArtistDetailAction, ArtistDetailState, ArtistDetailEvent> {
        &self.store
    }

    async fn handle_action(&self, action: ArtistDetailAction) {
        match action {
            ArtistDetailAction::LoadArtist(artist_id) => self.load(artist_id).await,
            ArtistDetailAction::Retry => {
                let last = *self.artist_id.lock().unwrap_or_else(PoisonError::into_inner);
                if let Some(artist_id) = last {
                    self.load(artist_id).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ArtistMember, Reason};
    use crate::viewmodel::messages::EnglishText;
    use std::collections::VecDeque;

    struct ScriptedLoader {
        answers: Mutex<VecDeque<UseCaseResult<ArtistDetail>>>,
        calls: Mutex<Vec<u64>>,
    }

    impl ScriptedLoader {
        fn new(answers: Vec<UseCaseResult<ArtistDetail>>) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(answers.into()),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl UseCase<u64> for ScriptedLoader {
        type Output = UseCaseResult<ArtistDetail>;

        async fn execute(&self, artist_id: u64) -> UseCaseResult<ArtistDetail> {
            self.calls.lock().unwrap().push(artist_id);
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(Reason::NotFound))
        }
    }

    fn radiohead() -> ArtistDetail {
        ArtistDetail {
            name: "Radiohead".into(),
            profile: Some("English rock band".into()),
            image_url: None,
            members: vec![ArtistMember {
                name: "Thom Yorke".into(),
                active: true,
            }],
        }
    }

    async fn settled(vm: &ArtistDetailViewModel) -> ArtistDetailState {
        let mut states = vm.subscribe();
        loop {
            let state = states.borrow_and_update().clone();
            if state != ArtistDetailState::Loading {
                return state;
            }
            states.changed().await.unwrap();
        }
    }

    #[tokio::test]
    async fn no_internet_becomes_error_with_one_event() {
        let loader = ScriptedLoader::new(vec![Err(Reason::NoInternet)]);
        let vm = ArtistDetailViewModel::new(loader.clone(), Arc::new(EnglishText));

        vm.send_action(ArtistDetailAction::LoadArtist(999));

        let message = "No internet connection. Please try again".to_string();
        assert_eq!(settled(&vm).await, ArtistDetailState::Error(message.clone()));
        assert_eq!(
            vm.next_event().await,
            Some(ArtistDetailEvent::ShowError(message))
        );
        assert_eq!(vm.try_next_event(), None);
        assert_eq!(*loader.calls.lock().unwrap(), vec![999]);
    }

    #[tokio::test]
    async fn success_carries_the_detail() {
        let loader = ScriptedLoader::new(vec![Ok(radiohead())]);
        let vm = ArtistDetailViewModel::new(loader, Arc::new(EnglishText));

        vm.send_action(ArtistDetailAction::LoadArtist(3840));

        assert_eq!(settled(&vm).await, ArtistDetailState::Success(radiohead()));
        assert_eq!(vm.try_next_event(), None);
    }

    #[tokio::test]
    async fn retry_reloads_the_last_artist() {
        let loader = ScriptedLoader::new(vec![Err(Reason::Timeout), Ok(radiohead())]);
        let vm = ArtistDetailViewModel::new(loader.clone(), Arc::new(EnglishText));

        vm.send_action(ArtistDetailAction::LoadArtist(3840));
        assert!(matches!(settled(&vm).await, ArtistDetailState::Error(_)));

        vm.send_action(ArtistDetailAction::Retry);
        // drain the Error -> Loading -> Success transitions
        let mut states = vm.subscribe();
        while !matches!(*states.borrow_and_update(), ArtistDetailState::Success(_)) {
            states.changed().await.unwrap();
        }
        assert_eq!(*loader.calls.lock().unwrap(), vec![3840, 3840]);
    }
}
