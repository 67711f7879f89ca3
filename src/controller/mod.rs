//! Controller module - input handling and screen navigation
//!
//! - `input`: key event handling
//! - `navigation`: the screen stack, list paging and view snapshots

mod input;
mod navigation;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::model::{
    AppModel, ArtistDetailUseCase, ArtistReleasesUseCase, DiscogsApi, DiscogsRepository,
    ReleaseDetailUseCase, SearchArtistUseCase,
};
use crate::viewmodel::{SearchViewModel, TextResourceProvider};

pub(crate) use navigation::Screen;

/// Use cases and text shared by every screen the controller opens
pub struct Services {
    pub search: Arc<SearchArtistUseCase>,
    pub artist_detail: Arc<ArtistDetailUseCase>,
    pub releases: Arc<ArtistReleasesUseCase>,
    pub release_detail: Arc<ReleaseDetailUseCase>,
    pub text: Arc<dyn TextResourceProvider>,
}

impl Services {
    pub fn new(api: Arc<dyn DiscogsApi>, text: Arc<dyn TextResourceProvider>) -> Self {
        let repository = Arc::new(DiscogsRepository::new(api));
        Self {
            search: Arc::new(SearchArtistUseCase::new(repository.clone())),
            artist_detail: Arc::new(ArtistDetailUseCase::new(repository.clone())),
            releases: Arc::new(ArtistReleasesUseCase::new(repository.clone())),
            release_detail: Arc::new(ReleaseDetailUseCase::new(repository)),
            text,
        }
    }
}

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<AppModel>,
    pub(crate) services: Arc<Services>,
    pub(crate) search: Arc<SearchViewModel>,
    /// Screens above search; popping one drops its view model and cancels its work
    pub(crate) screens: Arc<Mutex<Vec<Screen>>>,
    pub(crate) search_selected: Arc<Mutex<usize>>,
}

impl AppController {
    pub fn new(model: Arc<AppModel>, services: Services) -> Self {
        let search = SearchViewModel::new(services.search.clone(), services.text.clone());
        Self {
            model,
            services: Arc::new(services),
            search,
            screens: Arc::new(Mutex::new(Vec::new())),
            search_selected: Arc::new(Mutex::new(0)),
        }
    }
}
