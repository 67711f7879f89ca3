//! In-memory Discogs gateway for unit tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::discogs_client::DiscogsApi;
use super::entities::{
    ApiPagination, ArtistDetailResponse, ArtistReleaseItem, ArtistReleasesResponse,
    ArtistSearchResponse, ArtistSearchResult, ReleaseDetailResponse,
};
use super::error::ApiError;

type Queue<T> = Mutex<VecDeque<Result<T, ApiError>>>;

#[derive(Default)]
struct FakeState {
    search: Queue<ArtistSearchResponse>,
    releases: Queue<ArtistReleasesResponse>,
    artist: Queue<ArtistDetailResponse>,
    release: Queue<ReleaseDetailResponse>,
    search_calls: Mutex<Vec<(String, u32)>>,
    release_calls: Mutex<Vec<(u64, u32)>>,
    detail_calls: Mutex<Vec<u64>>,
    search_delay: Mutex<Option<Duration>>,
}

/// Scripted responses are served in order. When a search queue runs dry the
/// fake answers with a single page holding one artist named after the query.
#[derive(Clone, Default)]
pub struct FakeDiscogsApi {
    state: Arc<FakeState>,
}

pub fn artist_row(id: u64, name: &str) -> ArtistSearchResult {
    ArtistSearchResult {
        id,
        title: name.to_string(),
        thumb: None,
        cover_image: None,
        resource_url: None,
    }
}

pub fn release_row(id: u64, title: &str, kind: &str) -> ArtistReleaseItem {
    ArtistReleaseItem {
        id,
        title: title.to_string(),
        year: Some(1997),
        thumb: None,
        label: None,
        role: Some("Main".to_string()),
        kind: Some(kind.to_string()),
        main_release: (kind == "master").then_some(id + 1_000_000),
    }
}

fn pagination(page: u32, pages: u32, items: usize) -> ApiPagination {
    ApiPagination {
        page,
        pages,
        per_page: 30,
        items: items as u32,
    }
}

impl FakeDiscogsApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_page(page: u32, pages: u32, rows: Vec<ArtistSearchResult>) -> ArtistSearchResponse {
        ArtistSearchResponse {
            pagination: pagination(page, pages, rows.len()),
            results: rows,
        }
    }

    pub fn releases_page(page: u32, pages: u32, rows: Vec<ArtistReleaseItem>) -> ArtistReleasesResponse {
        ArtistReleasesResponse {
            pagination: pagination(page, pages, rows.len()),
            releases: rows,
        }
    }

    pub fn artist_detail(id: u64, name: &str) -> ArtistDetailResponse {
        ArtistDetailResponse {
            id,
            name: name.to_string(),
            profile: Some("[b]English[/b] rock band".to_string()),
            images: vec![],
            members: vec![],
        }
    }

    pub fn release_detail(id: u64, title: &str) -> ReleaseDetailResponse {
        ReleaseDetailResponse {
            id,
            title: title.to_string(),
            year: Some(1997),
            artists: vec![],
            genres: vec!["Rock".to_string()],
            styles: vec![],
            labels: vec![],
            tracklist: vec![],
            images: vec![],
        }
    }

    pub fn push_search(&self, response: Result<ArtistSearchResponse, ApiError>) {
        self.state.search.lock().unwrap().push_back(response);
    }

    pub fn push_releases(&self, response: Result<ArtistReleasesResponse, ApiError>) {
        self.state.releases.lock().unwrap().push_back(response);
    }

    pub fn push_artist(&self, response: Result<ArtistDetailResponse, ApiError>) {
        self.state.artist.lock().unwrap().push_back(response);
    }

    pub fn push_release(&self, response: Result<ReleaseDetailResponse, ApiError>) {
        self.state.release.lock().unwrap().push_back(response);
    }

    /// Every search call sleeps this long before answering
    pub fn set_search_delay(&self, delay: Duration) {
        *self.state.search_delay.lock().unwrap() = Some(delay);
    }

    pub fn search_calls(&self) -> Vec<(String, u32)> {
        self.state.search_calls.lock().unwrap().clone()
    }

    pub fn release_calls(&self) -> Vec<(u64, u32)> {
        self.state.release_calls.lock().unwrap().clone()
    }

    pub fn detail_calls(&self) -> Vec<u64> {
        self.state.detail_calls.lock().unwrap().clone()
    }
}

fn not_found<T>() -> Result<T, ApiError> {
    Err(ApiError::from_status(404, "The requested resource was not found."))
}

#[async_trait]
impl DiscogsApi for FakeDiscogsApi {
    async fn search_artists(
        &self,
        query: &str,
        page: u32,
        _per_page: u32,
        _kind: &str,
    ) -> Result<ArtistSearchResponse, ApiError> {
        self.state
            .search_calls
            .lock()
            .unwrap()
            .push((query.to_string(), page));
        let delay = *self.state.search_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = self.state.search.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(Self::search_page(1, 1, vec![artist_row(1, query)])))
    }

    async fn get_artist_releases(
        &self,
        artist_id: u64,
        _sort: &str,
        _order: &str,
        page: u32,
        _per_page: u32,
    ) -> Result<ArtistReleasesResponse, ApiError> {
        self.state
            .release_calls
            .lock()
            .unwrap()
            .push((artist_id, page));
        let scripted = self.state.releases.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(Self::releases_page(1, 1, vec![])))
    }

    async fn get_artist_details(&self, artist_id: u64) -> Result<ArtistDetailResponse, ApiError> {
        self.state.detail_calls.lock().unwrap().push(artist_id);
        let scripted = self.state.artist.lock().unwrap().pop_front();
        scripted.unwrap_or_else(not_found)
    }

    async fn get_release_details(&self, release_id: u64) -> Result<ReleaseDetailResponse, ApiError> {
        self.state.detail_calls.lock().unwrap().push(release_id);
        let scripted = self.state.release.lock().unwrap().pop_front();
        scripted.unwrap_or_else(not_found)
    }
}
