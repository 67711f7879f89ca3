//! Use cases: one operation each, delegating to a repository

use std::sync::Arc;

use async_trait::async_trait;

use super::content::{Artist, ArtistDetail, Release, ReleaseDetail};
use super::error::UseCaseResult;
use super::paging::PagingData;
use super::paging_sources::ReleaseScope;
use super::repository::{
    ArtistDetailRepository, ArtistReleasesRepository, ReleaseDetailRepository,
    SearchArtistRepository,
};

#[async_trait]
pub trait UseCase<P: Send + 'static>: Send + Sync {
    type Output: Send;

    async fn execute(&self, params: P) -> Self::Output;
}

pub struct SearchArtistUseCase {
    repository: Arc<dyn SearchArtistRepository>,
}

impl SearchArtistUseCase {
    pub fn new(repository: Arc<dyn SearchArtistRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl UseCase<String> for SearchArtistUseCase {
    type Output = PagingData<Artist>;

    async fn execute(&self, query: String) -> PagingData<Artist> {
        self.repository.search_artist(&query)
    }
}

pub struct ArtistReleasesUseCase {
    repository: Arc<dyn ArtistReleasesRepository>,
}

impl ArtistReleasesUseCase {
    pub fn new(repository: Arc<dyn ArtistReleasesRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl UseCase<(u64, ReleaseScope)> for ArtistReleasesUseCase {
    type Output = PagingData<Release>;

    async fn execute(&self, params: (u64, ReleaseScope)) -> PagingData<Release> {
        let (artist_id, scope) = params;
        self.repository.artist_releases(artist_id, scope)
    }
}

pub struct ArtistDetailUseCase {
    repository: Arc<dyn ArtistDetailRepository>,
}

impl ArtistDetailUseCase {
    pub fn new(repository: Arc<dyn ArtistDetailRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl UseCase<u64> for ArtistDetailUseCase {
    type Output = UseCaseResult<ArtistDetail>;

    async fn execute(&self, artist_id: u64) -> UseCaseResult<ArtistDetail> {
        self.repository.artist_detail(artist_id).await
    }
}

pub struct ReleaseDetailUseCase {
    repository: Arc<dyn ReleaseDetailRepository>,
}

impl ReleaseDetailUseCase {
    pub fn new(repository: Arc<dyn ReleaseDetailRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl UseCase<u64> for ReleaseDetailUseCase {
    type Output = UseCaseResult<ReleaseDetail>;

    async fn execute(&self, release_id: u64) -> UseCaseResult<ReleaseDetail> {
        self.repository.release_detail(release_id).await
    }
}
