//! Repositories over the Discogs gateway
//!
//! Paginated lists come back as `PagingData` (failures show up in its load
//! states). Single-shot lookups come back as `UseCaseResult`.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use super::content::{Artist, ArtistDetail, Release, ReleaseDetail};
use super::discogs_client::DiscogsApi;
use super::error::{ApiError, Reason, UseCaseResult};
use super::paging::{Pager, PagingConfig, PagingData};
use super::paging_sources::{ArtistPagingSource, ArtistReleasesPagingSource, ReleaseScope};

/// Run a gateway call and fold any failure into a `Reason`.
pub async fn safe_call<T, F>(call: F) -> UseCaseResult<T>
where
    F: Future<Output = Result<T, ApiError>>,
{
    call.await.map_err(|err| {
        tracing::warn!(error = %err, "Discogs call failed");
        Reason::from(err)
    })
}

pub trait SearchArtistRepository: Send + Sync {
    fn search_artist(&self, query: &str) -> PagingData<Artist>;
}

pub trait ArtistReleasesRepository: Send + Sync {
    fn artist_releases(&self, artist_id: u64, scope: ReleaseScope) -> PagingData<Release>;
}

#[async_trait]
pub trait ArtistDetailRepository: Send + Sync {
    async fn artist_detail(&self, artist_id: u64) -> UseCaseResult<ArtistDetail>;
}

#[async_trait]
pub trait ReleaseDetailRepository: Send + Sync {
    async fn release_detail(&self, release_id: u64) -> UseCaseResult<ReleaseDetail>;
}

/// Every repository, backed by one gateway
#[derive(Clone)]
pub struct DiscogsRepository {
    api: Arc<dyn DiscogsApi>,
    config: PagingConfig,
}

impl DiscogsRepository {
    pub fn new(api: Arc<dyn DiscogsApi>) -> Self {
        Self {
            api,
            config: PagingConfig::default(),
        }
    }
}

impl SearchArtistRepository for DiscogsRepository {
    fn search_artist(&self, query: &str) -> PagingData<Artist> {
        let api = self.api.clone();
        let query = query.to_string();
        let pager = Pager::new(self.config, move || {
            ArtistPagingSource::new(api.clone(), query.clone())
        });
        PagingData::new(pager)
    }
}

impl ArtistReleasesRepository for DiscogsRepository {
    fn artist_releases(&self, artist_id: u64, scope: ReleaseScope) -> PagingData<Release> {
        let api = self.api.clone();
        let pager = Pager::new(self.config, move || {
            ArtistReleasesPagingSource::new(api.clone(), artist_id, scope)
        });
        PagingData::new(pager)
    }
}

#[async_trait]
impl ArtistDetailRepository for DiscogsRepository {
    async fn artist_detail(&self, artist_id: u64) -> UseCaseResult<ArtistDetail> {
        let response = safe_call(self.api.get_artist_details(artist_id)).await?;
        Ok(response.into())
    }
}

#[async_trait]
impl ReleaseDetailRepository for DiscogsRepository {
    async fn release_detail(&self, release_id: u64) -> UseCaseResult<ReleaseDetail> {
        let response = safe_call(self.api.get_release_details(release_id)).await?;
        Ok(response.into())
    }
}
