//! Paging sources over the Discogs search and artist-releases endpoints

use std::sync::Arc;

use async_trait::async_trait;

use super::content::{Artist, PaginatedResult, Release, ReleaseKind};
use super::discogs_client::{DiscogsApi, SEARCH_TYPE_ARTIST, SORT_BY_YEAR, SORT_ORDER_DESC};
use super::error::LoadError;
use super::paging::{page_number_refresh_key, LoadParams, LoadResult, Page, PagingSource, PagingState};
use crate::config::FIRST_PAGE;

/// Artists matching one search query
pub struct ArtistPagingSource {
    api: Arc<dyn DiscogsApi>,
    query: String,
}

impl ArtistPagingSource {
    pub fn new(api: Arc<dyn DiscogsApi>, query: impl Into<String>) -> Self {
        Self {
            api,
            query: query.into(),
        }
    }
}

#[async_trait]
impl PagingSource for ArtistPagingSource {
    type Item = Artist;

    async fn load(&self, params: LoadParams) -> LoadResult<Artist> {
        let page = params.key.unwrap_or(FIRST_PAGE);
        let response = self
            .api
            .search_artists(&self.query, page, params.load_size, SEARCH_TYPE_ARTIST)
            .await
            .map_err(LoadError::from)?;

        let result: PaginatedResult<Vec<Artist>> = response.into();
        tracing::debug!(
            query = %self.query,
            page = result.current_page,
            total_pages = result.total_pages,
            count = result.data.len(),
            "Loaded artist page"
        );
        Ok(Page::from(result))
    }

    fn refresh_key(&self, state: &PagingState<Artist>) -> Option<u32> {
        page_number_refresh_key(state)
    }
}

/// Which of an artist's releases a list shows
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ReleaseScope {
    #[default]
    All,
    /// Master releases only, one row per album rather than per pressing
    Albums,
}

impl ReleaseScope {
    fn keeps(self, release: &Release) -> bool {
        match self {
            ReleaseScope::All => true,
            ReleaseScope::Albums => release.kind == ReleaseKind::Master,
        }
    }
}

/// One artist's releases, newest first
pub struct ArtistReleasesPagingSource {
    api: Arc<dyn DiscogsApi>,
    artist_id: u64,
    scope: ReleaseScope,
}

impl ArtistReleasesPagingSource {
    pub fn new(api: Arc<dyn DiscogsApi>, artist_id: u64, scope: ReleaseScope) -> Self {
        Self {
            api,
            artist_id,
            scope,
        }
    }
}

#[async_trait]
impl PagingSource for ArtistReleasesPagingSource {
    type Item = Release;

    async fn load(&self, params: LoadParams) -> LoadResult<Release> {
        let first = params.key.unwrap_or(FIRST_PAGE);
        let mut page = first;
        let mut prev_key = None;
        loop {
            let response = self
                .api
                .get_artist_releases(self.artist_id, SORT_BY_YEAR, SORT_ORDER_DESC, page, params.load_size)
                .await
                .map_err(LoadError::from)?;

            let mut result: PaginatedResult<Vec<Release>> = response.into();
            let scope = self.scope;
            result.data.retain(|r| scope.keeps(r));
            tracing::debug!(
                artist_id = self.artist_id,
                page = result.current_page,
                total_pages = result.total_pages,
                count = result.data.len(),
                ?scope,
                "Loaded releases page"
            );

            if page == first {
                prev_key = result.prev_page();
            }
            let next_key = result.next_page();
            // A page the scope filtered down to nothing would stall paging
            match next_key {
                Some(next) if result.data.is_empty() && next > page => page = next,
                _ => {
                    return Ok(Page {
                        data: result.data,
                        prev_key,
                        next_key,
                    })
                }
            }
        }
    }

    fn refresh_key(&self, state: &PagingState<Release>) -> Option<u32> {
        page_number_refresh_key(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::error::ApiError;
    use crate::model::testing::{artist_row, release_row, FakeDiscogsApi};

    fn params(key: Option<u32>) -> LoadParams {
        LoadParams { key, load_size: 30 }
    }

    #[tokio::test]
    async fn first_search_page_has_no_prev_and_next_two() {
        let api = FakeDiscogsApi::new();
        api.push_search(Ok(FakeDiscogsApi::search_page(
            1,
            10,
            vec![artist_row(3840, "Radiohead")],
        )));
        let source = ArtistPagingSource::new(Arc::new(api.clone()), "Radiohead");

        let page = source.load(params(None)).await.unwrap();
        assert_eq!(page.prev_key, None);
        assert_eq!(page.next_key, Some(2));
        assert_eq!(page.data[0].name, "Radiohead");
        assert_eq!(api.search_calls(), vec![("Radiohead".to_string(), 1)]);
    }

    #[tokio::test]
    async fn last_search_page_has_no_next() {
        let api = FakeDiscogsApi::new();
        api.push_search(Ok(FakeDiscogsApi::search_page(10, 10, vec![])));
        let source = ArtistPagingSource::new(Arc::new(api), "Radiohead");

        let page = source.load(params(Some(10))).await.unwrap();
        assert_eq!(page.prev_key, Some(9));
        assert_eq!(page.next_key, None);
    }

    #[tokio::test]
    async fn server_error_becomes_internal_server_error() {
        let api = FakeDiscogsApi::new();
        api.push_search(Err(ApiError::from_status(500, "Internal Server Error")));
        let source = ArtistPagingSource::new(Arc::new(api), "x");

        let err = source.load(params(None)).await.unwrap_err();
        assert!(matches!(err, LoadError::InternalServerError(_)));
    }

    #[tokio::test]
    async fn io_failure_becomes_network_unavailable() {
        let api = FakeDiscogsApi::new();
        api.push_search(Err(ApiError::Io("Network down".into())));
        let source = ArtistPagingSource::new(Arc::new(api), "x");

        let err = source.load(params(None)).await.unwrap_err();
        assert_eq!(err, LoadError::NetworkUnavailable(Some("Network down".into())));
    }

    #[tokio::test]
    async fn releases_source_requests_newest_first() {
        let api = FakeDiscogsApi::new();
        api.push_releases(Ok(FakeDiscogsApi::releases_page(
            2,
            3,
            vec![release_row(1, "OK Computer", "master")],
        )));
        let source = ArtistReleasesPagingSource::new(Arc::new(api.clone()), 3840, ReleaseScope::All);

        let page = source.load(params(Some(2))).await.unwrap();
        assert_eq!(page.prev_key, Some(1));
        assert_eq!(page.next_key, Some(3));
        assert_eq!(api.release_calls(), vec![(3840, 2)]);
    }

    #[tokio::test]
    async fn album_scope_keeps_masters_only() {
        let api = FakeDiscogsApi::new();
        api.push_releases(Ok(FakeDiscogsApi::releases_page(
            1,
            2,
            vec![
                release_row(1, "OK Computer", "master"),
                release_row(2, "OK Computer (Japan)", "release"),
            ],
        )));
        let source = ArtistReleasesPagingSource::new(Arc::new(api), 3840, ReleaseScope::Albums);

        let page = source.load(params(None)).await.unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].title, "OK Computer");
        assert_eq!(page.next_key, Some(2));
    }

    #[tokio::test]
    async fn album_scope_skips_pages_without_masters() {
        let api = FakeDiscogsApi::new();
        api.push_releases(Ok(FakeDiscogsApi::releases_page(
            1,
            3,
            vec![release_row(5, "Creep (CD single)", "release")],
        )));
        api.push_releases(Ok(FakeDiscogsApi::releases_page(
            2,
            3,
            vec![release_row(6, "Pablo Honey", "master")],
        )));
        let source = ArtistReleasesPagingSource::new(Arc::new(api.clone()), 3840, ReleaseScope::Albums);

        let page = source.load(params(None)).await.unwrap();
        assert_eq!(page.data[0].title, "Pablo Honey");
        assert_eq!(page.prev_key, None);
        assert_eq!(page.next_key, Some(3));
        assert_eq!(api.release_calls(), vec![(3840, 1), (3840, 2)]);
    }

    #[tokio::test]
    async fn album_scope_stops_at_last_page() {
        let api = FakeDiscogsApi::new();
        api.push_releases(Ok(FakeDiscogsApi::releases_page(
            2,
            2,
            vec![release_row(5, "Creep (CD single)", "release")],
        )));
        let source = ArtistReleasesPagingSource::new(Arc::new(api.clone()), 3840, ReleaseScope::Albums);

        let page = source.load(params(Some(2))).await.unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.prev_key, Some(1));
        assert_eq!(page.next_key, None);
        assert_eq!(api.release_calls(), vec![(3840, 2)]);
    }

    #[tokio::test]
    async fn releases_not_found_is_typed() {
        let api = FakeDiscogsApi::new();
        api.push_releases(Err(ApiError::from_status(404, "Artist not found.")));
        let source = ArtistReleasesPagingSource::new(Arc::new(api), 999, ReleaseScope::All);

        let err = source.load(params(None)).await.unwrap_err();
        assert_eq!(err, LoadError::NotFound(Some("Artist not found.".into())));
    }
}
