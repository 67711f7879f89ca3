//! Page-by-page loading of remote lists
//!
//! A `PagingSource` knows how to fetch one page for a key. A `Pager` pairs a
//! page size with a factory producing fresh sources, and `PagingData` is the
//! cached list a screen holds: it keeps the loaded pages, loads the next one
//! on demand and publishes snapshots over a watch channel.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::{watch, Mutex};

use super::content::PaginatedResult;
use super::error::LoadError;
use crate::config::PER_PAGE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadParams {
    /// Page to load, `None` on the very first load
    pub key: Option<u32>,
    pub load_size: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub prev_key: Option<u32>,
    pub next_key: Option<u32>,
}

impl<T> From<PaginatedResult<Vec<T>>> for Page<T> {
    fn from(result: PaginatedResult<Vec<T>>) -> Self {
        Page {
            prev_key: result.prev_page(),
            next_key: result.next_page(),
            data: result.data,
        }
    }
}

pub type LoadResult<T> = Result<Page<T>, LoadError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PagingConfig {
    pub page_size: u32,
    pub initial_load_size: u32,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: PER_PAGE,
            initial_load_size: PER_PAGE,
        }
    }
}

/// Pages loaded so far and where the user is looking
#[derive(Clone, Debug)]
pub struct PagingState<T> {
    pub pages: Vec<Page<T>>,
    pub anchor_position: Option<usize>,
    pub config: PagingConfig,
}

impl<T> PagingState<T> {
    /// The loaded page holding item `position`, or the last non-empty page
    /// when the position is past the end.
    pub fn closest_page_to_position(&self, position: usize) -> Option<&Page<T>> {
        let mut remaining = position;
        for page in &self.pages {
            if remaining < page.data.len() {
                return Some(page);
            }
            remaining -= page.data.len();
        }
        self.pages.iter().rev().find(|p| !p.data.is_empty())
    }

    pub fn item_count(&self) -> usize {
        self.pages.iter().map(|p| p.data.len()).sum()
    }
}

#[async_trait]
pub trait PagingSource: Send + Sync {
    type Item: Clone + Send + Sync + 'static;

    async fn load(&self, params: LoadParams) -> LoadResult<Self::Item>;

    /// Key to reload from after the list is invalidated
    fn refresh_key(&self, state: &PagingState<Self::Item>) -> Option<u32>;
}

/// Refresh key for sources keyed by consecutive page numbers.
pub fn page_number_refresh_key<T>(state: &PagingState<T>) -> Option<u32> {
    let anchor = state.anchor_position?;
    let page = state.closest_page_to_position(anchor)?;
    page.prev_key
        .map(|k| k + 1)
        .or_else(|| page.next_key.and_then(|k| k.checked_sub(1)))
}

type DynSource<T> = Arc<dyn PagingSource<Item = T>>;
type SourceFactory<T> = Arc<dyn Fn() -> DynSource<T> + Send + Sync>;

pub struct Pager<T> {
    config: PagingConfig,
    factory: SourceFactory<T>,
}

impl<T> Clone for Pager<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            factory: self.factory.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Pager<T> {
    pub fn new<S, F>(config: PagingConfig, factory: F) -> Self
    where
        S: PagingSource<Item = T> + 'static,
        F: Fn() -> S + Send + Sync + 'static,
    {
        Self {
            config,
            factory: Arc::new(move || Arc::new(factory()) as DynSource<T>),
        }
    }

    pub fn config(&self) -> PagingConfig {
        self.config
    }

    fn new_source(&self) -> DynSource<T> {
        (self.factory)()
    }

    /// Every page in order, starting from the first.
    ///
    /// Nothing is fetched until the stream is polled. Each call starts over
    /// with a fresh source. The stream ends after the last page or right after
    /// the first error.
    pub fn stream(&self) -> BoxStream<'static, LoadResult<T>> {
        let source = self.new_source();
        let config = self.config;

        stream::unfold(Some(None::<u32>), move |cursor| {
            let source = source.clone();
            async move {
                let key = cursor?;
                let load_size = if key.is_none() {
                    config.initial_load_size
                } else {
                    config.page_size
                };
                match source.load(LoadParams { key, load_size }).await {
                    Ok(page) => {
                        let next = page.next_key.map(Some);
                        Some((Ok(page), next))
                    }
                    Err(err) => Some((Err(err), None)),
                }
            }
        })
        .boxed()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    NotLoading { end_of_pagination_reached: bool },
    Loading,
    Error(LoadError),
}

impl LoadState {
    pub fn idle() -> Self {
        LoadState::NotLoading {
            end_of_pagination_reached: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            LoadState::Error(err) => Some(err),
            _ => None,
        }
    }
}

/// Load state of each direction, reported independently
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadStates {
    pub refresh: LoadState,
    pub prepend: LoadState,
    pub append: LoadState,
}

impl Default for LoadStates {
    fn default() -> Self {
        Self {
            refresh: LoadState::idle(),
            prepend: LoadState::idle(),
            append: LoadState::idle(),
        }
    }
}

impl LoadStates {
    fn complete() -> Self {
        let done = LoadState::NotLoading {
            end_of_pagination_reached: true,
        };
        Self {
            refresh: done.clone(),
            prepend: done.clone(),
            append: done,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PagingSnapshot<T> {
    pub items: Vec<T>,
    pub load_states: LoadStates,
}

impl<T> PagingSnapshot<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

struct PageStore<T> {
    source: Option<DynSource<T>>,
    state: PagingState<T>,
    load_states: LoadStates,
}

impl<T: Clone> PageStore<T> {
    fn snapshot(&self) -> PagingSnapshot<T> {
        PagingSnapshot {
            items: self
                .state
                .pages
                .iter()
                .flat_map(|p| p.data.iter().cloned())
                .collect(),
            load_states: self.load_states.clone(),
        }
    }
}

struct Inner<T> {
    pager: Option<Pager<T>>,
    store: Mutex<PageStore<T>>,
    snapshot: watch::Sender<PagingSnapshot<T>>,
}

/// Shared handle on a paginated list.
///
/// Clones see the same pages. Loads are serialized; an append or prepend
/// requested while another load is running is dropped.
pub struct PagingData<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for PagingData<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for PagingData<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagingData")
            .field("remote", &self.inner.pager.is_some())
            .finish()
    }
}

impl<T: Clone + Send + Sync + 'static> PagingData<T> {
    pub fn new(pager: Pager<T>) -> Self {
        let config = pager.config();
        Self::build(Some(pager), Vec::new(), config, LoadStates::default())
    }

    /// A list that never loads anything
    pub fn empty() -> Self {
        Self::from_items(Vec::new())
    }

    /// A fixed, fully loaded list
    pub fn from_items(items: Vec<T>) -> Self {
        let page = Page {
            data: items,
            prev_key: None,
            next_key: None,
        };
        Self::build(None, vec![page], PagingConfig::default(), LoadStates::complete())
    }

    fn build(
        pager: Option<Pager<T>>,
        pages: Vec<Page<T>>,
        config: PagingConfig,
        load_states: LoadStates,
    ) -> Self {
        let store = PageStore {
            source: None,
            state: PagingState {
                pages,
                anchor_position: None,
                config,
            },
            load_states,
        };
        let (snapshot, _) = watch::channel(store.snapshot());
        Self {
            inner: Arc::new(Inner {
                pager,
                store: Mutex::new(store),
                snapshot,
            }),
        }
    }

    pub fn snapshot(&self) -> PagingSnapshot<T> {
        self.inner.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PagingSnapshot<T>> {
        self.inner.snapshot.subscribe()
    }

    fn publish(&self, store: &PageStore<T>) {
        self.inner.snapshot.send_replace(store.snapshot());
    }

    /// Record the item the user is looking at; used to pick the refresh key.
    pub async fn set_anchor(&self, position: usize) {
        self.inner.store.lock().await.state.anchor_position = Some(position);
    }

    /// Drop the current source and reload with a fresh one.
    ///
    /// Starts from the source's refresh key when pages were already loaded,
    /// otherwise from the first page. Loaded pages are kept if the reload fails.
    pub async fn refresh(&self) -> Result<(), LoadError> {
        let Some(pager) = &self.inner.pager else {
            return Ok(());
        };
        let mut store = self.inner.store.lock().await;

        let key = match &store.source {
            Some(old) if !store.state.pages.is_empty() => old.refresh_key(&store.state),
            _ => None,
        };
        let source = pager.new_source();
        store.source = Some(source.clone());
        store.load_states.refresh = LoadState::Loading;
        self.publish(&store);

        let load_size = store.state.config.initial_load_size;
        tracing::debug!(?key, "Refreshing paged list");

        match source.load(LoadParams { key, load_size }).await {
            Ok(page) => {
                let reached_end = page.next_key.is_none();
                let reached_start = page.prev_key.is_none();
                store.state.pages = vec![page];
                store.load_states = LoadStates {
                    refresh: LoadState::NotLoading {
                        end_of_pagination_reached: false,
                    },
                    prepend: LoadState::NotLoading {
                        end_of_pagination_reached: reached_start,
                    },
                    append: LoadState::NotLoading {
                        end_of_pagination_reached: reached_end,
                    },
                };
                self.publish(&store);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Refresh failed");
                store.load_states.refresh = LoadState::Error(err.clone());
                self.publish(&store);
                Err(err)
            }
        }
    }

    /// Append the page after the last loaded one.
    pub async fn load_more(&self) -> Result<(), LoadError> {
        let Ok(mut store) = self.inner.store.try_lock() else {
            return Ok(());
        };
        let (Some(source), Some(key)) = (
            store.source.clone(),
            store.state.pages.last().and_then(|p| p.next_key),
        ) else {
            return Ok(());
        };

        store.load_states.append = LoadState::Loading;
        self.publish(&store);

        let load_size = store.state.config.page_size;
        tracing::debug!(key, "Appending page");

        match source.load(LoadParams { key: Some(key), load_size }).await {
            Ok(page) => {
                store.load_states.append = LoadState::NotLoading {
                    end_of_pagination_reached: page.next_key.is_none(),
                };
                store.state.pages.push(page);
                self.publish(&store);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "Append failed");
                store.load_states.append = LoadState::Error(err.clone());
                self.publish(&store);
                Err(err)
            }
        }
    }

    /// Prepend the page before the first loaded one. Only useful after a
    /// refresh resumed in the middle of the list.
    pub async fn load_previous(&self) -> Result<(), LoadError> {
        let Ok(mut store) = self.inner.store.try_lock() else {
            return Ok(());
        };
        let (Some(source), Some(key)) = (
            store.source.clone(),
            store.state.pages.first().and_then(|p| p.prev_key),
        ) else {
            return Ok(());
        };

        store.load_states.prepend = LoadState::Loading;
        self.publish(&store);

        let load_size = store.state.config.page_size;
        match source.load(LoadParams { key: Some(key), load_size }).await {
            Ok(page) => {
                let added = page.data.len();
                store.load_states.prepend = LoadState::NotLoading {
                    end_of_pagination_reached: page.prev_key.is_none(),
                };
                store.state.pages.insert(0, page);
                if let Some(anchor) = store.state.anchor_position.as_mut() {
                    *anchor += added;
                }
                self.publish(&store);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "Prepend failed");
                store.load_states.prepend = LoadState::Error(err.clone());
                self.publish(&store);
                Err(err)
            }
        }
    }

    /// Re-run whichever load last failed.
    pub async fn retry(&self) -> Result<(), LoadError> {
        let states = self.snapshot().load_states;
        if states.refresh.error().is_some() {
            self.refresh().await
        } else if states.append.error().is_some() {
            self.load_more().await
        } else if states.prepend.error().is_some() {
            self.load_previous().await
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves `total_pages` pages of three numbers each; failures can be
    /// queued for specific keys.
    struct NumberSource {
        total_pages: u32,
        failures: Arc<StdMutex<VecDeque<u32>>>,
        loads: Arc<StdMutex<Vec<Option<u32>>>>,
    }

    #[async_trait]
    impl PagingSource for NumberSource {
        type Item = u32;

        async fn load(&self, params: LoadParams) -> LoadResult<u32> {
            self.loads.lock().unwrap().push(params.key);
            let page = params.key.unwrap_or(1);
            {
                let mut failures = self.failures.lock().unwrap();
                if failures.front() == Some(&page) {
                    failures.pop_front();
                    return Err(LoadError::NetworkUnavailable(None));
                }
            }
            let result = PaginatedResult {
                data: (0..3).map(|i| page * 10 + i).collect(),
                current_page: page,
                total_pages: self.total_pages,
            };
            Ok(result.into())
        }

        fn refresh_key(&self, state: &PagingState<u32>) -> Option<u32> {
            page_number_refresh_key(state)
        }
    }

    struct Harness {
        failures: Arc<StdMutex<VecDeque<u32>>>,
        loads: Arc<StdMutex<Vec<Option<u32>>>>,
        created: Arc<AtomicUsize>,
    }

    fn pager(total_pages: u32) -> (Pager<u32>, Harness) {
        let harness = Harness {
            failures: Arc::default(),
            loads: Arc::default(),
            created: Arc::default(),
        };
        let failures = harness.failures.clone();
        let loads = harness.loads.clone();
        let created = harness.created.clone();
        let pager = Pager::new(PagingConfig::default(), move || {
            created.fetch_add(1, Ordering::SeqCst);
            NumberSource {
                total_pages,
                failures: failures.clone(),
                loads: loads.clone(),
            }
        });
        (pager, harness)
    }

    fn page(data: Vec<u32>, prev_key: Option<u32>, next_key: Option<u32>) -> Page<u32> {
        Page {
            data,
            prev_key,
            next_key,
        }
    }

    #[test]
    fn closest_page_follows_item_offsets() {
        let state = PagingState {
            pages: vec![
                page(vec![1, 2, 3], None, Some(2)),
                page(vec![4, 5], Some(1), Some(3)),
            ],
            anchor_position: None,
            config: PagingConfig::default(),
        };
        assert_eq!(state.closest_page_to_position(0).unwrap().next_key, Some(2));
        assert_eq!(state.closest_page_to_position(3).unwrap().next_key, Some(3));
        assert_eq!(state.closest_page_to_position(99).unwrap().next_key, Some(3));
    }

    #[test]
    fn refresh_key_uses_neighbours_of_anchor_page() {
        let mut state = PagingState {
            pages: vec![
                page(vec![1, 2], None, Some(2)),
                page(vec![3, 4], Some(1), Some(3)),
            ],
            anchor_position: None,
            config: PagingConfig::default(),
        };
        assert_eq!(page_number_refresh_key(&state), None);

        state.anchor_position = Some(0);
        assert_eq!(page_number_refresh_key(&state), Some(1));

        state.anchor_position = Some(3);
        assert_eq!(page_number_refresh_key(&state), Some(2));
    }

    #[tokio::test]
    async fn stream_walks_every_page_then_ends() {
        let (pager, harness) = pager(3);
        let pages: Vec<Page<u32>> = pager.stream().try_collect().await.unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[2].data, vec![30, 31, 32]);
        assert_eq!(
            *harness.loads.lock().unwrap(),
            vec![None, Some(2), Some(3)]
        );
    }

    #[tokio::test]
    async fn stream_is_lazy_and_restartable() {
        let (pager, harness) = pager(2);
        let stream = pager.stream();
        assert!(harness.loads.lock().unwrap().is_empty());
        drop(stream);

        let first: Vec<_> = pager.stream().collect().await;
        let second: Vec<_> = pager.stream().collect().await;
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        assert_eq!(harness.created.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn stream_stops_after_error() {
        let (pager, harness) = pager(5);
        harness.failures.lock().unwrap().push_back(2);
        let results: Vec<_> = pager.stream().collect().await;
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert_eq!(results[1], Err(LoadError::NetworkUnavailable(None)));
    }

    #[tokio::test]
    async fn paging_data_refreshes_then_appends() {
        let (pager, _harness) = pager(2);
        let data = PagingData::new(pager);
        assert!(data.snapshot().is_empty());

        data.refresh().await.unwrap();
        let snap = data.snapshot();
        assert_eq!(snap.items, vec![10, 11, 12]);
        assert_eq!(
            snap.load_states.append,
            LoadState::NotLoading {
                end_of_pagination_reached: false
            }
        );

        data.load_more().await.unwrap();
        let snap = data.snapshot();
        assert_eq!(snap.items.len(), 6);
        assert_eq!(
            snap.load_states.append,
            LoadState::NotLoading {
                end_of_pagination_reached: true
            }
        );

        // nothing left to append
        data.load_more().await.unwrap();
        assert_eq!(data.snapshot().items.len(), 6);
    }

    #[tokio::test]
    async fn append_error_is_separate_from_refresh_and_retryable() {
        let (pager, harness) = pager(3);
        let data = PagingData::new(pager);
        data.refresh().await.unwrap();

        harness.failures.lock().unwrap().push_back(2);
        assert!(data.load_more().await.is_err());
        let snap = data.snapshot();
        assert_eq!(snap.items.len(), 3);
        assert_eq!(
            snap.load_states.append,
            LoadState::Error(LoadError::NetworkUnavailable(None))
        );
        assert!(snap.load_states.refresh.error().is_none());

        data.retry().await.unwrap();
        assert_eq!(data.snapshot().items.len(), 6);
    }

    #[tokio::test]
    async fn failed_refresh_reports_error_and_retry_recovers() {
        let (pager, harness) = pager(3);
        harness.failures.lock().unwrap().push_back(1);
        let data = PagingData::new(pager);

        assert_eq!(
            data.refresh().await,
            Err(LoadError::NetworkUnavailable(None))
        );
        assert!(data.snapshot().load_states.refresh.error().is_some());

        data.retry().await.unwrap();
        assert_eq!(data.snapshot().items, vec![10, 11, 12]);
    }

    #[tokio::test]
    async fn refresh_resumes_near_anchor_with_a_new_source() {
        let (pager, harness) = pager(5);
        let data = PagingData::new(pager);
        data.refresh().await.unwrap();
        data.load_more().await.unwrap();
        data.load_more().await.unwrap();
        data.set_anchor(7).await;

        data.refresh().await.unwrap();
        assert_eq!(data.snapshot().items, vec![30, 31, 32]);
        assert_eq!(harness.created.load(Ordering::SeqCst), 2);
        assert_eq!(harness.loads.lock().unwrap().last(), Some(&Some(3)));

        data.load_previous().await.unwrap();
        assert_eq!(data.snapshot().items, vec![20, 21, 22, 30, 31, 32]);
    }

    #[tokio::test]
    async fn fixed_lists_never_load() {
        let data = PagingData::from_items(vec!["a", "b"]);
        data.refresh().await.unwrap();
        data.load_more().await.unwrap();
        let snap = data.snapshot();
        assert_eq!(snap.items, vec!["a", "b"]);
        assert_eq!(
            snap.load_states.append,
            LoadState::NotLoading {
                end_of_pagination_reached: true
            }
        );
        assert!(PagingData::<u32>::empty().snapshot().is_empty());
    }

    #[tokio::test]
    async fn subscribers_see_published_snapshots() {
        let (pager, _harness) = pager(1);
        let data = PagingData::new(pager);
        let mut rx = data.subscribe();
        data.refresh().await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().items.len(), 3);
    }
}
