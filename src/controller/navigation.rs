//! Screen stack, list paging and view snapshots

use std::sync::Arc;

use crate::model::{
    Artist, ContentView, DetailStatus, ListStatus, ListView, LoadState, PagingData, PagingSnapshot,
    Reason, Release, ReleaseScope,
};
use crate::viewmodel::{
    ArtistDetailAction, ArtistDetailEvent, ArtistDetailState, ArtistDetailViewModel,
    ReleaseDetailAction, ReleaseDetailEvent, ReleaseDetailState, ReleaseDetailViewModel,
    ReleaseListAction, ReleaseListEvent, ReleaseListState, ReleaseListViewModel, SearchAction,
    Scope, SearchEvent, SearchState, StringId, ViewModel,
};
use super::AppController;

/// Start fetching the next page when the cursor is this close to the end
pub const LOAD_MORE_THRESHOLD: usize = 5;

pub(crate) enum Screen {
    ArtistDetail {
        vm: Arc<ArtistDetailViewModel>,
        artist: Artist,
    },
    Releases {
        vm: Arc<ReleaseListViewModel>,
        artist: Artist,
        selected: usize,
    },
    ReleaseDetail {
        vm: Arc<ReleaseDetailViewModel>,
        title: String,
        scroll: usize,
    },
}

/// The row Enter acts on
pub(crate) enum SelectedItem {
    Artist(Artist),
    Release(Release),
}

fn step(index: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    index.saturating_add_signed(delta).min(len - 1)
}

impl AppController {
    pub async fn on_query_changed(&self, query: String) {
        *self.search_selected.lock().await = 0;
        self.search.send_action(SearchAction::Search(query));
    }

    pub async fn open_artist(&self, artist: Artist) {
        tracing::debug!(artist_id = artist.id, name = %artist.name, "Opening artist");
        let vm = ArtistDetailViewModel::new(
            self.services.artist_detail.clone(),
            self.services.text.clone(),
        );
        vm.send_action(ArtistDetailAction::LoadArtist(artist.id));
        self.screens.lock().await.push(Screen::ArtistDetail { vm, artist });
    }

    pub async fn open_releases(&self, scope: ReleaseScope) {
        let mut screens = self.screens.lock().await;
        let Some(Screen::ArtistDetail { artist, .. }) = screens.last() else {
            return;
        };
        let artist = artist.clone();
        let vm = ReleaseListViewModel::new(self.services.releases.clone(), self.services.text.clone());
        vm.send_action(load_action(artist.id, scope));
        screens.push(Screen::Releases {
            vm,
            artist,
            selected: 0,
        });
    }

    /// Switch the open release list between all releases and albums
    pub async fn toggle_release_scope(&self) {
        let mut screens = self.screens.lock().await;
        if let Some(Screen::Releases { vm, artist, selected }) = screens.last_mut() {
            let scope = match vm.release_scope() {
                ReleaseScope::All => ReleaseScope::Albums,
                ReleaseScope::Albums => ReleaseScope::All,
            };
            *selected = 0;
            vm.send_action(load_action(artist.id, scope));
        }
    }

    pub async fn open_release(&self, release: Release) {
        let release_id = release.detail_id();
        tracing::debug!(release_id, title = %release.title, "Opening release");
        let vm = ReleaseDetailViewModel::new(
            self.services.release_detail.clone(),
            self.services.text.clone(),
        );
        vm.send_action(ReleaseDetailAction::LoadRelease(release_id));
        self.screens.lock().await.push(Screen::ReleaseDetail {
            vm,
            title: release.title,
            scroll: 0,
        });
    }

    /// Pop the top screen. Returns false when already at search.
    pub async fn navigate_back(&self) -> bool {
        self.screens.lock().await.pop().is_some()
    }

    pub async fn at_search(&self) -> bool {
        self.screens.lock().await.is_empty()
    }

    pub async fn on_artist_detail(&self) -> bool {
        matches!(self.screens.lock().await.last(), Some(Screen::ArtistDetail { .. }))
    }

    pub async fn move_selection(&self, delta: isize) {
        let mut screens = self.screens.lock().await;
        match screens.last_mut() {
            None => {
                let artists = self.search.paged_artists();
                let len = artists.snapshot().items.len();
                let mut selected = self.search_selected.lock().await;
                *selected = step(*selected, delta, len);
                page_near(self.search.store().scope(), artists, *selected);
            }
            Some(Screen::Releases { vm, selected, .. }) => {
                let releases = vm.paged_releases();
                let len = releases.snapshot().items.len();
                *selected = step(*selected, delta, len);
                page_near(vm.store().scope(), releases, *selected);
            }
            Some(Screen::ReleaseDetail { scroll, .. }) => {
                *scroll = scroll.saturating_add_signed(delta);
            }
            Some(Screen::ArtistDetail { .. }) => {}
        }
    }

    pub(crate) async fn selected_item(&self) -> Option<SelectedItem> {
        let screens = self.screens.lock().await;
        match screens.last() {
            None => {
                let selected = *self.search_selected.lock().await;
                self.search
                    .paged_artists()
                    .snapshot()
                    .items
                    .into_iter()
                    .nth(selected)
                    .map(SelectedItem::Artist)
            }
            Some(Screen::Releases { vm, selected, .. }) => vm
                .paged_releases()
                .snapshot()
                .items
                .into_iter()
                .nth(*selected)
                .map(SelectedItem::Release),
            _ => None,
        }
    }

    pub async fn retry(&self) {
        let screens = self.screens.lock().await;
        match screens.last() {
            None => self.search.send_action(SearchAction::Retry),
            Some(Screen::ArtistDetail { vm, .. }) => vm.send_action(ArtistDetailAction::Retry),
            Some(Screen::Releases { vm, .. }) => vm.send_action(ReleaseListAction::Retry),
            Some(Screen::ReleaseDetail { vm, .. }) => vm.send_action(ReleaseDetailAction::Retry),
        }
    }

    /// Turn pending one-shot events into the error toast.
    pub async fn collect_events(&self) {
        let mut messages = Vec::new();
        while let Some(SearchEvent::ShowError(message)) = self.search.try_next_event() {
            messages.push(message);
        }
        for screen in self.screens.lock().await.iter() {
            match screen {
                Screen::ArtistDetail { vm, .. } => {
                    while let Some(ArtistDetailEvent::ShowError(message)) = vm.try_next_event() {
                        messages.push(message);
                    }
                }
                Screen::Releases { vm, .. } => {
                    while let Some(ReleaseListEvent::ShowError(message)) = vm.try_next_event() {
                        messages.push(message);
                    }
                }
                Screen::ReleaseDetail { vm, .. } => {
                    while let Some(ReleaseDetailEvent::ShowError(message)) = vm.try_next_event() {
                        messages.push(message);
                    }
                }
            }
        }
        if let Some(latest) = messages.pop() {
            self.model.set_error(latest).await;
        }
    }

    pub async fn content_view(&self) -> ContentView {
        let screens = self.screens.lock().await;
        let text = &self.services.text;

        match screens.last() {
            None => {
                let status = match self.search.state() {
                    SearchState::Idle => ListStatus::Idle(text.get_string(StringId::SearchPrompt, &[])),
                    SearchState::Loading => ListStatus::Loading,
                    SearchState::Success => ListStatus::Ready,
                    SearchState::Empty => {
                        ListStatus::Empty(text.get_string(StringId::ArtistsNotFound, &[]))
                    }
                    SearchState::Error(message) => ListStatus::Error(message),
                };
                let selected = *self.search_selected.lock().await;
                ContentView::Search {
                    artists: self.list_view(self.search.paged_artists().snapshot(), selected, status),
                }
            }
            Some(Screen::ArtistDetail { vm, artist }) => ContentView::ArtistDetail {
                artist: artist.clone(),
                detail: match vm.state() {
                    ArtistDetailState::Loading => DetailStatus::Loading,
                    ArtistDetailState::Success(detail) => DetailStatus::Ready(detail),
                    ArtistDetailState::Error(message) => DetailStatus::Error(message),
                },
            },
            Some(Screen::Releases {
                vm,
                artist,
                selected,
            }) => {
                let scope = vm.release_scope();
                let status = match vm.state() {
                    ReleaseListState::Idle | ReleaseListState::Loading => ListStatus::Loading,
                    ReleaseListState::Success => ListStatus::Ready,
                    ReleaseListState::Empty => {
                        let id = match scope {
                            ReleaseScope::All => StringId::ReleasesNotFound,
                            ReleaseScope::Albums => StringId::AlbumsNotFound,
                        };
                        ListStatus::Empty(text.get_string(id, &[]))
                    }
                    ReleaseListState::Error(message) => ListStatus::Error(message),
                };
                ContentView::Releases {
                    artist: artist.clone(),
                    scope,
                    releases: self.list_view(vm.paged_releases().snapshot(), *selected, status),
                }
            }
            Some(Screen::ReleaseDetail { vm, title, scroll }) => ContentView::ReleaseDetail {
                title: title.clone(),
                scroll: *scroll,
                detail: match vm.state() {
                    ReleaseDetailState::Loading => DetailStatus::Loading,
                    ReleaseDetailState::Success(detail) => DetailStatus::Ready(detail),
                    ReleaseDetailState::Error(message) => DetailStatus::Error(message),
                },
            },
        }
    }

    fn list_view<T>(&self, snapshot: PagingSnapshot<T>, selected: usize, status: ListStatus) -> ListView<T> {
        let text = &self.services.text;
        let footer = match &snapshot.load_states.append {
            LoadState::Loading => Some(text.get_string(StringId::LoadingMore, &[])),
            LoadState::Error(err) => {
                let reason = Reason::from(err.clone()).to_ui_message(text.as_ref());
                Some(text.get_string(StringId::LoadMoreFailed, &[reason.as_str()]))
            }
            LoadState::NotLoading { .. } => None,
        };
        ListView {
            selected: selected.min(snapshot.items.len().saturating_sub(1)),
            items: snapshot.items,
            status,
            footer,
        }
    }
}

fn load_action(artist_id: u64, scope: ReleaseScope) -> ReleaseListAction {
    match scope {
        ReleaseScope::All => ReleaseListAction::LoadReleases(artist_id),
        ReleaseScope::Albums => ReleaseListAction::LoadAlbums(artist_id),
    }
}

/// Record the cursor and fetch the next page once it nears the end.
/// Runs in the screen's scope so leaving the screen cancels the fetch.
fn page_near<T: Clone + Send + Sync + 'static>(scope: &Scope, data: PagingData<T>, selected: usize) {
    let snapshot = data.snapshot();
    let near_end = selected + LOAD_MORE_THRESHOLD >= snapshot.items.len();
    let append_failed = snapshot.load_states.append.error().is_some();

    scope.spawn(async move {
        data.set_anchor(selected).await;
        if near_end && !append_failed {
            if let Err(err) = data.load_more().await {
                tracing::debug!(error = %err, "Load more failed");
            }
        }
    });
}
