//! UI-facing state: what the view renders each frame

use tokio::time::Instant;

use super::content::{Artist, ArtistDetail, Release, ReleaseDetail};
use super::paging_sources::ReleaseScope;

/// UI state shared by every screen
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub search_query: String,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}

/// Where a paginated screen is in its lifecycle
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListStatus {
    /// Nothing requested yet; carries a hint for the user
    Idle(String),
    Loading,
    Ready,
    Empty(String),
    Error(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DetailStatus<T> {
    Loading,
    Ready(T),
    Error(String),
}

/// A paginated list as drawn: rows, cursor and the row under the last item
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListView<T> {
    pub items: Vec<T>,
    pub selected: usize,
    pub status: ListStatus,
    /// "loading more" or the append error with its retry hint
    pub footer: Option<String>,
}

/// The screen on top of the navigation stack
#[derive(Clone, Debug)]
pub enum ContentView {
    Search {
        artists: ListView<Artist>,
    },
    ArtistDetail {
        artist: Artist,
        detail: DetailStatus<ArtistDetail>,
    },
    Releases {
        artist: Artist,
        scope: ReleaseScope,
        releases: ListView<Release>,
    },
    ReleaseDetail {
        title: String,
        detail: DetailStatus<ReleaseDetail>,
        scroll: usize,
    },
}

impl ContentView {
    pub fn title(&self) -> String {
        match self {
            ContentView::Search { .. } => "Search".to_string(),
            ContentView::ArtistDetail { artist, .. } => artist.name.clone(),
            ContentView::Releases { artist, scope, .. } => match scope {
                ReleaseScope::All => format!("{} / Releases", artist.name),
                ReleaseScope::Albums => format!("{} / Albums", artist.name),
            },
            ContentView::ReleaseDetail { title, .. } => title.clone(),
        }
    }
}
