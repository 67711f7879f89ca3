//! View models - per-screen state machines
//!
//! - `state_holder`: generic store (state, events, actions, scope)
//! - `search`: debounced artist search
//! - `artist_detail`, `release_list`, `release_detail`: the other screens
//! - `messages`: failure-to-text translation

mod artist_detail;
mod messages;
mod release_detail;
mod release_list;
mod search;
mod state_holder;

pub use artist_detail::{ArtistDetailAction, ArtistDetailEvent, ArtistDetailState, ArtistDetailViewModel};
pub use messages::{EnglishText, StringId, TextResourceProvider};
pub use release_detail::{
    ReleaseDetailAction, ReleaseDetailEvent, ReleaseDetailState, ReleaseDetailViewModel,
};
pub use release_list::{ReleaseListAction, ReleaseListEvent, ReleaseListState, ReleaseListViewModel};
pub use search::{SearchAction, SearchEvent, SearchState, SearchViewModel};
pub use state_holder::{Scope, ViewModel};
