//! Model module - catalog data and everything that fetches it
//!
//! - `content`: domain records (artists, releases, pages)
//! - `error`: failure taxonomies
//! - `entities`: Discogs wire shapes
//! - `mapper`: wire-to-domain conversions and BBCode stripping
//! - `discogs_client`: the HTTP gateway
//! - `paging`, `paging_sources`: page-by-page loading
//! - `repository`, `use_case`: layering the screens call into
//! - `types`, `app_model`: UI state

mod app_model;
mod content;
mod discogs_client;
mod entities;
mod error;
mod mapper;
mod paging;
mod paging_sources;
mod repository;
mod types;
mod use_case;

#[cfg(test)]
pub mod testing;

pub use app_model::AppModel;
pub use content::{Artist, ArtistDetail, Release, ReleaseDetail, ReleaseKind};
pub use discogs_client::{DiscogsApi, DiscogsClient};
pub use error::{Reason, UseCaseResult};
pub use paging::{LoadState, PagingData, PagingSnapshot};
pub use paging_sources::ReleaseScope;
pub use repository::DiscogsRepository;
pub use types::{ContentView, DetailStatus, ListStatus, ListView, UiState};
pub use use_case::{
    ArtistDetailUseCase, ArtistReleasesUseCase, ReleaseDetailUseCase, SearchArtistUseCase, UseCase,
};

#[cfg(test)]
pub use content::ArtistMember;
#[cfg(test)]
pub use error::{ApiError, LoadError};
