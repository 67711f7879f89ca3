//! Catalog records shown by the screens

/// An artist row from search results
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artist {
    pub id: u64,
    pub name: String,
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtistMember {
    pub name: String,
    pub active: bool,
}

/// Artist page. `profile` is plain text, BBCode already stripped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtistDetail {
    pub name: String,
    pub profile: Option<String>,
    pub image_url: Option<String>,
    pub members: Vec<ArtistMember>,
}

/// Discogs lists masters (the album as a work) and individual pressings
/// side by side in an artist's releases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ReleaseKind {
    Master,
    Release,
    #[default]
    Other,
}

impl ReleaseKind {
    pub fn from_wire(kind: Option<&str>) -> Self {
        match kind {
            Some(k) if k.eq_ignore_ascii_case("master") => ReleaseKind::Master,
            Some(k) if k.eq_ignore_ascii_case("release") => ReleaseKind::Release,
            _ => ReleaseKind::Other,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Release {
    pub id: u64,
    pub title: String,
    pub release_year: Option<u16>,
    pub image_url: Option<String>,
    pub kind: ReleaseKind,
    pub main_release_id: Option<u64>,
}

impl Release {
    /// Id to open with the release endpoint. A master row points at its
    /// main release.
    pub fn detail_id(&self) -> u64 {
        match self.kind {
            ReleaseKind::Master => self.main_release_id.unwrap_or(self.id),
            _ => self.id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub position: String,
    pub title: String,
    pub duration: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReleaseDetail {
    pub id: u64,
    pub title: String,
    pub release_year: Option<u16>,
    pub artists: Vec<String>,
    pub genres: Vec<String>,
    pub styles: Vec<String>,
    pub labels: Vec<String>,
    pub tracklist: Vec<Track>,
    pub image_url: Option<String>,
}

/// One mapped page plus where it sits in the result set
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaginatedResult<T> {
    pub data: T,
    pub current_page: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResult<T> {
    pub fn prev_page(&self) -> Option<u32> {
        self.current_page.checked_sub(1).filter(|p| *p > 0)
    }

    pub fn next_page(&self) -> Option<u32> {
        self.current_page
            .checked_add(1)
            .filter(|next| *next <= self.total_pages)
    }
}
