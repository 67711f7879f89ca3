//! Wire shapes of the Discogs JSON responses
//!
//! Only the fields the app reads are declared; serde ignores the rest.
//! Everything Discogs may omit is optional or defaulted.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct ApiPagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub items: u32,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ArtistSearchResult {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub resource_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ArtistSearchResponse {
    #[serde(default)]
    pub pagination: ApiPagination,
    #[serde(default)]
    pub results: Vec<ArtistSearchResult>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ArtistReleaseItem {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Set on master rows only
    #[serde(default)]
    pub main_release: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ArtistReleasesResponse {
    #[serde(default)]
    pub pagination: ApiPagination,
    #[serde(default)]
    pub releases: Vec<ArtistReleaseItem>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ApiImage {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub uri150: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ApiMember {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ArtistDetailResponse {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub images: Vec<ApiImage>,
    #[serde(default)]
    pub members: Vec<ApiMember>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ApiLabel {
    pub name: String,
    #[serde(default)]
    pub catno: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ApiTrack {
    #[serde(default)]
    pub position: Option<String>,
    pub title: String,
    #[serde(default)]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ApiArtistCredit {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ReleaseDetailResponse {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub artists: Vec<ApiArtistCredit>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub styles: Vec<String>,
    #[serde(default)]
    pub labels: Vec<ApiLabel>,
    #[serde(default)]
    pub tracklist: Vec<ApiTrack>,
    #[serde(default)]
    pub images: Vec<ApiImage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_response_tolerates_missing_fields() {
        let json = r#"{
            "pagination": {"page": 1, "pages": 10, "per_page": 30, "items": 290},
            "results": [
                {"id": 3840, "title": "Radiohead", "thumb": "https://img/rh.jpg", "type": "artist"},
                {"id": 1, "title": "Radiohead Tribute"}
            ]
        }"#;
        let response: ArtistSearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.pagination.pages, 10);
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[1].thumb, None);
    }

    #[test]
    fn release_item_reads_type_field() {
        let json = r#"{"id": 21491, "title": "OK Computer", "year": 1997, "type": "master", "main_release": 4950798}"#;
        let item: ArtistReleaseItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind.as_deref(), Some("master"));
        assert_eq!(item.main_release, Some(4950798));
        assert_eq!(item.year, Some(1997));
    }

    #[test]
    fn artist_detail_without_images_or_members() {
        let json = r#"{"id": 3840, "name": "Radiohead"}"#;
        let detail: ArtistDetailResponse = serde_json::from_str(json).unwrap();
        assert!(detail.images.is_empty());
        assert!(detail.members.is_empty());
        assert_eq!(detail.profile, None);
    }
}
