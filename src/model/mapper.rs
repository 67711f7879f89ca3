//! Wire-to-domain conversions

use std::sync::LazyLock;

use regex::Regex;

use super::content::{
    Artist, ArtistDetail, ArtistMember, PaginatedResult, Release, ReleaseDetail, ReleaseKind, Track,
};
use super::entities::{
    ApiImage, ArtistDetailResponse, ArtistReleasesResponse, ArtistSearchResponse,
    ReleaseDetailResponse,
};

static FORMATTING_TAGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[/?(b|i|u|url|img|quote|list|\*|size|color|font|align|center|left|right|justify)]")
        .expect("valid regex")
});
static URL_OPENERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[url=.*?]").expect("valid regex"));
static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[/?\w+(=.*?)?]").expect("valid regex"));
static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n").expect("valid regex"));

/// Reduce Discogs BBCode markup to plain text.
///
/// Cross-reference tags such as `[a=Thom Yorke]` or `[l123]` are removed
/// together with their payload; text between paired tags is kept.
pub fn strip_bbcode(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }

    let text = FORMATTING_TAGS.replace_all(input, "");
    let text = URL_OPENERS.replace_all(&text, "");
    let text = ANY_TAG.replace_all(&text, "");
    let text = LINE_BREAKS.replace_all(&text, "\n");
    text.trim().to_string()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn pick_image(images: Vec<ApiImage>) -> Option<String> {
    let primary = images
        .iter()
        .position(|img| img.kind.as_deref() == Some("primary"))
        .unwrap_or(0);
    images
        .into_iter()
        .nth(primary)
        .and_then(|img| non_blank(img.uri).or_else(|| non_blank(img.uri150)))
}

fn year(raw: Option<u16>) -> Option<u16> {
    raw.filter(|y| *y > 0)
}

impl From<ArtistSearchResponse> for PaginatedResult<Vec<Artist>> {
    fn from(response: ArtistSearchResponse) -> Self {
        let data = response
            .results
            .into_iter()
            .map(|row| Artist {
                id: row.id,
                name: row.title,
                image_url: non_blank(row.thumb),
            })
            .collect();

        PaginatedResult {
            data,
            current_page: response.pagination.page,
            total_pages: response.pagination.pages,
        }
    }
}

impl From<ArtistReleasesResponse> for PaginatedResult<Vec<Release>> {
    fn from(response: ArtistReleasesResponse) -> Self {
        let data = response
            .releases
            .into_iter()
            .map(|row| Release {
                id: row.id,
                kind: ReleaseKind::from_wire(row.kind.as_deref()),
                title: row.title,
                release_year: year(row.year),
                image_url: non_blank(row.thumb),
                main_release_id: row.main_release,
            })
            .collect();

        PaginatedResult {
            data,
            current_page: response.pagination.page,
            total_pages: response.pagination.pages,
        }
    }
}

impl From<ArtistDetailResponse> for ArtistDetail {
    fn from(response: ArtistDetailResponse) -> Self {
        let profile = response
            .profile
            .as_deref()
            .map(strip_bbcode)
            .filter(|p| !p.is_empty());

        ArtistDetail {
            name: response.name,
            profile,
            image_url: pick_image(response.images),
            members: response
                .members
                .into_iter()
                .map(|m| ArtistMember {
                    name: m.name,
                    active: m.active,
                })
                .collect(),
        }
    }
}

impl From<ReleaseDetailResponse> for ReleaseDetail {
    fn from(response: ReleaseDetailResponse) -> Self {
        ReleaseDetail {
            id: response.id,
            title: response.title,
            release_year: year(response.year),
            artists: response.artists.into_iter().map(|a| a.name).collect(),
            genres: response.genres,
            styles: response.styles,
            labels: response.labels.into_iter().map(|l| l.name).collect(),
            tracklist: response
                .tracklist
                .into_iter()
                .map(|t| Track {
                    position: t.position.unwrap_or_default(),
                    title: t.title,
                    duration: non_blank(t.duration),
                })
                .collect(),
            image_url: pick_image(response.images),
        }
    }
}
