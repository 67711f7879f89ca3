//! Discogs REST client

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;

use super::entities::{
    ArtistDetailResponse, ArtistReleasesResponse, ArtistSearchResponse, ReleaseDetailResponse,
};
use super::error::ApiError;
use crate::config::Config;
use crate::{log_api_request, log_api_result};

pub const SEARCH_TYPE_ARTIST: &str = "artist";
pub const SORT_BY_YEAR: &str = "year";
pub const SORT_ORDER_DESC: &str = "desc";

/// The four Discogs endpoints the app reads from.
///
/// One call is one HTTP GET. No retries happen here.
#[async_trait]
pub trait DiscogsApi: Send + Sync {
    async fn search_artists(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
        kind: &str,
    ) -> Result<ArtistSearchResponse, ApiError>;

    async fn get_artist_releases(
        &self,
        artist_id: u64,
        sort: &str,
        order: &str,
        page: u32,
        per_page: u32,
    ) -> Result<ArtistReleasesResponse, ApiError>;

    async fn get_artist_details(&self, artist_id: u64) -> Result<ArtistDetailResponse, ApiError>;

    async fn get_release_details(&self, release_id: u64) -> Result<ReleaseDetailResponse, ApiError>;
}

#[derive(Clone)]
pub struct DiscogsClient {
    http: reqwest::Client,
    base_url: Arc<str>,
}

impl DiscogsClient {
    /// Build a client whose every request carries the auth token and user agent.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("invalid user agent")?,
        );
        match &config.token {
            Some(token) => {
                let mut value = HeaderValue::from_str(&format!("Discogs token={token}"))
                    .context("invalid Discogs token")?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            None => tracing::warn!("DISCOGS_TOKEN is not set, requests will be anonymous"),
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: Arc::from(config.base_url.as_str()),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let started = Instant::now();

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(
            path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Discogs response"
        );

        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), error_message(&body, status)));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Discogs error bodies look like `{"message": "..."}`.
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unexpected status")
                .to_string()
        })
}

#[async_trait]
impl DiscogsApi for DiscogsClient {
    async fn search_artists(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
        kind: &str,
    ) -> Result<ArtistSearchResponse, ApiError> {
        log_api_request!("search_artists", query, page);
        let result = self
            .get(
                "database/search",
                &[
                    ("q", query.to_string()),
                    ("page", page.to_string()),
                    ("per_page", per_page.to_string()),
                    ("type", kind.to_string()),
                ],
            )
            .await;
        log_api_result!("search_artists", result);
        result
    }

    async fn get_artist_releases(
        &self,
        artist_id: u64,
        sort: &str,
        order: &str,
        page: u32,
        per_page: u32,
    ) -> Result<ArtistReleasesResponse, ApiError> {
        log_api_request!("get_artist_releases", artist_id, page);
        let result = self
            .get(
                &format!("artists/{artist_id}/releases"),
                &[
                    ("sort", sort.to_string()),
                    ("sort_order", order.to_string()),
                    ("page", page.to_string()),
                    ("per_page", per_page.to_string()),
                ],
            )
            .await;
        log_api_result!("get_artist_releases", result);
        result
    }

    async fn get_artist_details(&self, artist_id: u64) -> Result<ArtistDetailResponse, ApiError> {
        log_api_request!("get_artist_details", artist_id);
        let result = self.get(&format!("artists/{artist_id}"), &[]).await;
        log_api_result!("get_artist_details", result);
        result
    }

    async fn get_release_details(&self, release_id: u64) -> Result<ReleaseDetailResponse, ApiError> {
        log_api_request!("get_release_details", release_id);
        let result = self.get(&format!("releases/{release_id}"), &[]).await;
        log_api_result!("get_release_details", result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_discogs_body() {
        let status = reqwest::StatusCode::NOT_FOUND;
        assert_eq!(
            error_message(r#"{"message": "Artist not found."}"#, status),
            "Artist not found."
        );
        assert_eq!(error_message("<html>", status), "Not Found");
    }

    #[test]
    fn client_builds_with_and_without_token() {
        let mut config = Config::default();
        assert!(DiscogsClient::new(&config).is_ok());
        config.token = Some("abc123".into());
        assert!(DiscogsClient::new(&config).is_ok());
    }

    #[test]
    fn control_characters_in_token_are_rejected() {
        let config = Config {
            token: Some("bad\ntoken".into()),
            ..Config::default()
        };
        assert!(DiscogsClient::new(&config).is_err());
    }
}
