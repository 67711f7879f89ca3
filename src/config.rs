//! Runtime configuration read from the environment

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.discogs.com/";
pub const DEFAULT_USER_AGENT: &str = "discogs-rs/0.1 +https://github.com/discogs-rs/discogs-rs";
pub const DEFAULT_LOG_DIR: &str = ".logs";

/// Page size used for every paginated Discogs call
pub const PER_PAGE: u32 = 30;
pub const FIRST_PAGE: u32 = 1;

/// Quiet period the search box waits for before querying
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Clone, Debug)]
pub struct Config {
    pub token: Option<String>,
    pub base_url: String,
    pub user_agent: String,
    pub log_dir: PathBuf,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Build the configuration from `DISCOGS_*` environment variables.
    ///
    /// Every variable is optional. A missing token is allowed; Discogs then
    /// answers with 401 and the UI reports it like any other failure.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let token = lookup("DISCOGS_TOKEN").filter(|t| !t.trim().is_empty());

        let mut base_url = lookup("DISCOGS_BASE_URL").unwrap_or(defaults.base_url);
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let timeout = match lookup("DISCOGS_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("DISCOGS_TIMEOUT_SECS is not a number: {raw}"))?;
                Duration::from_secs(secs)
            }
            None => defaults.timeout,
        };

        Ok(Self {
            token,
            base_url,
            user_agent: lookup("DISCOGS_USER_AGENT").unwrap_or(defaults.user_agent),
            log_dir: lookup("DISCOGS_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.token, None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.log_dir, PathBuf::from(".logs"));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn base_url_gets_trailing_slash_and_blank_token_is_ignored() {
        let config = Config::from_lookup(lookup_from(&[
            ("DISCOGS_BASE_URL", "http://localhost:8080"),
            ("DISCOGS_TOKEN", "   "),
            ("DISCOGS_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/");
        assert_eq!(config.token, None);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_timeout_is_an_error() {
        let result = Config::from_lookup(lookup_from(&[("DISCOGS_TIMEOUT_SECS", "soon")]));
        assert!(result.is_err());
    }
}
