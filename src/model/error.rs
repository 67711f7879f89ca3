//! Failure taxonomies
//!
//! Three layers, each closed:
//! - `ApiError`: what the HTTP gateway reports
//! - `LoadError`: what a paging source hands to the pager
//! - `Reason`: what a use case reports to a state holder

use thiserror::Error;

/// Transport-level failure produced by the Discogs gateway
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("{0}")]
    Other(String),
}

impl ApiError {
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        ApiError::Http {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Connect(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::from_status(status.as_u16(), err.to_string())
        } else if err.is_request() || err.is_body() {
            ApiError::Io(err.to_string())
        } else {
            ApiError::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Failure a paging source returns instead of a page
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("{}", .0.as_deref().unwrap_or("Unauthorized"))]
    Unauthorized(Option<String>),
    #[error("{}", .0.as_deref().unwrap_or("Forbidden"))]
    Forbidden(Option<String>),
    #[error("{}", .0.as_deref().unwrap_or("Not found"))]
    NotFound(Option<String>),
    #[error("{}", .0.as_deref().unwrap_or("Internal server error"))]
    InternalServerError(Option<String>),
    #[error("{}", .0.as_deref().unwrap_or("Network unavailable"))]
    NetworkUnavailable(Option<String>),
    #[error("{}", .0.as_deref().unwrap_or("Request timed out"))]
    Timeout(Option<String>),
    #[error("{}", .0.as_deref().unwrap_or("Unknown error"))]
    Unknown(Option<String>),
}

impl From<ApiError> for LoadError {
    /// Status codes first, then the I/O family, then the catch-all.
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Http { status: 401, message } => LoadError::Unauthorized(Some(message)),
            ApiError::Http { status: 403, message } => LoadError::Forbidden(Some(message)),
            ApiError::Http { status: 404, message } => LoadError::NotFound(Some(message)),
            ApiError::Http { status: 500, message } => LoadError::InternalServerError(Some(message)),
            ApiError::Timeout => LoadError::Timeout(None),
            ApiError::Connect(message) | ApiError::Io(message) => {
                LoadError::NetworkUnavailable(Some(message))
            }
            other => LoadError::Unknown(Some(other.to_string())),
        }
    }
}

/// Why a use case failed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Reason {
    #[error("not found")]
    NotFound,
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("no internet connection")]
    NoInternet,
    #[error("timeout")]
    Timeout,
    #[error("internal server error")]
    InternalServerError,
    #[error("{0}")]
    Unknown(String),
}

pub type UseCaseResult<T> = Result<T, Reason>;

impl From<ApiError> for Reason {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Http { status: 404, .. } => Reason::NotFound,
            ApiError::Http { status: 401, .. } => Reason::Unauthorized,
            ApiError::Http { status: 403, .. } => Reason::Forbidden,
            ApiError::Http { status: 500, .. } => Reason::InternalServerError,
            ApiError::Connect(_) | ApiError::Io(_) => Reason::NoInternet,
            ApiError::Timeout => Reason::Timeout,
            other => Reason::Unknown(other.to_string()),
        }
    }
}

impl From<LoadError> for Reason {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Unauthorized(_) => Reason::Unauthorized,
            LoadError::Forbidden(_) => Reason::Forbidden,
            LoadError::NotFound(_) => Reason::NotFound,
            LoadError::InternalServerError(_) => Reason::InternalServerError,
            LoadError::NetworkUnavailable(_) => Reason::NoInternet,
            LoadError::Timeout(_) => Reason::Timeout,
            LoadError::Unknown(message) => {
                Reason::Unknown(message.unwrap_or_else(|| "Unknown error".to_string()))
            }
        }
    }
}
