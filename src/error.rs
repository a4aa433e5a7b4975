use thiserror::Error;

use crate::domain::Venue;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Venue fetch failures, classified for the retry policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Network failure, timeout, or 5xx. Retried with backoff.
    #[error("{venue} request failed: {reason}")]
    Transient { venue: Venue, reason: String },

    /// HTTP 429. Retried with backoff.
    #[error("{venue} rate limited the request")]
    RateLimited { venue: Venue },

    /// Credentials rejected. Not retried; the venue sits out the cycle.
    #[error("{venue} authentication failed: {reason}")]
    Auth { venue: Venue, reason: String },

    /// The response body did not have the expected shape. Not retried.
    #[error("{venue} returned an unreadable response: {reason}")]
    Decode { venue: Venue, reason: String },
}

impl FetchError {
    pub const fn venue(&self) -> Venue {
        match self {
            Self::Transient { venue, .. }
            | Self::RateLimited { venue }
            | Self::Auth { venue, .. }
            | Self::Decode { venue, .. } => *venue,
        }
    }

    /// Whether the retry policy should try again.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. } | Self::RateLimited { .. })
    }

    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Classify a non-success HTTP status.
    pub fn from_status(venue: Venue, status: reqwest::StatusCode) -> Self {
        use reqwest::StatusCode;

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Auth {
                venue,
                reason: status.to_string(),
            },
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited { venue },
            s if s.is_server_error() || s == StatusCode::REQUEST_TIMEOUT => Self::Transient {
                venue,
                reason: status.to_string(),
            },
            _ => Self::Decode {
                venue,
                reason: format!("unexpected status {status}"),
            },
        }
    }

    /// Classify a transport-level error.
    pub fn from_reqwest(venue: Venue, err: &reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_status(venue, status);
        }
        if err.is_decode() {
            return Self::Decode {
                venue,
                reason: err.to_string(),
            };
        }
        Self::Transient {
            venue,
            reason: err.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("scan timed out after {0}s")]
    ScanTimeout(u64),
}

pub type Result<T> = std::result::Result<T, Error>;
