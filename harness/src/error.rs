use hyper::{header, http};
use std::{io, path::PathBuf, sync};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Request timed out: {url}")]
    Timeout {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Connection failed: {url}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request error: {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request failed: {status} {url} - {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Couldn't build the HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Invalid header name")]
    InvalidHeaderName,

    #[error("Invalid header value")]
    InvalidHeaderValue,

    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("The lock was poisoned")]
    PoisonedLock,

    #[error("IoError: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Hyper error: {0}")]
    Hyper(#[from] hyper::Error),

    #[error("Http error: {0}")]
    Http(#[from] http::Error),
}

impl Error {
    /// Whether the error came from the transport layer rather than from a response.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Timeout { .. } | Error::Connection { .. } | Error::Transport { .. }
        )
    }

    /// The HTTP status carried by a strict-mode failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl<T> From<sync::PoisonError<T>> for Error {
    fn from(_: sync::PoisonError<T>) -> Self {
        Error::PoisonedLock
    }
}

impl From<header::InvalidHeaderName> for Error {
    fn from(_: header::InvalidHeaderName) -> Self {
        Error::InvalidHeaderName
    }
}

impl From<header::InvalidHeaderValue> for Error {
    fn from(_: header::InvalidHeaderValue) -> Self {
        Error::InvalidHeaderValue
    }
}
