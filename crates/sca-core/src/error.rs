//! Error types: fatal run errors and per-item download errors.

use std::path::PathBuf;

use thiserror::Error;

/// HTTP transport failure (curl error or non-2xx status).
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// The blocking transfer task did not complete (panicked or was cancelled).
    #[error("transfer task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("concurrency limiter closed")]
    Limiter(#[from] tokio::sync::AcquireError),
}

/// Failure talking to the track service API.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response is missing `{0}`")]
    MissingField(&'static str),
    #[error("service task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Content-metadata extraction failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetadataError {
    #[error("no filename in content disposition")]
    MissingFilename,
}

/// Per-track failure. Counted and logged; never aborts sibling downloads.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("could not resolve download URL: {0}")]
    Resolve(#[source] ServiceError),
    #[error("download failed: {0}")]
    Fetch(#[source] FetchError),
    #[error("failed to obtain metadata from headers: {0}")]
    Metadata(#[source] MetadataError),
    #[error("failed to save {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to set extended attribute on {}: {source}", path.display())]
    Attribute {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that abort the whole run before any per-track work.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("could not create {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid client ID")]
    InvalidClientId,
    #[error("Invalid authentication token")]
    InvalidAuthToken,
    #[error("service error: {0}")]
    Service(#[from] ServiceError),
}
