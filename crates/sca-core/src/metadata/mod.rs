//! Content metadata extracted from a download response.
//!
//! The filename comes from `Content-Disposition` (`filename*` preferred over
//! `filename`); the timestamp from `Last-Modified`, falling back to the
//! current time when the header is missing or unparseable.

mod content_disposition;
mod last_modified;

pub use content_disposition::parse_content_disposition_filename;
pub use last_modified::parse_http_date;

use chrono::{DateTime, Utc};

use crate::error::MetadataError;
use crate::http::ResponseHeaders;

/// Filename and modification time for one downloaded track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentMetadata {
    /// Server-provided filename. Never empty.
    pub filename: String,
    pub last_modified: DateTime<Utc>,
}

impl ContentMetadata {
    /// Extract metadata from response headers.
    pub fn from_headers(headers: &ResponseHeaders) -> Result<Self, MetadataError> {
        let filename = headers
            .get("content-disposition")
            .and_then(parse_content_disposition_filename)
            .ok_or(MetadataError::MissingFilename)?;

        let last_modified = match headers.get("last-modified").and_then(parse_http_date) {
            Some(t) => t,
            None => {
                tracing::debug!(
                    raw = headers.get("last-modified").unwrap_or(""),
                    "no usable Last-Modified, using current time"
                );
                Utc::now()
            }
        };

        Ok(Self {
            filename,
            last_modified,
        })
    }
}
