//! SoundCloud API v2 response shapes.

use serde::Deserialize;

use crate::service::TrackDescriptor;

/// One page of a paginated collection.
#[derive(Debug, Deserialize)]
pub(crate) struct Page<T> {
    pub collection: Vec<T>,
    #[serde(default)]
    pub next_href: Option<String>,
}

/// Body of `/tracks/{id}/download`.
#[derive(Debug, Deserialize)]
pub(crate) struct DownloadLink {
    #[serde(rename = "redirectUri")]
    pub redirect_uri: Option<String>,
}

pub(crate) type TrackPage = Page<TrackDescriptor>;
