//! SoundCloud API v2 client.
//!
//! Every request carries the `client_id` query parameter and an
//! `Authorization: OAuth <token>` header. Requests go through
//! [`CurlFetcher`], so all calls block.

mod types;

use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ArchiverConfig;
use crate::error::{FetchError, ServiceError};
use crate::http::{CurlFetcher, HttpResponse};
use crate::service::{TrackDescriptor, TrackService, User};

use types::{DownloadLink, TrackPage};

/// Upper bound on followed `next_href` links, in case the API loops.
const MAX_PAGES: usize = 10_000;

pub struct SoundCloudClient {
    api_base: String,
    client_id: String,
    auth_header: String,
    page_size: u32,
    http: CurlFetcher,
}

impl SoundCloudClient {
    pub fn new(cfg: &ArchiverConfig, client_id: &str, auth_token: &str) -> Self {
        Self {
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            client_id: client_id.to_string(),
            auth_header: format!("OAuth {}", auth_token),
            page_size: cfg.page_size.max(1),
            http: CurlFetcher::from_config(cfg),
        }
    }

    /// Absolute API URL for `path` with the given query pairs and `client_id`.
    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ServiceError> {
        let mut url = Url::parse(&format!("{}{}", self.api_base, path))?;
        url.query_pairs_mut()
            .extend_pairs(query)
            .append_pair("client_id", &self.client_id);
        Ok(url)
    }

    /// Ensure a server-provided link (e.g. `next_href`) carries our `client_id`.
    fn with_client_id(&self, link: &str) -> Result<Url, ServiceError> {
        let mut url = Url::parse(link)?;
        if !url.query_pairs().any(|(k, _)| k == "client_id") {
            url.query_pairs_mut().append_pair("client_id", &self.client_id);
        }
        Ok(url)
    }

    fn send(&self, url: &Url) -> Result<HttpResponse, ServiceError> {
        tracing::debug!(path = url.path(), "API request");
        Ok(self
            .http
            .get_raw(url.as_str(), &[("Authorization", self.auth_header.as_str())])?)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, ServiceError> {
        let response = self.send(url)?;
        if !response.is_success() {
            return Err(FetchError::Http(response.status).into());
        }
        Ok(serde_json::from_slice(&response.body)?)
    }

    /// `Ok(false)` on 401/403, `Ok(true)` on 2xx, error otherwise.
    fn probe(&self, url: &Url) -> Result<bool, ServiceError> {
        let response = self.send(url)?;
        match response.status {
            401 | 403 => Ok(false),
            s if (200..300).contains(&s) => Ok(true),
            s => Err(FetchError::Http(s).into()),
        }
    }
}

impl TrackService for SoundCloudClient {
    fn validate_client_id(&self) -> Result<bool, ServiceError> {
        let url = self.endpoint("/search/tracks", &[("q", "a"), ("limit", "1")])?;
        self.probe(&url)
    }

    fn validate_auth_token(&self) -> Result<bool, ServiceError> {
        let url = self.endpoint("/me", &[])?;
        self.probe(&url)
    }

    fn current_user(&self) -> Result<User, ServiceError> {
        let url = self.endpoint("/me", &[])?;
        self.get_json(&url)
    }

    fn user_tracks(&self, user_id: u64) -> Result<Vec<TrackDescriptor>, ServiceError> {
        let limit = self.page_size.to_string();
        let mut url = self.endpoint(&format!("/users/{}/tracks", user_id), &[("limit", &limit)])?;
        let mut tracks = Vec::new();

        for _ in 0..MAX_PAGES {
            let page: TrackPage = self.get_json(&url)?;
            tracks.extend(page.collection);
            match page.next_href.as_deref() {
                Some(next) if !next.is_empty() => url = self.with_client_id(next)?,
                _ => break,
            }
        }

        tracing::debug!(user_id, count = tracks.len(), "listed user tracks");
        Ok(tracks)
    }

    fn original_download_url(&self, track_id: u64) -> Result<String, ServiceError> {
        let url = self.endpoint(&format!("/tracks/{}/download", track_id), &[])?;
        let link: DownloadLink = self.get_json(&url)?;
        link.redirect_uri
            .filter(|u| !u.is_empty())
            .ok_or(ServiceError::MissingField("redirectUri"))
    }
}
