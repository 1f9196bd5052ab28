//! Shared fakes for the collaborator traits.

#![allow(dead_code)]

pub mod http_server;

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sca_core::archive::ArchiveContext;
use sca_core::error::{FetchError, ServiceError};
use sca_core::http::{HttpFetcher, HttpResponse, ResponseHeaders};
use sca_core::service::{TrackDescriptor, TrackService, User};
use sca_core::storage::AttributeStore;

pub fn track(id: u64, title: &str) -> TrackDescriptor {
    TrackDescriptor {
        id,
        title: title.to_string(),
    }
}

/// In-memory track service. Download URLs are `mem://track/<id>`.
#[derive(Default)]
pub struct FakeService {
    pub client_id_valid: bool,
    pub auth_token_valid: bool,
    pub tracks: Vec<TrackDescriptor>,
    /// Track ids whose download URL cannot be resolved.
    pub unresolvable: HashSet<u64>,
    pub calls: Mutex<Vec<&'static str>>,
}

impl FakeService {
    pub fn valid(tracks: Vec<TrackDescriptor>) -> Self {
        Self {
            client_id_valid: true,
            auth_token_valid: true,
            tracks,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn log(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

pub fn download_url(id: u64) -> String {
    format!("mem://track/{}", id)
}

impl TrackService for FakeService {
    fn validate_client_id(&self) -> Result<bool, ServiceError> {
        self.log("validate_client_id");
        Ok(self.client_id_valid)
    }

    fn validate_auth_token(&self) -> Result<bool, ServiceError> {
        self.log("validate_auth_token");
        Ok(self.auth_token_valid)
    }

    fn current_user(&self) -> Result<User, ServiceError> {
        self.log("current_user");
        Ok(User {
            id: 9,
            username: "archivist".to_string(),
        })
    }

    fn user_tracks(&self, user_id: u64) -> Result<Vec<TrackDescriptor>, ServiceError> {
        self.log("user_tracks");
        assert_eq!(user_id, 9);
        Ok(self.tracks.clone())
    }

    fn original_download_url(&self, track_id: u64) -> Result<String, ServiceError> {
        self.log("original_download_url");
        if self.unresolvable.contains(&track_id) {
            return Err(FetchError::Http(404).into());
        }
        Ok(download_url(track_id))
    }
}

/// Canned responses keyed by URL, with optional latency and an in-flight gauge.
#[derive(Default)]
pub struct FakeFetcher {
    pub responses: HashMap<String, HttpResponse>,
    pub delay: Option<Duration>,
    /// URLs whose fetch panics.
    pub panic_on: HashSet<String>,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub fetches: AtomicUsize,
}

impl FakeFetcher {
    pub fn insert(&mut self, url: String, status: u32, headers: &[(&str, &str)], body: &[u8]) {
        self.responses.insert(
            url,
            HttpResponse {
                status,
                headers: headers.iter().copied().collect::<ResponseHeaders>(),
                body: body.to_vec(),
            },
        );
    }

    /// A track response with a content disposition and fixed Last-Modified.
    pub fn insert_track(&mut self, id: u64, server_filename: &str, body: &[u8]) {
        let disposition = format!("attachment; filename=\"{}\"", server_filename);
        self.insert(
            download_url(id),
            200,
            &[
                ("Content-Disposition", disposition.as_str()),
                ("Last-Modified", "Wed, 21 Oct 2015 07:28:00 GMT"),
            ],
            body,
        );
    }
}

impl HttpFetcher for FakeFetcher {
    fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(d) = self.delay {
            std::thread::sleep(d);
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panic_on.contains(url) {
            panic!("fetcher exploded on {}", url);
        }
        match self.responses.get(url) {
            Some(r) if r.is_success() => Ok(r.clone()),
            Some(r) => Err(FetchError::Http(r.status)),
            None => Err(FetchError::Http(404)),
        }
    }
}

/// Records every attribute write instead of touching the filesystem.
#[derive(Default)]
pub struct RecordingAttributes {
    pub set: Mutex<Vec<(PathBuf, String, Vec<u8>)>>,
}

impl RecordingAttributes {
    pub fn entries(&self) -> Vec<(PathBuf, String, Vec<u8>)> {
        self.set.lock().unwrap().clone()
    }
}

impl AttributeStore for RecordingAttributes {
    fn set(&self, path: &Path, name: &str, value: &[u8]) -> io::Result<()> {
        self.set
            .lock()
            .unwrap()
            .push((path.to_path_buf(), name.to_string(), value.to_vec()));
        Ok(())
    }
}

/// Rejects every attribute write, like a filesystem without xattr support.
pub struct UnsupportedAttributes;

impl AttributeStore for UnsupportedAttributes {
    fn set(&self, _path: &Path, _name: &str, _value: &[u8]) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "xattrs not supported"))
    }
}

pub fn context(
    service: Arc<FakeService>,
    fetcher: Arc<FakeFetcher>,
    attributes: Arc<dyn AttributeStore>,
    destination: &Path,
) -> ArchiveContext {
    ArchiveContext {
        service,
        fetcher,
        attributes,
        destination: destination.to_path_buf(),
    }
}
