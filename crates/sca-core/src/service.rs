//! The track service seam: account validation, track listing, download URL resolution.

use serde::Deserialize;

use crate::error::ServiceError;

/// One track of the authenticated user. Only the fields the archiver reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackDescriptor {
    pub id: u64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
}

/// Remote track service. Calls are blocking; async callers go through
/// `spawn_blocking`. Implementations are shared read-only across tasks.
pub trait TrackService: Send + Sync {
    fn validate_client_id(&self) -> Result<bool, ServiceError>;
    fn validate_auth_token(&self) -> Result<bool, ServiceError>;
    fn current_user(&self) -> Result<User, ServiceError>;
    /// Every track of `user_id`, all pages.
    fn user_tracks(&self, user_id: u64) -> Result<Vec<TrackDescriptor>, ServiceError>;
    /// URL of the original-quality file for `track_id`.
    fn original_download_url(&self, track_id: u64) -> Result<String, ServiceError>;
}
