//! Checks that must pass before any track is downloaded.

use std::path::Path;
use std::sync::Arc;

use crate::error::{FatalError, ServiceError};
use crate::service::TrackService;

/// Make sure `dir` is a usable destination: an existing directory, or a
/// path that can be created (recursively).
pub fn prepare_destination(dir: &Path) -> Result<(), FatalError> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(FatalError::NotADirectory(dir.to_path_buf()));
        }
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(|source| FatalError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    tracing::debug!("created {}", dir.display());
    Ok(())
}

/// Validate the client id, then the auth token.
pub async fn validate_credentials(service: &Arc<dyn TrackService>) -> Result<(), FatalError> {
    let svc = Arc::clone(service);
    let (client_ok, token_ok) = tokio::task::spawn_blocking(move || -> Result<_, ServiceError> {
        if !svc.validate_client_id()? {
            return Ok((false, false));
        }
        Ok((true, svc.validate_auth_token()?))
    })
    .await
    .map_err(|e| FatalError::Service(e.into()))??;

    if !client_ok {
        return Err(FatalError::InvalidClientId);
    }
    if !token_ok {
        return Err(FatalError::InvalidAuthToken);
    }
    Ok(())
}
