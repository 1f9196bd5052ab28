//! Download one track: resolve, fetch, name, write, stamp, tag.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{FetchError, ItemError};
use crate::http::HttpResponse;
use crate::metadata::ContentMetadata;
use crate::naming::derive_output_filename;
use crate::service::TrackDescriptor;
use crate::storage::{self, ORIGINAL_FILENAME_ATTR};

use super::limiter::ConcurrencyLimiter;
use super::ArchiveContext;

/// Result of one track download.
#[derive(Debug)]
pub enum DownloadOutcome {
    Success { path: PathBuf },
    Failure { error: ItemError },
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DownloadOutcome::Success { .. })
    }
}

/// Download `track` into the context's destination directory.
///
/// Never fails outward: every error becomes a logged `Failure`.
pub async fn download_one(
    ctx: &ArchiveContext,
    limiter: &ConcurrencyLimiter,
    track: &TrackDescriptor,
) -> DownloadOutcome {
    tracing::info!("Downloading {}", track.title);

    match try_download_one(ctx, limiter, track).await {
        Ok(path) => {
            tracing::info!("Downloaded {} successfully to {}", track.title, path.display());
            DownloadOutcome::Success { path }
        }
        Err(error) => {
            tracing::error!("Failed to download {}: {}", track.title, error);
            DownloadOutcome::Failure { error }
        }
    }
}

/// Same as [`download_one`] with the error returned instead of logged.
pub async fn try_download_one(
    ctx: &ArchiveContext,
    limiter: &ConcurrencyLimiter,
    track: &TrackDescriptor,
) -> Result<PathBuf, ItemError> {
    let response = fetch_track(ctx, limiter, track.id).await?;

    let meta = ContentMetadata::from_headers(&response.headers).map_err(ItemError::Metadata)?;
    let filename = derive_output_filename(&track.title, track.id, &meta.filename);
    let path = ctx.destination.join(filename);
    tracing::debug!(
        "Downloading as {} modified {}",
        path.display(),
        meta.last_modified
    );

    let attributes = Arc::clone(&ctx.attributes);
    let task_path = path.clone();
    tokio::task::spawn_blocking(move || save(attributes.as_ref(), &task_path, &response, &meta))
        .await
        .map_err(|e| ItemError::Write {
            path: path.clone(),
            source: e.into(),
        })??;

    Ok(path)
}

/// Network phase, run while holding one limiter slot: resolve the download
/// URL, then GET it.
async fn fetch_track(
    ctx: &ArchiveContext,
    limiter: &ConcurrencyLimiter,
    track_id: u64,
) -> Result<HttpResponse, ItemError> {
    let _permit = limiter
        .acquire()
        .await
        .map_err(|e| ItemError::Fetch(FetchError::Limiter(e)))?;

    let service = Arc::clone(&ctx.service);
    let url = tokio::task::spawn_blocking(move || service.original_download_url(track_id))
        .await
        .map_err(|e| ItemError::Resolve(e.into()))?
        .map_err(ItemError::Resolve)?;

    let fetcher = Arc::clone(&ctx.fetcher);
    tokio::task::spawn_blocking(move || fetcher.get(&url))
        .await
        .map_err(|e| ItemError::Fetch(e.into()))?
        .map_err(ItemError::Fetch)
}

/// Write the body, set times, record the original filename.
///
/// If the attribute cannot be set the file is removed again, so a failed
/// item never leaves an untagged file behind.
fn save(
    attributes: &dyn storage::AttributeStore,
    path: &Path,
    response: &HttpResponse,
    meta: &ContentMetadata,
) -> Result<(), ItemError> {
    let write_err = |source| ItemError::Write {
        path: path.to_path_buf(),
        source,
    };
    storage::write_file(path, &response.body).map_err(write_err)?;
    storage::set_file_times(path, meta.last_modified).map_err(write_err)?;

    if let Err(source) = attributes.set(path, ORIGINAL_FILENAME_ATTR, meta.filename.as_bytes()) {
        if let Err(e) = std::fs::remove_file(path) {
            tracing::warn!("could not remove {} after attribute failure: {}", path.display(), e);
        }
        return Err(ItemError::Attribute {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}
