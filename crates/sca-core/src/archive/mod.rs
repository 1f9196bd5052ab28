//! Archive run: preflight checks, track enumeration, bounded concurrent
//! download of every track, and the final tally.
//!
//! Fatal errors (bad destination, invalid credentials, failed listing) end
//! the run before any track is downloaded. Per-track errors are logged and
//! counted, never propagated.

mod dispatch;
mod limiter;
mod preflight;
mod single;
mod tally;

pub use dispatch::Dispatcher;
pub use limiter::{ConcurrencyLimiter, NetworkPermit};
pub use preflight::{prepare_destination, validate_credentials};
pub use single::{download_one, try_download_one, DownloadOutcome};
pub use tally::{RunTally, TallySnapshot};

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{FatalError, ServiceError};
use crate::http::HttpFetcher;
use crate::service::{TrackDescriptor, TrackService};
use crate::storage::AttributeStore;

/// Collaborators and destination shared by every download task.
pub struct ArchiveContext {
    pub service: Arc<dyn TrackService>,
    pub fetcher: Arc<dyn HttpFetcher>,
    pub attributes: Arc<dyn AttributeStore>,
    pub destination: PathBuf,
}

/// Archive every track of the authenticated user into `ctx.destination`.
///
/// Returns the tally once all tracks have finished. Per-track failures are
/// part of the tally, not an error.
pub async fn run_archive(
    ctx: ArchiveContext,
    parallel_downloads: usize,
) -> Result<TallySnapshot, FatalError> {
    prepare_destination(&ctx.destination)?;
    validate_credentials(&ctx.service).await?;

    let service = Arc::clone(&ctx.service);
    let tracks = tokio::task::spawn_blocking(move || -> Result<Vec<TrackDescriptor>, ServiceError> {
        let me = service.current_user()?;
        tracing::debug!(user = %me.username, id = me.id, "authenticated");
        service.user_tracks(me.id)
    })
    .await
    .map_err(ServiceError::from)??;

    tracing::info!("Credentials are valid. Starting download.");
    tracing::debug!(tracks = tracks.len(), parallel_downloads, "dispatching");

    let dispatcher = Dispatcher::new(
        ctx,
        Arc::new(ConcurrencyLimiter::new(parallel_downloads)),
        Arc::new(RunTally::new()),
    );
    let tally = dispatcher.run_all(tracks).await;

    tracing::info!("Download finished.");
    tally.log_summary();
    Ok(tally)
}
