//! Fan out one download task per track, join all, tally outcomes.

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::service::TrackDescriptor;

use super::limiter::ConcurrencyLimiter;
use super::single::{download_one, DownloadOutcome};
use super::tally::{RunTally, TallySnapshot};
use super::ArchiveContext;

/// Runs track downloads concurrently under a shared limiter and tally.
pub struct Dispatcher {
    ctx: Arc<ArchiveContext>,
    limiter: Arc<ConcurrencyLimiter>,
    tally: Arc<RunTally>,
}

impl Dispatcher {
    pub fn new(ctx: ArchiveContext, limiter: Arc<ConcurrencyLimiter>, tally: Arc<RunTally>) -> Self {
        Self {
            ctx: Arc::new(ctx),
            limiter,
            tally,
        }
    }

    pub fn limiter(&self) -> &ConcurrencyLimiter {
        &self.limiter
    }

    /// Download every track and wait for all of them.
    ///
    /// Tasks are independent: a failing or panicking task is counted as one
    /// failure and never cancels the others. On return every track has been
    /// counted exactly once.
    pub async fn run_all(&self, tracks: Vec<TrackDescriptor>) -> TallySnapshot {
        let mut join_set = JoinSet::new();

        for track in tracks {
            let ctx = Arc::clone(&self.ctx);
            let limiter = Arc::clone(&self.limiter);
            let tally = Arc::clone(&self.tally);
            join_set.spawn(async move {
                match download_one(&ctx, &limiter, &track).await {
                    DownloadOutcome::Success { .. } => tally.record_success(),
                    DownloadOutcome::Failure { .. } => tally.record_failure(),
                }
            });
        }

        while let Some(res) = join_set.join_next().await {
            if let Err(e) = res {
                tracing::error!("download task failed: {}", e);
                self.tally.record_failure();
            }
        }

        self.tally.snapshot()
    }
}
