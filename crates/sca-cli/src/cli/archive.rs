//! The archive command: wire the SoundCloud client, curl fetcher and xattr
//! store into an archive run.

use anyhow::Result;
use sca_core::archive::{run_archive, ArchiveContext};
use sca_core::config::ArchiverConfig;
use sca_core::http::CurlFetcher;
use sca_core::soundcloud::SoundCloudClient;
use sca_core::storage::XattrStore;
use std::sync::Arc;

use super::Cli;

pub async fn run_archive_command(cli: &Cli, cfg: &ArchiverConfig) -> Result<()> {
    let ctx = ArchiveContext {
        service: Arc::new(SoundCloudClient::new(cfg, &cli.client_id, &cli.auth_token)),
        fetcher: Arc::new(CurlFetcher::from_config(cfg)),
        attributes: Arc::new(XattrStore),
        destination: cli.download_folder(cfg),
    };

    let tally = run_archive(ctx, cli.parallel_downloads(cfg)).await?;
    tracing::debug!(
        success = tally.success,
        failure = tally.failure,
        "archive run complete"
    );
    Ok(())
}
