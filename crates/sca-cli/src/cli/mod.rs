//! CLI for sc-archiver.

mod archive;

use anyhow::Result;
use clap::Parser;
use sca_core::config::{self, ArchiverConfig};
use std::path::PathBuf;

use archive::run_archive_command;

/// Download every track of a SoundCloud account, keeping original timestamps
/// and recording the original filename as an extended attribute.
#[derive(Debug, Parser)]
#[command(name = "sc-archiver")]
#[command(about = "SoundCloud Archive Downloader", long_about = None)]
pub struct Cli {
    /// SoundCloud Client ID.
    #[arg(long, value_name = "ID")]
    pub client_id: String,

    /// SoundCloud Authentication Token.
    #[arg(long, value_name = "TOKEN")]
    pub auth_token: String,

    /// Folder where tracks will be downloaded (default: soundcloud_archive).
    #[arg(long, value_name = "DIR")]
    pub download_folder: Option<PathBuf>,

    /// Number of parallel downloads (default: 5).
    #[arg(long, value_name = "N", value_parser = parse_parallel)]
    pub num_parallel_downloads: Option<usize>,
}

fn parse_parallel(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match config::load_or_init() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("could not load config, using defaults: {:#}", e);
                ArchiverConfig::default()
            }
        };
        tracing::debug!("loaded config: {:?}", cfg);

        run_archive_command(&cli, &cfg).await
    }

    /// Destination directory: flag, else config.
    pub fn download_folder(&self, cfg: &ArchiverConfig) -> PathBuf {
        self.download_folder
            .clone()
            .unwrap_or_else(|| cfg.download_folder.clone())
    }

    /// Concurrency limit: flag, else config.
    pub fn parallel_downloads(&self, cfg: &ArchiverConfig) -> usize {
        self.num_parallel_downloads
            .unwrap_or(cfg.num_parallel_downloads)
            .max(1)
    }
}
