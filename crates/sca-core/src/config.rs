use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default number of tracks whose network phase may run at once.
pub const DEFAULT_PARALLEL_DOWNLOADS: usize = 5;

/// Default destination directory, relative to the working directory.
pub const DEFAULT_DOWNLOAD_FOLDER: &str = "soundcloud_archive";

/// Global configuration loaded from `~/.config/sc-archiver/config.toml`.
/// Command-line flags override these values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiverConfig {
    /// Maximum number of concurrent track fetches.
    pub num_parallel_downloads: usize,
    /// Directory where tracks are written.
    pub download_folder: PathBuf,
    /// Base URL of the SoundCloud v2 API.
    pub api_base: String,
    /// Page size requested when listing a user's tracks.
    pub page_size: u32,
    /// Connect timeout per request, in seconds.
    pub connect_timeout_secs: u64,
    /// Total timeout per request (including body), in seconds.
    pub timeout_secs: u64,
    /// User-Agent sent with every request.
    pub user_agent: String,
}

fn default_user_agent() -> String {
    format!("sc-archiver/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ArchiverConfig {
    fn default() -> Self {
        Self {
            num_parallel_downloads: DEFAULT_PARALLEL_DOWNLOADS,
            download_folder: PathBuf::from(DEFAULT_DOWNLOAD_FOLDER),
            api_base: "https://api-v2.soundcloud.com".to_string(),
            page_size: 200,
            connect_timeout_secs: 30,
            timeout_secs: 600,
            user_agent: default_user_agent(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("sc-archiver")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ArchiverConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ArchiverConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ArchiverConfig = toml::from_str(&data)?;
    Ok(cfg)
}
