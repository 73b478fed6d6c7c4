use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::listing::DEFAULT_PATH;

/// Listing client settings (`[client]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL that navigation paths are resolved against.
    pub server_url: String,
    /// Path fetched when navigation is empty.
    pub default_path: String,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".to_string(),
            default_path: DEFAULT_PATH.to_string(),
            connect_timeout_secs: 15,
            request_timeout_secs: 30,
        }
    }
}

/// Photo server settings (`[server]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. "0.0.0.0:8000".
    pub listen_addr: String,
    /// Directory exposed under `/photos/` and `/thumbnail/`.
    pub storage_root: PathBuf,
    /// Directory with the web UI served under `/`.
    pub static_dir: PathBuf,
    /// Thumbnail height in pixels when the request has no usable `height`.
    pub thumbnail_height: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            storage_root: PathBuf::from("/media/sf_Photos"),
            static_dir: PathBuf::from("static"),
            thumbnail_height: 50,
        }
    }
}

/// Global configuration loaded from `~/.config/fotobrowser/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FotoConfig {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("fotobrowser")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FotoConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FotoConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: FotoConfig = toml::from_str(&data)?;
    Ok(cfg)
}
