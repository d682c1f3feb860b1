use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::fetch::FetchSettings;
use crate::platform::PlatformList;

/// Cache directory name under the system temp dir when `cache_dir` is not set.
pub const DEFAULT_CACHE_DIR_NAME: &str = "csvplay_cache";

/// How `play` treats an entry that is not on a known streaming platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayMode {
    /// Always open the link in the default browser.
    #[default]
    Browser,
    /// Download to the cache and hand the file to the default player.
    Download,
}

/// Global configuration loaded from `~/.config/csvplay/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Default play mode; the CLI `--mode` flag overrides it.
    #[serde(default)]
    pub play_mode: PlayMode,
    /// Cache directory; `None` = `<temp dir>/csvplay_cache`.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Downloads smaller than this are treated as error pages and deleted.
    pub min_file_bytes: u64,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Abort a download when no data arrives for this many seconds.
    pub stall_timeout_secs: u64,
    /// Cache filenames are cut to this many characters (before the extension).
    pub max_title_chars: usize,
    /// User-Agent sent with download requests.
    pub user_agent: String,
    /// Hosts whose links are always opened in the browser.
    #[serde(default = "default_platform_domains")]
    pub platform_domains: Vec<String>,
    /// Text encodings tried, in order, when importing a file.
    #[serde(default = "default_encodings")]
    pub encodings: Vec<String>,
}

fn default_platform_domains() -> Vec<String> {
    PlatformList::default_domains()
        .iter()
        .map(|d| d.to_string())
        .collect()
}

fn default_encodings() -> Vec<String> {
    crate::loader::DEFAULT_ENCODINGS
        .iter()
        .map(|e| e.to_string())
        .collect()
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            play_mode: PlayMode::default(),
            cache_dir: None,
            min_file_bytes: 1024,
            connect_timeout_secs: 15,
            stall_timeout_secs: 30,
            max_title_chars: 50,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            platform_domains: default_platform_domains(),
            encodings: default_encodings(),
        }
    }
}

impl PlayerConfig {
    /// Effective cache directory.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_CACHE_DIR_NAME))
    }

    pub fn platforms(&self) -> PlatformList {
        PlatformList::new(self.platform_domains.iter().cloned())
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            cache_dir: self.cache_dir(),
            min_file_bytes: self.min_file_bytes,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            stall_timeout: Duration::from_secs(self.stall_timeout_secs),
            max_title_chars: self.max_title_chars,
            user_agent: self.user_agent.clone(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("csvplay")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PlayerConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PlayerConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: PlayerConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
