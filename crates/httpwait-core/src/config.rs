use crate::backoff::BackoffSettings;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// libcurl transport options (`[transport]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Connect timeout per attempt, in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout per attempt, in seconds. Also bounds how long an
    /// abandoned attempt can linger after cancellation.
    pub request_timeout_secs: u64,
    pub follow_redirects: bool,
    pub max_redirects: u32,
    /// Optional `User-Agent` header; libcurl sends none by default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            request_timeout_secs: 30,
            follow_redirects: true,
            max_redirects: 10,
            user_agent: None,
        }
    }
}

/// Global configuration loaded from `~/.config/httpwait/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpWaitConfig {
    /// Default backoff settings; per-request values override them field by field.
    pub backoff: BackoffSettings,
    pub transport: TransportConfig,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("httpwait")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<HttpWaitConfig> {
    let path = config_path()?;
    load_or_init_at(&path)
}

/// Like [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<HttpWaitConfig> {
    if !path.exists() {
        let default_cfg = HttpWaitConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let cfg: HttpWaitConfig =
        toml::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    // Surface bad backoff values at startup rather than on the first fetch.
    cfg.backoff
        .resolve()
        .with_context(|| format!("invalid [backoff] section in {}", path.display()))?;
    Ok(cfg)
}
