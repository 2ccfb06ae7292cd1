use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::RetryPolicy;
use crate::subdivision::{self, SubdivisionCode};

/// Portal root the manifests and documents are served from.
pub const DEFAULT_BASE_URL: &str = "https://prezenta.roaep.ro/prezidentiale24112024/";

/// Manifest location relative to the base URL; `{code}` is replaced per subdivision.
pub const DEFAULT_MANIFEST_PATH: &str = "data/json/sicpv/pv/pv_{code}.json";

/// Substring marking scanned (as opposed to typed) result sheets.
pub const DEFAULT_SCAN_MARKER: &str = "scnnd";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per document (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (0 = retry immediately).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.0,
            max_delay_secs: 30,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        let base = if self.base_delay_secs.is_finite() && self.base_delay_secs > 0.0 {
            Duration::from_secs_f64(self.base_delay_secs)
        } else {
            Duration::ZERO
        };
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: base,
            max_delay: Duration::from_secs(self.max_delay_secs),
        }
    }
}

/// Global configuration loaded from `~/.config/pvsync/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PvsyncConfig {
    /// Portal root URL; manifests and relative document URLs resolve against it.
    pub base_url: String,
    /// Manifest path template relative to `base_url`, containing `{code}`.
    pub manifest_path: String,
    /// Subdivision codes to fetch, in order.
    pub subdivisions: Vec<String>,
    /// Where fetched documents land (one directory per subdivision) and where normalization reads.
    pub source_root: PathBuf,
    /// Root of the normalized archive.
    pub dest_root: PathBuf,
    /// Only manifest URLs containing this substring are downloaded.
    pub scan_marker: String,
    /// User-Agent sent with every request.
    pub user_agent: String,
    /// Pause after each successful download, in milliseconds.
    pub throttle_ms: u64,
    /// Number of leading subdivisions to skip (resume a partial run).
    #[serde(default)]
    pub skip: usize,
    /// Optional overall per-request timeout in seconds (None = transport default).
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for PvsyncConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            manifest_path: DEFAULT_MANIFEST_PATH.to_string(),
            subdivisions: subdivision::DEFAULT_CODES
                .iter()
                .map(|c| c.to_string())
                .collect(),
            source_root: PathBuf::from("pv"),
            dest_root: PathBuf::from("pv-clean"),
            scan_marker: DEFAULT_SCAN_MARKER.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            throttle_ms: 150,
            skip: 0,
            request_timeout_secs: None,
            retry: None,
        }
    }
}

impl PvsyncConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default().policy()
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    /// Parses every configured subdivision code; the first invalid one is an error.
    pub fn subdivision_codes(&self) -> Result<Vec<SubdivisionCode>> {
        self.subdivisions
            .iter()
            .map(|c| SubdivisionCode::parse(c).with_context(|| "invalid entry in `subdivisions`"))
            .collect()
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks the values a run cannot start without.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)
            .with_context(|| format!("invalid base_url: {}", self.base_url))?;
        if !self.manifest_path.contains("{code}") {
            anyhow::bail!("manifest_path must contain `{{code}}`: {}", self.manifest_path);
        }
        if self.scan_marker.is_empty() {
            anyhow::bail!("scan_marker must not be empty");
        }
        self.subdivision_codes()?;
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pvsync")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from an explicit file (must exist).
pub fn load_from_path(path: &Path) -> Result<PvsyncConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: PvsyncConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PvsyncConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PvsyncConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}
