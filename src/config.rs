//! TOML configuration and CI environment context.
//!
//! Layered configuration: `RUNBOARD_CONFIG` environment variable override,
//! then `runboard.toml` in the working directory, then compiled-in defaults.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for the runboard tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from a TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Try to load configuration from, in order:
    /// 1. The path specified by the `RUNBOARD_CONFIG` environment variable.
    /// 2. `runboard.toml` in the current directory.
    /// 3. Fall back to compiled-in defaults.
    pub fn load_or_default() -> Self {
        if let Ok(env_path) = std::env::var("RUNBOARD_CONFIG") {
            let path = Path::new(&env_path);
            match Self::load(path) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "RUNBOARD_CONFIG set but file could not be loaded, trying fallback"
                    );
                }
            }
        }

        let local_path = Path::new("runboard.toml");
        if local_path.exists() {
            match Self::load(local_path) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warn!(
                        path = %local_path.display(),
                        error = %e,
                        "local config file exists but could not be loaded, using defaults"
                    );
                }
            }
        }

        debug!("no config file found, using compiled-in defaults");
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Site
// ---------------------------------------------------------------------------

/// Branding for the generated dashboard page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Page title shown in the dashboard header.
    pub title: String,
    /// Optional absolute base prepended to per-run report links; relative
    /// links are used when unset.
    pub report_base_url: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "E2E Test Dashboard".to_string(),
            report_base_url: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Display windows for the dashboard widgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// How many recent runs the report list shows.
    pub list_limit: usize,
    /// How many recent runs the trend charts cover.
    pub trend_window: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            list_limit: 5,
            trend_window: 7,
        }
    }
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// Preview server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address and port the preview server binds to.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// CI context
// ---------------------------------------------------------------------------

/// Identity of the current CI run, read from the runner environment with
/// local-dev fallbacks so the tool stays usable outside CI.
#[derive(Debug, Clone)]
pub struct CiContext {
    pub run_number: u64,
    pub run_id: String,
    pub commit_sha: String,
}

impl CiContext {
    /// Read `GITHUB_RUN_NUMBER`, `GITHUB_RUN_ID` and `GITHUB_SHA`.
    ///
    /// Outside CI the run number falls back to epoch seconds (monotonic
    /// across local invocations), the run id to `"local"` and the sha to
    /// `"unknown"`. The sha is shortened to 7 characters either way.
    pub fn from_env() -> Self {
        let run_number = std::env::var("GITHUB_RUN_NUMBER")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| chrono::Utc::now().timestamp().max(0) as u64);

        let run_id = std::env::var("GITHUB_RUN_ID").unwrap_or_else(|_| "local".to_string());

        let commit_sha = std::env::var("GITHUB_SHA")
            .map(|sha| short_sha(&sha))
            .unwrap_or_else(|_| "unknown".to_string());

        Self {
            run_number,
            run_id,
            commit_sha,
        }
    }
}

fn short_sha(sha: &str) -> String {
    sha.chars().take(7).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
