//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.redefine/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::Section;
use crate::core::submission::Identity;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RedefineConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub inquiry: InquiryConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub initial_section: Option<Section>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CatalogConfig {
    pub courses_limit: Option<usize>,
    pub all_courses_limit: Option<usize>,
    pub mentors_featured_only: Option<bool>,
    pub rotation_interval_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct InquiryConfig {
    pub success_display_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct IdentityConfig {
    pub name: Option<String>,
    pub email: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_COURSES_LIMIT: usize = 10;
pub const DEFAULT_ALL_COURSES_LIMIT: usize = 12;
pub const DEFAULT_ROTATION_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_SUCCESS_DISPLAY_MS: u64 = 5000;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub initial_section: Section,
    pub courses_limit: usize,
    pub all_courses_limit: usize,
    pub mentors_featured_only: bool,
    pub rotation_interval: Duration,
    pub success_window: Duration,
    pub identity: Identity,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        resolve_with(&RedefineConfig::default(), None, None, |_| None)
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.redefine/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".redefine").join("config.toml"))
}

/// Load config from `~/.redefine/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `RedefineConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<RedefineConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(RedefineConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(RedefineConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: RedefineConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Redefine Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# base_url = "http://localhost:5000"   # Or set REDEFINE_BASE_URL
# request_timeout_secs = 10
# initial_section = "courses"          # "courses", "all-courses", "mentors"

# [catalog]
# courses_limit = 10
# all_courses_limit = 12
# mentors_featured_only = true
# rotation_interval_ms = 2000

# [inquiry]
# success_display_ms = 5000

# [identity]                           # Prefills the inquiry form
# name = "Ana Silva"                   # Or set REDEFINE_USER_NAME
# email = "ana@example.com"            # Or set REDEFINE_USER_EMAIL
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_section` and `cli_base_url` are from CLI flags (None = not specified).
pub fn resolve(
    config: &RedefineConfig,
    cli_section: Option<Section>,
    cli_base_url: Option<&str>,
) -> ResolvedConfig {
    resolve_with(config, cli_section, cli_base_url, |key| std::env::var(key).ok())
}

fn resolve_with(
    config: &RedefineConfig,
    cli_section: Option<Section>,
    cli_base_url: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli_base_url
        .map(|s| s.to_string())
        .or_else(|| env("REDEFINE_BASE_URL"))
        .or_else(|| config.general.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Identity: env → config. Blank values count as unknown.
    let identity = Identity {
        name: env("REDEFINE_USER_NAME")
            .or_else(|| config.identity.name.clone())
            .filter(|s| !s.trim().is_empty()),
        email: env("REDEFINE_USER_EMAIL")
            .or_else(|| config.identity.email.clone())
            .filter(|s| !s.trim().is_empty()),
    };

    ResolvedConfig {
        base_url,
        request_timeout: Duration::from_secs(non_zero_or_default(
            "request_timeout_secs",
            config.general.request_timeout_secs,
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )),
        initial_section: cli_section
            .or(config.general.initial_section)
            .unwrap_or_default(),
        courses_limit: config.catalog.courses_limit.unwrap_or(DEFAULT_COURSES_LIMIT),
        all_courses_limit: config
            .catalog
            .all_courses_limit
            .unwrap_or(DEFAULT_ALL_COURSES_LIMIT),
        mentors_featured_only: config.catalog.mentors_featured_only.unwrap_or(true),
        rotation_interval: Duration::from_millis(non_zero_or_default(
            "rotation_interval_ms",
            config.catalog.rotation_interval_ms,
            DEFAULT_ROTATION_INTERVAL_MS,
        )),
        success_window: Duration::from_millis(
            config
                .inquiry
                .success_display_ms
                .unwrap_or(DEFAULT_SUCCESS_DISPLAY_MS),
        ),
        identity,
    }
}

/// Zero is not a usable period; it falls back to `default`.
fn non_zero_or_default(key: &str, value: Option<u64>, default: u64) -> u64 {
    match value {
        Some(0) => {
            warn!("Ignoring {} = 0, using default {}", key, default);
            default
        }
        Some(v) => v,
        None => default,
    }
}
