use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::keywords::bukvarix::DEFAULT_BASE_URL;
use crate::keywords::pipeline::RetryPolicy;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. CLI flags
/// override the file paths after loading.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file holding the theme dictionaries.
    pub themes_file: PathBuf,
    /// Text file classified by `themescope file` when no path is given.
    pub input_file: PathBuf,
    /// Base URL of the keyword search service.
    pub keyword_source_url: String,
    /// Upper bound on a single keyword source request.
    pub keyword_source_timeout: Duration,
    pub retry: RetryPolicy,
    /// Address the TCP command server binds to.
    pub listen_addr: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default; only malformed numbers are an error.
    pub fn load() -> Result<Self> {
        let timeout_secs = parse_env_u64("KEYWORD_SOURCE_TIMEOUT_SECS")?.unwrap_or(30);
        let backoff_secs = parse_env_u64("KEYWORD_RETRY_BACKOFF_SECS")?.unwrap_or(3);
        // 0 and unset both mean "retry forever"
        let max_attempts = parse_env_u64("KEYWORD_RETRY_MAX_ATTEMPTS")?
            .filter(|n| *n > 0)
            .map(|n| u32::try_from(n).unwrap_or(u32::MAX));

        Ok(Self {
            themes_file: env::var("THEMESCOPE_THEMES_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./demo_data/themes.json")),
            input_file: env::var("THEMESCOPE_INPUT_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./demo_data/input.txt")),
            keyword_source_url: env::var("KEYWORD_SOURCE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            keyword_source_timeout: Duration::from_secs(timeout_secs),
            retry: RetryPolicy {
                backoff: Duration::from_secs(backoff_secs),
                max_attempts,
            },
            listen_addr: env::var("THEMESCOPE_LISTEN_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:777".to_string()),
        })
    }
}

/// Read an optional unsigned integer variable. Unset or empty is `None`.
fn parse_env_u64(key: &str) -> Result<Option<u64>> {
    match env::var(key) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{key} must be a non-negative integer, got {raw:?}")),
        Err(_) => Ok(None),
    }
}
