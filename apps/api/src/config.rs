use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Most files accepted by one batch upload. Also sizes the request body limit.
pub const MAX_BATCH_FILES: u64 = 20;

/// Application configuration loaded from environment variables.
/// Startup fails if `OPENAI_API_KEY` is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub model_name: String,
    pub max_file_size_mb: u64,
    pub cors_allow_origins: String,
    pub min_request_interval_ms: u64,
    pub port: u16,
    pub rust_log: String,
}

/// Parsed form of `CORS_ALLOW_ORIGINS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let max_file_size_mb: u64 = parse_env("MAX_FILE_SIZE_MB", 8)?;
        if max_file_size_mb == 0 {
            anyhow::bail!("MAX_FILE_SIZE_MB must be at least 1");
        }

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            model_name: std::env::var("MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            max_file_size_mb,
            cors_allow_origins: std::env::var("CORS_ALLOW_ORIGINS")
                .unwrap_or_else(|_| "*".to_string()),
            min_request_interval_ms: parse_env("MIN_REQUEST_INTERVAL_MS", 500)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Per-file upload ceiling in bytes. Saturates instead of overflowing.
    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    /// Whole-request body ceiling, large enough for a full batch upload.
    pub fn max_request_bytes(&self) -> usize {
        let bytes = self
            .max_file_bytes()
            .saturating_mul(MAX_BATCH_FILES)
            .saturating_add(1024 * 1024);
        usize::try_from(bytes).unwrap_or(usize::MAX)
    }

    pub fn cors_origins(&self) -> CorsOrigins {
        parse_cors_origins(&self.cors_allow_origins)
    }
}

pub fn parse_cors_origins(raw: &str) -> CorsOrigins {
    if raw.trim() == "*" {
        return CorsOrigins::Any;
    }
    CorsOrigins::List(
        raw.split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect(),
    )
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        openai_api_key: "sk-test".to_string(),
        openai_base_url: DEFAULT_BASE_URL.to_string(),
        model_name: DEFAULT_MODEL.to_string(),
        max_file_size_mb: 8,
        cors_allow_origins: "*".to_string(),
        min_request_interval_ms: 0,
        port: 8080,
        rust_log: "info".to_string(),
    }
}
