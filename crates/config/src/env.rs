use serde::Deserialize;
use sniff_common::error::{SniffError, SniffResult};
use std::env;

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:8080,http://127.0.0.1:8080";
const DEFAULT_MAX_UPLOAD_MB: &str = "10";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// Dashboard origins allowed by CORS.
    pub allowed_origins: Vec<String>,
    /// Largest image upload accepted by `/scan/image`, in bytes.
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// Load configuration from environment variables.
    /// Loads `.env` file if present; every variable has a default.
    pub fn from_env() -> SniffResult<Self> {
        // Best-effort .env load; ignore if missing
        let _ = dotenvy::dotenv();

        Ok(Self {
            host: get_var_or("HOST", "0.0.0.0"),
            port: get_var_or("PORT", "8081")
                .parse()
                .map_err(|e| SniffError::Config(format!("invalid PORT: {e}")))?,
            log_level: get_var_or("LOG_LEVEL", "info"),
            allowed_origins: parse_csv(&get_var_or("ALLOWED_ORIGINS", DEFAULT_ALLOWED_ORIGINS)),
            max_upload_bytes: parse_megabytes(&get_var_or("MAX_UPLOAD_MB", DEFAULT_MAX_UPLOAD_MB))?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn get_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_megabytes(raw: &str) -> SniffResult<usize> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|mb| *mb > 0)
        .and_then(|mb| mb.checked_mul(1024 * 1024))
        .ok_or_else(|| {
            SniffError::Config(format!(
                "MAX_UPLOAD_MB must be a positive integer that fits in memory, got {raw:?}"
            ))
        })
}

fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect()
}
