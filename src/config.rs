use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;
use crate::tts::gemini::{GeminiConfig, DEFAULT_BASE_URL};

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub static_dir: PathBuf,
    pub gemini: GeminiConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("GEMINI_API_KEY")
            .ok_or_else(|| AppError::Config("GEMINI_API_KEY must be set".into()))?;

        let port = match get("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| AppError::Config(format!("PORT must be a number, got '{}'", raw)))?,
            None => 3000,
        };

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let ip: IpAddr = host.parse().map_err(|_| {
            AppError::Config(format!("HOST must be an IP address, got '{}'", host))
        })?;
        let addr = SocketAddr::new(ip, port);

        let timeout = match get("GEMINI_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(raw.parse().map_err(|_| {
                AppError::Config(format!("GEMINI_TIMEOUT_SECS must be a number, got '{}'", raw))
            })?)),
            None => None,
        };

        Ok(Self {
            addr,
            static_dir: get("STATIC_DIR")
                .unwrap_or_else(|| "./static".to_string())
                .into(),
            gemini: GeminiConfig {
                api_key,
                base_url: get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                timeout,
            },
        })
    }
}
