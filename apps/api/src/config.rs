use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if no AI backend is configured.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub templates_dir: PathBuf,
    /// Base URL of a deployed AI service (`/ai/improve`, `/ai/ats`).
    pub ai_service_url: Option<String>,
    /// Enables the in-process AI service and the `/ai/*` routes.
    pub llm_api_key: Option<String>,
    pub chrome_executable: Option<PathBuf>,
    /// Sessions untouched for this long are dropped by the sweeper.
    pub session_idle_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            templates_dir: std::env::var("TEMPLATES_DIR")
                .unwrap_or_else(|_| "templates".to_string())
                .into(),
            ai_service_url: optional_env("AI_SERVICE_URL"),
            llm_api_key: optional_env("LLM_API_KEY"),
            chrome_executable: optional_env("CHROME_EXECUTABLE").map(PathBuf::from),
            session_idle_ttl: Duration::from_secs(
                std::env::var("SESSION_IDLE_TTL_SECS")
                    .unwrap_or_else(|_| "3600".to_string())
                    .parse::<u64>()
                    .context("SESSION_IDLE_TTL_SECS must be a whole number of seconds")?,
            ),
        };
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        if self.ai_service_url.is_none() && self.llm_api_key.is_none() {
            bail!("Either 'AI_SERVICE_URL' or 'LLM_API_KEY' must be set");
        }
        if self.session_idle_ttl.is_zero() {
            bail!("SESSION_IDLE_TTL_SECS must be greater than zero");
        }
        Ok(())
    }
}

/// Unset and blank are treated the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            templates_dir: "templates".into(),
            ai_service_url: None,
            llm_api_key: None,
            chrome_executable: None,
            session_idle_ttl: Duration::from_secs(3600),
        }
    }

    #[test]
    fn test_requires_an_ai_backend() {
        assert!(config().check().is_err());
        assert!(Config {
            llm_api_key: Some("hf_x".to_string()),
            ..config()
        }
        .check()
        .is_ok());
        assert!(Config {
            ai_service_url: Some("http://ai:5000".to_string()),
            ..config()
        }
        .check()
        .is_ok());
    }

    #[test]
    fn test_rejects_zero_idle_ttl() {
        let config = Config {
            llm_api_key: Some("hf_x".to_string()),
            session_idle_ttl: Duration::ZERO,
            ..config()
        };
        assert!(config.check().is_err());
    }
}
