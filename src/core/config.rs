use std::env;
use std::time::Duration;

use crate::shared::constants::ADMIN_API_PREFIX;
use crate::shared::types::{SortDirection, SortKey};

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub api: ApiConfig,
    pub view: ViewConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_format: LogFormat,
}

/// Connection settings for the admin REST API
#[derive(Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// Bearer credential, passed through untouched
    pub admin_token: String,
    pub timeout: Duration,
}

/// Initial ordering of category listings
#[derive(Debug, Clone, Copy)]
pub struct ViewConfig {
    pub sort_by: SortKey,
    pub sort_order: SortDirection,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            api: ApiConfig::from_env()?,
            view: ViewConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let log_format = match env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "pretty".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => return Err(format!("LOG_FORMAT must be 'pretty' or 'json', got '{}'", other)),
        };

        Ok(Self { log_format })
    }
}

impl ApiConfig {
    const DEFAULT_API_URL: &'static str = "http://localhost:5000";
    const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn from_env() -> Result<Self, String> {
        let api_url = env::var("API_URL").unwrap_or_else(|_| Self::DEFAULT_API_URL.to_string());

        let admin_token = env::var("ADMIN_TOKEN").unwrap_or_default();

        let timeout_secs = env::var("HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "HTTP_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self::new(&api_url, admin_token, Duration::from_secs(timeout_secs)))
    }

    /// `api_url` is the server root; the admin prefix is appended here
    pub fn new(api_url: &str, admin_token: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: format!("{}{}", api_url.trim_end_matches('/'), ADMIN_API_PREFIX),
            admin_token: admin_token.into(),
            timeout,
        }
    }

    pub fn has_token(&self) -> bool {
        !self.admin_token.is_empty()
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("admin_token", &if self.has_token() { "<redacted>" } else { "<empty>" })
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ViewConfig {
    pub fn from_env() -> Result<Self, String> {
        let sort_by = env::var("CATEGORY_SORT_BY")
            .unwrap_or_else(|_| "name".to_string())
            .parse::<SortKey>()
            .map_err(|e| format!("Invalid CATEGORY_SORT_BY: {}", e))?;

        let sort_order = env::var("CATEGORY_SORT_ORDER")
            .unwrap_or_else(|_| "asc".to_string())
            .parse::<SortDirection>()
            .map_err(|e| format!("Invalid CATEGORY_SORT_ORDER: {}", e))?;

        Ok(Self {
            sort_by,
            sort_order,
        })
    }
}
