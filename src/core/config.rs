use std::env;
use std::time::Duration;

use crate::errors::AdapterError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub openai_api_key: String,
    pub openai_org_id: Option<String>,
    pub base_url: String,
    pub request_timeout: Duration,
}

impl AdapterConfig {
    /// # Errors
    ///
    /// Returns [`AdapterError::MissingApiKey`] if `OPENAI_API_KEY` is unset or
    /// empty, and [`AdapterError::InvalidConfig`] for malformed optional values.
    pub fn from_env() -> Result<Self, AdapterError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`AdapterConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AdapterError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let openai_api_key = non_empty("OPENAI_API_KEY").ok_or(AdapterError::MissingApiKey)?;

        let request_timeout = match non_empty("OPENAI_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| AdapterError::InvalidConfig(format!("OPENAI_TIMEOUT_SECS: {e}")))?,
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self {
            openai_api_key,
            openai_org_id: non_empty("OPENAI_ORG_ID"),
            base_url: non_empty("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout,
        })
    }

    #[must_use]
    pub fn new(openai_api_key: impl Into<String>) -> Self {
        Self {
            openai_api_key: openai_api_key.into(),
            openai_org_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}
