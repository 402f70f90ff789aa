//! Lazily-initialized shared client
//!
//! Prefer constructing an [`OpenAiClient`] at startup and passing it to
//! [`InferenceAdapter::new`](crate::ai::InferenceAdapter::new). The cell here
//! covers call sites that cannot be handed a client.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};
use tracing::info;

use super::config::AdapterConfig;
use super::env::{DEFAULT_ENV_PATH, setup_env};
use crate::ai::OpenAiClient;
use crate::errors::AdapterError;

static SHARED_CLIENT: Lazy<ClientCell> = Lazy::new(|| ClientCell::new(DEFAULT_ENV_PATH));

/// A client built on first access from an env file, then reused.
#[derive(Debug)]
pub struct ClientCell {
    env_path: PathBuf,
    client: OnceCell<Arc<OpenAiClient>>,
}

impl ClientCell {
    #[must_use]
    pub fn new(env_path: impl Into<PathBuf>) -> Self {
        Self {
            env_path: env_path.into(),
            client: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn env_path(&self) -> &Path {
        &self.env_path
    }

    /// Return the cached client, building it on first call.
    ///
    /// A failed initialization caches nothing; the next call tries again.
    ///
    /// # Errors
    ///
    /// Returns an error if the env file is missing or malformed, or if
    /// `OPENAI_API_KEY` is not set.
    pub fn get_or_init(&self) -> Result<Arc<OpenAiClient>, AdapterError> {
        self.client
            .get_or_try_init(|| {
                setup_env(&self.env_path)?;
                let config = AdapterConfig::from_env()?;
                let client = OpenAiClient::from_config(&config)?;
                info!(env_path = %self.env_path.display(), "Initialized shared OpenAI client");
                Ok(Arc::new(client))
            })
            .map(Arc::clone)
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.client.get().is_some()
    }
}

/// The process-wide client, configured from `./.env` on first access.
///
/// # Errors
///
/// See [`ClientCell::get_or_init`].
pub fn shared_client() -> Result<Arc<OpenAiClient>, AdapterError> {
    SHARED_CLIENT.get_or_init()
}
