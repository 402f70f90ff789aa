//! Environment file loading

use std::path::Path;

use tracing::{debug, error};

use crate::errors::AdapterError;

/// Env file read by the shared client on first access.
pub const DEFAULT_ENV_PATH: &str = "./.env";

/// Load `KEY=value` pairs from a dotenv file into the process environment.
///
/// Variables that are already set keep their current value.
///
/// # Errors
///
/// Returns [`AdapterError::EnvFileNotFound`] if `path` does not exist, and
/// [`AdapterError::EnvFile`] if the file cannot be read or parsed.
pub fn setup_env(path: impl AsRef<Path>) -> Result<(), AdapterError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AdapterError::EnvFileNotFound(path.to_path_buf()));
    }

    match dotenvy::from_path(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Loaded environment file");
            Ok(())
        }
        Err(e) => {
            error!("Error loading .env file {}: {}", path.display(), e);
            Err(AdapterError::EnvFile {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
    }
}
