pub mod config;
pub mod env;
pub mod shared;

pub use config::AdapterConfig;
pub use env::{DEFAULT_ENV_PATH, setup_env};
pub use shared::{ClientCell, shared_client};
