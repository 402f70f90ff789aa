//! All AI/LLM functionality

pub mod adapter;
pub mod client;
pub mod retry;
pub mod types;

// Re-export main types for convenience
pub use adapter::InferenceAdapter;
pub use client::{ChatTransport, HttpTransport, OpenAiClient};
pub use retry::{RetryPolicy, with_retry};
pub use types::{ModelArgs, ParsedCompletion, ResponseFormat, Usage};
