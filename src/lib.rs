//! Inference adapter - structured-output chat completions against the `OpenAI` API.
//!
//! The crate wraps one provider call with the pieces every caller needs:
//! 1. Environment loading from a dotenv file
//! 2. A client built once and shared (or injected explicitly)
//! 3. Retries with randomized exponential backoff
//!
//! # Architecture
//!
//! The system uses:
//! - reqwest for the chat-completions HTTP call
//! - openai-api-rs for chat message types
//! - tokio-retry for backoff scheduling
//! - dotenvy for env files
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use inference_adapter::ai::{InferenceAdapter, ModelArgs, OpenAiClient, ResponseFormat};
//! use inference_adapter::core::{AdapterConfig, setup_env};
//! use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Sentiment {
//!     label: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     inference_adapter::setup_logging();
//!
//!     setup_env("./.env")?;
//!     let config = AdapterConfig::from_env()?;
//!     let adapter = InferenceAdapter::new(Arc::new(OpenAiClient::from_config(&config)?));
//!
//!     let schema = serde_json::json!({
//!         "type": "object",
//!         "properties": { "label": { "type": "string" } },
//!         "required": ["label"],
//!         "additionalProperties": false
//!     });
//!     let messages = vec![ChatCompletionMessage {
//!         role: MessageRole::user,
//!         content: Content::Text("I love this crate".to_string()),
//!         name: None,
//!         tool_calls: None,
//!         tool_call_id: None,
//!     }];
//!
//!     let (sentiment, usage) = adapter
//!         .predict_with_parse::<Sentiment>(
//!             &ModelArgs::new().model("gpt-4o-mini").temperature(0.0),
//!             &ResponseFormat::json_schema("sentiment", schema),
//!             &messages,
//!         )
//!         .await?
//!         .into_parts();
//!
//!     println!("{} ({:?})", sentiment.label, usage.map(|u| u.total_tokens));
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod ai;
pub mod core;
pub mod errors;

/// Configure structured logging with JSON output.
///
/// Verbosity follows `RUST_LOG` and defaults to `info`. Calling this more than
/// once is harmless; only the first subscriber is installed.
///
/// # Example
///
/// ```
/// inference_adapter::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
