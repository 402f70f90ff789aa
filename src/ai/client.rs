//! `OpenAI` chat-completions client with structured-output parsing
//!
//! The client builds the request body, hands it to a [`ChatTransport`], and
//! turns the provider's response into a [`ParsedCompletion`]. Every request
//! runs inside a `tracing` span tagged with the model name.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use super::types::{ModelArgs, ParsedCompletion, RESERVED_KEYS, ResponseFormat, Usage};
use crate::core::config::AdapterConfig;
use crate::errors::AdapterError;

/// Sends a chat-completions request body and returns the decoded JSON response.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AdapterError::HttpError`] for transport failures and
    /// [`AdapterError::OpenAIError`] for non-success HTTP statuses.
    async fn post_chat_completion(&self, body: &Value) -> Result<Value, AdapterError>;
}

/// HTTP transport over a pooled `reqwest` client.
pub struct HttpTransport {
    http: Client,
    endpoint: String,
    api_key: String,
    org_id: Option<String>,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &AdapterConfig) -> Result<Self, AdapterError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AdapterError::HttpError(format!("Failed to build OpenAI HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", config.base_url),
            api_key: config.openai_api_key.clone(),
            org_id: config.openai_org_id.clone(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn post_chat_completion(&self, body: &Value) -> Result<Value, AdapterError> {
        let mut request = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body);

        if let Some(org) = &self.org_id {
            request = request.header("OpenAI-Organization", org);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AdapterError::HttpError(format!("OpenAI API request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            return Err(AdapterError::OpenAIError {
                status: status.as_u16(),
                message: provider_error_message(&error_text),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AdapterError::ParseError(format!("Response body is not JSON: {e}")))
    }
}

/// Pull `error.message` out of a provider error body, falling back to the raw text.
#[must_use]
pub fn provider_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

/// Chat-completions client that parses structured output.
#[derive(Clone)]
pub struct OpenAiClient {
    transport: Arc<dyn ChatTransport>,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient").finish_non_exhaustive()
    }
}

impl OpenAiClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be built.
    pub fn from_config(config: &AdapterConfig) -> Result<Self, AdapterError> {
        let transport = HttpTransport::new(config)?;
        info!(endpoint = transport.endpoint(), "Created OpenAI client");
        Ok(Self::with_transport(Arc::new(transport)))
    }

    #[must_use]
    pub fn with_transport(transport: Arc<dyn ChatTransport>) -> Self {
        Self { transport }
    }

    /// Issue one structured-output completion and deserialize the first
    /// choice's content into `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid, the transport fails, or the
    /// response cannot be parsed into `T`.
    #[tracing::instrument(
        name = "openai.chat_completion",
        skip_all,
        fields(model = model_args.model_name().unwrap_or("unknown"))
    )]
    pub async fn parse<T: DeserializeOwned>(
        &self,
        model_args: &ModelArgs,
        response_format: &ResponseFormat,
        messages: &[ChatCompletionMessage],
    ) -> Result<ParsedCompletion<T>, AdapterError> {
        let body = build_request_body(model_args, response_format, messages)?;

        #[cfg(feature = "debug-logs")]
        debug!("Chat completion request body:\n{}", body);

        #[cfg(not(feature = "debug-logs"))]
        debug!("Sending chat completion with {} messages", messages.len());

        let started = Instant::now();
        let response = self.transport.post_chat_completion(&body).await?;
        let elapsed_ms = started.elapsed().as_millis();

        let completion = parse_completion_response::<T>(response)?;

        match &completion.usage {
            Some(usage) => info!(
                elapsed_ms,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Chat completion parsed"
            ),
            None => info!(elapsed_ms, "Chat completion parsed (no usage reported)"),
        }

        Ok(completion)
    }
}

/// Merge model arguments with the messages and response format.
///
/// # Errors
///
/// Returns [`AdapterError::InvalidRequest`] if the model arguments set a
/// reserved key.
pub fn build_request_body(
    model_args: &ModelArgs,
    response_format: &ResponseFormat,
    messages: &[ChatCompletionMessage],
) -> Result<Value, AdapterError> {
    if let Some(key) = RESERVED_KEYS
        .iter()
        .find(|key| model_args.as_map().contains_key(**key))
    {
        return Err(AdapterError::InvalidRequest(format!(
            "model arguments may not set `{key}`"
        )));
    }

    let mut body = model_args.as_map().clone();
    body.insert(
        "messages".to_string(),
        Value::Array(build_chat_messages(messages)),
    );
    body.insert("response_format".to_string(), response_format.to_value());

    Ok(Value::Object(body))
}

/// Encode messages in the chat-completions wire shape.
/// - Text content is sent as a plain string
/// - Image content becomes typed parts: { type: "text" } and { type: "`image_url`" }
#[must_use]
pub fn build_chat_messages(messages: &[ChatCompletionMessage]) -> Vec<Value> {
    messages
        .iter()
        .map(|m| {
            let role_str = match m.role {
                MessageRole::system => "system",
                MessageRole::user => "user",
                MessageRole::assistant => "assistant",
                MessageRole::function => "function",
                MessageRole::tool => "tool",
            };

            let content = match &m.content {
                Content::Text(t) => json!(t),
                Content::ImageUrl(parts) => {
                    let mut out: Vec<Value> = Vec::new();
                    for part in parts {
                        if let Some(ref text) = part.text {
                            out.push(json!({
                                "type": "text",
                                "text": text
                            }));
                        }
                        if let Some(ref iu) = part.image_url {
                            out.push(json!({
                                "type": "image_url",
                                "image_url": { "url": iu.url }
                            }));
                        }
                    }
                    Value::Array(out)
                }
            };

            let mut message = json!({
                "role": role_str,
                "content": content
            });

            if let Some(name) = &m.name {
                message["name"] = json!(name);
            }
            if let Some(id) = &m.tool_call_id {
                message["tool_call_id"] = json!(id);
            }
            if let Some(calls) = &m.tool_calls {
                match serde_json::to_value(calls) {
                    Ok(v) => message["tool_calls"] = v,
                    Err(e) => warn!("Dropping unserializable tool calls: {}", e),
                }
            }

            message
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    id: Option<String>,
    model: Option<String>,
    #[serde(default)]
    choices: Vec<CompletionChoice>,
    usage: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    finish_reason: Option<String>,
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
    refusal: Option<String>,
}

/// Usage never fails a completion; an unreadable record is logged and dropped.
fn read_usage(raw: Option<Value>) -> Option<Usage> {
    match raw {
        None | Some(Value::Null) => None,
        Some(value) => match serde_json::from_value::<Usage>(value) {
            Ok(usage) => Some(usage),
            Err(e) => {
                warn!("Ignoring unreadable usage record: {}", e);
                None
            }
        },
    }
}

/// Turn a raw chat-completions response into a [`ParsedCompletion`].
///
/// # Errors
///
/// - [`AdapterError::LengthLimit`] / [`AdapterError::ContentFilter`] for truncated or filtered output
/// - [`AdapterError::Refusal`] when the model declined to answer; the error keeps the usage record
/// - [`AdapterError::ParseError`] when the content is missing or does not match `T`
pub fn parse_completion_response<T: DeserializeOwned>(
    response: Value,
) -> Result<ParsedCompletion<T>, AdapterError> {
    let response: CompletionResponse = serde_json::from_value(response)
        .map_err(|e| AdapterError::ParseError(format!("Unexpected response shape: {e}")))?;

    let usage = read_usage(response.usage);

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AdapterError::ParseError("No choices in response".to_string()))?;

    match choice.finish_reason.as_deref() {
        Some("length") => return Err(AdapterError::LengthLimit),
        Some("content_filter") => return Err(AdapterError::ContentFilter),
        _ => {}
    }

    let message = choice
        .message
        .ok_or_else(|| AdapterError::ParseError("No message in first choice".to_string()))?;

    if let Some(refusal) = message.refusal {
        return Err(AdapterError::Refusal {
            message: refusal,
            usage,
        });
    }

    let content = message
        .content
        .ok_or_else(|| AdapterError::ParseError("No content in response message".to_string()))?;

    let parsed = serde_json::from_str::<T>(&content).map_err(|e| {
        AdapterError::ParseError(format!("Structured output does not match schema: {e}"))
    })?;

    Ok(ParsedCompletion {
        parsed,
        usage,
        id: response.id,
        model: response.model,
    })
}
