use std::sync::Arc;

use openai_api_rs::v1::chat_completion::ChatCompletionMessage;
use serde::de::DeserializeOwned;

use super::client::OpenAiClient;
use super::retry::{RetryPolicy, with_retry};
use super::types::{ModelArgs, ParsedCompletion, ResponseFormat};
use crate::core::shared::shared_client;
use crate::errors::AdapterError;

/// Structured-output inference with retries.
#[derive(Debug, Clone)]
pub struct InferenceAdapter {
    client: Arc<OpenAiClient>,
    retry: RetryPolicy,
}

impl InferenceAdapter {
    /// Uses the default policy: 3 attempts, 1-60s randomized exponential backoff.
    #[must_use]
    pub fn new(client: Arc<OpenAiClient>) -> Self {
        Self {
            client,
            retry: RetryPolicy::default(),
        }
    }

    /// Build an adapter around the process-wide shared client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the shared client cannot be initialized.
    pub fn from_shared() -> Result<Self, AdapterError> {
        Ok(Self::new(shared_client()?))
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn client(&self) -> &Arc<OpenAiClient> {
        &self.client
    }

    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Request a completion constrained by `response_format` and parse it into `T`.
    ///
    /// # Errors
    ///
    /// Returns the last error once retries are exhausted, or the first
    /// non-retryable error.
    pub async fn predict_with_parse<T: DeserializeOwned>(
        &self,
        model_args: &ModelArgs,
        response_format: &ResponseFormat,
        messages: &[ChatCompletionMessage],
    ) -> Result<ParsedCompletion<T>, AdapterError> {
        with_retry(&self.retry, || {
            self.client.parse::<T>(model_args, response_format, messages)
        })
        .await
    }
}
