use std::error::Error;
use std::path::PathBuf;

use inference_adapter::errors::AdapterError;

#[test]
fn test_adapter_error_implements_error_trait() {
    fn assert_error<T: Error + Send + Sync + 'static>(_: &T) {}

    let error = AdapterError::ParseError("test error".to_string());
    assert_error(&error);
}

#[test]
fn test_adapter_error_display() {
    let error = AdapterError::EnvFileNotFound(PathBuf::from("./.env"));
    assert_eq!(format!("{error}"), "File not found: ./.env");

    let error = AdapterError::MissingApiKey;
    assert_eq!(
        format!("{error}"),
        "OPENAI_API_KEY not found in environment variables"
    );

    let error = AdapterError::OpenAIError {
        status: 429,
        message: "Rate limit reached".to_string(),
    };
    assert_eq!(
        format!("{error}"),
        "OpenAI API error (status 429): Rate limit reached"
    );

    let error = AdapterError::HttpError("Connection error".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to send HTTP request: Connection error"
    );
}

#[test]
fn test_retryable_classification() {
    let api = |status| AdapterError::OpenAIError {
        status,
        message: String::new(),
    };

    assert!(AdapterError::HttpError("reset".to_string()).is_retryable());
    assert!(AdapterError::ParseError("truncated".to_string()).is_retryable());
    assert!(AdapterError::LengthLimit.is_retryable());
    assert!(api(408).is_retryable());
    assert!(api(429).is_retryable());
    assert!(api(500).is_retryable());
    assert!(api(503).is_retryable());

    assert!(!api(400).is_retryable());
    assert!(!api(401).is_retryable());
    assert!(!api(404).is_retryable());
    assert!(!AdapterError::MissingApiKey.is_retryable());
    assert!(!AdapterError::EnvFileNotFound(PathBuf::from(".env")).is_retryable());
    assert!(
        !AdapterError::Refusal {
            message: "no".to_string(),
            usage: None,
        }
        .is_retryable()
    );
    assert!(!AdapterError::ContentFilter.is_retryable());
}

#[test]
fn test_config_errors() {
    assert!(AdapterError::MissingApiKey.is_config_error());
    assert!(AdapterError::EnvFileNotFound(PathBuf::from(".env")).is_config_error());
    assert!(AdapterError::InvalidConfig("x".to_string()).is_config_error());
    assert!(AdapterError::InvalidRequest("x".to_string()).is_config_error());
    assert!(!AdapterError::HttpError("x".to_string()).is_config_error());
}

#[test]
fn test_adapter_error_from_conversions() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: AdapterError = json_err.into();
    assert!(matches!(err, AdapterError::ParseError(_)));

    #[allow(unused)]
    #[allow(clippy::items_after_statements)]
    fn _check_reqwest_conversion(err: reqwest::Error) -> AdapterError {
        AdapterError::from(err)
    }
}
