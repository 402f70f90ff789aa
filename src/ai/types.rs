//! Request and response types for structured-output completions

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Request keys owned by the adapter; model arguments may not set them.
pub const RESERVED_KEYS: &[&str] = &["messages", "response_format"];

/// Provider-specific request parameters, passed through unmodified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelArgs(Map<String, Value>);

impl ModelArgs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn model(self, model: impl Into<String>) -> Self {
        self.set("model", Value::String(model.into()))
    }

    #[must_use]
    pub fn temperature(self, temperature: f64) -> Self {
        self.set("temperature", json!(temperature))
    }

    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn model_name(&self) -> Option<&str> {
        self.0.get("model").and_then(Value::as_str)
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for ModelArgs {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Output constraint sent as the request's `response_format`.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    JsonSchema {
        name: String,
        description: Option<String>,
        schema: Value,
        strict: bool,
    },
    JsonObject,
}

impl ResponseFormat {
    #[must_use]
    pub fn json_schema(name: impl Into<String>, schema: Value) -> Self {
        Self::JsonSchema {
            name: name.into(),
            description: None,
            schema,
            strict: true,
        }
    }

    /// Derive the schema from a Rust type.
    ///
    /// Generated schemas are not guaranteed to satisfy the provider's strict
    /// mode rules, so `strict` starts off; opt in with [`ResponseFormat::strict`].
    #[must_use]
    pub fn for_type<T: JsonSchema>(name: impl Into<String>) -> Self {
        let root = schemars::schema_for!(T);
        let schema = serde_json::to_value(root).unwrap_or_else(|_| json!({}));
        Self::JsonSchema {
            name: name.into(),
            description: None,
            schema,
            strict: false,
        }
    }

    #[must_use]
    pub fn strict(self, enabled: bool) -> Self {
        match self {
            Self::JsonSchema {
                name,
                description,
                schema,
                ..
            } => Self::JsonSchema {
                name,
                description,
                schema,
                strict: enabled,
            },
            Self::JsonObject => Self::JsonObject,
        }
    }

    #[must_use]
    pub fn description(self, text: impl Into<String>) -> Self {
        match self {
            Self::JsonSchema {
                name,
                schema,
                strict,
                ..
            } => Self::JsonSchema {
                name,
                description: Some(text.into()),
                schema,
                strict,
            },
            Self::JsonObject => Self::JsonObject,
        }
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::JsonSchema {
                name,
                description,
                schema,
                strict,
            } => {
                let mut json_schema = json!({
                    "name": name,
                    "schema": schema,
                    "strict": strict,
                });
                if let Some(desc) = description {
                    json_schema["description"] = Value::String(desc.clone());
                }
                json!({
                    "type": "json_schema",
                    "json_schema": json_schema,
                })
            }
            Self::JsonObject => json!({ "type": "json_object" }),
        }
    }
}

/// Token accounting reported alongside a completion.
///
/// Counters are optional since providers may omit them or send `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: Option<u64>,
    #[serde(default)]
    pub completion_tokens: Option<u64>,
    #[serde(default)]
    pub total_tokens: Option<u64>,
    /// Provider-specific details such as cached or reasoning token counts.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A structured completion deserialized into `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCompletion<T> {
    pub parsed: T,
    pub usage: Option<Usage>,
    pub id: Option<String>,
    pub model: Option<String>,
}

impl<T> ParsedCompletion<T> {
    #[must_use]
    pub fn into_parts(self) -> (T, Option<Usage>) {
        (self.parsed, self.usage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(JsonSchema)]
    #[allow(dead_code)]
    struct Verdict {
        label: String,
        confidence: f64,
    }

    #[test]
    fn test_model_args_builders() {
        let args = ModelArgs::new()
            .model("gpt-4o-mini")
            .temperature(0.0)
            .set("seed", json!(7));

        assert_eq!(args.model_name(), Some("gpt-4o-mini"));
        assert_eq!(args.get("temperature"), Some(&json!(0.0)));
        assert_eq!(args.get("seed"), Some(&json!(7)));
        assert_eq!(args.as_map().len(), 3);
    }

    #[test]
    fn test_json_schema_wire_shape() {
        let format = ResponseFormat::json_schema("verdict", json!({"type": "object"}))
            .description("Classification result");

        assert_eq!(
            format.to_value(),
            json!({
                "type": "json_schema",
                "json_schema": {
                    "name": "verdict",
                    "description": "Classification result",
                    "schema": {"type": "object"},
                    "strict": true,
                }
            })
        );
        assert_eq!(
            ResponseFormat::JsonObject.to_value(),
            json!({"type": "json_object"})
        );
    }

    #[test]
    fn test_for_type_generates_object_schema() {
        let format = ResponseFormat::for_type::<Verdict>("verdict");
        let value = format.to_value();

        assert_eq!(value["json_schema"]["strict"], json!(false));
        let schema = &value["json_schema"]["schema"];
        assert_eq!(schema["type"], json!("object"));
        assert!(schema["properties"].get("label").is_some());
        assert!(schema["properties"].get("confidence").is_some());

        let strict = ResponseFormat::for_type::<Verdict>("verdict").strict(true);
        assert_eq!(strict.to_value()["json_schema"]["strict"], json!(true));
    }

    #[test]
    fn test_usage_keeps_provider_details() {
        let usage: Usage = serde_json::from_value(json!({
            "prompt_tokens": 12,
            "completion_tokens": 5,
            "total_tokens": 17,
            "prompt_tokens_details": {"cached_tokens": 0}
        }))
        .unwrap();

        assert_eq!(usage.total_tokens, Some(17));
        assert_eq!(
            usage.extra.get("prompt_tokens_details"),
            Some(&json!({"cached_tokens": 0}))
        );
    }

    #[test]
    fn test_usage_accepts_null_and_missing_counters() {
        let usage: Usage = serde_json::from_value(json!({
            "prompt_tokens": 5,
            "completion_tokens": null
        }))
        .unwrap();

        assert_eq!(usage.prompt_tokens, Some(5));
        assert_eq!(usage.completion_tokens, None);
        assert_eq!(usage.total_tokens, None);
    }
}
