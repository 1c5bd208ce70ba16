//! Prediction models and the factories that build them from settings.
//!
//! Two entry points exist:
//!
//! - [`build_model`] takes validated [`AppSettings`]; it cannot fail.
//! - [`build_model_unchecked`] reads a raw JSON document directly. Only the
//!   shape needed to pick a model is checked: an out-of-range `ret_val` or a
//!   malformed endpoint goes straight into the model.

use std::fmt;

use serde_json::Value;
use tracing::{debug, info};

use crate::config::{AppSettings, ModelSettings};
use crate::error::{ModelError, ModelResult};

/// A model that scores one feature vector.
pub trait MlModel: fmt::Debug + Send + Sync {
    /// Returns the prediction for `vector`.
    fn predict(&self, vector: &[f64]) -> f64;
}

/// Always predicts the same value.
#[derive(Debug, Clone, PartialEq)]
pub struct MockedModel {
    ret_value: f64,
}

impl MockedModel {
    pub fn new(ret_value: f64) -> Self {
        Self { ret_value }
    }

    pub fn ret_value(&self) -> f64 {
        self.ret_value
    }
}

impl MlModel for MockedModel {
    fn predict(&self, vector: &[f64]) -> f64 {
        info!(len = vector.len(), "Mocked model prediction");
        self.ret_value
    }
}

/// A model behind an HTTP endpoint.
///
/// No request is made yet: predictions echo the first feature.
#[derive(Debug, Clone, PartialEq)]
pub struct RestModel {
    url: String,
    timeout: Option<i64>,
}

impl RestModel {
    pub fn new(url: impl Into<String>, timeout: Option<i64>) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request timeout in seconds, if any.
    pub fn timeout(&self) -> Option<i64> {
        self.timeout
    }
}

impl MlModel for RestModel {
    fn predict(&self, vector: &[f64]) -> f64 {
        info!(url = %self.url, timeout = ?self.timeout, "Rest model prediction");
        // TODO: POST the vector to `url` once the serving API is settled.
        vector.first().copied().unwrap_or(0.0)
    }
}

// =============================================================================
// Factories
// =============================================================================

/// Builds the model selected by validated settings.
pub fn build_model(settings: &AppSettings) -> Box<dyn MlModel> {
    debug!(
        model_type = settings.ml_model.model_type(),
        "Building model"
    );
    match &settings.ml_model {
        ModelSettings::Mocked(mocked) => Box::new(MockedModel::new(mocked.ret_val)),
        ModelSettings::Rest(rest) => Box::new(RestModel::new(&rest.http_endpoint, rest.timeout)),
    }
}

/// Builds a model straight from a raw settings document, without validation.
///
/// # Errors
///
/// - [`ModelError::MissingField`] if `ml_model`, `ml_model.model_type` or a
///   field the model needs is absent or has an unusable type.
/// - [`ModelError::UnsupportedModel`] for any `model_type` other than
///   `mocked` or `rest`.
pub fn build_model_unchecked(settings: &Value) -> ModelResult<Box<dyn MlModel>> {
    let model = settings
        .get("ml_model")
        .ok_or_else(|| ModelError::missing_field("ml_model"))?;
    let model_type = model
        .get("model_type")
        .and_then(Value::as_str)
        .ok_or_else(|| ModelError::missing_field("ml_model.model_type"))?;

    debug!(model_type, "Building model from unchecked settings");

    match model_type {
        "mocked" => {
            let ret_val = model
                .get("ret_val")
                .and_then(Value::as_f64)
                .ok_or_else(|| ModelError::missing_field("ml_model.ret_val"))?;
            Ok(Box::new(MockedModel::new(ret_val)))
        }
        "rest" => {
            let url = model
                .get("http_endpoint")
                .and_then(Value::as_str)
                .ok_or_else(|| ModelError::missing_field("ml_model.http_endpoint"))?;
            let timeout = match model.get("timeout") {
                None | Some(Value::Null) => None,
                Some(value) => Some(lenient_int(value).ok_or_else(|| {
                    ModelError::missing_field("ml_model.timeout")
                })?),
            };
            Ok(Box::new(RestModel::new(url, timeout)))
        }
        other => Err(ModelError::UnsupportedModel(other.to_string())),
    }
}

/// Accepts an integer or a string holding one.
fn lenient_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mocked_returns_fixed_value() {
        let model = MockedModel::new(0.6);
        assert_eq!(model.predict(&[1.0, 2.0, 3.0]), 0.6);
        assert_eq!(model.predict(&[]), 0.6);
    }

    #[test]
    fn test_rest_echoes_first_feature() {
        let model = RestModel::new("http://localhost:9050/model", Some(10));
        assert_eq!(model.predict(&[1.0, 2.0, 3.0]), 1.0);
        assert_eq!(model.predict(&[]), 0.0);
        assert_eq!(model.timeout(), Some(10));
    }

    #[test]
    fn test_unchecked_missing_fields() {
        assert!(matches!(
            build_model_unchecked(&json!({})),
            Err(ModelError::MissingField(f)) if f == "ml_model"
        ));
        assert!(matches!(
            build_model_unchecked(&json!({ "ml_model": {} })),
            Err(ModelError::MissingField(f)) if f == "ml_model.model_type"
        ));
        assert!(matches!(
            build_model_unchecked(&json!({ "ml_model": { "model_type": "mocked" } })),
            Err(ModelError::MissingField(f)) if f == "ml_model.ret_val"
        ));
    }

    #[test]
    fn test_unchecked_unknown_model() {
        let err = build_model_unchecked(&json!({ "ml_model": { "model_type": "onnx" } }))
            .unwrap_err();
        assert!(matches!(err, ModelError::UnsupportedModel(ref t) if t == "onnx"));
        assert_eq!(err.to_string(), "Unsupported model type: onnx");
    }

    #[test]
    fn test_unchecked_timeout_coercion() {
        let model = build_model_unchecked(&json!({
            "ml_model": { "model_type": "rest", "http_endpoint": "x", "timeout": "20" }
        }))
        .unwrap();
        assert_eq!(model.predict(&[7.0]), 7.0);

        assert!(matches!(
            build_model_unchecked(&json!({
                "ml_model": { "model_type": "rest", "http_endpoint": "x", "timeout": [] }
            })),
            Err(ModelError::MissingField(f)) if f == "ml_model.timeout"
        ));
    }
}
