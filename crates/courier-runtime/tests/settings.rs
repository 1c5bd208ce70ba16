//! Validated vs unchecked model construction over the same documents.

use courier_runtime::{AppSettings, ConfigError, ModelSettings, build_model, build_model_unchecked};
use serde_json::{Value, json};

fn mocked_ok() -> Value {
    json!({ "ml_model": { "model_type": "mocked", "ret_val": 0.6 } })
}

fn mocked_fault() -> Value {
    json!({ "ml_model": { "model_type": "mocked", "ret_val": -0.1 } })
}

fn rest_ok() -> Value {
    json!({
        "ml_model": {
            "model_type": "rest",
            "http_endpoint": "http://localhost:9050/model",
            "timeout": 10
        }
    })
}

fn rest_fault() -> Value {
    json!({
        "ml_model": {
            "model_type": "rest",
            "http_endpoint": "invalid_url",
            "timeout": "20"
        }
    })
}

#[test]
fn validated_mocked_model() {
    let settings = AppSettings::from_value(mocked_ok()).unwrap();
    let model = build_model(&settings);
    assert_eq!(model.predict(&[1.0, 2.0, 3.0]), 0.6);
}

#[test]
fn validated_rejects_out_of_range_ret_val() {
    let err = AppSettings::from_value(mocked_fault()).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError { .. }));
    assert!(err.to_string().contains("ret_val must be in 0 - 1 range, given -0.1"));
}

#[test]
fn validated_rest_model() {
    let settings = AppSettings::from_value(rest_ok()).unwrap();
    assert!(matches!(
        settings.ml_model,
        ModelSettings::Rest(ref rest) if rest.timeout == Some(10)
    ));

    let model = build_model(&settings);
    assert_eq!(model.predict(&[1.0, 2.0, 3.0]), 1.0);
}

#[test]
fn validated_rejects_bad_rest_settings() {
    // The string timeout fails deserialization before the URL is looked at.
    let err = AppSettings::from_value(rest_fault()).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));

    let mut url_only = rest_fault();
    url_only["ml_model"]["timeout"] = json!(20);
    let err = AppSettings::from_value(url_only).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidUrl { ref url, .. } if url == "invalid_url"));
}

#[test]
fn unchecked_accepts_every_document() {
    let inputs = [mocked_ok(), mocked_fault(), rest_ok(), rest_fault()];
    let predictions: Vec<f64> = inputs
        .iter()
        .map(|doc| build_model_unchecked(doc).unwrap().predict(&[10.0, 20.0, 30.0]))
        .collect();

    assert_eq!(predictions, [0.6, -0.1, 10.0, 10.0]);
}
