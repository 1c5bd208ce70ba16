//! Model Settings Example
//!
//! Builds prediction models from four settings documents, twice: once
//! through validated `AppSettings`, once straight from the raw JSON. The
//! validated path refuses the two faulty documents; the unchecked path
//! builds a model from every one of them.
//!
//! Passing `--config` loads layered settings (file, then `COURIER_*`
//! environment variables) instead of the built-in documents.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package model-settings
//! COURIER_ML_MODEL__MODEL_TYPE=mocked COURIER_ML_MODEL__RET_VAL=0.3 \
//!     cargo run --package model-settings -- --config courier.toml
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use courier::prelude::*;
use serde_json::{Value, json};
use tracing::info;

#[derive(Debug, Parser)]
#[command(version, about = "Validated vs unchecked model construction")]
struct Cli {
    /// Load settings from this file instead of the built-in examples.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Feature vector passed to `predict`.
    #[arg(short, long, value_delimiter = ',', default_values_t = [1.0, 2.0, 3.0])]
    vector: Vec<f64>,
}

fn examples() -> [(&'static str, Value); 4] {
    [
        (
            "mocked ok",
            json!({ "ml_model": { "model_type": "mocked", "ret_val": 0.6 } }),
        ),
        (
            "mocked fault",
            json!({ "ml_model": { "model_type": "mocked", "ret_val": -0.1 } }),
        ),
        (
            "rest ok",
            json!({
                "ml_model": {
                    "model_type": "rest",
                    "http_endpoint": "http://localhost:9050/model",
                    "timeout": 10
                }
            }),
        ),
        (
            "rest fault",
            json!({
                "ml_model": {
                    "model_type": "rest",
                    "http_endpoint": "invalid_url",
                    "timeout": "20"
                }
            }),
        ),
    ]
}

fn validated_examples(vector: &[f64]) {
    for (label, doc) in examples() {
        match AppSettings::from_value(doc) {
            Ok(settings) => {
                let model = build_model(&settings);
                println!("{label}: {}", model.predict(vector));
            }
            Err(err) => println!("{label}: {err}"),
        }
    }
}

fn unchecked_examples(vector: &[f64]) -> Result<()> {
    for (label, doc) in examples() {
        let model = build_model_unchecked(&doc).with_context(|| format!("building {label}"))?;
        println!("{label}: {}", model.predict(vector));
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.config {
        let settings = ConfigLoader::new()
            .file(&path)
            .load()
            .with_context(|| format!("loading {}", path.display()))?;
        courier::runtime::logging::init_from_config(&settings.logging);

        let model = build_model(&settings);
        info!(model_type = settings.ml_model.model_type(), "Model built from settings");
        println!("{model:?}: {}", model.predict(&cli.vector));
        return Ok(());
    }

    LoggingBuilder::new().with_level(Level::INFO).init();

    println!("VALIDATED SETTINGS");
    validated_examples(&cli.vector);
    println!("UNCHECKED SETTINGS");
    unchecked_examples(&cli.vector)
}
