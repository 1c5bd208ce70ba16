//! Configuration module for the Courier runtime.
//!
//! This module provides layered settings loading (files, environment,
//! overrides) and validation for model selection and logging.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_settings, load_settings_from_file};
pub use schema::{
    AppSettings, LogFormat, LogLevel, LogOutput, LoggingConfig, MockedModelSettings,
    ModelSettings, RestModelSettings, SpanEventConfig,
};
pub use validation::{validate_model_settings, validate_settings};
