//! Courier Runtime - settings, logging and model selection.
//!
//! This crate provides:
//! - Layered settings loading with validation (`ConfigLoader`, `AppSettings`)
//! - Logging configuration (`LoggingBuilder`)
//! - Prediction models chosen from settings (`build_model`)
//!
//! # Example
//!
//! ```rust,ignore
//! use courier_runtime::{ConfigLoader, build_model, logging};
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = ConfigLoader::new().load()?;
//!     logging::init_from_config(&settings.logging);
//!
//!     let model = build_model(&settings);
//!     println!("{}", model.predict(&[1.0, 2.0, 3.0]));
//!     Ok(())
//! }
//! ```
//!
//! Settings held as plain JSON can skip validation entirely through
//! [`build_model_unchecked`]; see [`model`] for what that gives up.

pub mod config;
pub mod error;
pub mod logging;
pub mod model;

// Re-exports
pub use config::{AppSettings, ConfigError, ConfigLoader, ConfigResult, ModelSettings};
pub use error::{ModelError, ModelResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use model::{MlModel, MockedModel, RestModel, build_model, build_model_unchecked};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// This provides all the commonly used logging macros:
/// - `trace!`, `debug!`, `info!`, `warn!`, `error!`
/// - `span`, `event`
/// - `instrument` attribute
/// - `Level` for span creation
pub mod prelude {
    pub use tracing::{Level, debug, error, event, info, instrument, span, trace, warn};
}
