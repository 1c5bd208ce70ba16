//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{
    AppSettings, LogOutput, LoggingConfig, MockedModelSettings, ModelSettings, RestModelSettings,
};

/// Validates the entire configuration.
pub fn validate_settings(settings: &AppSettings) -> ConfigResult<()> {
    validate_model_settings(&settings.ml_model)?;
    validate_logging_config(&settings.logging)?;
    Ok(())
}

/// Validates the selected model's settings.
pub fn validate_model_settings(settings: &ModelSettings) -> ConfigResult<()> {
    match settings {
        ModelSettings::Mocked(mocked) => validate_mocked(mocked),
        ModelSettings::Rest(rest) => validate_rest(rest),
    }
}

fn validate_mocked(settings: &MockedModelSettings) -> ConfigResult<()> {
    let v = settings.ret_val;
    if !(0.0..=1.0).contains(&v) {
        return Err(ConfigError::validation(format!(
            "ret_val must be in 0 - 1 range, given {v}"
        )));
    }
    Ok(())
}

fn validate_rest(settings: &RestModelSettings) -> ConfigResult<()> {
    validate_url(&settings.http_endpoint, "http")?;

    if let Some(timeout) = settings.timeout
        && timeout < 0
    {
        return Err(ConfigError::validation(format!(
            "timeout must not be negative, given {timeout}"
        )));
    }

    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }
    Ok(())
}

/// Validates a URL.
fn validate_url(url: &str, expected_scheme: &str) -> ConfigResult<()> {
    if url.is_empty() {
        return Err(ConfigError::missing_field("url"));
    }

    let valid_schemes = match expected_scheme {
        "http" => ["http://", "https://"],
        _ => return Err(ConfigError::validation("Unknown URL scheme type")),
    };

    let Some(rest) = valid_schemes.iter().find_map(|s| url.strip_prefix(s)) else {
        return Err(ConfigError::invalid_url(
            url,
            format!("URL must start with one of: {:?}", valid_schemes),
        ));
    };

    // authority ends at the first path, query or fragment delimiter
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit('@').next().unwrap_or_default();
    let host = match host_port.strip_prefix('[') {
        Some(v6) => v6.split(']').next().unwrap_or_default(),
        None => host_port.split(':').next().unwrap_or_default(),
    };

    if host.is_empty() {
        return Err(ConfigError::invalid_url(url, "URL host is empty"));
    }

    Ok(())
}
