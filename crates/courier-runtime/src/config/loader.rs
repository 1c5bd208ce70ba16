//! Layered settings loading on top of figment.
//!
//! Sources, lowest priority first:
//!
//! 1. logging defaults (`ml_model` has none and must come from a source)
//! 2. `courier.{profile}.toml`, then the first `courier.toml` / `config.toml`
//!    found in the search paths, or the file given to [`ConfigLoader::file`]
//! 3. `COURIER_*` environment variables, `__` separating nested keys
//! 4. values passed to [`ConfigLoader::merge`] and [`ConfigLoader::set`]
//!
//! With the `yaml-config` feature, `.yaml` and `.yml` files are discovered
//! the same way, after their TOML counterparts.
//!
//! ```bash
//! COURIER_ML_MODEL__MODEL_TYPE=rest \
//! COURIER_ML_MODEL__HTTP_ENDPOINT=http://localhost:9050/model \
//! COURIER_LOGGING__LEVEL=debug my-app
//! ```
//!
//! ```rust,ignore
//! use courier_runtime::config::ConfigLoader;
//!
//! let settings = ConfigLoader::new()
//!     .file("settings/courier.toml")
//!     .set("ml_model.timeout", 10)
//!     .load()?;
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(any(feature = "toml-config", feature = "yaml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::{AppSettings, LoggingConfig};
use super::validation::validate_settings;

const ENV_PREFIX: &str = "COURIER_";
const PROFILE_VAR: &str = "COURIER_PROFILE";

/// File stems tried in every search path, in order.
const FILE_STEMS: [&str; 2] = ["courier", "config"];
/// Extensions tried for every stem; disabled formats are skipped.
const FILE_EXTENSIONS: [&str; 3] = ["toml", "yaml", "yml"];

/// Selects the `courier.{profile}.*` file merged beneath the main one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    #[default]
    Development,
    Production,
    Custom(String),
}

impl Profile {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Parses a profile name; unknown names become [`Profile::Custom`].
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Reads `COURIER_PROFILE`, defaulting to development.
    pub fn from_env() -> Self {
        std::env::var(PROFILE_VAR)
            .map(|name| Self::parse(&name))
            .unwrap_or_default()
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A settings file format enabled at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    #[cfg(feature = "toml-config")]
    Toml,
    #[cfg(feature = "yaml-config")]
    Yaml,
}

impl FileFormat {
    fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            #[cfg(feature = "toml-config")]
            "toml" => Some(Self::Toml),
            #[cfg(feature = "yaml-config")]
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    fn of(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    #[allow(unused_variables)]
    fn merge(self, figment: Figment, path: &Path) -> Figment {
        match self {
            #[cfg(feature = "toml-config")]
            Self::Toml => figment.merge(Toml::file(path)),
            #[cfg(feature = "yaml-config")]
            Self::Yaml => figment.merge(Yaml::file(path)),
        }
    }
}

/// Returns `dir/stem.profile.ext` for `dir/stem.ext`.
fn profile_variant(path: &Path, profile: &Profile) -> Option<PathBuf> {
    let stem = path.file_stem()?.to_str()?;
    let ext = path.extension()?.to_str()?;
    Some(path.with_file_name(format!("{stem}.{profile}.{ext}")))
}

/// The working directory, then `<user config dir>/courier`.
fn default_search_paths() -> Vec<PathBuf> {
    std::env::current_dir()
        .ok()
        .into_iter()
        .chain(dirs::config_dir().map(|dir| dir.join("courier")))
        .collect()
}

/// Builder that merges settings sources and produces validated [`AppSettings`].
pub struct ConfigLoader {
    profile: Profile,
    search_paths: Vec<PathBuf>,
    config_file: Option<PathBuf>,
    load_env: bool,
    /// Merged last, above the environment.
    overrides: Figment,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// A loader for the profile in `COURIER_PROFILE`, reading the environment
    /// and searching the default paths.
    pub fn new() -> Self {
        Self {
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            config_file: None,
            load_env: true,
            overrides: Figment::new(),
        }
    }

    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::parse(profile.as_ref());
        self
    }

    /// Adds a directory to search. Once any is added, the defaults are not
    /// searched.
    pub fn search_path(mut self, path: impl AsRef<Path>) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    pub fn with_current_dir(self) -> Self {
        match std::env::current_dir() {
            Ok(cwd) => self.search_path(cwd),
            Err(_) => self,
        }
    }

    /// Adds `<user config dir>/courier`, e.g. `~/.config/courier` on Linux.
    pub fn with_user_config_dir(self) -> Self {
        match dirs::config_dir() {
            Some(dir) => self.search_path(dir.join("courier")),
            None => self,
        }
    }

    /// Loads exactly this file instead of searching. It must exist.
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Overrides with complete settings.
    pub fn merge(mut self, settings: AppSettings) -> Self {
        self.overrides = self.overrides.merge(Serialized::defaults(settings));
        self
    }

    /// Overrides a single dotted key, e.g. `("ml_model.ret_val", 0.3)`.
    pub fn set<T: serde::Serialize>(mut self, key: &str, value: T) -> Self {
        self.overrides = self.overrides.merge(Serialized::global(key, value));
        self
    }

    /// Merges every source, then deserializes and validates the result.
    ///
    /// A missing or mistyped field is a [`ConfigError::ParseError`]; a value
    /// out of range is reported by validation.
    pub fn load(self) -> ConfigResult<AppSettings> {
        let profile = self.profile.clone();
        let settings: AppSettings = self.into_figment()?.extract()?;
        validate_settings(&settings)?;

        debug!(
            %profile,
            model_type = settings.ml_model.model_type(),
            logging_level = %settings.logging.level,
            "Settings loaded"
        );
        Ok(settings)
    }

    fn into_figment(self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::default("logging", LoggingConfig::default()));

        let found = match &self.config_file {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::FileNotFound(path.clone()));
                }
                let format = FileFormat::of(path).ok_or_else(|| {
                    ConfigError::parse(format!(
                        "unsupported or disabled settings format: {}",
                        path.display()
                    ))
                })?;
                Some((path.clone(), format))
            }
            None => self.discover(),
        };

        match found {
            Some((path, format)) => {
                if let Some(variant) = profile_variant(&path, &self.profile)
                    && variant.is_file()
                {
                    debug!(path = %variant.display(), profile = %self.profile, "Merging profile settings");
                    figment = format.merge(figment, &variant);
                }
                info!(path = %path.display(), "Merging settings file");
                figment = format.merge(figment, &path);
            }
            None => warn!("No settings file found, using environment and overrides only"),
        }

        if self.load_env {
            trace!(prefix = ENV_PREFIX, "Merging environment");
            figment = figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["profile"]).split("__"));
        }

        Ok(figment.merge(self.overrides))
    }

    /// First existing `stem.ext` in the search paths, in path, stem and
    /// extension order.
    fn discover(&self) -> Option<(PathBuf, FileFormat)> {
        let dirs = if self.search_paths.is_empty() {
            default_search_paths()
        } else {
            self.search_paths.clone()
        };

        dirs.iter()
            .flat_map(|dir| {
                FILE_STEMS.iter().flat_map(move |stem| {
                    FILE_EXTENSIONS
                        .iter()
                        .map(move |ext| dir.join(format!("{stem}.{ext}")))
                })
            })
            .find_map(|path| {
                let format = FileFormat::of(&path)?;
                path.is_file().then_some((path, format))
            })
    }
}

/// Loads settings from the default locations.
pub fn load_settings() -> ConfigResult<AppSettings> {
    ConfigLoader::new().load()
}

/// Loads settings from `path`, with environment overrides.
pub fn load_settings_from_file(path: impl AsRef<Path>) -> ConfigResult<AppSettings> {
    ConfigLoader::new().file(path).load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{LogLevel, ModelSettings, RestModelSettings};
    use figment::Jail;

    #[test]
    fn test_profile_parse() {
        assert_eq!(Profile::parse("prod"), Profile::Production);
        assert_eq!(Profile::parse("Development"), Profile::Development);
        assert_eq!(Profile::parse("staging").as_str(), "staging");
    }

    #[test]
    fn test_profile_variant_path() {
        let variant = profile_variant(Path::new("conf/courier.toml"), &Profile::Production);
        assert_eq!(variant, Some(PathBuf::from("conf/courier.production.toml")));
    }

    #[test]
    fn test_missing_model_is_parse_error() {
        Jail::expect_with(|jail| {
            let result = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load();
            assert!(matches!(result, Err(ConfigError::ParseError(_))));
            Ok(())
        });
    }

    #[test]
    fn test_missing_file() {
        Jail::expect_with(|_jail| {
            let result = ConfigLoader::new().file("absent.toml").load();
            assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
            Ok(())
        });
    }

    #[test]
    fn test_unsupported_extension() {
        Jail::expect_with(|jail| {
            jail.create_file("courier.ini", "model_type = mocked")?;
            let result = ConfigLoader::new().file("courier.ini").load();
            assert!(matches!(result, Err(ConfigError::ParseError(_))));
            Ok(())
        });
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_toml_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "courier.toml",
                r#"
                [ml_model]
                model_type = "rest"
                http_endpoint = "http://localhost:9050/model"

                [logging]
                level = "debug"
                "#,
            )?;
            jail.set_env("COURIER_ML_MODEL__TIMEOUT", "10");

            let settings = ConfigLoader::new()
                .search_path(jail.directory())
                .load()
                .map_err(|e| e.to_string())?;

            assert_eq!(settings.logging.level, LogLevel::Debug);
            assert_eq!(
                settings.ml_model,
                ModelSettings::Rest(RestModelSettings {
                    http_endpoint: "http://localhost:9050/model".to_string(),
                    timeout: Some(10),
                })
            );
            Ok(())
        });
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_profile_file_and_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "courier.toml",
                "[ml_model]\nmodel_type = \"mocked\"\nret_val = 0.6\n",
            )?;
            jail.create_file("courier.production.toml", "[logging]\nlevel = \"warn\"\n")?;

            let settings = ConfigLoader::new()
                .profile("production")
                .search_path(jail.directory())
                .without_env()
                .set("ml_model.ret_val", 0.25)
                .load()
                .map_err(|e| e.to_string())?;

            assert_eq!(settings.logging.level, LogLevel::Warn);
            assert!(matches!(
                settings.ml_model,
                ModelSettings::Mocked(ref m) if m.ret_val == 0.25
            ));
            Ok(())
        });
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_loaded_settings_are_validated() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "courier.toml",
                "[ml_model]\nmodel_type = \"mocked\"\nret_val = -0.1\n",
            )?;

            let result = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load();
            assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
            Ok(())
        });
    }
}
