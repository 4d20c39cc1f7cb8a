//! Configuration management for remind.
//!
//! Configuration can be set via environment variables:
//! - `REMIND_STORE` - Optional. Path of the store file. Defaults to `store.rmnd`
//!   in the current directory.
//! - `REMIND_ASSUME_YES` - Optional. Skip confirmation prompts. Defaults to `false`.
//! - `REMIND_DATE_FORMAT` - Optional. strftime format of the "Added On" column.
//!   Defaults to `%c`.

use chrono::format::{Item, StrftimeItems};
use chrono::Local;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::util::parse_bool;

/// Default store file name, relative to the current directory.
pub const DEFAULT_STORE_FILE: &str = "store.rmnd";

/// Default strftime format for timestamps.
pub const DEFAULT_DATE_FORMAT: &str = "%c";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Tool configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute path of the store file
    pub store_path: PathBuf,

    /// Answer "yes" to every confirmation
    pub assume_yes: bool,

    /// strftime format for task timestamps
    pub date_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: resolve_path(Path::new(DEFAULT_STORE_FILE)),
            assume_yes: false,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a variable is set but unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let store_path = lookup("REMIND_STORE")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STORE_FILE.to_string());

        let date_format =
            lookup("REMIND_DATE_FORMAT").unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string());
        validate_date_format(&date_format)
            .map_err(|e| ConfigError::InvalidValue("REMIND_DATE_FORMAT".to_string(), e))?;

        let assume_yes = lookup("REMIND_ASSUME_YES")
            .map(|value| parse_bool(&value))
            .unwrap_or(false);

        Ok(Self {
            store_path: resolve_path(Path::new(&store_path)),
            assume_yes,
            date_format,
        })
    }

    /// Override the store location (command-line flag).
    pub fn with_store_path(mut self, path: impl AsRef<Path>) -> Self {
        self.store_path = resolve_path(path.as_ref());
        self
    }
}

/// Make `path` absolute against the current directory.
pub fn resolve_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    }
}

/// Check that `format` is a strftime string chrono can render.
///
/// Some specifiers (`%#z`) parse fine but only work for parsing, so a sample
/// timestamp is formatted as well.
pub fn validate_date_format(format: &str) -> Result<(), String> {
    if format.is_empty() {
        return Err("format must not be empty".to_string());
    }
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(format!("'{}' is not a valid strftime format", format));
    }
    let mut sample = String::new();
    write!(sample, "{}", Local::now().format_with_items(items.iter()))
        .map_err(|_| format!("'{}' cannot be used to display dates", format))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_store_path_is_absolute() {
        let config = Config::default();
        assert!(config.store_path.is_absolute());
        assert!(config.store_path.ends_with(DEFAULT_STORE_FILE));
        assert!(!config.assume_yes);
        assert_eq!(config.date_format, DEFAULT_DATE_FORMAT);
    }

    #[test]
    fn with_store_path_resolves_relative_paths() {
        let config = Config::default().with_store_path("lists/home.rmnd");
        assert!(config.store_path.is_absolute());
        assert!(config.store_path.ends_with("lists/home.rmnd"));

        let absolute = Config::default().with_store_path("/tmp/x.rmnd");
        assert_eq!(absolute.store_path, PathBuf::from("/tmp/x.rmnd"));
    }

    #[test]
    fn validate_date_format_rejects_bad_specifiers() {
        assert!(validate_date_format("%Y-%m-%d %H:%M").is_ok());
        assert!(validate_date_format("%c").is_ok());
        assert!(validate_date_format("").is_err());
        assert!(validate_date_format("%Q").is_err());
    }

    #[test]
    fn validate_date_format_rejects_parse_only_specifiers() {
        let err = validate_date_format("%#z").unwrap_err();
        assert!(err.contains("%#z"));
        assert!(validate_date_format("%d.%m. %#z").is_err());
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn from_lookup_uses_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert!(config.store_path.ends_with(DEFAULT_STORE_FILE));
        assert!(config.store_path.is_absolute());
        assert!(!config.assume_yes);
        assert_eq!(config.date_format, DEFAULT_DATE_FORMAT);
    }

    #[test]
    fn blank_store_variable_falls_back_to_default() {
        let config = Config::from_lookup(lookup(&[("REMIND_STORE", "   ")])).unwrap();
        assert!(config.store_path.ends_with(DEFAULT_STORE_FILE));

        let config = Config::from_lookup(lookup(&[("REMIND_STORE", "/tmp/work.rmnd")])).unwrap();
        assert_eq!(config.store_path, PathBuf::from("/tmp/work.rmnd"));
    }

    #[test]
    fn assume_yes_is_parsed_from_env() {
        for value in ["1", "true", "Yes"] {
            let config = Config::from_lookup(lookup(&[("REMIND_ASSUME_YES", value)])).unwrap();
            assert!(config.assume_yes, "{value} should enable assume_yes");
        }
        for value in ["0", "no", ""] {
            let config = Config::from_lookup(lookup(&[("REMIND_ASSUME_YES", value)])).unwrap();
            assert!(!config.assume_yes, "{value} should not enable assume_yes");
        }
    }

    #[test]
    fn invalid_date_format_is_a_config_error() {
        for value in ["%Q", "%#z", ""] {
            let err = Config::from_lookup(lookup(&[("REMIND_DATE_FORMAT", value)])).unwrap_err();
            let ConfigError::InvalidValue(name, _) = err;
            assert_eq!(name, "REMIND_DATE_FORMAT");
        }

        let config = Config::from_lookup(lookup(&[("REMIND_DATE_FORMAT", "%Y-%m-%d")])).unwrap();
        assert_eq!(config.date_format, "%Y-%m-%d");
    }
}
