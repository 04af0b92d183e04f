//! Layered settings lookup.
//!
//! Settings come from an optional TOML file overlaid by the process
//! environment. Setting names are the plain lowercase environment variable
//! names (`ddb_table_name`, `hash_key`, ...).
//!
//! Lookup rules:
//! - a required setting that is absent is an error
//! - a setting that is present but empty falls back to its default
//! - any other value, including `0`, is taken as given

use crate::error::{Error, Result};

/// Read-only view over the layered configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    inner: config::Config,
}

impl Settings {
    pub fn new(inner: config::Config) -> Self {
        Self { inner }
    }

    /// Loads `file` (if it exists) and then the process environment.
    pub fn load(file: &str) -> Result<Self> {
        let inner = config::Config::builder()
            .add_source(
                config::File::with_name(file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::default())
            .build()?;

        Ok(Self::new(inner))
    }

    /// Builds settings from literal key/value pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let mut builder = config::Config::builder();
        for (key, value) in pairs {
            builder = builder.set_override(key, value)?;
        }
        Ok(Self::new(builder.build()?))
    }

    fn raw(&self, key: &str) -> Result<Option<String>> {
        match self.inner.get_string(key) {
            Ok(value) => Ok(Some(value)),
            Err(config::ConfigError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// A setting that must be present and non-empty.
    pub fn required(&self, key: &str) -> Result<String> {
        match self.raw(key)? {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(Error::missing_setting(key)),
        }
    }

    /// A setting that must be present; empty means `default`.
    pub fn required_or(&self, key: &str, default: &str) -> Result<String> {
        match self.raw(key)? {
            Some(value) if value.is_empty() => Ok(default.to_string()),
            Some(value) => Ok(value),
            None => Err(Error::missing_setting(key)),
        }
    }

    /// Integer form of [`Settings::required_or`].
    pub fn required_i64_or(&self, key: &str, default: i64) -> Result<i64> {
        let raw = self.required_or(key, &default.to_string())?;
        raw.trim()
            .parse::<i64>()
            .map_err(|_| Error::config(format!("{} must be an integer, got {:?}", key, raw)))
    }

    /// A setting that may be absent; absent or empty means `default`.
    pub fn optional_or(&self, key: &str, default: &str) -> Result<String> {
        Ok(self.optional(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// A setting that may be absent; empty counts as absent.
    pub fn optional(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw(key)?.filter(|value| !value.is_empty()))
    }
}
