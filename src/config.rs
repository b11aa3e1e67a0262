//! Named group/key settings store.
//!
//! Objects consult a [`Config`] to derive width-dependent bounds. Typed
//! `get_*` accessors try the instance store first and fall back to the
//! process-wide default store, which is seeded with every key the built-in
//! variants query.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single typed configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i32),
    Double(f64),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// A `(group, key)` store of typed settings.
///
/// A key set on an instance shadows the built-in default; a key absent from
/// the instance falls through to [`Config::default_config`]. The default
/// store is contractually complete for every key any variant looks up, so a
/// miss there panics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    groups: HashMap<String, HashMap<String, Value>>,
}

impl Config {
    /// Creates an empty config; every lookup falls through to the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a config from a TOML file of `[group]` tables.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("loaded config from {:?}", path);
        Ok(cfg)
    }

    /// The process-wide default config, seeded with the built-in constants.
    pub fn default_config() -> &'static Arc<Config> {
        static DEFAULT: OnceLock<Arc<Config>> = OnceLock::new();
        DEFAULT.get_or_init(|| {
            let mut cfg = Config::new();
            cfg.set_int("graphical", "net-width", 10);
            cfg.set_int("graphical", "pin-width-net", 10);
            cfg.set_int("graphical", "pin-width-bus", 30);
            Arc::new(cfg)
        })
    }

    fn lookup(&self, group: &str, key: &str) -> Option<Value> {
        self.groups.get(group)?.get(key).copied()
    }

    /// Looks up an integer in this store only; no default fallback.
    pub fn lookup_int(&self, group: &str, key: &str) -> Option<i32> {
        match self.lookup(group, key)? {
            Value::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn lookup_double(&self, group: &str, key: &str) -> Option<f64> {
        match self.lookup(group, key)? {
            Value::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn lookup_bool(&self, group: &str, key: &str) -> Option<bool> {
        match self.lookup(group, key)? {
            Value::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the integer for `(group, key)`, falling back to the default
    /// store.
    ///
    /// # Panics
    ///
    /// Panics if the key is missing from the default store as well; that
    /// means a variant/key pairing was added without seeding a default.
    pub fn get_int(&self, group: &str, key: &str) -> i32 {
        self.lookup_int(group, key)
            .or_else(|| Self::default_config().lookup_int(group, key))
            .unwrap_or_else(|| panic!("no built-in default for config key {group}.{key}"))
    }

    pub fn get_double(&self, group: &str, key: &str) -> f64 {
        self.lookup_double(group, key)
            .or_else(|| Self::default_config().lookup_double(group, key))
            .unwrap_or_else(|| panic!("no built-in default for config key {group}.{key}"))
    }

    pub fn get_bool(&self, group: &str, key: &str) -> bool {
        self.lookup_bool(group, key)
            .or_else(|| Self::default_config().lookup_bool(group, key))
            .unwrap_or_else(|| panic!("no built-in default for config key {group}.{key}"))
    }

    fn set(&mut self, group: &str, key: &str, value: Value) {
        self.groups
            .entry(group.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    pub fn set_int(&mut self, group: &str, key: &str, value: i32) {
        self.set(group, key, Value::Int(value));
    }

    pub fn set_double(&mut self, group: &str, key: &str, value: f64) {
        self.set(group, key, Value::Double(value));
    }

    pub fn set_bool(&mut self, group: &str, key: &str, value: bool) {
        self.set(group, key, Value::Bool(value));
    }
}
