//! Config file loading
//!
//! Finds the nearest config file above the working directory and a fallback
//! file in the home directory, and deep-merges them. Home values act as
//! defaults; values from the nearer file win.

mod discover;
mod merge;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::config::{home_dir, APP_NAME};
use crate::error::ConfigError;

pub use discover::{candidate_names, search, ConfigSource, FoundConfig};
pub use merge::deep_merge;

/// Reads and writes the application's config files.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    app_name: String,
    cwd: PathBuf,
    home: Option<PathBuf>,
}

impl ConfigLoader {
    /// Loader rooted at the process working directory and `$HOME`.
    pub fn new(app_name: impl Into<String>) -> Result<Self, ConfigError> {
        let cwd = env::current_dir().map_err(|source| ConfigError::Io {
            path: PathBuf::from("."),
            source,
        })?;
        Ok(Self::with_dirs(app_name, cwd, home_dir()))
    }

    pub fn with_dirs(
        app_name: impl Into<String>,
        cwd: impl Into<PathBuf>,
        home: Option<PathBuf>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            cwd: cwd.into(),
            home,
        }
    }

    /// Nearest config file, searching upward from the working directory and
    /// stopping after the home directory.
    pub fn find_local(&self) -> Result<Option<FoundConfig>, ConfigError> {
        search(&self.app_name, &self.cwd, self.home.as_deref())
    }

    /// Config file in the home directory itself.
    pub fn find_home(&self) -> Result<Option<FoundConfig>, ConfigError> {
        match &self.home {
            Some(home) => search(&self.app_name, home, Some(home)),
            None => Ok(None),
        }
    }

    /// Merged configuration; an empty object when no file exists.
    pub fn read(&self) -> Result<Value, ConfigError> {
        let local = found_value(self.find_local()?);
        let home = found_value(self.find_home()?);
        Ok(deep_merge(home, local))
    }

    /// Deep-merges `partial` into the nearest config file, `partial` taking
    /// precedence, and writes the result back as pretty JSON. Without any
    /// file, `~/.{app}rc` is created. Returns `partial`.
    pub fn write(&self, partial: Value) -> Result<Value, ConfigError> {
        let found = self.find_local()?;
        let target = match &found {
            Some(found) => found.path.clone(),
            None => self.default_path()?,
        };

        if !partial.is_object() {
            return Err(ConfigError::NotAnObject(target));
        }

        let existing = found
            .as_ref()
            .map(|f| Value::Object(f.config.clone()))
            .unwrap_or_else(empty_object);
        let merged = deep_merge(existing, partial.clone());

        let document = match found.as_ref().map(|f| f.source) {
            Some(ConfigSource::PackageJson) => {
                let mut package = read_json(&target)?;
                if let Value::Object(fields) = &mut package {
                    fields.insert(self.app_name.clone(), merged);
                }
                package
            }
            _ => merged,
        };

        write_json(&target, &document)?;
        info!(path = %target.display(), "Wrote config");
        Ok(partial)
    }

    /// `~/.{app}rc`
    pub fn default_path(&self) -> Result<PathBuf, ConfigError> {
        self.home
            .as_ref()
            .map(|home| home.join(format!(".{}rc", self.app_name)))
            .ok_or(ConfigError::HomeNotFound)
    }
}

/// Merged configuration for this application, from the working directory
/// and `$HOME`.
pub fn read_config() -> Result<Value, ConfigError> {
    ConfigLoader::new(APP_NAME)?.read()
}

/// Merges `partial` into this application's nearest config file.
pub fn write_config(partial: Value) -> Result<Value, ConfigError> {
    ConfigLoader::new(APP_NAME)?.write(partial)
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

fn found_value(found: Option<FoundConfig>) -> Value {
    found
        .map(|f| {
            debug!(path = %f.path.display(), "Merging config");
            Value::Object(f.config)
        })
        .unwrap_or_else(empty_object)
}

fn read_json(path: &Path) -> Result<Value, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    discover::parse_json(path, &content)
}

fn write_json(path: &Path, value: &Value) -> Result<(), ConfigError> {
    let text = serde_json::to_string_pretty(value).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, text).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
