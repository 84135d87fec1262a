//! Config file discovery
//!
//! Walks from a start directory towards the filesystem root looking for the
//! first directory that holds a config file for the application.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ConfigError;

/// Kind of file a config was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// The application's property inside `package.json`
    PackageJson,
    /// A dedicated rc file
    RcFile,
}

/// A config file located by [`search`].
#[derive(Debug, Clone, PartialEq)]
pub struct FoundConfig {
    pub path: PathBuf,
    pub source: ConfigSource,
    /// Parsed content; empty for a YAML `~`/`null` document
    pub config: Map<String, Value>,
}

/// File names checked in every directory, in priority order.
pub fn candidate_names(app_name: &str) -> Vec<String> {
    vec![
        "package.json".to_string(),
        format!(".{app_name}rc"),
        format!(".{app_name}rc.json"),
        format!(".{app_name}rc.yaml"),
        format!(".{app_name}rc.yml"),
    ]
}

/// Searches `start` and its ancestors. The walk ends after `stop_dir` has
/// been checked, or at the root when `start` is not below `stop_dir`.
pub fn search(
    app_name: &str,
    start: &Path,
    stop_dir: Option<&Path>,
) -> Result<Option<FoundConfig>, ConfigError> {
    let names = candidate_names(app_name);
    let mut dir = Some(start);

    while let Some(current) = dir {
        for name in &names {
            let path = current.join(name);
            if !path.is_file() {
                continue;
            }
            if let Some(found) = load(app_name, &path)? {
                debug!(path = %found.path.display(), "Found config file");
                return Ok(Some(found));
            }
        }

        if stop_dir.is_some_and(|stop| stop == current) {
            break;
        }
        dir = current.parent();
    }

    Ok(None)
}

/// Loads one candidate. Neither a whitespace-only rc file nor a
/// `package.json` without the application's property counts as a config
/// file; the search moves on past them.
fn load(app_name: &str, path: &Path) -> Result<Option<FoundConfig>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if path.file_name().is_some_and(|name| name == "package.json") {
        let package = parse_json(path, &content)?;
        return match package.get(app_name) {
            Some(section) => Ok(Some(FoundConfig {
                path: path.to_path_buf(),
                source: ConfigSource::PackageJson,
                config: into_object(path, section.clone())?,
            })),
            None => Ok(None),
        };
    }

    if content.trim().is_empty() {
        debug!(path = %path.display(), "Skipping empty config file");
        return Ok(None);
    }

    let value = if path.extension().is_some_and(|ext| ext == "json") {
        parse_json(path, &content)?
    } else {
        // Extension-less rc files may hold YAML or JSON; JSON is valid YAML
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?
    };

    Ok(Some(FoundConfig {
        path: path.to_path_buf(),
        source: ConfigSource::RcFile,
        config: into_object(path, value)?,
    }))
}

pub(crate) fn parse_json(path: &Path, content: &str) -> Result<Value, ConfigError> {
    serde_json::from_str(content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn into_object(path: &Path, value: Value) -> Result<Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(ConfigError::NotAnObject(path.to_path_buf())),
    }
}
