//! Configuration system for xq.
//!
//! Configuration is read from `~/.config/xq/config.toml` when present. Its
//! main use is declaring namespace prefixes once instead of passing `-n` on
//! every invocation.
//!
//! # Example
//!
//! ```toml
//! [namespaces]
//! atom = "http://www.w3.org/2005/Atom"
//! dc = "http://purl.org/dc/elements/1.1/"
//! ```

use anyhow::{anyhow, bail, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Configuration for the xq application.
///
/// # Fields
///
/// * `namespaces` - Prefix to namespace URI bindings usable in expressions (default: empty)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Prefix to namespace URI bindings
    #[serde(default)]
    pub namespaces: BTreeMap<String, String>,
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/xq/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("xq");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Loads configuration from `path`, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!("ignoring unreadable config {}: {}", path.display(), err);
                return Self::default();
            }
        };

        toml::from_str(&contents).unwrap_or_else(|err| {
            warn!("ignoring invalid config {}: {}", path.display(), err);
            Self::default()
        })
    }

    /// Adds namespace bindings given on the command line.
    ///
    /// Command-line bindings replace config bindings with the same prefix.
    pub fn with_cli_namespaces<I>(mut self, bindings: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.namespaces.extend(bindings);
        self
    }
}

/// Parses a `PREFIX=URI` namespace binding.
///
/// # Errors
///
/// Returns an error if the `=` separator is missing or either side is empty.
pub fn parse_namespace_binding(binding: &str) -> Result<(String, String)> {
    let (prefix, uri) = binding
        .split_once('=')
        .ok_or_else(|| anyhow!("expected PREFIX=URI, got '{}'", binding))?;

    let prefix = prefix.trim();
    let uri = uri.trim();
    if prefix.is_empty() {
        bail!("namespace prefix must not be empty in '{}'", binding);
    }
    if uri.is_empty() {
        bail!("namespace URI must not be empty in '{}'", binding);
    }

    Ok((prefix.to_string(), uri.to_string()))
}
