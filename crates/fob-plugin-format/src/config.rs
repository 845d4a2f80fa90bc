//! Format plugin configuration
//!
//! The option bag mixes the plugin's own keys (`extensions`) with pass-through
//! formatter options, so a config such as
//!
//! ```json
//! { "extensions": [".js", ".jsx"], "singleQuote": true }
//! ```
//!
//! deserializes into an allow-list plus `{ "singleQuote": true }` for the
//! formatter.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

use crate::error::{FormatError, Result};
use crate::formatter::FormatterOptions;

/// Extension processed when none are configured
pub const DEFAULT_EXTENSION: &str = ".js";

fn default_extensions() -> Vec<String> {
    vec![DEFAULT_EXTENSION.to_string()]
}

/// Configuration for the format plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatPluginOptions {
    /// File extensions to rewrite, with or without the leading dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Options handed to the formatter untouched
    #[serde(flatten)]
    pub formatter: Map<String, Value>,
}

impl Default for FormatPluginOptions {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            formatter: Map::new(),
        }
    }
}

impl FormatPluginOptions {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from a raw JSON option bag
    ///
    /// # Errors
    ///
    /// Fails if `extensions` is not a list of strings or the bag isn't an object.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| FormatError::InvalidOption {
            key: "extensions".to_string(),
            expected: "array of strings",
            received: e.to_string(),
        })
    }

    /// Replace the extension allow-list
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Add an extension to the allow-list
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extensions.push(extension.into());
        self
    }

    /// Set a single pass-through formatter option
    pub fn with_formatter_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.formatter.insert(key.into(), value.into());
        self
    }

    /// Merge a map of pass-through formatter options
    pub fn with_formatter_options(mut self, options: Map<String, Value>) -> Self {
        self.formatter.extend(options);
        self
    }

    /// Validate the formatter options
    pub fn formatter_options(&self) -> Result<FormatterOptions> {
        FormatterOptions::from_map(&self.formatter)
    }

    /// Normalized allow-list (no leading dots)
    pub(crate) fn extension_set(&self) -> Result<FxHashSet<String>> {
        self.extensions
            .iter()
            .map(|ext| {
                let trimmed = ext.trim().trim_start_matches('.');
                if trimmed.is_empty() {
                    Err(FormatError::InvalidExtension { value: ext.clone() })
                } else {
                    Ok(trimmed.to_string())
                }
            })
            .collect()
    }
}

/// Check whether `id` ends in one of the allowed extensions
pub(crate) fn has_allowed_extension(extensions: &FxHashSet<String>, id: &str) -> bool {
    Path::new(id)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.contains(ext))
}
