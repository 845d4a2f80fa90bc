//! File-based config discovery
//!
//! Finds format options in the project's existing config files so the plugin
//! can be configured without code.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::FormatPluginOptions;
use crate::error::{FormatError, Result};

/// Table read from `fob.toml`
const TOML_TABLE: &str = "format";
/// Field read from `package.json`
const PACKAGE_FIELD: &str = "fobFormat";

/// Searches a project root for format options
///
/// # Example
///
/// ```no_run
/// use fob_plugin_format::FormatConfigDiscovery;
///
/// let options = FormatConfigDiscovery::new(".").load().unwrap();
/// ```
pub struct FormatConfigDiscovery {
    root: PathBuf,
}

impl FormatConfigDiscovery {
    /// Create a new discovery rooted at `root`
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a config file carrying format options
    ///
    /// Searches in this order:
    /// 1. `fob.toml` with a `[format]` table
    /// 2. `package.json` with a `fobFormat` field
    ///
    /// # Errors
    ///
    /// A `fob.toml` that exists but can't be read or parsed is an error rather
    /// than being skipped.
    pub fn find(&self) -> Result<Option<PathBuf>> {
        let toml_path = self.root.join("fob.toml");
        if toml_path.exists() {
            let content =
                fs::read_to_string(&toml_path).map_err(|e| FormatError::read(&toml_path, e))?;
            let parsed = toml::from_str::<toml::Table>(&content).map_err(|e| {
                FormatError::config(&toml_path, format!("Invalid TOML syntax: {e}"))
            })?;
            if parsed.contains_key(TOML_TABLE) {
                return Ok(Some(toml_path));
            }
        }

        let pkg_path = self.root.join("package.json");
        if let Ok(content) = fs::read_to_string(&pkg_path) {
            if let Ok(parsed) = serde_json::from_str::<Value>(&content) {
                if parsed.get(PACKAGE_FIELD).is_some_and(|v| !v.is_null()) {
                    return Ok(Some(pkg_path));
                }
            }
        }

        Ok(None)
    }

    /// Load options from the discovered file, or defaults when there is none
    pub fn load(&self) -> Result<FormatPluginOptions> {
        match self.find()? {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!(
                    "[fob-format] No format config found in {}, using defaults",
                    self.root.display()
                );
                Ok(FormatPluginOptions::default())
            }
        }
    }

    /// Load options from a specific `fob.toml` or `package.json`
    pub fn load_from(path: &Path) -> Result<FormatPluginOptions> {
        let content = fs::read_to_string(path).map_err(|e| FormatError::read(path, e))?;

        let section = if path.file_name() == Some(std::ffi::OsStr::new("package.json")) {
            let parsed: Value = serde_json::from_str(&content)
                .map_err(|e| FormatError::config(path, format!("Invalid JSON: {e}")))?;
            parsed.get(PACKAGE_FIELD).cloned()
        } else {
            let parsed: toml::Table = toml::from_str(&content)
                .map_err(|e| FormatError::config(path, format!("Invalid TOML syntax: {e}")))?;
            parsed
                .get(TOML_TABLE)
                .map(|table| {
                    serde_json::to_value(table).map_err(|e| {
                        FormatError::config(path, format!("TOML to JSON conversion failed: {e}"))
                    })
                })
                .transpose()?
        };

        let section = section.ok_or_else(|| {
            FormatError::config(
                path,
                format!("missing `{TOML_TABLE}` table or `{PACKAGE_FIELD}` field"),
            )
        })?;

        if !section.is_object() {
            return Err(FormatError::config(path, "format options must be a table/object"));
        }

        tracing::debug!("[fob-format] Loaded format config from {}", path.display());
        FormatPluginOptions::from_value(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_no_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let discovery = FormatConfigDiscovery::new(dir.path());
        assert!(discovery.find().unwrap().is_none());
        assert_eq!(discovery.load().unwrap(), FormatPluginOptions::default());
    }

    #[test]
    fn test_fob_toml() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("fob.toml"),
            "[format]\nextensions = [\".js\", \".jsx\"]\nsingleQuote = true\ntabWidth = 4\n",
        )
        .unwrap();

        let options = FormatConfigDiscovery::new(dir.path()).load().unwrap();
        assert_eq!(options.extensions, vec![".js", ".jsx"]);
        assert_eq!(options.formatter.get("singleQuote"), Some(&json!(true)));
        assert_eq!(options.formatter_options().unwrap().tab_width, 4);
    }

    #[test]
    fn test_fob_toml_without_table_falls_through_to_package_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("fob.toml"), "[bundle]\nentry = \"a.js\"\n").unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{ "name": "demo", "fobFormat": { "useTabs": true } }"#,
        )
        .unwrap();

        let discovery = FormatConfigDiscovery::new(dir.path());
        assert_eq!(discovery.find().unwrap(), Some(dir.path().join("package.json")));

        let options = discovery.load().unwrap();
        assert!(options.formatter_options().unwrap().use_tabs);
        assert_eq!(options.extensions, vec![".js"]);
    }

    #[test]
    fn test_package_json_null_field_is_ignored() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), r#"{ "fobFormat": null }"#).unwrap();
        assert!(FormatConfigDiscovery::new(dir.path()).find().unwrap().is_none());
    }

    #[test]
    fn test_non_table_section_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, r#"{ "fobFormat": true }"#).unwrap();

        let err = FormatConfigDiscovery::load_from(&path).unwrap_err();
        assert!(matches!(err, FormatError::Config { .. }));
    }

    #[test]
    fn test_malformed_fob_toml_is_reported() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("fob.toml"),
            "[format]\nsingleQuote = \"yes\"\n[broken",
        )
        .unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{ "fobFormat": { "useTabs": true } }"#,
        )
        .unwrap();

        let discovery = FormatConfigDiscovery::new(dir.path());
        let err = discovery.load().unwrap_err();
        assert!(matches!(err, FormatError::Config { .. }));
        assert!(err.to_string().contains("Invalid TOML syntax"));
        assert!(discovery.find().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fob.toml");
        fs::write(&path, "[format\n").unwrap();

        let err = FormatConfigDiscovery::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid TOML syntax"));
    }
}
