//! Rolldown plugin that formats source files in place
//!
//! This plugin hooks Rolldown's `load` stage. Every module whose extension is
//! in the configured allow-list is read from disk, run through the OXC
//! printer and written back to the same path before Rolldown loads it.
//!
//! ## Architecture
//!
//! ```text
//! module id → load() hook → extension allow-list → read → format → write back → Rolldown load
//! ```
//!
//! ## Why the `load` hook?
//!
//! - It runs once per module, with the module's real file path
//! - Returning `None` leaves loading to Rolldown, which then reads the rewritten file
//! - Errors returned from the hook fail the build for that module
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use fob_plugin_format::{FobFormatPlugin, FormatPluginOptions};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = FormatPluginOptions::new()
//!     .with_extensions([".js", ".jsx"])
//!     .with_formatter_option("singleQuote", true);
//!
//! // Add to your Rolldown bundler configuration
//! let plugin = Arc::new(FobFormatPlugin::try_new(options)?);
//! # Ok(())
//! # }
//! ```

use anyhow::Context;
use rolldown_plugin::{HookLoadArgs, HookLoadReturn, Plugin, PluginContext};
use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

mod config;
mod discovery;
mod error;
mod formatter;

pub use config::{FormatPluginOptions, DEFAULT_EXTENSION};
pub use discovery::FormatConfigDiscovery;
pub use error::{FormatError, Result};
pub use formatter::{format_source, FormatterOptions};

/// Rolldown plugin that rewrites matching source files with the formatter
///
/// The plugin only holds immutable configuration, so concurrent `load` calls
/// for different modules don't interact.
#[derive(Debug, Clone, Default)]
pub struct FobFormatPlugin {
    options: FormatPluginOptions,
}

/// What happened to a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Extension not in the allow-list, a dependency, or not a file on disk
    Skipped,
    /// Already formatted; nothing written
    Unchanged,
    /// Formatted output written back
    Rewritten,
}

impl FobFormatPlugin {
    /// Create a plugin that formats `.js` files with default formatter options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a plugin with custom options
    ///
    /// Invalid options are reported when the first matching file is loaded,
    /// which fails the build. Use [`FobFormatPlugin::try_new`] to check them
    /// up front.
    pub fn with_options(options: FormatPluginOptions) -> Self {
        Self { options }
    }

    /// Create a plugin after validating the options
    ///
    /// # Errors
    ///
    /// Returns an error if a known formatter option has the wrong type or an
    /// extension is empty.
    pub fn try_new(options: FormatPluginOptions) -> Result<Self> {
        options.extension_set()?;
        options.formatter_options()?;
        Ok(Self { options })
    }

    /// Create a plugin from options discovered in `root`
    pub fn from_project(root: impl AsRef<Path>) -> Result<Self> {
        Self::try_new(FormatConfigDiscovery::new(root).load()?)
    }

    /// The options this plugin was built with
    pub fn options(&self) -> &FormatPluginOptions {
        &self.options
    }

    /// Format the file at `id` in place if its extension is allowed
    pub async fn process_file(&self, id: &str) -> Result<FileOutcome> {
        process_file(&self.options, id).await
    }
}

async fn process_file(options: &FormatPluginOptions, id: &str) -> Result<FileOutcome> {
    // Virtual modules have no file behind them
    if id.starts_with('\0') {
        return Ok(FileOutcome::Skipped);
    }

    // Installed dependencies are not the project's sources
    if is_dependency(id) {
        tracing::trace!("[fob-format] Skipping dependency {}", id);
        return Ok(FileOutcome::Skipped);
    }

    let extensions = options.extension_set()?;
    if !config::has_allowed_extension(&extensions, id) {
        tracing::trace!("[fob-format] Skipping {}", id);
        return Ok(FileOutcome::Skipped);
    }

    let formatter_options = options.formatter_options()?;
    let path = PathBuf::from(id);

    let source = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| FormatError::read(&path, e))?;

    let formatted = format_source(&path, &source, &formatter_options)?;

    if formatted == source {
        tracing::debug!("[fob-format] {} already formatted", id);
        return Ok(FileOutcome::Unchanged);
    }

    tokio::fs::write(&path, &formatted)
        .await
        .map_err(|e| FormatError::write(&path, e))?;

    tracing::info!(
        "[fob-format] Formatted {} ({} → {} bytes)",
        id,
        source.len(),
        formatted.len()
    );

    Ok(FileOutcome::Rewritten)
}

fn is_dependency(id: &str) -> bool {
    Path::new(id)
        .components()
        .any(|c| matches!(c, Component::Normal(name) if name == "node_modules"))
}

impl Plugin for FobFormatPlugin {
    /// Returns the plugin name for debugging and logging
    fn name(&self) -> Cow<'static, str> {
        "fob-format".into()
    }

    /// Declare which hooks this plugin uses
    fn register_hook_usage(&self) -> rolldown_plugin::HookUsage {
        use rolldown_plugin::HookUsage;
        HookUsage::Load
    }

    /// Load hook - formats matching files in place
    ///
    /// # Returns
    ///
    /// - `Ok(None)` - always on success; Rolldown loads the (possibly rewritten) file
    /// - `Err(e)` - invalid options, unparsable source, output that would drop
    ///   comments, or an I/O failure
    fn load(
        &self,
        _ctx: &PluginContext,
        args: &HookLoadArgs<'_>,
    ) -> impl std::future::Future<Output = HookLoadReturn> + Send {
        let id = args.id.to_string();
        let options = self.options.clone();

        async move {
            process_file(&options, &id)
                .await
                .with_context(|| format!("[fob-format] Failed to format {}", id))?;
            Ok(None)
        }
    }
}
