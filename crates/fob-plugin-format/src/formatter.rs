//! OXC-backed formatter
//!
//! Formatting is a parse/print round trip: the source is parsed with
//! `oxc_parser` and printed back with `oxc_codegen`, which normalizes
//! whitespace, indentation, quoting and semicolons.
//!
//! ```text
//! source → Parser → Program (AST) → Codegen (FormatterOptions) → formatted source
//! ```

use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions, IndentChar};
use oxc_parser::Parser;
use oxc_span::SourceType;
use serde_json::{Map, Value};
use std::path::Path;

use crate::error::{FormatError, Result};

/// Typed view of the recognised formatter options.
///
/// Built from the pass-through option bag with [`FormatterOptions::from_map`].
/// Keys the formatter doesn't know are ignored so that option bags shared with
/// other tools keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatterOptions {
    /// Prefer single quotes for string literals
    pub single_quote: bool,
    /// Indent with tabs instead of spaces
    pub use_tabs: bool,
    /// Number of indent characters per level
    pub tab_width: usize,
}

impl Default for FormatterOptions {
    fn default() -> Self {
        Self {
            single_quote: false,
            use_tabs: false,
            tab_width: 2,
        }
    }
}

impl FormatterOptions {
    /// Validate a raw option bag.
    ///
    /// `null` is treated like an absent key. Any other value of the wrong
    /// shape for a known key is rejected.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        let mut options = Self::default();

        for (key, value) in map {
            if value.is_null() {
                continue;
            }
            match key.as_str() {
                "singleQuote" => options.single_quote = expect_bool(key, value)?,
                "useTabs" => options.use_tabs = expect_bool(key, value)?,
                "tabWidth" => options.tab_width = expect_width(key, value)?,
                other => tracing::trace!("[fob-format] Ignoring unknown option: {}", other),
            }
        }

        Ok(options)
    }

    fn to_codegen_options(self) -> CodegenOptions {
        CodegenOptions {
            single_quote: self.single_quote,
            indent_char: if self.use_tabs {
                IndentChar::Tab
            } else {
                IndentChar::Space
            },
            indent_width: self.tab_width,
            ..CodegenOptions::default()
        }
    }
}

fn expect_bool(key: &str, value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| FormatError::invalid_option(key, "boolean", value))
}

/// Accepted range for `tabWidth`
const TAB_WIDTH_RANGE: std::ops::RangeInclusive<u64> = 1..=16;

fn expect_width(key: &str, value: &Value) -> Result<usize> {
    value
        .as_u64()
        .filter(|width| TAB_WIDTH_RANGE.contains(width))
        .and_then(|width| usize::try_from(width).ok())
        .ok_or_else(|| FormatError::invalid_option(key, "integer between 1 and 16", value))
}

/// Format `source` as the language implied by `path`'s extension.
///
/// Extensions OXC doesn't recognise are parsed as ES modules.
///
/// # Errors
///
/// Returns [`FormatError::Syntax`] if the source does not parse, and
/// [`FormatError::CommentsDropped`] if the printer lost any comment, so the
/// caller never writes output that deletes source content.
pub fn format_source(path: &Path, source: &str, options: &FormatterOptions) -> Result<String> {
    let allocator = Allocator::default();
    let source_type = SourceType::from_path(path).unwrap_or_else(|_| SourceType::mjs());

    let parsed = Parser::new(&allocator, source, source_type).parse();
    if !parsed.errors.is_empty() {
        return Err(FormatError::Syntax {
            path: path.to_path_buf(),
            messages: parsed.errors.iter().map(|e| e.to_string()).collect(),
        });
    }

    let printed = Codegen::new()
        .with_options(options.to_codegen_options())
        .build(&parsed.program);

    let dropped: Vec<String> = parsed
        .program
        .comments
        .iter()
        .map(|comment| comment.span.source_text(source).trim())
        .filter(|text| !printed.code.contains(text))
        .map(str::to_string)
        .collect();
    if !dropped.is_empty() {
        return Err(FormatError::CommentsDropped {
            path: path.to_path_buf(),
            comments: dropped,
        });
    }

    Ok(printed.code)
}
