//! Error types for the format plugin

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FormatError>;

/// Errors that can occur while validating options or rewriting a file
#[derive(Error, Debug, Diagnostic)]
pub enum FormatError {
    /// A known formatter option carries a value of the wrong shape
    #[error("Invalid {key} value. Expected {expected}, but received {received}.")]
    #[diagnostic(
        code(fob::format::invalid_option),
        help("Check the `{key}` entry in your format options")
    )]
    InvalidOption {
        key: String,
        expected: &'static str,
        received: String,
    },

    /// An extension in the allow-list is empty
    #[error("Invalid extension {value:?} in allow-list")]
    #[diagnostic(
        code(fob::format::invalid_extension),
        help("Extensions look like \".js\" or \"jsx\"")
    )]
    InvalidExtension { value: String },

    /// The formatter could not parse the file
    #[error("Failed to parse {}: {}", .path.display(), .messages.join(", "))]
    #[diagnostic(code(fob::format::syntax))]
    Syntax { path: PathBuf, messages: Vec<String> },

    /// The printer's output is missing comments from the source
    #[error("Formatting {} would drop comments: {}", .path.display(), .comments.join(", "))]
    #[diagnostic(
        code(fob::format::comments_dropped),
        help("Move the comment onto its own line, or remove the file's extension from the allow-list")
    )]
    CommentsDropped { path: PathBuf, comments: Vec<String> },

    /// Reading or writing the file failed
    #[error("Failed to {action} {}: {source}", .path.display())]
    #[diagnostic(code(fob::format::io))]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A discovered config file could not be loaded
    #[error("Invalid format config in {}: {message}", .path.display())]
    #[diagnostic(code(fob::format::config))]
    Config { path: PathBuf, message: String },
}

impl FormatError {
    pub fn invalid_option(
        key: impl Into<String>,
        expected: &'static str,
        received: &serde_json::Value,
    ) -> Self {
        Self::InvalidOption {
            key: key.into(),
            expected,
            received: describe_value(received),
        }
    }

    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action: "read",
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action: "write",
            path: path.into(),
            source,
        }
    }

    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Render a JSON value as `<type> <value>` for error messages
fn describe_value(value: &serde_json::Value) -> String {
    use serde_json::Value;

    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string {s:?}"),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invalid_option_message() {
        let err = FormatError::invalid_option("singleQuote", "boolean", &json!("yes"));
        assert_eq!(
            err.to_string(),
            "Invalid singleQuote value. Expected boolean, but received string \"yes\"."
        );
    }

    #[test]
    fn test_describe_value() {
        assert_eq!(describe_value(&json!(null)), "null");
        assert_eq!(describe_value(&json!(3)), "number 3");
        assert_eq!(describe_value(&json!([1])), "array");
        assert_eq!(describe_value(&json!({"a": 1})), "object");
    }

    #[test]
    fn test_io_error_message() {
        let err = FormatError::write(
            "/tmp/a.js",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "Failed to write /tmp/a.js: denied");
    }
}
