//! Structured error types for the Folio rendering engine.
//!
//! Only conditions that stop a conversion are errors. A malformed token
//! stream or a degenerate block is recovered during layout and logged.

use thiserror::Error;

/// The unified error type returned by all public Folio API functions.
#[derive(Debug, Error)]
pub enum FolioError {
    /// Nothing to render. Checked before the engine is invoked.
    #[error("No content provided")]
    EmptyInput,

    /// The theme describes a page with no printable region.
    #[error("Invalid theme: {0}")]
    InvalidTheme(String),

    /// A JSON document or theme failed to parse.
    #[error("Failed to parse JSON: {source}{}", hint_suffix(.hint))]
    Parse {
        source: serde_json::Error,
        hint: String,
    },

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the expected schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        FolioError::Parse { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_carries_hint() {
        let err: FolioError = serde_json::from_str::<serde_json::Value>("{\"a\": 1,}")
            .unwrap_err()
            .into();
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to parse JSON"));
        assert!(msg.contains("trailing commas"));
    }

    #[test]
    fn empty_input_message() {
        assert_eq!(FolioError::EmptyInput.to_string(), "No content provided");
    }
}
