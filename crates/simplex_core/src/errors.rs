//! Error Types
//!
//! This module defines the error types used throughout the solver.
//!
//! # Overview
//!
//! The main error type [`SimplexError`] covers every failure that can happen
//! while turning a scene definition into solver topology:
//! - JSON syntax errors (with the byte offset of the failure)
//! - Sections that don't match the shape required by their encoding version
//! - Cross-references to shapes, progressions or controllers that don't exist
//!
//! Evaluation itself never fails, so nothing on the `solve` path returns
//! these errors.
//!
//! # Usage
//!
//! All fallible APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, SimplexError>`.
//!
//! ```rust,ignore
//! use simplex::{Result, Solver};
//!
//! fn load(solver: &mut Solver, json: &str) -> Result<()> {
//!     solver.parse_json(json)?;
//!     solver.build();
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the Simplex solver.
#[derive(Error, Debug)]
pub enum SimplexError {
    // ========================================================================
    // Syntax Errors
    // ========================================================================
    /// The definition is not valid JSON.
    #[error("JSON syntax error at byte {offset}: {message}")]
    JsonSyntax {
        /// Human readable parser message
        message: String,
        /// Byte offset into the definition where parsing failed
        offset: usize,
    },

    // ========================================================================
    // Structural Errors
    // ========================================================================
    /// A section is valid JSON but doesn't have the required layout.
    #[error("JSON structure error: {0}")]
    Json(#[from] serde_json::Error),

    /// The definition is missing a required section or is otherwise unusable.
    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),

    /// A cross-reference points past the end of the referenced list.
    #[error("Index out of bounds: {context} (index: {index})")]
    IndexOutOfBounds {
        /// Description of what was being referenced
        context: String,
        /// The invalid index
        index: usize,
    },

    /// The `encodingVersion` field names a dialect this crate can't read.
    #[error("Unsupported encoding version: {0}")]
    UnsupportedEncoding(u64),
}

impl SimplexError {
    /// Shorthand for building an [`SimplexError::IndexOutOfBounds`].
    pub fn out_of_bounds(context: impl Into<String>, index: usize) -> Self {
        SimplexError::IndexOutOfBounds {
            context: context.into(),
            index,
        }
    }

    /// Converts a serde_json syntax error into a [`SimplexError::JsonSyntax`]
    /// carrying a byte offset into `source`.
    ///
    /// serde_json reports 1-based line/column pairs, hosts expect the flat
    /// offset, so the position is re-derived by walking `source`.
    #[must_use]
    pub fn from_syntax(err: &serde_json::Error, source: &str) -> Self {
        SimplexError::JsonSyntax {
            message: err.to_string(),
            offset: byte_offset(source, err.line(), err.column()),
        }
    }
}

fn byte_offset(source: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(source.len())
}

/// Alias for `Result<T, SimplexError>`.
pub type Result<T> = std::result::Result<T, SimplexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_offset_single_line() {
        assert_eq!(byte_offset("{\"a\": ]", 1, 7), 6);
    }

    #[test]
    fn test_byte_offset_multi_line() {
        let src = "{\n  \"a\": 1,\n  ]";
        // line 3 starts after "{\n" and "  \"a\": 1,\n"
        assert_eq!(byte_offset(src, 3, 3), 2 + 10 + 2);
    }

    #[test]
    fn test_syntax_error_has_offset() {
        let src = "{\"shapes\": [}";
        let err = serde_json::from_str::<serde_json::Value>(src).unwrap_err();
        match SimplexError::from_syntax(&err, src) {
            SimplexError::JsonSyntax { offset, .. } => assert!(offset <= src.len()),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
