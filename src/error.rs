//! Error types for the parts of the crate that have a genuinely fallible
//! surface (principally the unified-diff parser).
//!
//! Everything else in this crate is a total function of its inputs: the
//! three line-diff engines, the hunker, the word-diff engine, the move
//! detector and the semantic differ never fail.

use thiserror::Error;

/// Errors produced by `diffcore`.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DiffError {
    /// The unified-diff parser encountered a line it could not interpret.
    #[error("invalid unified diff at line {line}: {message}")]
    UnifiedDiff {
        /// 1-based line number in the input text where parsing failed.
        line: usize,
        /// Human-readable description of what was expected.
        message: String,
    },

    /// A configuration value was out of its valid range.
    #[error("invalid option `{option}`: {message}")]
    InvalidOption {
        /// Name of the offending option.
        option: &'static str,
        /// Human-readable description of the problem.
        message: String,
    },
}

/// Convenience alias used throughout the crate's fallible APIs.
pub type Result<T> = std::result::Result<T, DiffError>;
