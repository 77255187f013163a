//! Error types for the book and its feed collaborators
//!
//! The book core itself never fails; these cover decoding, configuration and
//! the opt-in invariant checks.

use crate::data::{Price, Side};
use thiserror::Error;

/// Main error type for the crate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

/// Parsing-specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Unknown message: {0}")]
    UnknownMessage(String),
}

/// Book states that upstream contract violations can produce
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    #[error("{side} side out of order or duplicated at level {index}: {price}")]
    Unordered { side: Side, index: usize, price: Price },

    #[error("crossed book: best bid {bid} >= best ask {ask}")]
    Crossed { bid: Price, ask: Price },
}

/// Error severity levels
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    Low,    // Bad single message, the stream carries on
    Medium, // Book state is suspect until the next snapshot
    High,   // Cannot start
}

impl ErrorSeverity {
    pub fn from_error(error: &BookError) -> Self {
        match error {
            BookError::Parse(_) => ErrorSeverity::Low,
            BookError::Invariant(_) => ErrorSeverity::Medium,
            BookError::Configuration(_) => ErrorSeverity::High,
        }
    }
}

/// Error reporter for structured logging
pub struct ErrorReporter;

impl ErrorReporter {
    pub fn report_error(error: &BookError, symbol: Option<&str>) {
        let symbol = symbol.unwrap_or("-");

        match ErrorSeverity::from_error(error) {
            ErrorSeverity::High => {
                tracing::error!(symbol, "HIGH SEVERITY: {}", error);
            }
            ErrorSeverity::Medium => {
                tracing::warn!(symbol, "MEDIUM SEVERITY: {}", error);
            }
            ErrorSeverity::Low => {
                tracing::debug!(symbol, "LOW SEVERITY: {}", error);
            }
        }
    }
}
