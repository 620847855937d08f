//! Error types shared by the engine and the scenario loader.

use thiserror::Error;

/// The single failure kind of every tariff calculation.
///
/// Raised eagerly, before any computation, so a failing call never produces a
/// partial result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid input: {reason}")]
pub struct InvalidInputError {
    /// Human-readable description of the rejected input.
    pub reason: String,
}

impl InvalidInputError {
    /// Creates an error with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"tariff.slabs[2].rate"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Why a scenario could not be turned into a report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunError {
    /// One or more configuration fields are invalid.
    #[error("{}", join_config_errors(.0))]
    Config(Vec<ConfigError>),
    /// Neither the scenario nor the caller supplied a bill amount.
    #[error("no bill amount given (set billing.total_bill or pass --bill)")]
    MissingBill,
    #[error(transparent)]
    Invalid(#[from] InvalidInputError),
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        Self::Config(vec![e])
    }
}

fn join_config_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Fails with `InvalidInputError` unless `value` is finite and `>= 0`.
pub(crate) fn ensure_non_negative(value: f64, what: &str) -> Result<(), InvalidInputError> {
    if !value.is_finite() {
        return Err(InvalidInputError::new(format!(
            "{what} must be a finite number, got {value}"
        )));
    }
    if value < 0.0 {
        return Err(InvalidInputError::new(format!(
            "{what} must be >= 0, got {value}"
        )));
    }
    Ok(())
}
