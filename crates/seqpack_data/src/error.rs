//! Error types for seqpack_data.

use thiserror::Error;

use crate::value::SequenceSide;

/// Result type alias using [`DataError`].
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while packing sequence records.
#[derive(Error, Debug)]
pub enum DataError {
    /// Alignment mode name is not one of the supported modes.
    #[error("Unsupported alignment mode: {0}")]
    UnsupportedMode(String),

    /// A feature or label sequence has no steps.
    #[error("{side} sequence is empty")]
    EmptySequence {
        /// The side that was empty.
        side: SequenceSide,
    },

    /// A step does not carry the expected number of values.
    #[error("{side} step {step} has {got} values, expected {expected}")]
    MalformedStep {
        /// The side the step belongs to.
        side: SequenceSide,
        /// Time index of the step.
        step: usize,
        /// Expected number of values.
        expected: usize,
        /// Actual number of values.
        got: usize,
    },

    /// Index out of bounds.
    #[error("Index {index} out of bounds for length {length}")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The length of the collection.
        length: usize,
    },

    /// A raw value could not be converted to a number.
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// A class label is not a valid class index.
    #[error("Invalid label: {0}")]
    InvalidLabel(String),

    /// Feature and label lengths differ under equal-length alignment.
    #[error("Length mismatch: {features} feature steps vs {labels} label steps under EQUAL_LENGTH alignment")]
    LengthMismatch {
        /// Number of feature steps.
        features: usize,
        /// Number of label steps.
        labels: usize,
    },

    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A dataset pre-processor failed.
    #[error("Pre-processing error: {0}")]
    PreProcess(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Core error.
    #[error("Core error: {0}")]
    CoreError(#[from] seqpack_core::CoreError),
}

impl DataError {
    /// Check whether this error was caused by the example's data rather than
    /// by configuration or a failing hook.
    ///
    /// Data errors are local to one example; callers packing many examples
    /// typically skip them and keep going.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::EmptySequence { .. }
                | Self::MalformedStep { .. }
                | Self::IndexOutOfBounds { .. }
                | Self::Conversion(_)
                | Self::InvalidLabel(_)
                | Self::LengthMismatch { .. }
                | Self::InvalidInput(_)
        )
    }
}
