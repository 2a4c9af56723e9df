//! Error types for the pegfmt pipeline.
//!
//! One [`thiserror::Error`] enum with a variant per failure class named in
//! the design: parse errors are fatal and carry a source position, internal
//! consistency errors indicate an optimizer bug, validation errors are
//! reported but do not block writing the formatted output, and I/O errors
//! wrap [`std::io::Error`].

use crate::position::Position;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PegfmtError {
    #[error("parse error at {position}: expected {expected}, found {found}")]
    Parse {
        position: Position,
        expected: String,
        found: String,
    },

    #[error("internal consistency error: {0}")]
    InternalConsistency(String),

    #[error("packcc rejected the generated output:\n{stderr}")]
    Validation { stderr: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PegfmtError {
    pub fn parse(position: Position, expected: impl Into<String>, found: impl Into<String>) -> Self {
        PegfmtError::Parse {
            position,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PegfmtError::InternalConsistency(message.into())
    }

    /// Whether this error class is fatal to the pipeline (spec §7): every
    /// variant except [`PegfmtError::Validation`] aborts the run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, PegfmtError::Validation { .. })
    }
}

pub type Result<T> = std::result::Result<T, PegfmtError>;
