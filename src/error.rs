//! Error types for CSV tokenizing, reading and writing

use crate::csv::State;
use std::fmt;
use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, CsvError>;

/// Where in the input the tokenizer was when something went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Number of characters consumed before the offending one (0-based)
    pub char_offset: u64,
    /// Byte offset of the offending character in UTF-8 encoded input
    pub byte_offset: u64,
    /// Record number, starting from 1
    pub record: u64,
    /// Field number within the record, starting from 1
    pub field: u64,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field {} of record {} (char {}, byte {})",
            self.field, self.record, self.char_offset, self.byte_offset
        )
    }
}

/// Errors that can occur while parsing or writing CSV
#[derive(Error, Debug)]
pub enum CsvError {
    /// Input ended inside a quoted field
    #[error("Unterminated quoted field: input ended in {state} at {position}")]
    UnterminatedQuotedField { position: Position, state: State },

    /// Content followed a closing quote before the next delimiter or terminator
    #[error(
        "Malformed quoted field: unexpected character {found:?} after closing quote in {position}"
    )]
    MalformedQuotedField {
        position: Position,
        state: State,
        found: char,
    },

    #[error("Invalid dialect: {0}")]
    InvalidDialect(String),

    #[error("Read error: {0}")]
    ReadError(String),

    #[error("Write error: {0}")]
    WriteError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CsvError {
    /// Position of a tokenizer failure, `None` for I/O and configuration errors
    pub fn position(&self) -> Option<Position> {
        match self {
            CsvError::UnterminatedQuotedField { position, .. }
            | CsvError::MalformedQuotedField { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Tokenizer state at the failure, `None` for I/O and configuration errors
    pub fn state(&self) -> Option<State> {
        match self {
            CsvError::UnterminatedQuotedField { state, .. }
            | CsvError::MalformedQuotedField { state, .. } => Some(*state),
            _ => None,
        }
    }
}
