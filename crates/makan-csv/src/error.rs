//! Error types for the makan-csv codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("input has no header row")]
  Empty,

  #[error("line {line}: unterminated quoted field")]
  UnterminatedQuote { line: usize },

  #[error("missing required column {0:?}")]
  MissingColumn(&'static str),

  #[error("line {line}: expected {expected} fields, found {found}")]
  FieldCount {
    line:     usize,
    expected: usize,
    found:    usize,
  },

  #[error("line {line}: invalid {column}: {value:?}")]
  InvalidField {
    line:   usize,
    column: &'static str,
    value:  String,
  },

  #[error("line {line}: {source}")]
  Row {
    line:   usize,
    #[source]
    source: makan_core::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
