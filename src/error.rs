use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Vector dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Vector input is null or empty")]
    NullInput,

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("No frames found in line")]
    EmptyLine,

    #[error("Invalid averaging size: {0}")]
    InvalidAveragingSize(usize),
}
