//! Parser de frames de Leap Motion (palma + 5 dedos) y extracción de
//! features para datos de entrenamiento.

pub mod config;
pub mod error;
pub mod export;
pub mod feature_aggregator;
pub mod feature_record;
pub mod finger;
pub mod frame;
pub mod line_parser;
pub mod line_reader;
pub mod palm;
pub mod types;
pub mod vector_math;

#[cfg(test)]
mod test_support;

pub use error::ParseError;
pub use feature_record::FeatureRecord;
pub use frame::{Frame, TriSpreadPairing};
pub use line_parser::{parse_line, LineParser, ParseOptions};
