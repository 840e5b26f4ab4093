use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ParseError;
use crate::feature_aggregator::{AggregatorOptions, FeatureAggregator};
use crate::frame::{Frame, TriSpreadPairing};
use crate::types::{DEFAULT_AVERAGING_SIZE, FRAME_PATTERN};

/// Opciones de parseo de una línea
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Frames por bloque en el promediado temporal (default: 5)
    pub averaging_size: usize,
    /// Activa el promediado temporal (default: false)
    pub average_frames: bool,
    /// Pareja de dedos del spread triangular (default: legacy)
    pub tri_spread_pairing: TriSpreadPairing,
    /// Media del orden de cada dedo en toda la línea (default: false)
    pub line_order_averaging: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            averaging_size: DEFAULT_AVERAGING_SIZE,
            average_frames: false,
            tri_spread_pairing: TriSpreadPairing::default(),
            line_order_averaging: false,
        }
    }
}

fn frame_regex() -> &'static Regex {
    static FRAME_REGEX: OnceLock<Regex> = OnceLock::new();
    FRAME_REGEX.get_or_init(|| Regex::new(FRAME_PATTERN).expect("valid frame regex"))
}

/// Parser de líneas crudas del sensor
#[derive(Debug, Clone)]
pub struct LineParser {
    options: ParseOptions,
    aggregator: FeatureAggregator,
}

impl LineParser {
    pub fn new(options: ParseOptions) -> Self {
        let aggregator = FeatureAggregator::new(AggregatorOptions {
            tri_spread_pairing: options.tri_spread_pairing,
            line_order_averaging: options.line_order_averaging,
        });
        Self { options, aggregator }
    }

    /// Separa la línea en el texto de cada frame (sin el " . " final)
    pub fn split_frames(raw_line: &str) -> Vec<&str> {
        frame_regex()
            .find_iter(raw_line)
            .map(|m| m.as_str().trim_end_matches(['.', ' ']))
            .collect()
    }

    /// Parsea una línea completa: construye cada frame, calcula las features
    /// de línea y opcionalmente promedia bloques de frames.
    pub fn parse(&self, raw_line: &str) -> Result<Vec<Frame>, ParseError> {
        let sign = raw_line.chars().last().ok_or(ParseError::EmptyLine)?;

        let segments = Self::split_frames(raw_line);
        if segments.is_empty() {
            return Err(ParseError::EmptyLine);
        }

        let mut frames = segments
            .into_iter()
            .map(|segment| Frame::parse(segment, sign))
            .collect::<Result<Vec<_>, _>>()?;

        self.aggregator.compute_line_features(&mut frames)?;
        debug!(sign = %sign, frames = frames.len(), "línea parseada");

        if self.options.average_frames {
            return self
                .aggregator
                .average_frames(frames, self.options.averaging_size);
        }

        Ok(frames)
    }
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

/// Atajo con las opciones por defecto salvo el promediado temporal
pub fn parse_line(
    raw_line: &str,
    averaging_size: usize,
    average_frames: bool,
) -> Result<Vec<Frame>, ParseError> {
    LineParser::new(ParseOptions {
        averaging_size,
        average_frames,
        ..Default::default()
    })
    .parse(raw_line)
}
