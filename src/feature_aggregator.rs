//! Features de línea completa y promediado temporal de frames

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ParseError;
use crate::finger::Finger;
use crate::frame::{Frame, TriSpreadPairing};
use crate::palm::Palm;
use crate::types::NUM_FINGERS;
use crate::vector_math::distance;

/// Campo escalar con nombre que participa en el promediado temporal
pub struct ScalarField<T> {
    pub name: &'static str,
    pub get: fn(&T) -> f64,
    pub set: fn(&mut T, f64),
}

/// Entidades cuyos campos escalares se promedian entre frames.
/// Los campos vectoriales nunca se promedian.
pub trait Averageable: Sized + 'static {
    fn scalar_fields() -> &'static [ScalarField<Self>];
}

const FINGER_SCALARS: &[ScalarField<Finger>] = &[
    ScalarField {
        name: "length",
        get: |f| f.length,
        set: |f, v| f.length = v,
    },
    ScalarField {
        name: "distance_from_palm_center",
        get: |f| f.distance_from_palm_center,
        set: |f, v| f.distance_from_palm_center = v,
    },
    ScalarField {
        name: "dip_tip_projection",
        get: |f| f.dip_tip_projection,
        set: |f, v| f.dip_tip_projection = v,
    },
    ScalarField {
        name: "pip_dip_projection",
        get: |f| f.pip_dip_projection,
        set: |f, v| f.pip_dip_projection = v,
    },
    ScalarField {
        name: "mcp_pip_projection",
        get: |f| f.mcp_pip_projection,
        set: |f, v| f.mcp_pip_projection = v,
    },
    ScalarField {
        name: "order",
        get: |f| f.order,
        set: |f, v| f.order = v,
    },
    ScalarField {
        name: "angle",
        get: |f| f.angle,
        set: |f, v| f.angle = v,
    },
];

const PALM_SCALARS: &[ScalarField<Palm>] = &[
    ScalarField {
        name: "confidence",
        get: |p| p.confidence,
        set: |p, v| p.confidence = v,
    },
    ScalarField {
        name: "pinch_strength",
        get: |p| p.pinch_strength,
        set: |p, v| p.pinch_strength = v,
    },
    ScalarField {
        name: "grab_strength",
        get: |p| p.grab_strength,
        set: |p, v| p.grab_strength = v,
    },
    ScalarField {
        name: "sphere_radius",
        get: |p| p.sphere_radius,
        set: |p, v| p.sphere_radius = v,
    },
    ScalarField {
        name: "tilt_angle",
        get: |p| p.tilt_angle,
        set: |p, v| p.tilt_angle = v,
    },
];

impl Averageable for Finger {
    fn scalar_fields() -> &'static [ScalarField<Self>] {
        FINGER_SCALARS
    }
}

impl Averageable for Palm {
    fn scalar_fields() -> &'static [ScalarField<Self>] {
        PALM_SCALARS
    }
}

/// Escribe en `target` la media de cada campo escalar de `items`
fn mean_into<'a, T: Averageable>(target: &mut T, items: impl Iterator<Item = &'a T> + Clone) {
    for field in T::scalar_fields() {
        let (sum, count) = items
            .clone()
            .fold((0.0, 0usize), |(sum, count), item| (sum + (field.get)(item), count + 1));
        if count > 0 {
            (field.set)(target, sum / count as f64);
        }
    }
}

fn mean_or_zero(values: &[f64]) -> f64 {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    if mean.is_nan() {
        0.0
    } else {
        mean
    }
}

/// Opciones de las features de línea
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorOptions {
    pub tri_spread_pairing: TriSpreadPairing,
    /// Sustituye el orden de cada dedo por su media en toda la línea
    pub line_order_averaging: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FeatureAggregator {
    options: AggregatorOptions,
}

impl FeatureAggregator {
    pub fn new(options: AggregatorOptions) -> Self {
        Self { options }
    }

    /// Calcula las medias de distancia, spread y spread triangular de toda la
    /// línea y las copia en cada frame. Un NaN (menos de 2 frames) se guarda como 0.0.
    pub fn compute_line_features(&self, frames: &mut [Frame]) -> Result<(), ParseError> {
        let average_distance = mean_or_zero(&Self::tip_travel_distances(frames)?);

        let spreads = frames
            .iter()
            .map(Frame::spread)
            .collect::<Result<Vec<_>, _>>()?;
        let average_spread = mean_or_zero(&spreads);

        let tri_spreads = frames
            .iter()
            .map(|frame| frame.triangular_spread(self.options.tri_spread_pairing))
            .collect::<Result<Vec<_>, _>>()?;
        let average_triangular_spread = mean_or_zero(&tri_spreads);

        for frame in frames.iter_mut() {
            frame.average_distance = average_distance;
            frame.average_spread = average_spread;
            frame.average_triangular_spread = average_triangular_spread;
        }

        if self.options.line_order_averaging {
            Self::average_finger_order(frames);
        }

        debug!(
            frames = frames.len(),
            average_distance, average_spread, average_triangular_spread, "features de línea"
        );
        Ok(())
    }

    /// Distancias recorridas por la punta de cada dedo entre frames consecutivos
    fn tip_travel_distances(frames: &[Frame]) -> Result<Vec<f64>, ParseError> {
        let mut distances = Vec::with_capacity(frames.len().saturating_sub(1) * NUM_FINGERS);
        for pair in frames.windows(2) {
            for (current, next) in pair[0].fingers.iter().zip(&pair[1].fingers) {
                distances.push(distance(&current.tip_position, &next.tip_position)?);
            }
        }
        Ok(distances)
    }

    /// Media del orden de cada dedo (por posición de parseo) en todos los frames
    pub fn average_finger_order(frames: &mut [Frame]) {
        if frames.is_empty() {
            return;
        }

        let mut orders = [0.0; NUM_FINGERS];
        for frame in frames.iter() {
            for (sum, finger) in orders.iter_mut().zip(&frame.fingers) {
                *sum += finger.order;
            }
        }
        let count = frames.len() as f64;

        for frame in frames.iter_mut() {
            for (finger, sum) in frame.fingers.iter_mut().zip(&orders) {
                finger.order = sum / count;
            }
        }
    }

    /// Agrupa tramos contiguos con el mismo signo en bloques de `averaging_size`
    /// frames (el último puede ser menor) y reduce cada bloque a un frame.
    pub fn average_frames(
        &self,
        frames: Vec<Frame>,
        averaging_size: usize,
    ) -> Result<Vec<Frame>, ParseError> {
        if averaging_size == 0 {
            return Err(ParseError::InvalidAveragingSize(averaging_size));
        }

        let averaged: Vec<Frame> = frames
            .chunk_by(|a, b| a.sign == b.sign)
            .flat_map(|run| run.chunks(averaging_size))
            .map(average_chunk)
            .collect();

        debug!(
            input = frames.len(),
            output = averaged.len(),
            averaging_size,
            "promediado temporal"
        );
        Ok(averaged)
    }
}

/// Réplica del primer frame con cada campo escalar promediado en el bloque.
/// Posiciones y vectores se quedan con los valores del primer frame.
fn average_chunk(chunk: &[Frame]) -> Frame {
    let mut averaged = chunk[0].clone();

    for i in 0..NUM_FINGERS {
        mean_into(&mut averaged.fingers[i], chunk.iter().map(|frame| &frame.fingers[i]));
    }
    mean_into(&mut averaged.palm, chunk.iter().map(|frame| &frame.palm));

    averaged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{frame_text, hand_values, palm_values};

    fn frames(count: usize, sign: char) -> Vec<Frame> {
        (0..count)
            .map(|i| {
                let mut palm = palm_values();
                palm[13] = i as f64 * 0.05; // pinch
                palm[14] = 1.0 - i as f64 * 0.05; // grab
                let text = frame_text(&palm, &hand_values(i as f64 * 3.0));
                Frame::parse(&text, sign).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_single_frame_distance_is_zero() {
        let mut single = frames(1, 'A');
        FeatureAggregator::default()
            .compute_line_features(&mut single)
            .unwrap();

        assert_eq!(single[0].average_distance, 0.0);
        assert!(single[0].average_spread > 0.0);
    }

    #[test]
    fn test_empty_line_features_are_noop() {
        let mut none: Vec<Frame> = Vec::new();
        FeatureAggregator::default()
            .compute_line_features(&mut none)
            .unwrap();
    }

    #[test]
    fn test_average_distance_of_uniform_motion() {
        // Cada punta avanza (3, 3, 0) entre frames
        let mut moving = frames(4, 'A');
        FeatureAggregator::default()
            .compute_line_features(&mut moving)
            .unwrap();

        let expected = (18.0f64).sqrt();
        for frame in &moving {
            assert!((frame.average_distance - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_line_averages_are_broadcast() {
        let mut line = frames(6, 'C');
        FeatureAggregator::default()
            .compute_line_features(&mut line)
            .unwrap();

        let spreads: Vec<f64> = line.iter().map(|f| f.spread().unwrap()).collect();
        let expected = spreads.iter().sum::<f64>() / spreads.len() as f64;
        for frame in &line {
            assert_eq!(frame.average_spread, line[0].average_spread);
            assert_eq!(frame.average_triangular_spread, line[0].average_triangular_spread);
            assert!((frame.average_spread - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_line_order_averaging() {
        let mut line = frames(2, 'A');
        line[1].fingers[0].order = 2.0;
        line[1].fingers[1].order = 1.0;

        let aggregator = FeatureAggregator::new(AggregatorOptions {
            line_order_averaging: true,
            ..Default::default()
        });
        aggregator.compute_line_features(&mut line).unwrap();

        for frame in &line {
            assert_eq!(frame.fingers[0].order, 1.5);
            assert_eq!(frame.fingers[1].order, 1.5);
            assert_eq!(frame.fingers[4].order, 5.0);
        }
    }

    #[test]
    fn test_average_frames_sizes() {
        let input = frames(12, 'A');
        let averaged = FeatureAggregator::default()
            .average_frames(input.clone(), 5)
            .unwrap();

        assert_eq!(averaged.len(), 3);

        let chunk_bounds = [(0, 5), (5, 10), (10, 12)];
        for (out, &(start, end)) in averaged.iter().zip(&chunk_bounds) {
            let chunk = &input[start..end];
            let n = chunk.len() as f64;

            for i in 0..NUM_FINGERS {
                for field in Finger::scalar_fields() {
                    let mean = chunk.iter().map(|f| (field.get)(&f.fingers[i])).sum::<f64>() / n;
                    let actual = (field.get)(&out.fingers[i]);
                    assert!((actual - mean).abs() < 1e-9, "{}: {} vs {}", field.name, actual, mean);
                }
            }
            for field in Palm::scalar_fields() {
                let mean = chunk.iter().map(|f| (field.get)(&f.palm)).sum::<f64>() / n;
                assert!(((field.get)(&out.palm) - mean).abs() < 1e-9);
            }

            // Los vectores son los del primer frame del bloque
            assert_eq!(out.fingers[0].tip_position, chunk[0].fingers[0].tip_position);
            assert_eq!(out.palm.position, chunk[0].palm.position);
        }
    }

    #[test]
    fn test_average_frames_splits_sign_runs() {
        let mut input = frames(3, 'A');
        input.extend(frames(4, 'B'));
        input.extend(frames(2, 'A'));

        let averaged = FeatureAggregator::default()
            .average_frames(input, 3)
            .unwrap();
        let signs: Vec<char> = averaged.iter().map(|f| f.sign).collect();
        assert_eq!(signs, vec!['A', 'B', 'B', 'A']);
    }

    #[test]
    fn test_average_frames_rejects_zero_size() {
        let err = FeatureAggregator::default()
            .average_frames(frames(2, 'A'), 0)
            .unwrap_err();
        assert_eq!(err, ParseError::InvalidAveragingSize(0));
    }
}
