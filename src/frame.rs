use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::finger::Finger;
use crate::palm::Palm;
use crate::types::{FRAME_GROUPS, NUM_FINGERS};
use crate::vector_math::{distance, midpoint};

/// Pareja de dedos cuyo punto medio mcp forma el triángulo del spread triangular.
///
/// `Legacy` toma los dedos `i` e `i + i`, lo que reproduce los datos de
/// entrenamiento históricos. `Adjacent` toma `i` e `i + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TriSpreadPairing {
    #[default]
    Legacy,
    Adjacent,
}

impl TriSpreadPairing {
    fn partner(self, i: usize) -> usize {
        match self {
            TriSpreadPairing::Legacy => i + i,
            TriSpreadPairing::Adjacent => i + 1,
        }
    }
}

/// Una instantánea de la palma y los cinco dedos
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Siempre en orden de parseo, nunca se reordena
    pub fingers: [Finger; NUM_FINGERS],
    pub palm: Palm,
    pub sign: char,
    pub average_distance: f64,
    pub average_spread: f64,
    pub average_triangular_spread: f64,
}

fn same_rank(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Elimina paréntesis y punto y coma, separa por comas y parsea cada valor.
pub fn parse_data_string(data: &str) -> Result<Vec<f64>, ParseError> {
    let cleaned: String = data
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | ';'))
        .collect();

    cleaned
        .split(',')
        .map(|token| {
            let token = token.trim();
            token.parse::<f64>().map_err(|_| {
                ParseError::MalformedRecord(format!("invalid number {:?}", token))
            })
        })
        .collect()
}

impl Frame {
    /// Construye un frame desde su texto: 11 grupos separados por ';'
    /// (palma + 2 grupos por dedo).
    pub fn parse(segment: &str, sign: char) -> Result<Self, ParseError> {
        let groups: Vec<&str> = segment
            .split(';')
            .filter(|group| !group.trim().is_empty())
            .collect();

        if groups.len() != FRAME_GROUPS {
            return Err(ParseError::MalformedRecord(format!(
                "frame expects {} groups, got {}",
                FRAME_GROUPS,
                groups.len()
            )));
        }

        let palm = Palm::from_values(&parse_data_string(groups[0])?)?;

        let fingers: Vec<Finger> = (0..NUM_FINGERS)
            .map(|i| {
                let joined = format!("{},{}", groups[1 + 2 * i], groups[2 + 2 * i]);
                let values = parse_data_string(&joined)?;
                Finger::from_values(i, &values, &palm.position, &palm.normal)
            })
            .collect::<Result<_, _>>()?;

        let fingers: [Finger; NUM_FINGERS] = fingers
            .try_into()
            .map_err(|_| ParseError::MalformedRecord("frame must have 5 fingers".to_string()))?;

        let mut frame = Self {
            fingers,
            palm,
            sign,
            average_distance: 0.0,
            average_spread: 0.0,
            average_triangular_spread: 0.0,
        };
        frame.order_fingers();
        Ok(frame)
    }

    /// Asigna a cada dedo su rango según la coordenada x de la articulación pip.
    /// Dedos con la misma x exacta comparten rango; el siguiente valor distinto
    /// toma el rango siguiente. Un NaN va antes que cualquier número.
    pub fn order_fingers(&mut self) {
        let mut ranked: Vec<f64> = self.fingers.iter().map(|f| f.pip_position[0]).collect();
        ranked.sort_by(|a, b| a.partial_cmp(b).unwrap_or_else(|| b.is_nan().cmp(&a.is_nan())));
        ranked.dedup_by(|a, b| same_rank(*a, *b));

        for finger in self.fingers.iter_mut() {
            let x = finger.pip_position[0];
            if let Some(rank) = ranked.iter().position(|&value| same_rank(value, x)) {
                finger.order = (rank + 1) as f64;
            }
        }
    }

    /// Separación entre dedos: suma de distancias tip, dip, mcp y pip entre
    /// los pares (0,1), (1,2) y (2,3)
    pub fn spread(&self) -> Result<f64, ParseError> {
        let mut spread = 0.0;
        for i in 0..3 {
            let (a, b) = (&self.fingers[i], &self.fingers[i + 1]);
            spread += distance(&a.tip_position, &b.tip_position)?
                + distance(&a.dip_position, &b.dip_position)?
                + distance(&a.mcp_position, &b.mcp_position)?
                + distance(&a.pip_position, &b.pip_position)?;
        }
        Ok(spread)
    }

    /// Suma de áreas (Heron) de los triángulos formados por las puntas de dos
    /// dedos vecinos y el punto medio de sus metacarpos. Áreas no finitas se omiten.
    pub fn triangular_spread(&self, pairing: TriSpreadPairing) -> Result<f64, ParseError> {
        let mut spread = 0.0;
        for i in 0..3 {
            let first = &self.fingers[i];
            let next = &self.fingers[i + 1];
            let middle_mcp = midpoint(
                &first.mcp_position,
                &self.fingers[pairing.partner(i)].mcp_position,
            )?;

            let a = distance(&first.tip_position, &next.tip_position)?;
            let b = distance(&first.tip_position, &middle_mcp)?;
            let c = distance(&next.tip_position, &middle_mcp)?;

            let s = (a + b + c) / 2.0;
            let area = (s * (s - a) * (s - b) * (s - c)).sqrt();

            if area.is_finite() {
                spread += area;
            }
        }
        Ok(spread)
    }
}
