//! Registro plano de features que se exporta por cada frame.
//!
//! El orden de las columnas es fijo y `Sign` siempre va al final:
//! los scripts de entrenamiento leen la clase de la última columna.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::frame::Frame;
use crate::types::NUM_FINGERS;

/// Features exportadas de un dedo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerFeatures {
    pub extended_distance: f64,
    pub dip_tip_projection: f64,
    pub order: f64,
    pub angle: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    /// En orden de parseo (Finger1..Finger5)
    pub fingers: [FingerFeatures; NUM_FINGERS],
    pub palm_grab_strength: f64,
    pub palm_pinch_strength: f64,
    pub average_distance: f64,
    pub average_spread: f64,
    pub average_tri_spread: f64,
    pub sign: char,
}

const FINGER_COLUMNS: [&str; 4] = ["ExtendedDistance", "DipTipProjection", "OrderX", "Angle"];
const FRAME_COLUMNS: [&str; 5] = [
    "PalmGrabStrength",
    "PalmPinchStrength",
    "AverageDistance",
    "AverageSpread",
    "AverageTriSpread",
];
pub const SIGN_COLUMN: &str = "Sign";

impl From<&Frame> for FeatureRecord {
    fn from(frame: &Frame) -> Self {
        let fingers = frame.fingers.each_ref().map(|finger| FingerFeatures {
            extended_distance: finger.distance_from_palm_center,
            dip_tip_projection: finger.dip_tip_projection,
            order: finger.order,
            angle: finger.angle,
        });

        Self {
            fingers,
            palm_grab_strength: frame.palm.grab_strength,
            palm_pinch_strength: frame.palm.pinch_strength,
            average_distance: frame.average_distance,
            average_spread: frame.average_spread,
            average_tri_spread: frame.average_triangular_spread,
            sign: frame.sign,
        }
    }
}

impl FeatureRecord {
    /// Nombres de las columnas numéricas (sin `Sign`)
    pub fn feature_names() -> Vec<String> {
        let mut names =
            Vec::with_capacity(NUM_FINGERS * FINGER_COLUMNS.len() + FRAME_COLUMNS.len());
        for finger in 1..=NUM_FINGERS {
            for column in FINGER_COLUMNS {
                names.push(format!("Finger{}{}", finger, column));
            }
        }
        names.extend(FRAME_COLUMNS.iter().map(|c| c.to_string()));
        names
    }

    /// Cabecera completa, con `Sign` al final
    pub fn header() -> Vec<String> {
        let mut header = Self::feature_names();
        header.push(SIGN_COLUMN.to_string());
        header
    }

    /// Valores numéricos en el mismo orden que `feature_names`
    pub fn values(&self) -> Vec<f64> {
        let mut values =
            Vec::with_capacity(NUM_FINGERS * FINGER_COLUMNS.len() + FRAME_COLUMNS.len());
        for finger in &self.fingers {
            values.extend([
                finger.extended_distance,
                finger.dip_tip_projection,
                finger.order,
                finger.angle,
            ]);
        }
        values.extend([
            self.palm_grab_strength,
            self.palm_pinch_strength,
            self.average_distance,
            self.average_spread,
            self.average_tri_spread,
        ]);
        values
    }

    /// Fila de texto para CSV
    pub fn to_row(&self) -> Vec<String> {
        let mut row: Vec<String> = self.values().iter().map(|v| v.to_string()).collect();
        row.push(self.sign.to_string());
        row
    }
}

impl Serialize for FeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let names = Self::feature_names();
        let mut map = serializer.serialize_map(Some(names.len() + 1))?;
        for (name, value) in names.iter().zip(self.values()) {
            map.serialize_entry(name, &value)?;
        }
        map.serialize_entry(SIGN_COLUMN, &self.sign)?;
        map.end()
    }
}
