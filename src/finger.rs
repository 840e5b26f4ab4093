use crate::error::ParseError;
use crate::types::{vec3, Vector3, FINGER_FIELDS};
use crate::vector_math::{angle_to_plane, difference, distance, projection};

/// Lectura de un dedo en un frame.
///
/// `index` es la posición de parseo (0-4) y fija el nombre de las columnas
/// de salida; `order` es el rango espacial (1-5) que asigna el frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Finger {
    pub index: usize,
    pub direction: Vector3,
    pub length: f64,
    pub tip_position: Vector3,
    pub tip_velocity: Vector3,
    pub dip_position: Vector3,
    pub pip_position: Vector3,
    pub mcp_position: Vector3,
    /// Distancia máxima entre una articulación y el centro de la palma
    pub distance_from_palm_center: f64,
    pub dip_tip_projection: f64,
    pub pip_dip_projection: f64,
    pub mcp_pip_projection: f64,
    pub order: f64,
    pub angle: f64,
}

impl Finger {
    /// Construye un dedo desde 19 valores:
    /// direction[3], length, tip[3], tip_velocity[3], dip[3], pip[3], mcp[3]
    pub fn from_values(
        index: usize,
        values: &[f64],
        palm_position: &Vector3,
        palm_normal: &Vector3,
    ) -> Result<Self, ParseError> {
        if values.len() != FINGER_FIELDS {
            return Err(ParseError::MalformedRecord(format!(
                "finger {} expects {} values, got {}",
                index + 1,
                FINGER_FIELDS,
                values.len()
            )));
        }

        let direction = vec3(values, 0);
        let tip_position = vec3(values, 4);
        let dip_position = vec3(values, 10);
        let pip_position = vec3(values, 13);
        let mcp_position = vec3(values, 16);

        // Punto del dedo más alejado del centro de la palma
        let mut distance_from_palm_center = f64::NEG_INFINITY;
        for joint in [&tip_position, &dip_position, &pip_position, &mcp_position] {
            distance_from_palm_center =
                distance_from_palm_center.max(distance(joint, palm_position)?);
        }

        // Segmentos del dedo proyectados sobre la normal de la palma
        let dip_tip_projection =
            projection(&difference(&dip_position, &tip_position)?, palm_normal)?;
        let pip_dip_projection =
            projection(&difference(&pip_position, &dip_position)?, palm_normal)?;
        let mcp_pip_projection =
            projection(&difference(&mcp_position, &pip_position)?, palm_normal)?;

        Ok(Self {
            index,
            direction,
            length: values[3],
            tip_position,
            tip_velocity: vec3(values, 7),
            dip_position,
            pip_position,
            mcp_position,
            distance_from_palm_center,
            dip_tip_projection,
            pip_dip_projection,
            mcp_pip_projection,
            order: 0.0,
            angle: angle_to_plane(&direction)?,
        })
    }
}
