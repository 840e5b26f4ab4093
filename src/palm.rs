use crate::error::ParseError;
use crate::types::{vec3, Vector3, PALM_FIELDS};
use crate::vector_math::angle_to_plane;

/// Lectura de la palma en un frame
#[derive(Debug, Clone, PartialEq)]
pub struct Palm {
    pub normal: Vector3,
    pub position: Vector3,
    pub velocity: Vector3,
    pub sphere_center: Vector3,
    pub sphere_radius: f64,
    /// Confianza del sensor, normalmente en [0, 1] (no se valida)
    pub confidence: f64,
    pub pinch_strength: f64,
    pub grab_strength: f64,
    /// Inclinación de la normal respecto al plano x-z (radianes)
    pub tilt_angle: f64,
}

impl Palm {
    /// Construye la palma desde 16 valores:
    /// normal[3], position[3], velocity[3], sphere_center[3],
    /// confidence, pinch, grab, sphere_radius
    pub fn from_values(values: &[f64]) -> Result<Self, ParseError> {
        if values.len() != PALM_FIELDS {
            return Err(ParseError::MalformedRecord(format!(
                "palm expects {} values, got {}",
                PALM_FIELDS,
                values.len()
            )));
        }

        let normal = vec3(values, 0);
        let tilt_angle = angle_to_plane(&normal)?;

        Ok(Self {
            normal,
            position: vec3(values, 3),
            velocity: vec3(values, 6),
            sphere_center: vec3(values, 9),
            confidence: values[12],
            pinch_strength: values[13],
            grab_strength: values[14],
            sphere_radius: values[15],
            tilt_angle,
        })
    }
}
