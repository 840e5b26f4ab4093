/// Vector de 3 componentes [x, y, z] tal como lo reporta el sensor
pub type Vector3 = [f64; 3];

/// Constantes del formato de entrada
pub const PALM_FIELDS: usize = 16;
pub const FINGER_FIELDS: usize = 19;
pub const NUM_FINGERS: usize = 5;
pub const FRAME_GROUPS: usize = 1 + NUM_FINGERS * 2; // palma + 2 grupos por dedo

/// Tamaño de bloque por defecto para el promediado temporal
pub const DEFAULT_AVERAGING_SIZE: usize = 5;

/// Un frame termina con espacio, punto, espacio
pub const FRAME_PATTERN: &str = r".+?\s\.\s";

/// Lee tres valores consecutivos a partir de `start`.
/// El llamador debe haber validado la longitud.
pub fn vec3(values: &[f64], start: usize) -> Vector3 {
    [values[start], values[start + 1], values[start + 2]]
}
