//! Generadores de texto de entrada para los tests

use crate::types::{FINGER_FIELDS, NUM_FINGERS, PALM_FIELDS};

pub fn palm_values() -> [f64; PALM_FIELDS] {
    [
        0.1, -0.9, 0.2, // normal
        5.0, 180.0, -20.0, // position
        1.0, 2.0, 3.0, // velocity
        4.0, 170.0, -15.0, // sphere center
        0.95, 0.25, 0.75, 60.0, // confidence, pinch, grab, radius
    ]
}

/// Un dedo con la articulación pip en `pip_x`, desplazado por `shift`
pub fn finger_values(pip_x: f64, shift: f64) -> [f64; FINGER_FIELDS] {
    [
        0.1, 0.2, -0.95, // direction
        50.0 + shift, // length
        pip_x + 2.0, 140.0 + shift, -90.0, // tip
        0.5, 0.5, 0.5, // tip velocity
        pip_x + 1.0, 150.0 + shift, -70.0, // dip
        pip_x, 160.0 + shift, -50.0, // pip
        pip_x - 1.0, 175.0 + shift + 0.1 * pip_x, -20.0, // mcp
    ]
}

pub fn hand_values(shift: f64) -> [[f64; FINGER_FIELDS]; NUM_FINGERS] {
    [
        finger_values(-60.0 + shift, shift),
        finger_values(-30.0 + shift, shift),
        finger_values(0.0 + shift, shift),
        finger_values(25.0 + shift, shift),
        finger_values(55.0 + shift, shift),
    ]
}

fn join(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Texto de un frame: palma entre paréntesis y cada dedo en dos grupos (10 + 9)
pub fn frame_text(palm: &[f64], fingers: &[[f64; FINGER_FIELDS]]) -> String {
    let mut groups = vec![format!("({})", join(palm))];
    for finger in fingers {
        groups.push(format!("({})", join(&finger[..10])));
        groups.push(format!("({})", join(&finger[10..])));
    }
    groups.join(";")
}

/// Línea completa: cada frame termina en " . " y la línea en el signo
pub fn line_text(frames: &[String], sign: char) -> String {
    let mut line = String::new();
    for frame in frames {
        line.push_str(frame);
        line.push_str(" . ");
    }
    line.push(sign);
    line
}

/// Línea con `count` frames que se desplazan `step` unidades por frame
pub fn moving_line(count: usize, step: f64, sign: char) -> String {
    let frames: Vec<String> = (0..count)
        .map(|i| frame_text(&palm_values(), &hand_values(i as f64 * step)))
        .collect();
    line_text(&frames, sign)
}
