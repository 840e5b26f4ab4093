//! Operaciones sobre vectores numéricos (distancia, proyección, ángulos)

use crate::error::ParseError;

fn check_dimensions(a: &[f64], b: &[f64]) -> Result<(), ParseError> {
    if a.len() != b.len() {
        return Err(ParseError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}

/// Norma euclidiana
pub fn norm(a: &[f64]) -> f64 {
    a.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Producto escalar
pub fn dot(a: &[f64], b: &[f64]) -> Result<f64, ParseError> {
    check_dimensions(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

/// Distancia euclidiana entre dos vectores
pub fn distance(a: &[f64], b: &[f64]) -> Result<f64, ParseError> {
    check_dimensions(a, b)?;
    Ok(a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt())
}

/// Longitud de `a` proyectado sobre el vector unitario de `b`.
/// Si `b` es el vector cero el resultado es NaN.
pub fn projection(a: &[f64], b: &[f64]) -> Result<f64, ParseError> {
    check_dimensions(a, b)?;
    let norm_b = norm(b);
    Ok(a.iter().zip(b).map(|(x, y)| x * (y / norm_b)).sum())
}

/// Ángulo (radianes) entre `a` y su proyección sobre el plano x-z.
/// Devuelve 0 cuando el cálculo no está definido (vector cero o vertical).
pub fn angle_to_plane(a: &[f64]) -> Result<f64, ParseError> {
    if a.len() != 3 {
        return Err(ParseError::DimensionMismatch {
            left: a.len(),
            right: 3,
        });
    }

    let projected = [a[0], 0.0, a[2]];
    let cos = dot(a, &projected)? / (norm(a) * norm(&projected));
    let angle = cos.acos();

    if angle.is_nan() {
        Ok(0.0)
    } else {
        Ok(angle)
    }
}

/// Ángulo (radianes) entre dos vectores
pub fn angle_between(a: &[f64], b: &[f64]) -> Result<f64, ParseError> {
    let product = dot(a, b)?;
    Ok((product / (norm(a) * norm(b))).acos())
}

/// Resta elemento a elemento: a - b
pub fn difference(a: &[f64], b: &[f64]) -> Result<Vec<f64>, ParseError> {
    check_dimensions(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x - y).collect())
}

/// Punto medio entre dos vectores
pub fn midpoint(a: &[f64], b: &[f64]) -> Result<Vec<f64>, ParseError> {
    if a.is_empty() || b.is_empty() {
        return Err(ParseError::NullInput);
    }
    check_dimensions(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| (x + y) / 2.0).collect())
}
