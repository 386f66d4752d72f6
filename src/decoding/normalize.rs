use crate::matrix::CodingMatrix;

/// Added to every norm before dividing, so all-zero vectors map to zero
pub const NORM_EPSILON: f64 = 1e-6;

/// Direction a matrix is normalized along
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// each row is one vector
    Rows,
    /// each column is one vector
    Columns,
}

pub fn normalize(values: &[f64]) -> Vec<f64> {
    normalize_with(values, NORM_EPSILON)
}

/// `values / (||values||_2 + epsilon)`
pub fn normalize_with(values: &[f64], epsilon: f64) -> Vec<f64> {
    let norm = values
        .iter()
        .map(|x| x * x)
        .sum::<f64>()
        .sqrt();
    let scale = 1.0 / (norm + epsilon);
    values
        .iter()
        .map(|x| x * scale)
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn zero_mean_normalize(values: &[f64]) -> Vec<f64> {
    zero_mean_normalize_with(values, NORM_EPSILON)
}

/// Subtract the mean, then [`normalize_with`]
pub fn zero_mean_normalize_with(values: &[f64], epsilon: f64) -> Vec<f64> {
    let m = mean(values);
    let centered: Vec<f64> = values
        .iter()
        .map(|x| x - m)
        .collect();
    normalize_with(&centered, epsilon)
}

pub fn normalize_matrix(matrix: &CodingMatrix, axis: Axis) -> CodingMatrix {
    match axis {
        Axis::Rows => matrix.map_rows(normalize),
        Axis::Columns => matrix.map_columns(normalize),
    }
}

pub fn zero_mean_normalize_matrix(matrix: &CodingMatrix, axis: Axis) -> CodingMatrix {
    match axis {
        Axis::Rows => matrix.map_rows(zero_mean_normalize),
        Axis::Columns => matrix.map_columns(zero_mean_normalize),
    }
}
