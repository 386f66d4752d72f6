use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::normalize::{Axis, normalize, normalize_matrix, zero_mean_normalize, zero_mean_normalize_matrix};
use crate::error::{CodingError, CodingResult};
use crate::matrix::CodingMatrix;

/// How measurements and codes are compared
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Correlation {
    /// ZNCC: subtract the mean, then normalize. Safe for any coding matrix.
    #[default]
    ZeroMean,
    /// NCC without mean subtraction. For codes that are already zero-mean,
    /// or binary codes where mean subtraction would merge all-zeros with
    /// all-ones.
    Raw,
}

impl Correlation {
    fn prepare(self, values: &[f64]) -> Vec<f64> {
        match self {
            Correlation::ZeroMean => zero_mean_normalize(values),
            Correlation::Raw => normalize(values),
        }
    }

    fn prepare_rows(self, matrix: &CodingMatrix) -> CodingMatrix {
        match self {
            Correlation::ZeroMean => zero_mean_normalize_matrix(matrix, Axis::Rows),
            Correlation::Raw => normalize_matrix(matrix, Axis::Rows),
        }
    }
}

/// Nearest-code decoder over a fixed coding matrix.
///
/// The matrix rows are normalized once at construction; every lookup after
/// that only normalizes the measurement. A `Decoder` is never mutated and can
/// be shared between threads.
#[derive(Clone, Debug)]
pub struct Decoder {
    correlation: Correlation,
    codes: CodingMatrix,
}

impl Decoder {
    pub fn new(matrix: &CodingMatrix, correlation: Correlation) -> CodingResult<Self> {
        if matrix.rows() == 0 {
            return Err(CodingError::domain("cannot decode against an empty coding matrix"));
        }
        ensure_finite("coding matrix", matrix.as_slice())?;

        debug!(
            "Decoder ready: {} codes of length {} ({:?} correlation)",
            matrix.rows(),
            matrix.cols(),
            correlation
        );
        Ok(Self {
            correlation,
            codes: correlation.prepare_rows(matrix),
        })
    }

    pub fn correlation(&self) -> Correlation {
        self.correlation
    }

    pub fn domain_len(&self) -> usize {
        self.codes.rows()
    }

    pub fn code_len(&self) -> usize {
        self.codes.cols()
    }

    /// Correlation of `measurement` with every code, one entry per index
    pub fn lookup(&self, measurement: &[f64]) -> CodingResult<Vec<f64>> {
        CodingError::check_len("decode measurement", self.code_len(), measurement.len())?;
        ensure_finite("measurement", measurement)?;

        let x = self.correlation.prepare(measurement);
        Ok(self
            .codes
            .iter_rows()
            .map(|code| dot(code, &x))
            .collect())
    }

    /// Index whose code best matches `measurement`. Ties go to the lowest index.
    pub fn decode(&self, measurement: &[f64]) -> CodingResult<usize> {
        let scores = self.lookup(measurement)?;
        let (index, score) = argmax(&scores);
        trace!("Decoded index {} (score {:.6})", index, score);
        Ok(index)
    }

    /// Batched lookup: `measurements` is `K x M`, one measurement per column;
    /// the result is `N x M`.
    pub fn lookup_batch(&self, measurements: &CodingMatrix) -> CodingResult<CodingMatrix> {
        CodingError::check_len("decode measurements", self.code_len(), measurements.rows())?;

        let columns = measurements
            .columns()
            .par_iter()
            .map(|m| self.lookup(m))
            .collect::<CodingResult<Vec<_>>>()?;
        if columns.is_empty() {
            return Ok(CodingMatrix::zeros(self.domain_len(), 0));
        }
        CodingMatrix::from_columns(&columns)
    }

    /// Decode every column of a `K x M` measurement matrix
    pub fn decode_batch(&self, measurements: &CodingMatrix) -> CodingResult<Vec<usize>> {
        CodingError::check_len("decode measurements", self.code_len(), measurements.rows())?;

        measurements
            .columns()
            .par_iter()
            .map(|m| self.decode(m))
            .collect()
    }
}

fn ensure_finite(what: &str, values: &[f64]) -> CodingResult<()> {
    if values.iter().all(|x| x.is_finite()) {
        Ok(())
    } else {
        Err(CodingError::domain(format!("{} contains non-finite values", what)))
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// First maximum; `scores` is never empty here
fn argmax(scores: &[f64]) -> (usize, f64) {
    scores
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best, best_score), (i, &s)| {
            if s > best_score { (i, s) } else { (best, best_score) }
        })
}

/// ZNCC of `measurement` against every row of `matrix`
pub fn zero_mean_cross_correlation_lookup(
    measurement: &[f64],
    matrix: &CodingMatrix,
) -> CodingResult<Vec<f64>> {
    CodingError::check_len("lookup measurement", matrix.cols(), measurement.len())?;
    Decoder::new(matrix, Correlation::ZeroMean)?.lookup(measurement)
}

/// NCC of `measurement` against every row of `matrix`. Only valid when the
/// codes in `matrix` are zero-mean, e.g. zero-mean Gray codes.
pub fn cross_correlation_lookup(
    measurement: &[f64],
    matrix: &CodingMatrix,
) -> CodingResult<Vec<f64>> {
    CodingError::check_len("lookup measurement", matrix.cols(), measurement.len())?;
    Decoder::new(matrix, Correlation::Raw)?.lookup(measurement)
}

pub fn decode(
    measurement: &[f64],
    matrix: &CodingMatrix,
    correlation: Correlation,
) -> CodingResult<usize> {
    CodingError::check_len("decode measurement", matrix.cols(), measurement.len())?;
    Decoder::new(matrix, correlation)?.decode(measurement)
}

pub fn decode_batch(
    measurements: &CodingMatrix,
    matrix: &CodingMatrix,
    correlation: Correlation,
) -> CodingResult<Vec<usize>> {
    CodingError::check_len("decode measurements", matrix.cols(), measurements.rows())?;
    Decoder::new(matrix, correlation)?.decode_batch(measurements)
}
