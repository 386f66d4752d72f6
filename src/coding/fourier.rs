use std::f64::consts::PI;

use tracing::debug;

use super::TemporalCode;
use crate::error::{CodingError, CodingResult};
use crate::matrix::CodingMatrix;

/// Truncated Fourier code: `n_freqs` harmonics sampled at the phase of each
/// index, as interleaved `(cos, -sin)` pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FourierCode {
    domain_len: usize,
    n_freqs: usize,
    include_zeroth: bool,
}

impl FourierCode {
    pub fn new(
        domain_len: usize,
        n_freqs: usize,
        include_zeroth: bool,
    ) -> CodingResult<Self> {
        if domain_len == 0 {
            return Err(CodingError::domain("fourier domain length must be positive"));
        }
        if n_freqs == 0 {
            return Err(CodingError::domain("fourier code needs at least one frequency"));
        }
        Ok(Self {
            domain_len,
            n_freqs,
            include_zeroth,
        })
    }

    pub fn n_freqs(&self) -> usize {
        self.n_freqs
    }

    pub fn include_zeroth(&self) -> bool {
        self.include_zeroth
    }

    /// Harmonics in code order
    pub fn frequencies(&self) -> std::ops::Range<usize> {
        let first = if self.include_zeroth { 0 } else { 1 };
        first..first + self.n_freqs
    }
}

impl TemporalCode for FourierCode {
    fn name(&self) -> String {
        format!(
            "k-{}_n-{}_trunc-fourier",
            2 * self.n_freqs,
            self.domain_len
        )
    }

    fn domain_len(&self) -> usize {
        self.domain_len
    }

    fn code_len(&self) -> usize {
        2 * self.n_freqs
    }

    fn encode(&self, index: usize) -> CodingResult<Vec<f64>> {
        if index >= self.domain_len {
            return Err(CodingError::domain(format!(
                "index {} is outside the domain [0, {})",
                index, self.domain_len
            )));
        }

        let theta = 2.0 * PI * index as f64 / self.domain_len as f64;
        let mut code = Vec::with_capacity(self.code_len());
        for freq in self.frequencies() {
            let phase = freq as f64 * theta;
            code.push(phase.cos());
            code.push(-phase.sin());
        }
        Ok(code)
    }
}

pub fn encode(
    index: usize,
    domain_len: usize,
    n_freqs: usize,
    include_zeroth: bool,
) -> CodingResult<Vec<f64>> {
    FourierCode::new(domain_len, n_freqs, include_zeroth)?.encode(index)
}

/// `domain_len x 2*n_freqs` coding matrix
pub fn build_matrix(
    domain_len: usize,
    n_freqs: usize,
    include_zeroth: bool,
) -> CodingResult<CodingMatrix> {
    let matrix = FourierCode::new(domain_len, n_freqs, include_zeroth)?
        .coding_matrix()?;
    debug!(
        "Built truncated fourier coding matrix: {} x {} (zeroth harmonic: {})",
        matrix.rows(),
        matrix.cols(),
        include_zeroth
    );
    Ok(matrix)
}
