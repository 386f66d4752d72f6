use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use rustfft::{Fft, FftPlanner, num_complex::Complex};

use crate::error::{CodingError, CodingResult};
use crate::matrix::CodingMatrix;

/// Circular (wrap-around) correlation and convolution of length `len`
/// signals through the FFT. The plans are built once and shared, so one
/// correlator can serve every column of a code set.
#[derive(Clone)]
pub struct CircularCorrelator {
    len: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl fmt::Debug for CircularCorrelator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircularCorrelator")
            .field("len", &self.len)
            .finish()
    }
}

impl CircularCorrelator {
    pub fn new(len: usize) -> Self {
        // a zero length correlator never runs its plans
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(len.max(1));
        let inverse = planner.plan_fft_inverse(len.max(1));
        Self {
            len,
            forward,
            inverse,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn spectrum(&self, signal: &[f64]) -> Vec<Complex<f64>> {
        let mut buffer: Vec<Complex<f64>> = signal
            .iter()
            .map(|&x| Complex::new(x, 0.0))
            .collect();
        self.forward.process(&mut buffer);
        buffer
    }

    fn real_inverse(&self, mut spectrum: Vec<Complex<f64>>) -> Vec<f64> {
        self.inverse.process(&mut spectrum);
        let scale = 1.0 / self.len as f64;
        spectrum
            .iter()
            .map(|c| c.re * scale)
            .collect()
    }

    fn check(&self, v1: &[f64], v2: &[f64]) -> CodingResult<()> {
        CodingError::check_len("circular correlation", self.len, v1.len())?;
        CodingError::check_len("circular correlation", self.len, v2.len())
    }

    /// `r[m] = sum_n v1[n] * v2[(n + m) mod N]`; index 0 is zero shift
    pub fn correlate(&self, v1: &[f64], v2: &[f64]) -> CodingResult<Vec<f64>> {
        self.check(v1, v2)?;
        if self.is_empty() {
            return Ok(Vec::new());
        }

        let a = self.spectrum(v1);
        let b = self.spectrum(v2);
        let product = a
            .iter()
            .zip(&b)
            .map(|(x, y)| x.conj() * y)
            .collect();
        Ok(self.real_inverse(product))
    }

    /// `c[m] = sum_n v1[n] * v2[(m - n) mod N]`, same length as the inputs
    pub fn convolve(&self, v1: &[f64], v2: &[f64]) -> CodingResult<Vec<f64>> {
        self.check(v1, v2)?;
        if self.is_empty() {
            return Ok(Vec::new());
        }

        let a = self.spectrum(v1);
        let b = self.spectrum(v2);
        let product = a
            .iter()
            .zip(&b)
            .map(|(x, y)| x * y)
            .collect();
        Ok(self.real_inverse(product))
    }

    /// Column `j` of the result correlates column `j` of `a` with column `j`
    /// of `b`, along the sample (row) axis.
    pub fn correlate_columns(
        &self,
        a: &CodingMatrix,
        b: &CodingMatrix,
    ) -> CodingResult<CodingMatrix> {
        self.columnwise(a, b, Self::correlate)
    }

    pub fn convolve_columns(
        &self,
        a: &CodingMatrix,
        b: &CodingMatrix,
    ) -> CodingResult<CodingMatrix> {
        self.columnwise(a, b, Self::convolve)
    }

    fn columnwise(
        &self,
        a: &CodingMatrix,
        b: &CodingMatrix,
        op: fn(&Self, &[f64], &[f64]) -> CodingResult<Vec<f64>>,
    ) -> CodingResult<CodingMatrix> {
        CodingError::check_len("column-wise correlation columns", a.cols(), b.cols())?;
        CodingError::check_len("column-wise correlation rows", self.len, a.rows())?;
        CodingError::check_len("column-wise correlation rows", self.len, b.rows())?;

        let columns = a
            .columns()
            .par_iter()
            .zip(b.columns().par_iter())
            .map(|(x, y)| op(self, x, y))
            .collect::<CodingResult<Vec<_>>>()?;

        if columns.is_empty() {
            return Ok(CodingMatrix::zeros(self.len, 0));
        }
        CodingMatrix::from_columns(&columns)
    }
}

pub fn circular_correlate(v1: &[f64], v2: &[f64]) -> CodingResult<Vec<f64>> {
    CodingError::check_len("circular correlation", v1.len(), v2.len())?;
    CircularCorrelator::new(v1.len()).correlate(v1, v2)
}

pub fn circular_convolve(v1: &[f64], v2: &[f64]) -> CodingResult<Vec<f64>> {
    CodingError::check_len("circular convolution", v1.len(), v2.len())?;
    CircularCorrelator::new(v1.len()).convolve(v1, v2)
}

/// Batched [`circular_correlate`] along the rows of two equal-shape matrices
pub fn circular_correlate_columns(
    a: &CodingMatrix,
    b: &CodingMatrix,
) -> CodingResult<CodingMatrix> {
    CircularCorrelator::new(a.rows()).correlate_columns(a, b)
}

pub fn circular_convolve_columns(
    a: &CodingMatrix,
    b: &CodingMatrix,
) -> CodingResult<CodingMatrix> {
    CircularCorrelator::new(a.rows()).convolve_columns(a, b)
}
