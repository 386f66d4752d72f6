// Piecewise constant waveforms over one period of `n_samples` samples.

use crate::error::{CodingError, CodingResult};
use crate::matrix::CodingMatrix;

/// Absorbs representation error in products such as `(7/30) * 30` so that
/// rational fractions of N land on the sample they name.
const SAMPLE_TOLERANCE: f64 = 1e-9;

fn samples_in(fraction: f64, n_samples: usize) -> usize {
    (fraction * n_samples as f64 + SAMPLE_TOLERANCE).floor() as usize
}

/// `n_samples x k` square pulses. The first `floor(duty_cycle * N)` samples
/// of every column are `1 / duty_cycle`, the rest zero, so the area under
/// each column stays N whatever the duty cycle.
pub fn build_modulation(
    n_samples: usize,
    k: usize,
    duty_cycle: f64,
) -> CodingResult<CodingMatrix> {
    if !(duty_cycle > 0.0 && duty_cycle <= 1.0) {
        return Err(CodingError::domain(format!(
            "duty cycle should be in (0, 1], got {}",
            duty_cycle
        )));
    }

    let high = samples_in(duty_cycle, n_samples).min(n_samples);
    let amplitude = 1.0 / duty_cycle;

    let len = n_samples.checked_mul(k).ok_or_else(|| {
        CodingError::domain(format!("{} x {} modulation overflows", n_samples, k))
    })?;
    let mut data = vec![0.0; len];
    data[..high * k].fill(amplitude);
    CodingMatrix::from_vec(n_samples, k, data)
}

/// {0, 1} indicator built from consecutive intervals.
///
/// Interval `j` starts at `floor(prefix_j * N)`, where `prefix_j` is the sum
/// of the fractions before it, and spans `floor(fraction_j * N)` samples.
/// Even intervals are high, odd intervals low. The result is then rotated
/// right by `round(shift_fraction * N)` samples, wrapping past the end.
pub fn build_piecewise_indicator(
    n_samples: usize,
    interval_fractions: &[f64],
    shift_fraction: f64,
) -> CodingResult<Vec<f64>> {
    if let Some(bad) = interval_fractions
        .iter()
        .find(|f| !f.is_finite() || **f < 0.0)
    {
        return Err(CodingError::domain(format!(
            "interval fractions must be finite and non-negative, got {}",
            bad
        )));
    }
    if !shift_fraction.is_finite() {
        return Err(CodingError::domain("shift fraction must be finite"));
    }

    let mut indicator = vec![0.0; n_samples];
    if n_samples == 0 {
        return Ok(indicator);
    }

    let mut prefix = 0.0;
    for (j, &fraction) in interval_fractions.iter().enumerate() {
        if j % 2 == 0 {
            let start = samples_in(prefix, n_samples).min(n_samples);
            let end = start
                .saturating_add(samples_in(fraction, n_samples))
                .min(n_samples);
            indicator[start..end].fill(1.0);
        }
        prefix += fraction;
    }

    let shift = (shift_fraction * n_samples as f64).round_ties_even() as i64;
    let shift = shift.rem_euclid(n_samples as i64) as usize;
    indicator.rotate_right(shift);
    Ok(indicator)
}
