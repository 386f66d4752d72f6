// Time-of-flight unit conversions. Physical constants are parameters; pass
// `SPEED_OF_LIGHT` or a calibrated value explicitly.

use std::f64::consts::TAU;

use crate::error::{CodingError, CodingResult};

/// Speed of light in vacuum as used for depth conversions (m/s)
pub const SPEED_OF_LIGHT: f64 = 3e8;

/// Map a phase from `atan2` range `(-pi, pi]` to `[0, 2pi)`
pub fn linearize_phase(phase: f64) -> f64 {
    if phase < 0.0 { phase + TAU } else { phase }
}

/// Round trip time for `phase` within a period of `repetition_tau` seconds
pub fn phase_to_time(phase: f64, repetition_tau: f64) -> f64 {
    linearize_phase(phase) * repetition_tau / TAU
}

/// Round trip time to one-way distance
pub fn time_to_depth(time: f64, speed_of_light: f64) -> f64 {
    speed_of_light * time / 2.0
}

pub fn depth_to_time(depth: f64, speed_of_light: f64) -> f64 {
    2.0 * depth / speed_of_light
}

pub fn phase_to_depth(phase: f64, repetition_tau: f64, speed_of_light: f64) -> f64 {
    time_to_depth(phase_to_time(phase, repetition_tau), speed_of_light)
}

/// Time from the angle of a phasor `re + i*im`
pub fn phasor_to_time(re: f64, im: f64, repetition_tau: f64) -> f64 {
    phase_to_time(im.atan2(re), repetition_tau)
}

/// Depth of the center of histogram bin `index` when one period of
/// `repetition_tau` seconds is split into `n_bins` bins
pub fn bin_to_depth(
    index: usize,
    n_bins: usize,
    repetition_tau: f64,
    speed_of_light: f64,
) -> CodingResult<f64> {
    if index >= n_bins {
        return Err(CodingError::domain(format!(
            "bin {} is outside the histogram [0, {})",
            index, n_bins
        )));
    }
    let bin_width = repetition_tau / n_bins as f64;
    Ok(time_to_depth((index as f64 + 0.5) * bin_width, speed_of_light))
}

/// One-hot histogram with a single count at `tstamp`
pub fn timestamp_to_histogram(tstamp: usize, hist_len: usize) -> CodingResult<Vec<f64>> {
    if tstamp >= hist_len {
        return Err(CodingError::domain(format!(
            "timestamp {} is outside the histogram [0, {})",
            tstamp, hist_len
        )));
    }
    let mut hist = vec![0.0; hist_len];
    hist[tstamp] = 1.0;
    Ok(hist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const TOL: f64 = 1e-12;

    #[test]
    fn test_linearize_phase() {
        assert!((linearize_phase(-PI / 2.0) - 1.5 * PI).abs() < TOL);
        assert_eq!(linearize_phase(1.0), 1.0);
        assert_eq!(linearize_phase(0.0), 0.0);
    }

    #[test]
    fn test_phase_to_time() {
        let tau = 10e-9;
        assert!((phase_to_time(PI, tau) - 5e-9).abs() < TOL);
        assert!((phase_to_time(-PI / 2.0, tau) - 7.5e-9).abs() < TOL);
        assert!((phasor_to_time(0.0, 1.0, tau) - 2.5e-9).abs() < TOL);
    }

    #[test]
    fn test_depth_time_inverse() {
        for depth in [0.0, 0.3, 1.5, 7.25] {
            let t = depth_to_time(depth, SPEED_OF_LIGHT);
            assert!((time_to_depth(t, SPEED_OF_LIGHT) - depth).abs() < 1e-9);
        }
        // 10 ns round trip is 1.5 m
        assert!((time_to_depth(10e-9, SPEED_OF_LIGHT) - 1.5).abs() < 1e-9);
        assert!((phase_to_depth(PI, 10e-9, SPEED_OF_LIGHT) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_bin_to_depth() {
        let d = bin_to_depth(0, 100, 10e-9, SPEED_OF_LIGHT).unwrap();
        assert!((d - 0.0075).abs() < 1e-12);
        assert!(bin_to_depth(100, 100, 10e-9, SPEED_OF_LIGHT).is_err());
    }

    #[test]
    fn test_histogram() {
        let hist = timestamp_to_histogram(3, 8).unwrap();
        assert_eq!(hist.iter().sum::<f64>(), 1.0);
        assert_eq!(hist[3], 1.0);
        assert!(timestamp_to_histogram(8, 8).is_err());
    }
}
