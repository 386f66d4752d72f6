//! Hamiltonian codes for indirect time-of-flight.
//!
//! Each code pairs a narrow square light pulse (modulation) with a binary
//! sensor exposure pattern (demodulation). The demodulation patterns below are
//! the published Hamiltonian designs for K = 3, 4 and 5; the fractions are
//! design constants and are reproduced as given.

use tracing::debug;

use super::duty_cycle::{build_modulation, build_piecewise_indicator};
use crate::error::{CodingError, CodingResult};
use crate::matrix::CodingMatrix;

/// One demodulation column: interval fractions of the period (alternating
/// high/low, starting high) and a circular shift as a fraction of the period.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DemodSpec {
    pub intervals: &'static [f64],
    pub shift: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HamiltonianDesign {
    pub k: usize,
    pub modulation_duty: f64,
    pub demod: &'static [DemodSpec],
}

const HALF: &[f64] = &[1. / 2., 1. / 2.];

const HAM_K3: HamiltonianDesign = HamiltonianDesign {
    k: 3,
    modulation_duty: 1. / 6.,
    demod: &[
        DemodSpec { intervals: HALF, shift: 0. },
        DemodSpec { intervals: HALF, shift: 1. / 3. },
        DemodSpec { intervals: HALF, shift: 2. / 3. },
    ],
};

const HAM_K4: HamiltonianDesign = HamiltonianDesign {
    k: 4,
    modulation_duty: 1. / 12.,
    demod: &[
        DemodSpec {
            intervals: &[6. / 12., 6. / 12.],
            shift: 5. / 12.,
        },
        DemodSpec {
            intervals: &[6. / 12., 6. / 12.],
            shift: 2. / 12.,
        },
        DemodSpec {
            intervals: &[3. / 12., 4. / 12., 3. / 12., 2. / 12.],
            shift: 0. / 12.,
        },
        DemodSpec {
            intervals: &[2. / 12., 3. / 12., 4. / 12., 3. / 12.],
            shift: 4. / 12.,
        },
    ],
};

const HAM_K5: HamiltonianDesign = HamiltonianDesign {
    k: 5,
    modulation_duty: 1. / 30.,
    demod: &[
        DemodSpec {
            intervals: &[15. / 30., 15. / 30.],
            shift: 15. / 30.,
        },
        DemodSpec {
            intervals: &[15. / 30., 15. / 30.],
            shift: 7. / 30.,
        },
        DemodSpec {
            intervals: &[8. / 30., 8. / 30., 7. / 30., 7. / 30.],
            shift: 3. / 30.,
        },
        DemodSpec {
            intervals: &[
                4. / 30., 4. / 30., 4. / 30., 4. / 30.,
                3. / 30., 4. / 30., 4. / 30., 3. / 30.,
            ],
            shift: 1. / 30.,
        },
        DemodSpec {
            intervals: &[
                2. / 30., 2. / 30., 2. / 30., 2. / 30., 2. / 30., 2. / 30., 2. / 30.,
                3. / 30., 2. / 30., 2. / 30., 2. / 30., 2. / 30., 3. / 30., 2. / 30.,
            ],
            shift: 4. / 30.,
        },
    ],
};

/// Design table for `k`, which must be 3, 4 or 5
pub fn design(k: usize) -> CodingResult<&'static HamiltonianDesign> {
    match k {
        3 => Ok(&HAM_K3),
        4 => Ok(&HAM_K4),
        5 => Ok(&HAM_K5),
        _ => Err(CodingError::UnsupportedScheme(k)),
    }
}

/// `(modfs, demodfs)`, both `n_samples x k`
pub fn build_hamiltonian(
    k: usize,
    n_samples: usize,
) -> CodingResult<(CodingMatrix, CodingMatrix)> {
    let design = design(k)?;
    if n_samples == 0 {
        return Err(CodingError::domain("hamiltonian codes need at least one sample"));
    }

    let modfs = build_modulation(n_samples, design.k, design.modulation_duty)?;
    let columns = design
        .demod
        .iter()
        .map(|demod| build_piecewise_indicator(n_samples, demod.intervals, demod.shift))
        .collect::<CodingResult<Vec<_>>>()?;
    let demodfs = CodingMatrix::from_columns(&columns)?;

    debug!(
        "Built HamK{}: {} samples, modulation duty cycle {:.4}",
        k, n_samples, design.modulation_duty
    );
    Ok((modfs, demodfs))
}

/// Gives every code a 180 degree shifted partner of opposite polarity:
/// `[modfs | modfs]` and `[demodfs | 1 - demodfs]`.
pub fn build_complementary(
    modfs: &CodingMatrix,
    demodfs: &CodingMatrix,
) -> CodingResult<(CodingMatrix, CodingMatrix)> {
    CodingError::check_len("complementary rows", modfs.rows(), demodfs.rows())?;
    CodingError::check_len("complementary columns", modfs.cols(), demodfs.cols())?;

    let complementary_modfs = modfs.hconcat(modfs)?;
    let negated = demodfs.map(|d| 1.0 - d);
    let complementary_demodfs = demodfs.hconcat(&negated)?;
    Ok((complementary_modfs, complementary_demodfs))
}
