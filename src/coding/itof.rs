//! Indirect time-of-flight code sets.
//!
//! An iToF code is a pair of periodic functions over N samples: the light
//! modulation and the sensor demodulation. What the sensor measures for a
//! return delayed by `d` samples is their circular correlation at lag `d`, so
//! the correlation functions (divided by N) form the N x K coding matrix that
//! depth decoding works against.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::TemporalCode;
use super::gray;
use super::hamiltonian::{build_complementary, build_hamiltonian};
use crate::decoding::Correlation;
use crate::dsp::CircularCorrelator;
use crate::error::{CodingError, CodingResult};
use crate::matrix::CodingMatrix;

/// Correlation values below this fraction of the largest one are FFT
/// round-off; windows that never overlap the pulse correlate to exactly 0.
const ROUNDOFF_FLOOR: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItofScheme {
    Gray,
    Hamiltonian,
}

impl ItofScheme {
    fn tag(self) -> &'static str {
        match self {
            ItofScheme::Gray => "gray",
            ItofScheme::Hamiltonian => "hamilt",
        }
    }
}

/// Modulation, demodulation and correlation functions, each N x K.
///
/// Deserializing recomputes `corrfs` from the two function matrices; any
/// `corrfs` in the input is ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCodeSet")]
pub struct CodeSet {
    scheme: ItofScheme,
    complementary: bool,
    modfs: CodingMatrix,
    demodfs: CodingMatrix,
    corrfs: CodingMatrix,
}

#[derive(Deserialize)]
struct RawCodeSet {
    scheme: ItofScheme,
    complementary: bool,
    modfs: CodingMatrix,
    demodfs: CodingMatrix,
}

impl TryFrom<RawCodeSet> for CodeSet {
    type Error = CodingError;

    fn try_from(raw: RawCodeSet) -> CodingResult<Self> {
        if raw.complementary && raw.modfs.cols() % 2 != 0 {
            return Err(CodingError::domain(format!(
                "complementary code set needs an even number of codes, got {}",
                raw.modfs.cols()
            )));
        }
        CodeSet::assemble(raw.scheme, raw.complementary, raw.modfs, raw.demodfs)
    }
}

impl CodeSet {
    /// Correlates `modfs` with `demodfs` column by column
    pub fn from_functions(
        scheme: ItofScheme,
        modfs: CodingMatrix,
        demodfs: CodingMatrix,
    ) -> CodingResult<Self> {
        Self::assemble(scheme, false, modfs, demodfs)
    }

    fn assemble(
        scheme: ItofScheme,
        complementary: bool,
        modfs: CodingMatrix,
        demodfs: CodingMatrix,
    ) -> CodingResult<Self> {
        CodingError::check_len("code set samples", modfs.rows(), demodfs.rows())?;
        CodingError::check_len("code set columns", modfs.cols(), demodfs.cols())?;
        if modfs.rows() == 0 {
            return Err(CodingError::domain("code set needs at least one sample"));
        }

        let n = modfs.rows();
        let corrfs = CircularCorrelator::new(n)
            .correlate_columns(&modfs, &demodfs)?
            .scale(1.0 / n as f64);
        let floor = ROUNDOFF_FLOOR
            * corrfs
                .as_slice()
                .iter()
                .fold(0.0_f64, |acc, v| acc.max(v.abs()));
        let corrfs = corrfs.map(|v| if v.abs() < floor { 0.0 } else { v });

        let set = Self {
            scheme,
            complementary,
            modfs,
            demodfs,
            corrfs,
        };
        debug!(
            "{}: mean of light modulation functions = {:?}",
            set.name(),
            set.modulation_means()
        );
        Ok(set)
    }

    /// Gray demodulation with an ideal pulse of area N at sample 0 as
    /// modulation. N = 2^k.
    pub fn gray(k: u32) -> CodingResult<Self> {
        let demodfs = gray::build_matrix(k)?;
        let (n, cols) = demodfs.shape();

        let mut data = vec![0.0; n * cols];
        data[..cols].fill(n as f64);
        let modfs = CodingMatrix::from_vec(n, cols, data)?;

        let set = Self::assemble(ItofScheme::Gray, false, modfs, demodfs)?;
        info!("Generated {}", set.name());
        Ok(set)
    }

    /// Hamiltonian code set for k = 3, 4 or 5
    pub fn hamiltonian(k: usize, n_samples: usize) -> CodingResult<Self> {
        let (modfs, demodfs) = build_hamiltonian(k, n_samples)?;
        let set = Self::assemble(ItofScheme::Hamiltonian, false, modfs, demodfs)?;
        info!("Generated {}", set.name());
        Ok(set)
    }

    /// 2K-wide set where every code gains a 180 degree shifted partner
    pub fn complementary(&self) -> CodingResult<Self> {
        if self.complementary {
            return Err(CodingError::domain(format!(
                "{} is already complementary",
                self.name()
            )));
        }
        let (modfs, demodfs) = build_complementary(&self.modfs, &self.demodfs)?;
        let set = Self::assemble(self.scheme, true, modfs, demodfs)?;
        info!("Generated {}", set.name());
        Ok(set)
    }

    /// `k-{K}_n-{N}_<scheme>` or `k-{K}-{2K}_n-{N}_<scheme>-complementary`
    pub fn name(&self) -> String {
        let (n, width) = self.corrfs.shape();
        if self.complementary {
            format!(
                "k-{}-{}_n-{}_{}-complementary",
                width / 2,
                width,
                n,
                self.scheme.tag()
            )
        } else {
            format!("k-{}_n-{}_{}", width, n, self.scheme.tag())
        }
    }

    pub fn scheme(&self) -> ItofScheme {
        self.scheme
    }

    pub fn is_complementary(&self) -> bool {
        self.complementary
    }

    pub fn modfs(&self) -> &CodingMatrix {
        &self.modfs
    }

    pub fn demodfs(&self) -> &CodingMatrix {
        &self.demodfs
    }

    pub fn corrfs(&self) -> &CodingMatrix {
        &self.corrfs
    }

    pub fn modulation_means(&self) -> Vec<f64> {
        self.modfs.column_means()
    }
}

impl TemporalCode for CodeSet {
    fn name(&self) -> String {
        CodeSet::name(self)
    }

    fn domain_len(&self) -> usize {
        self.corrfs.rows()
    }

    fn code_len(&self) -> usize {
        self.corrfs.cols()
    }

    /// Noiseless measurement for a return delayed by `index` samples
    fn encode(&self, index: usize) -> CodingResult<Vec<f64>> {
        if index >= self.domain_len() {
            return Err(CodingError::domain(format!(
                "delay {} is outside the period [0, {})",
                index,
                self.domain_len()
            )));
        }
        Ok(self.corrfs.row(index).to_vec())
    }

    fn coding_matrix(&self) -> CodingResult<CodingMatrix> {
        Ok(self.corrfs.clone())
    }

    /// Plain Gray sets contain the all-zeros and all-ones codes, which mean
    /// subtraction cannot tell apart
    fn correlation(&self) -> Correlation {
        match (self.scheme, self.complementary) {
            (ItofScheme::Gray, false) => Correlation::Raw,
            _ => Correlation::ZeroMean,
        }
    }
}
