// Temporal coding schemes: every index of a length-N domain maps to a
// K-long code vector, collected row by row into a coding matrix.

pub mod bits;
pub mod duty_cycle;
pub mod fourier;
pub mod gray;
pub mod hamiltonian;
pub mod itof;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::decoding::Correlation;
use crate::error::CodingResult;
use crate::matrix::CodingMatrix;

pub use fourier::FourierCode;
pub use gray::{GrayCode, GrayVariant};
pub use itof::{CodeSet, ItofScheme};

/// A scheme that encodes each domain index on its own
pub trait TemporalCode: Send + Sync {
    /// `k-{K}_n-{N}_<scheme>`
    fn name(&self) -> String;

    /// Number of indices N
    fn domain_len(&self) -> usize;

    /// Code vector length K
    fn code_len(&self) -> usize;

    fn encode(&self, index: usize) -> CodingResult<Vec<f64>>;

    /// N x K matrix, row `i` = `encode(i)`
    fn coding_matrix(&self) -> CodingResult<CodingMatrix> {
        let rows = (0..self.domain_len())
            .into_par_iter()
            .map(|i| self.encode(i))
            .collect::<CodingResult<Vec<_>>>()?;
        CodingMatrix::from_rows(rows, self.code_len())
    }

    /// Correlation to decode this scheme with
    fn correlation(&self) -> Correlation {
        Correlation::ZeroMean
    }
}

/// Scheme selection with its parameters, e.g. from a JSON config:
/// `{"scheme": "fourier", "domain_len": 256, "n_freqs": 4}`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum SchemeKind {
    Gray {
        width: u32,
        #[serde(default)]
        variant: GrayVariant,
    },
    Fourier {
        domain_len: usize,
        n_freqs: usize,
        #[serde(default)]
        include_zeroth: bool,
    },
    /// Pulse modulation against Gray demodulation, decoded on its
    /// correlation functions
    ItofGray {
        width: u32,
        #[serde(default)]
        complementary: bool,
    },
    Hamiltonian {
        k: usize,
        n_samples: usize,
        #[serde(default)]
        complementary: bool,
    },
}

impl SchemeKind {
    pub fn create(&self) -> CodingResult<Box<dyn TemporalCode>> {
        let code: Box<dyn TemporalCode> = match *self {
            SchemeKind::Gray { width, variant } => Box::new(GrayCode::new(width, variant)?),
            SchemeKind::Fourier {
                domain_len,
                n_freqs,
                include_zeroth,
            } => Box::new(FourierCode::new(domain_len, n_freqs, include_zeroth)?),
            SchemeKind::ItofGray {
                width,
                complementary,
            } => Box::new(with_complement(CodeSet::gray(width)?, complementary)?),
            SchemeKind::Hamiltonian {
                k,
                n_samples,
                complementary,
            } => Box::new(with_complement(
                CodeSet::hamiltonian(k, n_samples)?,
                complementary,
            )?),
        };
        Ok(code)
    }
}

fn with_complement(set: CodeSet, complementary: bool) -> CodingResult<CodeSet> {
    if complementary {
        set.complementary()
    } else {
        Ok(set)
    }
}
