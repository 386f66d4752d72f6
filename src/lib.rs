//! Temporal coding for time-of-flight histograms.
//!
//! A timestamp in an N-bin histogram is compressed into K << N values by a
//! coding scheme and recovered with a normalized cross-correlation lookup
//! against the scheme's N x K coding matrix.
//!
//! ```
//! use tofcode_rs::coding::fourier;
//! use tofcode_rs::decoding::{decode, Correlation};
//!
//! let matrix = fourier::build_matrix(256, 4, false)?;
//! let code = fourier::encode(37, 256, 4, false)?;
//! assert_eq!(decode(&code, &matrix, Correlation::ZeroMean)?, 37);
//! # Ok::<(), tofcode_rs::CodingError>(())
//! ```

pub mod coding;
pub mod decoding;
pub mod dsp;
pub mod error;
pub mod matrix;
pub mod units;
pub mod utils;

pub use coding::{CodeSet, SchemeKind, TemporalCode};
pub use decoding::{Correlation, Decoder};
pub use error::{CodingError, CodingResult};
pub use matrix::CodingMatrix;
