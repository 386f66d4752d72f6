/// Log level (overridden by RUST_LOG)
pub const LOG_LEVEL: &str = "info";

/// Histogram bins used when no domain length is given.
/// A power of two so the Gray code is fully binary.
pub const DEFAULT_DOMAIN_LEN: usize = 256;

/// Gray code width matching `DEFAULT_DOMAIN_LEN`
pub const DEFAULT_GRAY_WIDTH: u32 = 8;

/// Number of harmonics for truncated Fourier codes (K = 8)
pub const DEFAULT_FOURIER_FREQS: usize = 4;

/// Hamiltonian code length
pub const DEFAULT_HAMILTONIAN_K: usize = 4;

/// Samples per period for iToF code sets
pub const DEFAULT_ITOF_SAMPLES: usize = 128;

/// Indices drawn by `tofcode roundtrip`
pub const DEFAULT_ROUNDTRIP_TRIALS: usize = 3;
