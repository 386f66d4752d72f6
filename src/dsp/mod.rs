pub mod correlation;

pub use correlation::{
    CircularCorrelator, circular_convolve, circular_convolve_columns,
    circular_correlate, circular_correlate_columns,
};
