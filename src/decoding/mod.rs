pub mod decoder;
pub mod normalize;

pub use decoder::{
    Correlation, Decoder, cross_correlation_lookup, decode, decode_batch,
    zero_mean_cross_correlation_lookup,
};
pub use normalize::{
    Axis, NORM_EPSILON, normalize, normalize_matrix, normalize_with,
    zero_mean_normalize, zero_mean_normalize_matrix, zero_mean_normalize_with,
};
