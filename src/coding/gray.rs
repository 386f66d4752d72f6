use serde::{Deserialize, Serialize};
use tracing::debug;

use super::TemporalCode;
use super::bits::to_gray_bits;
use crate::decoding::Correlation;
use crate::error::{CodingError, CodingResult};
use crate::matrix::CodingMatrix;

/// Level assigned to each Gray bit
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrayVariant {
    /// bits as {0, 1}
    #[default]
    Binary,
    /// bits as {-1, +1}
    ZeroMean,
}

impl GrayVariant {
    fn level(self, bit: u8) -> f64 {
        match self {
            GrayVariant::Binary => bit as f64,
            GrayVariant::ZeroMean => 2.0 * bit as f64 - 1.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GrayVariant::Binary => "gray",
            GrayVariant::ZeroMean => "zero-mean-gray",
        }
    }
}

/// `width`-bit reflected binary Gray code over `2^width` indices
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrayCode {
    width: u32,
    variant: GrayVariant,
    domain_len: usize,
}

impl GrayCode {
    pub fn new(width: u32, variant: GrayVariant) -> CodingResult<Self> {
        if width == 0 {
            return Err(CodingError::domain("gray code width must be at least 1"));
        }
        let domain_len = 1usize
            .checked_shl(width)
            .ok_or_else(|| {
                CodingError::domain(format!(
                    "a {}-bit gray code has more codes than fit in memory",
                    width
                ))
            })?;

        Ok(Self {
            width,
            variant,
            domain_len,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn variant(&self) -> GrayVariant {
        self.variant
    }
}

impl TemporalCode for GrayCode {
    fn name(&self) -> String {
        format!(
            "k-{}_n-{}_{}",
            self.width,
            self.domain_len,
            self.variant.name()
        )
    }

    fn domain_len(&self) -> usize {
        self.domain_len
    }

    fn code_len(&self) -> usize {
        self.width as usize
    }

    fn encode(&self, index: usize) -> CodingResult<Vec<f64>> {
        encode(index, self.width, self.variant)
    }

    /// Every column of the {-1, +1} matrix is zero-mean over the domain, so
    /// plain NCC applies. It also keeps the all-ones code apart from the
    /// all-zeros one, which mean subtraction would collapse together.
    fn correlation(&self) -> Correlation {
        match self.variant {
            GrayVariant::Binary => Correlation::ZeroMean,
            GrayVariant::ZeroMean => Correlation::Raw,
        }
    }
}

/// Gray code of `index` with the levels of `variant`
pub fn encode(
    index: usize,
    width: u32,
    variant: GrayVariant,
) -> CodingResult<Vec<f64>> {
    let bits = to_gray_bits(index as u64, width)?;
    Ok(bits
        .into_iter()
        .map(|bit| variant.level(bit))
        .collect())
}

/// All `2^width` codes, row `i` holding the code of `i`
pub fn build(width: u32, variant: GrayVariant) -> CodingResult<CodingMatrix> {
    let code = GrayCode::new(width, variant)?;
    let matrix = code.coding_matrix()?;
    debug!(
        "Built {} coding matrix: {} x {}",
        variant.name(),
        matrix.rows(),
        matrix.cols()
    );
    Ok(matrix)
}

pub fn build_matrix(width: u32) -> CodingResult<CodingMatrix> {
    build(width, GrayVariant::Binary)
}

pub fn build_zero_mean_matrix(width: u32) -> CodingResult<CodingMatrix> {
    build(width, GrayVariant::ZeroMean)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hamming(a: &[f64], b: &[f64]) -> usize {
        a.iter()
            .zip(b)
            .filter(|(x, y)| x != y)
            .count()
    }

    #[test]
    fn test_matrix_shape() {
        for width in 1..=8 {
            let m = build_matrix(width).unwrap();
            assert_eq!(m.shape(), (1 << width, width as usize));
        }
    }

    #[test]
    fn test_adjacent_codes_differ_in_one_bit() {
        for width in 1..=10 {
            let m = build_matrix(width).unwrap();
            for i in 0..m.rows() - 1 {
                assert_eq!(
                    hamming(m.row(i), m.row(i + 1)),
                    1,
                    "width {} index {}",
                    width,
                    i
                );
            }
        }
    }

    #[test]
    fn test_rows_unique() {
        let m = build_matrix(6).unwrap();
        let mut rows: Vec<Vec<u8>> = m
            .iter_rows()
            .map(|r| r.iter().map(|&x| x as u8).collect())
            .collect();
        rows.sort();
        rows.dedup();
        assert_eq!(rows.len(), 64);
    }

    #[test]
    fn test_zero_mean_is_affine_map_of_binary() {
        let binary = build_matrix(5).unwrap();
        let zero_mean = build_zero_mean_matrix(5).unwrap();
        assert_eq!(zero_mean, binary.map(|x| 2.0 * x - 1.0));

        // every column is balanced over the full domain
        for mean in zero_mean.column_means() {
            assert_eq!(mean, 0.0);
        }
    }

    #[test]
    fn test_encode_matches_matrix_row() {
        let m = build_zero_mean_matrix(8).unwrap();
        let code = encode(200, 8, GrayVariant::ZeroMean).unwrap();
        assert_eq!(code.as_slice(), m.row(200));
    }

    #[test]
    fn test_invalid_widths() {
        assert!(matches!(build_matrix(0), Err(CodingError::Domain(_))));
        assert!(GrayCode::new(usize::BITS, GrayVariant::Binary).is_err());
        assert!(encode(16, 4, GrayVariant::Binary).is_err());
    }

    #[test]
    fn test_name() {
        let code = GrayCode::new(8, GrayVariant::Binary).unwrap();
        assert_eq!(code.name(), "k-8_n-256_gray");
    }
}
