// Reflected binary Gray code <-> fixed width bit vectors (MSB first)

use crate::error::{CodingError, CodingResult};

/// Binary to reflected binary Gray code
pub fn to_gray(value: u64) -> u64 {
    value ^ (value >> 1)
}

/// Gray code back to binary (prefix XOR over all higher bits)
pub fn from_gray(gray: u64) -> u64 {
    let mut value = gray;
    let mut shift = 1;
    while shift < u64::BITS {
        value ^= value >> shift;
        shift <<= 1;
    }
    value
}

/// Gray code of `value` as `width` bits, MSB first, left padded with zeros.
/// Fails when `value` does not fit in `width` bits.
pub fn to_gray_bits(value: u64, width: u32) -> CodingResult<Vec<u8>> {
    if width < u64::BITS && value >> width != 0 {
        return Err(CodingError::domain(format!(
            "can't represent {} with a {}-bit gray code",
            value, width
        )));
    }

    let gray = to_gray(value);
    let bits = (0..width)
        .rev()
        .map(|i| {
            if i < u64::BITS {
                ((gray >> i) & 1) as u8
            } else {
                0
            }
        })
        .collect();
    Ok(bits)
}

/// Same as [`to_gray_bits`] with 0 -> -1 and 1 -> +1
pub fn to_zero_mean_gray_bits(value: u64, width: u32) -> CodingResult<Vec<i8>> {
    let bits = to_gray_bits(value, width)?;
    Ok(bits
        .into_iter()
        .map(|bit| 2 * bit as i8 - 1)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_gray_known_values() {
        let expected = [0, 1, 3, 2, 6, 7, 5, 4];
        for (value, &gray) in expected.iter().enumerate() {
            assert_eq!(to_gray(value as u64), gray);
        }
    }

    #[test]
    fn test_from_gray_inverts_to_gray() {
        for value in (0..5000u64).chain([u64::MAX, u64::MAX / 3, 1 << 63]) {
            assert_eq!(from_gray(to_gray(value)), value);
        }
    }

    #[test]
    fn test_gray_bits_big_endian() {
        // 5 -> gray 0b111, 6 -> gray 0b101
        assert_eq!(to_gray_bits(5, 4).unwrap(), vec![0, 1, 1, 1]);
        assert_eq!(to_gray_bits(6, 3).unwrap(), vec![1, 0, 1]);
    }

    #[test]
    fn test_zero_is_all_zero() {
        for width in 1..=16 {
            let bits = to_gray_bits(0, width).unwrap();
            assert_eq!(bits.len(), width as usize);
            assert!(bits.iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn test_value_too_wide_rejected() {
        assert!(to_gray_bits(255, 8).is_ok());
        let err = to_gray_bits(256, 8).unwrap_err();
        assert!(matches!(err, CodingError::Domain(_)));
        assert!(to_gray_bits(1, 0).is_err());
    }

    #[test]
    fn test_wide_widths() {
        let bits = to_gray_bits(u64::MAX, 64).unwrap();
        assert_eq!(bits[0], 1);
        assert!(bits[1..].iter().all(|&b| b == 0));

        let padded = to_gray_bits(1, 70).unwrap();
        assert_eq!(padded.len(), 70);
        assert_eq!(padded.iter().map(|&b| b as u32).sum::<u32>(), 1);
        assert_eq!(padded[69], 1);
    }

    #[test]
    fn test_zero_mean_bits() {
        assert_eq!(to_zero_mean_gray_bits(5, 4).unwrap(), vec![-1, 1, 1, 1]);
        assert_eq!(to_zero_mean_gray_bits(0, 3).unwrap(), vec![-1, -1, -1]);
        assert!(to_zero_mean_gray_bits(8, 3).is_err());
    }
}
