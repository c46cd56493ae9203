//! Conversions from host numbers into capacities and positions.
//!
//! JavaScript hands us `f64`s, so anything that is not a non-negative
//! integer has to be rejected here before it reaches [`BitSet`].

use crate::bit_set::{BitSet, MAX_CAPACITY};
use crate::error::BitSetError;

#[allow(clippy::cast_precision_loss)]
const MAX_CAPACITY_F64: f64 = MAX_CAPACITY as f64;

/// # Errors
///
/// [`BitSetError::InvalidCapacity`] unless `value` is an integer in
/// `[0, MAX_CAPACITY]`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn capacity_from_f64(value: f64) -> Result<usize, BitSetError> {
    if !is_integer(value) || !(0.0..=MAX_CAPACITY_F64).contains(&value) {
        return Err(BitSetError::InvalidCapacity(value));
    }
    Ok(value as usize)
}

/// # Errors
///
/// [`BitSetError::InvalidPosition`] for fractional or non-finite values,
/// [`BitSetError::OutOfRange`] for integers outside `[0, capacity)`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn position_from_f64(value: f64, capacity: usize) -> Result<usize, BitSetError> {
    if !is_integer(value) {
        return Err(BitSetError::InvalidPosition(value));
    }
    #[allow(clippy::cast_precision_loss)]
    let in_range = value >= 0.0 && value < capacity as f64;
    if !in_range {
        return Err(BitSetError::OutOfRange {
            // saturating
            position: value as i128,
            capacity,
        });
    }
    Ok(value as usize)
}

/// # Errors
///
/// The first failure of [`position_from_f64`] among `values`.
pub fn positions_from_f64(values: &[f64], capacity: usize) -> Result<Vec<usize>, BitSetError> {
    values
        .iter()
        .map(|&value| position_from_f64(value, capacity))
        .collect()
}

/// Number of random draws requested by the host.
///
/// # Errors
///
/// [`BitSetError::InvalidCount`] unless `value` is an integer in
/// `[0, MAX_CAPACITY]`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn count_from_f64(value: f64) -> Result<usize, BitSetError> {
    if !is_integer(value) || !(0.0..=MAX_CAPACITY_F64).contains(&value) {
        return Err(BitSetError::InvalidCount(value));
    }
    Ok(value as usize)
}

/// Splits a host `BigInt` mask into the word layout of
/// [`BitSet::insert_mask_words`], low word first.
///
/// # Errors
///
/// [`BitSetError::InvalidMask`] if `value` is negative.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn mask_words_from_i128(value: i128) -> Result<[u64; 2], BitSetError> {
    if value < 0 {
        return Err(BitSetError::InvalidMask(value));
    }
    Ok([value as u64, (value >> 64) as u64])
}

/// Membership for an arbitrary host number; never fails.
#[must_use]
pub fn contains_f64(set: &BitSet, value: f64) -> bool {
    position_from_f64(value, set.capacity()).is_ok_and(|position| set.contains(position))
}

fn is_integer(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_accepts_integers() {
        assert_eq!(capacity_from_f64(0.0), Ok(0));
        assert_eq!(capacity_from_f64(20.0), Ok(20));
    }

    #[test]
    fn capacity_rejects_negative_fractional_and_non_finite() {
        for value in [-1.0, 2.5, f64::NAN, f64::INFINITY, MAX_CAPACITY_F64 + 1.0] {
            assert!(matches!(
                capacity_from_f64(value),
                Err(BitSetError::InvalidCapacity(_))
            ));
        }
    }

    #[test]
    fn negative_position_keeps_its_sign() {
        assert_eq!(
            position_from_f64(-3.0, 10),
            Err(BitSetError::OutOfRange {
                position: -3,
                capacity: 10
            })
        );
    }

    #[test]
    fn fractional_position_is_invalid() {
        assert!(matches!(
            position_from_f64(1.5, 10),
            Err(BitSetError::InvalidPosition(_))
        ));
    }

    #[test]
    fn positions_stop_at_first_failure() {
        assert_eq!(positions_from_f64(&[1.0, 2.0], 3), Ok(vec![1, 2]));
        assert_eq!(
            positions_from_f64(&[1.0, 3.0, -1.0], 3),
            Err(BitSetError::OutOfRange {
                position: 3,
                capacity: 3
            })
        );
    }

    #[test]
    fn count_rejects_negative_and_fractional() {
        assert_eq!(count_from_f64(0.0), Ok(0));
        assert_eq!(count_from_f64(5.0), Ok(5));
        for value in [-1.0, 0.5, f64::NAN, f64::NEG_INFINITY, MAX_CAPACITY_F64 + 1.0] {
            assert!(matches!(
                count_from_f64(value),
                Err(BitSetError::InvalidCount(_))
            ));
        }
    }

    #[test]
    fn negative_mask_is_rejected_without_writing() {
        let mut set = BitSet::empty(64).unwrap();
        let result = mask_words_from_i128(-1).and_then(|words| set.insert_mask_words(&words));
        assert_eq!(result, Err(BitSetError::InvalidMask(-1)));
        assert!(set.is_empty());
    }

    #[test]
    fn mask_above_64_bits_is_not_truncated() {
        let mut set = BitSet::empty(64).unwrap();
        let words = mask_words_from_i128((1 << 64) + 1).unwrap();
        assert_eq!(words, [1, 1]);
        assert_eq!(
            set.insert_mask_words(&words),
            Err(BitSetError::OutOfRange {
                position: 64,
                capacity: 64
            })
        );
        assert!(set.is_empty());

        let mut wide = BitSet::empty(65).unwrap();
        wide.insert_mask_words(&words).unwrap();
        assert_eq!(wide.members().collect::<Vec<_>>(), vec![0, 64]);
    }

    #[test]
    fn contains_is_false_outside_range() {
        let set = BitSet::new(8, [0, 7]).unwrap();
        assert!(contains_f64(&set, 0.0));
        assert!(contains_f64(&set, 7.0));
        assert!(!contains_f64(&set, 8.0));
        assert!(!contains_f64(&set, -1.0));
        assert!(!contains_f64(&set, 0.5));
    }
}
