use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use winnow::{
    Parser,
    combinator::{opt, preceded},
    token::take_while,
};

use crate::bit_set::BitSet;
use crate::error::BitSetError;

/// Binary digits, most-significant first, with an optional `0b` prefix.
fn binary_digits<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    preceded(opt("0b"), take_while(0.., ('0', '1'))).parse_next(input)
}

/// Parses the [`BitSet::to_binary_string`] form. The capacity is the number
/// of digits and the last digit is position 0.
///
/// # Errors
///
/// [`BitSetError::Parse`] if `text` holds anything besides the digits.
pub fn parse_binary_str(text: &str) -> Result<BitSet, BitSetError> {
    let digits = binary_digits
        .parse(text)
        .map_err(|e| BitSetError::Parse(e.to_string()))?;
    let capacity = digits.len();
    let members = digits
        .bytes()
        .enumerate()
        .filter(|&(_, digit)| digit == b'1')
        .map(|(i, _)| capacity - 1 - i);
    BitSet::new(capacity, members)
}

impl FromStr for BitSet {
    type Err = BitSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_binary_str(s)
    }
}

impl Serialize for BitSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_binary_string())
    }
}

impl<'de> Deserialize<'de> for BitSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_binary_str(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_digit_is_position_zero() {
        let set: BitSet = "00000101".parse().unwrap();
        assert_eq!(set.capacity(), 8);
        assert_eq!(set.members().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn accepts_prefix() {
        let set: BitSet = "0b100".parse().unwrap();
        assert_eq!(set.capacity(), 3);
        assert_eq!(set.members().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn empty_string_is_empty_capacity() {
        let set: BitSet = "".parse().unwrap();
        assert_eq!(set.capacity(), 0);
    }

    #[test]
    fn rejects_other_characters() {
        for text in ["0120", "10 1", "0x11", "b01"] {
            assert!(
                matches!(text.parse::<BitSet>(), Err(BitSetError::Parse(_))),
                "{text}"
            );
        }
    }
}
