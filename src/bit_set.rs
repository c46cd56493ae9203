use std::fmt;
use std::iter::FusedIterator;

use crate::error::BitSetError;

type Word = u64;

const WORD_BITS: usize = Word::BITS as usize;

/// Largest capacity a [`BitSet`] accepts.
pub const MAX_CAPACITY: usize = u32::MAX as usize;

/// A set of integers in `[0, capacity)` packed into 64-bit words.
///
/// Position `p` lives in word `p / 64`, least-significant bit first. Bits at
/// or beyond `capacity` are always zero, and no operation clears a bit once
/// it is set.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct BitSet {
    capacity: usize,
    words: Vec<Word>,
}

impl BitSet {
    /// Creates a set holding exactly `members`.
    ///
    /// # Errors
    ///
    /// [`BitSetError::InvalidCapacity`] if `capacity` exceeds [`MAX_CAPACITY`],
    /// [`BitSetError::OutOfRange`] if any member is not below `capacity`.
    pub fn new(
        capacity: usize,
        members: impl IntoIterator<Item = usize>,
    ) -> Result<Self, BitSetError> {
        let mut set = Self::empty(capacity)?;
        set.insert_many(members)?;
        Ok(set)
    }

    /// Creates a set with no members.
    ///
    /// # Errors
    ///
    /// [`BitSetError::InvalidCapacity`] if `capacity` exceeds [`MAX_CAPACITY`].
    pub fn empty(capacity: usize) -> Result<Self, BitSetError> {
        if capacity > MAX_CAPACITY {
            #[allow(clippy::cast_precision_loss)]
            return Err(BitSetError::InvalidCapacity(capacity as f64));
        }
        Ok(Self {
            capacity,
            words: vec![0; capacity.div_ceil(WORD_BITS)],
        })
    }

    /// Creates a set whose members are the set bits of `mask`, bit 0 being
    /// position 0.
    ///
    /// # Errors
    ///
    /// As [`BitSet::empty`], or [`BitSetError::OutOfRange`] if `mask` has a
    /// bit at or above `capacity`.
    pub fn from_mask(capacity: usize, mask: u64) -> Result<Self, BitSetError> {
        let mut set = Self::empty(capacity)?;
        set.insert_mask(mask)?;
        Ok(set)
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of members.
    #[must_use]
    pub fn count(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    #[must_use]
    pub fn as_words(&self) -> &[u64] {
        &self.words
    }

    /// Adds `position`, returning `true` if it was not already a member.
    ///
    /// # Errors
    ///
    /// [`BitSetError::OutOfRange`] if `position >= capacity`.
    pub fn insert(&mut self, position: usize) -> Result<bool, BitSetError> {
        self.check(position)?;
        let (word_index, mask) = location(position);
        let already_present = (self.words[word_index] & mask) != 0;
        self.words[word_index] |= mask;
        Ok(!already_present)
    }

    /// Adds every position in `positions`. Nothing is written unless all of
    /// them are in range.
    ///
    /// # Errors
    ///
    /// [`BitSetError::OutOfRange`] for the first position not below `capacity`.
    pub fn insert_many(
        &mut self,
        positions: impl IntoIterator<Item = usize>,
    ) -> Result<(), BitSetError> {
        let positions = positions
            .into_iter()
            .map(|position| self.check(position).map(|()| position))
            .collect::<Result<Vec<_>, _>>()?;
        for position in positions {
            let (word_index, mask) = location(position);
            self.words[word_index] |= mask;
        }
        debug_assert!(self.tail_is_clear());
        Ok(())
    }

    /// ORs `mask` into the set, bit 0 being position 0. Only positions below
    /// 64 can be named this way; use [`BitSet::insert_mask_words`] for wider
    /// masks.
    ///
    /// # Errors
    ///
    /// [`BitSetError::OutOfRange`] naming the highest bit of `mask` at or
    /// above `capacity`. The set is left unchanged.
    pub fn insert_mask(&mut self, mask: u64) -> Result<(), BitSetError> {
        self.insert_mask_words(&[mask])
    }

    /// ORs a multi-word mask into the set, laid out like [`BitSet::as_words`]:
    /// bit `b` of `mask[i]` is position `64 * i + b`. Trailing zero words are
    /// allowed even past the storage length.
    ///
    /// # Errors
    ///
    /// [`BitSetError::OutOfRange`] naming the highest set bit at or above
    /// `capacity`. The set is left unchanged.
    pub fn insert_mask_words(&mut self, mask: &[u64]) -> Result<(), BitSetError> {
        let Some((index, &top)) = mask.iter().enumerate().rfind(|&(_, &word)| word != 0) else {
            return Ok(());
        };
        let highest = index * WORD_BITS + (Word::BITS - 1 - top.leading_zeros()) as usize;
        self.check(highest)?;
        for (word, &bits) in self.words.iter_mut().zip(mask) {
            *word |= bits;
        }
        debug_assert!(self.tail_is_clear());
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, position: usize) -> bool {
        if position >= self.capacity {
            return false;
        }
        let (word_index, mask) = location(position);
        (self.words[word_index] & mask) != 0
    }

    /// Checked lookup of a single bit.
    ///
    /// # Errors
    ///
    /// [`BitSetError::OutOfRange`] if `position >= capacity`.
    pub fn get(&self, position: usize) -> Result<bool, BitSetError> {
        self.check(position)?;
        Ok(self.contains(position))
    }

    /// Members in ascending order. Each call starts a fresh scan.
    #[must_use]
    pub fn members(&self) -> Members<'_> {
        Members {
            words: &self.words,
            word_index: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    /// One flag per position, position 0 first.
    #[must_use]
    pub fn bits(&self) -> Bits<'_> {
        Bits {
            set: self,
            front: 0,
            back: self.capacity,
        }
    }

    /// Renders the set as `capacity` binary digits, most-significant first:
    /// the last character is position 0, as in a binary literal of the mask.
    #[must_use]
    pub fn to_binary_string(&self) -> String {
        self.bits()
            .rev()
            .map(|bit| if bit { '1' } else { '0' })
            .collect()
    }

    /// The set as an integer bitmask, or `None` if a member is 64 or above.
    #[must_use]
    pub fn to_mask(&self) -> Option<u64> {
        match self.words.split_first() {
            None => Some(0),
            Some((&first, rest)) => rest.iter().all(|&word| word == 0).then_some(first),
        }
    }

    fn check(&self, position: usize) -> Result<(), BitSetError> {
        if position < self.capacity {
            Ok(())
        } else {
            Err(BitSetError::out_of_range(position, self.capacity))
        }
    }

    fn tail_is_clear(&self) -> bool {
        let used = self.capacity % WORD_BITS;
        match self.words.last() {
            Some(&last) if used != 0 => last >> used == 0,
            _ => true,
        }
    }
}

impl fmt::Display for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BitSet(capacity={}, bits={}, count={})",
            self.capacity,
            self.to_binary_string(),
            self.count()
        )
    }
}

impl<'a> IntoIterator for &'a BitSet {
    type Item = bool;
    type IntoIter = Bits<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.bits()
    }
}

fn location(position: usize) -> (usize, Word) {
    (position / WORD_BITS, 1 << (position % WORD_BITS))
}

/// Ascending iterator over the members of a [`BitSet`].
#[derive(Clone, Debug)]
pub struct Members<'a> {
    words: &'a [Word],
    word_index: usize,
    current: Word,
}

impl Iterator for Members<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.current == 0 {
            self.word_index += 1;
            self.current = *self.words.get(self.word_index)?;
        }
        let bit = self.current.trailing_zeros() as usize;
        // clear lowest set bit
        self.current &= self.current - 1;
        Some(self.word_index * WORD_BITS + bit)
    }
}

impl FusedIterator for Members<'_> {}

/// Iterator over every position of a [`BitSet`] as a flag, position 0 first.
#[derive(Clone, Debug)]
pub struct Bits<'a> {
    set: &'a BitSet,
    front: usize,
    back: usize,
}

impl Iterator for Bits<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.front == self.back {
            return None;
        }
        let bit = self.set.contains(self.front);
        self.front += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for Bits<'_> {
    fn next_back(&mut self) -> Option<bool> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(self.set.contains(self.back))
    }
}

impl ExactSizeIterator for Bits<'_> {}

impl FusedIterator for Bits<'_> {}
