use anyhow::anyhow;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro128Plus;

use crate::bit_set::BitSet;
use crate::error::BitSetError;

impl BitSet {
    /// Draws `samples` positions uniformly from `[0, capacity)` and inserts
    /// them. Repeated draws merge, so the result may hold fewer members.
    /// Drawing stops early once every position is a member.
    ///
    /// # Errors
    ///
    /// [`BitSetError::InvalidCapacity`] if `capacity` exceeds the maximum.
    pub fn random<R: Rng>(
        capacity: usize,
        samples: usize,
        rng: &mut R,
    ) -> Result<Self, BitSetError> {
        let mut set = Self::empty(capacity)?;
        let mut members = 0;
        for _ in 0..samples {
            if members == capacity {
                break;
            }
            if set.insert(rng.random_range(0..capacity))? {
                members += 1;
            }
        }
        Ok(set)
    }
}

pub(crate) fn seeded_rng() -> anyhow::Result<Xoshiro128Plus> {
    let mut seed = [0u8; 16];
    getrandom::fill(&mut seed).map_err(|e| anyhow!("RNG seed failed: {e}"))?;
    Ok(Xoshiro128Plus::from_seed(seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_stay_in_range() {
        let mut rng = Xoshiro128Plus::seed_from_u64(7);
        for capacity in [1, 20, 64, 65, 500] {
            let set = BitSet::random(capacity, 5, &mut rng).unwrap();
            assert!(set.count() >= 1 && set.count() <= 5);
            assert!(set.members().all(|m| m < capacity));
        }
    }

    #[test]
    fn zero_capacity_has_no_members() {
        let mut rng = Xoshiro128Plus::seed_from_u64(0);
        let set = BitSet::random(0, 10, &mut rng).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn stops_drawing_once_full() {
        let mut rng = Xoshiro128Plus::seed_from_u64(3);
        let set = BitSet::random(8, usize::MAX, &mut rng).unwrap();
        assert_eq!(set.count(), 8);
    }

    #[test]
    fn same_seed_same_set() {
        let a = BitSet::random(100, 10, &mut Xoshiro128Plus::seed_from_u64(42)).unwrap();
        let b = BitSet::random(100, 10, &mut Xoshiro128Plus::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn seeded_rng_is_available() {
        let mut rng = seeded_rng().unwrap();
        let set = BitSet::random(16, 3, &mut rng).unwrap();
        assert!(!set.is_empty());
    }
}
