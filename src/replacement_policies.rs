use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cache::Line;

/// A generic trait for implementing new replacement policies. Can be used to
/// parameterise a Cache.
pub trait ReplacementPolicy {
    /// Chooses the way to overwrite within a set on a miss
    ///
    /// Implementations should assume that when this method is called, the
    /// returned line will be replaced
    ///
    /// # Arguments
    ///
    /// * `set`: The lines of the target set, way 0 first
    ///
    /// returns: usize, a way index within the set
    fn select_victim(&mut self, set: &[Line]) -> usize;
}

/// Least recently used replacement
///
/// Recency stamps live on the lines themselves, so the policy carries no
/// state of its own. The first empty way wins outright; otherwise the oldest
/// stamp is evicted, and the strict-improvement scan keeps the earliest way
/// on ties. That tie-break is part of the contract: runs must be reproducible
#[derive(Debug, Default)]
pub struct LeastRecentlyUsed;

impl ReplacementPolicy for LeastRecentlyUsed {
    fn select_victim(&mut self, set: &[Line]) -> usize {
        let mut victim = 0;
        let mut oldest = u64::MAX;
        for (way, line) in set.iter().enumerate() {
            if !line.valid {
                return way;
            }
            if line.recency < oldest {
                oldest = line.recency;
                victim = way;
            }
        }
        victim
    }
}

/// Uniform random replacement
///
/// Every way is equally eligible, valid or not, so a random victim can land
/// on an empty way even while valid lines exist
#[derive(Debug)]
pub struct RandomReplacement {
    rng: StdRng,
}

impl RandomReplacement {
    /// A seed pins the eviction sequence; without one the rng is seeded from
    /// operating system entropy
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl ReplacementPolicy for RandomReplacement {
    fn select_victim(&mut self, set: &[Line]) -> usize {
        self.rng.gen_range(0..set.len())
    }
}
