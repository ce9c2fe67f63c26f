use rand::{Rng, SeedableRng, rngs::StdRng};

/// Seeded random selector for reproducible stochastic choices
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Integer-weighted random selection
    ///
    /// Returns an index into `weights` with probability proportional to its
    /// weight, or `None` when every weight is zero.
    pub fn weighted_choice(&mut self, weights: &[u64]) -> Option<usize> {
        let total = weights
            .iter()
            .try_fold(0u64, |sum, &weight| sum.checked_add(weight))?;
        if total == 0 {
            return None;
        }

        let mut remaining = self.rng.random_range(0..total);
        for (index, &weight) in weights.iter().enumerate() {
            if remaining < weight {
                return Some(index);
            }
            remaining -= weight;
        }
        None
    }

    /// Uniform choice of an index below `len`
    pub fn uniform_choice(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.rng.random_range(0..len))
    }
}
