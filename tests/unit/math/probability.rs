//! Tests for seeded weighted and multiset sampling

#[cfg(test)]
mod tests {
    use tilecollapse::math::probability::RandomSelector;

    // Tests all-zero weights yield no choice
    // Verified by returning index 0 for a zero total
    #[test]
    fn test_weighted_choice_zero_total() {
        let mut selector = RandomSelector::new(1);
        assert_eq!(selector.weighted_choice(&[0, 0, 0]), None);
        assert_eq!(selector.weighted_choice(&[]), None);
    }

    // Tests zero-weight entries are never drawn
    // Verified by using <= instead of < in the cumulative walk
    #[test]
    fn test_weighted_choice_skips_zero_weights() {
        let mut selector = RandomSelector::new(7);
        for _ in 0..200 {
            assert_eq!(selector.weighted_choice(&[0, 5, 0]), Some(1));
        }
    }

    // Tests weights that overflow u64 are refused
    // Verified by using saturating_add in the total
    #[test]
    fn test_weighted_choice_overflow() {
        let mut selector = RandomSelector::new(3);
        assert_eq!(selector.weighted_choice(&[u64::MAX, 1]), None);
    }

    // Tests draws follow the weight ratio
    // Verified by ignoring weights and drawing uniformly
    #[test]
    fn test_weighted_choice_distribution() {
        let mut selector = RandomSelector::new(42);
        let mut hits = [0usize; 2];
        for _ in 0..4000 {
            if let Some(slot) = selector
                .weighted_choice(&[3, 1])
                .and_then(|index| hits.get_mut(index))
            {
                *slot += 1;
            }
        }
        let [heavy, light] = hits;
        assert!((2700..=3300).contains(&heavy), "hits: {hits:?}");
        assert_eq!(heavy + light, 4000);
    }

    // Tests the same seed reproduces the same sequence
    // Verified by seeding from entropy
    #[test]
    fn test_seed_determinism() {
        let mut first = RandomSelector::new(99);
        let mut second = RandomSelector::new(99);
        let a: Vec<Option<usize>> = (0..32).map(|_| first.uniform_choice(10)).collect();
        let b: Vec<Option<usize>> = (0..32).map(|_| second.uniform_choice(10)).collect();
        assert_eq!(a, b);
        assert_eq!(first.uniform_choice(0), None);
    }
}
