//! Tests for the linear-probing table: lookup, collisions and growth

#[cfg(test)]
mod tests {
    use tilecollapse::Result;
    use tilecollapse::analysis::table::{ProbeKey, ProbingTable};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct SameBucket(u32);

    impl ProbeKey for SameBucket {
        fn probe_hash(&self) -> u64 {
            0
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Spread(u64);

    impl ProbeKey for Spread {
        fn probe_hash(&self) -> u64 {
            self.0
        }
    }

    // Tests keys sharing a bucket stay distinct
    // Verified by comparing only hashes during probing
    #[test]
    fn test_colliding_keys_distinct() -> Result<()> {
        let mut table = ProbingTable::with_capacity(16)?;
        for key in 0..3 {
            table.set(SameBucket(key), key * 10)?;
        }

        assert_eq!(table.len(), 3);
        assert_eq!(table.get(&SameBucket(0)), Some(&0));
        assert_eq!(table.get(&SameBucket(2)), Some(&20));
        assert_eq!(table.get(&SameBucket(3)), None);
        assert_eq!(table.stats().collisions, 3);
        Ok(())
    }

    // Tests get_or_insert keeps the first value
    // Verified by overwriting on an existing key
    #[test]
    fn test_get_or_insert_keeps_first() -> Result<()> {
        let mut table = ProbingTable::new()?;
        assert_eq!(table.get_or_insert(Spread(5), "first")?, &"first");
        assert_eq!(table.get_or_insert(Spread(5), "second")?, &"first");
        assert_eq!(table.len(), 1);
        Ok(())
    }

    // Tests set replaces and returns the previous value
    // Verified by inserting a duplicate entry instead of replacing
    #[test]
    fn test_set_replaces() -> Result<()> {
        let mut table = ProbingTable::new()?;
        assert_eq!(table.set(Spread(1), 1)?, None);
        assert_eq!(table.set(Spread(1), 2)?, Some(1));
        assert_eq!(table.get(&Spread(1)), Some(&2));
        assert_eq!(table.len(), 1);

        if let Some(value) = table.get_mut(&Spread(1)) {
            *value = 3;
        }
        assert_eq!(table.get(&Spread(1)), Some(&3));
        Ok(())
    }

    // Tests growth triggers at the load factor and doubles capacity
    // Verified by checking the load factor after inserting
    #[test]
    fn test_growth_threshold() -> Result<()> {
        let mut table = ProbingTable::with_capacity(4)?;
        table.set(Spread(0), ())?;
        table.set(Spread(1), ())?;
        assert_eq!(table.capacity(), 4);

        table.set(Spread(2), ())?;
        assert_eq!(table.capacity(), 8);
        assert_eq!(table.stats().growths, 1);
        Ok(())
    }

    // Tests every entry survives repeated rehashing
    // Verified by rehashing with the old capacity as modulus
    #[test]
    fn test_growth_preserves_entries() -> Result<()> {
        let mut table = ProbingTable::with_capacity(1)?;
        for key in 0..500 {
            table.set(Spread(key * 7), key)?;
        }

        assert_eq!(table.len(), 500);
        assert!(table.stats().growths >= 9);
        assert!((table.len() as f64) / (table.capacity() as f64) < 0.75);
        for key in 0..500 {
            assert_eq!(table.get(&Spread(key * 7)), Some(&key));
        }
        assert!(!table.contains_key(&Spread(1)));
        Ok(())
    }

    // Tests iteration visits each entry exactly once
    // Verified by yielding empty slots from iter
    #[test]
    fn test_iter_visits_entries() -> Result<()> {
        let mut table = ProbingTable::new()?;
        for key in [3, 9, 27] {
            table.set(Spread(key), key)?;
        }
        let mut keys: Vec<u64> = table.keys().map(|key| key.0).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec![3, 9, 27]);
        assert_eq!(table.iter().count(), 3);
        Ok(())
    }
}
