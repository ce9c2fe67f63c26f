//! Owned open-addressing map with linear probing
//!
//! Shared by the content-keyed pattern table and the coordinate-keyed
//! adjacency index. Keys supply their own bucket hash through [`ProbeKey`];
//! equality is always checked with `Eq` so colliding hashes never merge
//! distinct keys.

use crate::io::configuration::{GROWTH_FACTOR, INITIAL_TABLE_CAPACITY, MAX_LOAD_FACTOR};
use crate::io::error::{Result, WithOperation, allocation_failure, computation_error};

/// Key usable in a [`ProbingTable`]
///
/// The hash only picks the starting slot, so it may be weak and
/// non-cryptographic.
pub trait ProbeKey: Eq {
    /// Bucket selector for this key
    fn probe_hash(&self) -> u64;
}

#[derive(Debug, Clone)]
struct Slot<K, V> {
    key: K,
    value: V,
}

/// Outcome of walking a probe sequence for a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    Occupied(usize),
    Vacant(usize),
    Exhausted,
}

/// Counters describing how a table has been exercised
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableStats {
    /// Number of times storage was grown and rehashed
    pub growths: usize,
    /// Extra probe steps taken past the home slot while inserting
    pub collisions: usize,
}

/// Open-addressing hash map with linear probing and load-factor growth
///
/// Before a new key is stored, the table grows by [`GROWTH_FACTOR`] if
/// `(len + 1) / capacity` would reach [`MAX_LOAD_FACTOR`], so a probe
/// sequence always meets a vacant slot.
#[derive(Debug, Clone)]
pub struct ProbingTable<K, V> {
    slots: Vec<Option<Slot<K, V>>>,
    length: usize,
    stats: TableStats,
}

impl<K: ProbeKey, V> ProbingTable<K, V> {
    /// Create a table with [`INITIAL_TABLE_CAPACITY`] slots
    ///
    /// # Errors
    ///
    /// Returns an error if the slot storage cannot be reserved
    pub fn new() -> Result<Self> {
        Self::with_capacity(INITIAL_TABLE_CAPACITY)
    }

    /// Create a table with at least one and exactly `max(capacity, 1)` slots
    ///
    /// # Errors
    ///
    /// Returns an error if the slot storage cannot be reserved
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            slots: Self::allocate_slots(capacity.max(1))?,
            length: 0,
            stats: TableStats::default(),
        })
    }

    fn allocate_slots(capacity: usize) -> Result<Vec<Option<Slot<K, V>>>> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .with_operation("probing table storage", capacity)?;
        slots.resize_with(capacity, || None);
        Ok(slots)
    }

    /// Number of stored entries
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Whether the table holds no entries
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Growth and collision counters
    pub const fn stats(&self) -> TableStats {
        self.stats
    }

    fn home_index(key: &K, capacity: usize) -> usize {
        (key.probe_hash() % capacity as u64) as usize
    }

    fn probe(&self, key: &K) -> (Probe, usize) {
        let capacity = self.slots.len();
        let mut index = Self::home_index(key, capacity);

        for step in 0..capacity {
            match self.slots.get(index) {
                Some(Some(slot)) if slot.key == *key => return (Probe::Occupied(index), step),
                Some(Some(_)) => index = (index + 1) % capacity,
                _ => return (Probe::Vacant(index), step),
            }
        }

        (Probe::Exhausted, capacity)
    }

    /// Look up the value stored for `key`
    pub fn get(&self, key: &K) -> Option<&V> {
        match self.probe(key).0 {
            Probe::Occupied(index) => self
                .slots
                .get(index)
                .and_then(Option::as_ref)
                .map(|slot| &slot.value),
            Probe::Vacant(_) | Probe::Exhausted => None,
        }
    }

    /// Mutable access to the value stored for `key`
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.probe(key).0 {
            Probe::Occupied(index) => self
                .slots
                .get_mut(index)
                .and_then(Option::as_mut)
                .map(|slot| &mut slot.value),
            Probe::Vacant(_) | Probe::Exhausted => None,
        }
    }

    /// Whether `key` has an entry
    pub fn contains_key(&self, key: &K) -> bool {
        matches!(self.probe(key).0, Probe::Occupied(_))
    }

    /// Return the existing value for `key`, or store `value` and return it
    ///
    /// # Errors
    ///
    /// Returns an error if the table needs to grow and the new storage
    /// cannot be reserved; the table is left unchanged in that case
    pub fn get_or_insert(&mut self, key: K, value: V) -> Result<&V> {
        if let (Probe::Occupied(index), _) = self.probe(&key) {
            return self
                .slots
                .get(index)
                .and_then(Option::as_ref)
                .map(|slot| &slot.value)
                .ok_or_else(|| computation_error("probing table lookup", &"occupied slot vanished"));
        }

        let stored = self.insert_new(key, value)?;
        Ok(&stored.value)
    }

    /// Store `value` under `key`, returning the value it replaced
    ///
    /// # Errors
    ///
    /// Returns an error if a new key forces growth and the new storage
    /// cannot be reserved; the table is left unchanged in that case
    pub fn set(&mut self, key: K, value: V) -> Result<Option<V>> {
        if let (Probe::Occupied(index), _) = self.probe(&key) {
            if let Some(Some(slot)) = self.slots.get_mut(index) {
                return Ok(Some(std::mem::replace(&mut slot.value, value)));
            }
        }

        self.insert_new(key, value)?;
        Ok(None)
    }

    // Caller guarantees `key` is absent
    fn insert_new(&mut self, key: K, value: V) -> Result<&mut Slot<K, V>> {
        let load_factor = (self.length + 1) as f64 / self.capacity() as f64;
        if load_factor >= MAX_LOAD_FACTOR {
            self.grow()?;
        }

        let (probe, steps) = self.probe(&key);
        let Probe::Vacant(index) = probe else {
            return Err(computation_error(
                "probing table insert",
                &format!("no vacant slot among {} slots", self.capacity()),
            ));
        };

        let slot = self
            .slots
            .get_mut(index)
            .ok_or_else(|| computation_error("probing table insert", &"slot out of range"))?;
        self.length += 1;
        self.stats.collisions += steps;
        Ok(slot.insert(Slot { key, value }))
    }

    /// Rehash every entry into fresh storage [`GROWTH_FACTOR`] times larger
    fn grow(&mut self) -> Result<()> {
        let new_capacity = self
            .capacity()
            .checked_mul(GROWTH_FACTOR)
            .ok_or_else(|| allocation_failure("probing table growth", usize::MAX))?;
        let mut new_slots = Self::allocate_slots(new_capacity)?;

        for slot in std::mem::take(&mut self.slots).into_iter().flatten() {
            let mut index = Self::home_index(&slot.key, new_capacity);
            while new_slots.get(index).is_some_and(Option::is_some) {
                index = (index + 1) % new_capacity;
            }
            if let Some(target) = new_slots.get_mut(index) {
                *target = Some(slot);
            }
        }

        self.slots = new_slots;
        self.stats.growths += 1;
        tracing::debug!(
            capacity = new_capacity,
            entries = self.length,
            "probing table grown"
        );
        Ok(())
    }

    /// Entries in slot order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref().map(|slot| (&slot.key, &slot.value)))
    }

    /// Keys in slot order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }
}
