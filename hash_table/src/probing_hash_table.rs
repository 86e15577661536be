use std::borrow::Borrow;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{BuildHasher, BuildHasherDefault, Hash};
use std::{mem, slice};

use crate::error::TableError;
use crate::prime::next_prime;

/// Capacity hint used by [`ProbingHashTable::new`], sized for a dictionary.
pub const DEFAULT_CAPACITY: usize = 10_000;

enum Slot<T> {
    Empty,
    // a tombstoned slot still belongs to every probe sequence passing through it
    Occupied { element: T, tombstone: bool },
}

impl<T> Slot<T> {
    fn live(&self) -> Option<&T> {
        match self {
            Slot::Occupied {
                element,
                tombstone: false,
            } => Some(element),
            _ => None,
        }
    }
}

/// Open addressing set with linear probing and lazy deletion.
///
/// The capacity is always a prime. The table grows to `next_prime(2 * capacity)`
/// as soon as more than half of its slots hold live elements, and never shrinks.
///
/// The default hasher is SipHash with fixed keys, so slot positions are
/// reproducible between runs.
pub struct ProbingHashTable<T, S = BuildHasherDefault<DefaultHasher>> {
    table: Vec<Slot<T>>,
    hasher: S,
    size: usize,
}

impl<T: Eq + Hash> ProbingHashTable<T> {
    pub fn new() -> Self {
        Self::with_hasher(BuildHasherDefault::default())
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, TableError> {
        Self::with_capacity_and_hasher(capacity, BuildHasherDefault::default())
    }
}

impl<T: Eq + Hash> Default for ProbingHashTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash, S: BuildHasher> ProbingHashTable<T, S> {
    pub fn with_hasher(hasher: S) -> Self {
        let capacity = next_prime(DEFAULT_CAPACITY);
        Self {
            table: empty_slots(Vec::with_capacity(capacity), capacity),
            hasher,
            size: 0,
        }
    }

    /// Creates a table of `next_prime(capacity)` empty slots.
    ///
    /// # Errors
    ///
    /// `TableError::InvalidCapacity` when `capacity` is zero, `TableError::Allocation`
    /// when the slots can not be allocated.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Result<Self, TableError> {
        if capacity == 0 {
            return Err(TableError::InvalidCapacity(capacity));
        }

        Ok(Self {
            table: allocate(next_prime(capacity))?,
            hasher,
            size: 0,
        })
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of slots, live or not.
    pub fn capacity(&self) -> usize {
        self.table.len()
    }

    pub fn clear(&mut self) {
        self.table.iter_mut().for_each(|slot| *slot = Slot::Empty);
        self.size = 0;
    }

    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find_slot(element)
            .is_some_and(|index| self.table[index].live().is_some())
    }

    /// Inserts `element`, returning `Ok(false)` if it was already present.
    ///
    /// A slot holding a tombstoned copy of `element` is reused. When the new element
    /// would make more than half of the slots live, the table grows first.
    ///
    /// # Errors
    ///
    /// `TableError::Allocation` if a grow can not allocate the new slots. The table is
    /// left as it was before the call and `element` is not inserted.
    pub fn insert(&mut self, element: T) -> Result<bool, TableError> {
        let mut index = self.insert_slot(&element)?;
        if self.table[index].live().is_some() {
            return Ok(false);
        }

        if self.size + 1 > self.table.len() / 2 {
            self.grow()?;
            index = self.insert_slot(&element)?;
        }

        self.table[index] = Slot::Occupied {
            element,
            tombstone: false,
        };
        self.size += 1;

        Ok(true)
    }

    /// Marks `element` as removed, returning `false` if it was not present.
    pub fn remove<Q>(&mut self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(index) = self.find_slot(element) else {
            return false;
        };

        match &mut self.table[index] {
            Slot::Occupied { tombstone, .. } if !*tombstone => {
                *tombstone = true;
                self.size -= 1;
                true
            }
            _ => false,
        }
    }

    /// Live elements in slot order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            slots: self.table.iter(),
        }
    }

    fn home<Q>(&self, element: &Q) -> usize
    where
        Q: Hash + ?Sized,
    {
        (self.hasher.hash_one(element) % self.table.len() as u64) as usize
    }

    // First slot on the probe sequence that is empty or holds `element` (tombstoned or not).
    // `None` after a full cycle over non-matching occupied slots.
    fn find_slot<Q>(&self, element: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let capacity = self.table.len();
        let mut index = self.home(element);
        for _ in 0..capacity {
            match &self.table[index] {
                Slot::Empty => return Some(index),
                Slot::Occupied { element: existing, .. } if existing.borrow() == element => {
                    return Some(index)
                }
                Slot::Occupied { .. } => index = (index + 1) % capacity,
            }
        }

        None
    }

    fn insert_slot(&mut self, element: &T) -> Result<usize, TableError> {
        loop {
            if let Some(index) = self.find_slot(element) {
                return Ok(index);
            }
            // no empty slot left, only tombstones; a grow discards them
            self.grow()?;
        }
    }

    fn grow(&mut self) -> Result<(), TableError> {
        let table = allocate(next_prime(2 * self.table.len()))?;
        let old_table = mem::replace(&mut self.table, table);

        self.size = 0;
        for slot in old_table {
            if let Slot::Occupied {
                element,
                tombstone: false,
            } = slot
            {
                self.place(element);
            }
        }

        Ok(())
    }

    // Rehash path: elements are distinct and the table holds no tombstones.
    fn place(&mut self, element: T) {
        let capacity = self.table.len();
        let mut index = self.home(&element);
        while matches!(self.table[index], Slot::Occupied { .. }) {
            index = (index + 1) % capacity;
        }

        self.table[index] = Slot::Occupied {
            element,
            tombstone: false,
        };
        self.size += 1;
    }
}

fn allocate<T>(capacity: usize) -> Result<Vec<Slot<T>>, TableError> {
    let mut table = Vec::new();
    table
        .try_reserve_exact(capacity)
        .map_err(|source| TableError::Allocation { capacity, source })?;
    Ok(empty_slots(table, capacity))
}

fn empty_slots<T>(mut table: Vec<Slot<T>>, capacity: usize) -> Vec<Slot<T>> {
    table.resize_with(capacity, || Slot::Empty);
    table
}

impl<T: fmt::Debug, S> fmt::Debug for ProbingHashTable<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.table.iter().filter_map(Slot::live))
            .finish()
    }
}

pub struct Iter<'a, T> {
    slots: slice::Iter<'a, Slot<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.slots.by_ref().find_map(Slot::live)
    }
}

impl<'a, T: Eq + Hash, S: BuildHasher> IntoIterator for &'a ProbingHashTable<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prime::is_prime;
    use std::hash::Hasher;

    // Sends every element to slot 0.
    #[derive(Default)]
    struct Colliding;

    impl Hasher for Colliding {
        fn finish(&self) -> u64 {
            0
        }

        fn write(&mut self, _bytes: &[u8]) {}
    }

    type CollidingState = BuildHasherDefault<Colliding>;

    #[test]
    fn test_basic_methods() {
        let mut hash_table = ProbingHashTable::with_capacity(10).unwrap();

        assert!(hash_table.insert("apple").unwrap());
        assert!(hash_table.insert("banana").unwrap());
        assert!(hash_table.insert("orange").unwrap());

        assert!(hash_table.contains(&"apple"));
        assert!(hash_table.contains(&"banana"));
        assert!(!hash_table.contains(&"grape"));
        assert_eq!(hash_table.len(), 3);

        assert!(hash_table.remove(&"banana"));
        assert!(!hash_table.contains(&"banana"));
        assert!(!hash_table.remove(&"banana"));
        assert_eq!(hash_table.len(), 2);

        assert!(hash_table.insert("banana").unwrap());
        assert!(hash_table.contains(&"banana"));
        assert_eq!(hash_table.len(), 3);
    }

    #[test]
    fn test_default_capacity() {
        let hash_table = ProbingHashTable::<String>::new();
        assert_eq!(hash_table.capacity(), 10_007);
        assert!(hash_table.is_empty());
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let result = ProbingHashTable::<u32>::with_capacity(0);
        assert!(matches!(result, Err(TableError::InvalidCapacity(0))));
    }

    #[test]
    fn test_no_duplicates() {
        let mut hash_table = ProbingHashTable::with_capacity(7).unwrap();

        assert!(hash_table.insert(42).unwrap());
        assert!(!hash_table.insert(42).unwrap());
        assert_eq!(hash_table.len(), 1);
    }

    #[test]
    fn test_borrowed_lookup() {
        let mut hash_table = ProbingHashTable::with_capacity(7).unwrap();
        hash_table.insert(String::from("tor")).unwrap();

        assert!(hash_table.contains("tor"));
        assert!(!hash_table.contains("torn"));
        assert!(hash_table.remove("tor"));
        assert!(hash_table.is_empty());
    }

    #[test]
    fn test_grow_on_half_full() {
        let mut hash_table = ProbingHashTable::with_capacity(5).unwrap();
        assert_eq!(hash_table.capacity(), 5);

        hash_table.insert(1).unwrap();
        hash_table.insert(2).unwrap();
        assert_eq!(hash_table.capacity(), 5);

        hash_table.insert(3).unwrap();
        assert_eq!(hash_table.capacity(), 11);

        for i in 4..=6 {
            hash_table.insert(i).unwrap();
        }
        assert_eq!(hash_table.capacity(), 23);

        for i in 1..=6 {
            assert!(hash_table.contains(&i));
        }
        assert_eq!(hash_table.len(), 6);
    }

    #[test]
    fn test_grow_skips_removed_elements() {
        let mut hash_table = ProbingHashTable::with_capacity(5).unwrap();
        hash_table.insert(1).unwrap();
        hash_table.insert(2).unwrap();
        hash_table.remove(&1);
        hash_table.insert(3).unwrap();
        hash_table.insert(4).unwrap();

        assert_eq!(hash_table.capacity(), 11);
        assert_eq!(hash_table.len(), 3);
        assert!(!hash_table.contains(&1));
        assert_eq!(hash_table.iter().count(), 3);
    }

    #[test]
    fn test_tombstone_keeps_probe_chain() {
        let mut hash_table =
            ProbingHashTable::with_capacity_and_hasher(11, CollidingState::default()).unwrap();

        hash_table.insert("a").unwrap();
        hash_table.insert("b").unwrap();
        hash_table.insert("c").unwrap();
        assert_eq!(hash_table.iter().copied().collect::<Vec<_>>(), ["a", "b", "c"]);

        assert!(hash_table.remove(&"b"));
        assert!(hash_table.contains(&"c"));
        assert!(!hash_table.contains(&"b"));
        assert!(hash_table.remove(&"c"));

        // "b" comes back into its old slot, ahead of the tombstoned "c"
        assert!(hash_table.insert("b").unwrap());
        assert!(hash_table.insert("d").unwrap());
        assert_eq!(hash_table.iter().copied().collect::<Vec<_>>(), ["a", "b", "d"]);
        assert_eq!(hash_table.len(), 3);
    }

    #[test]
    fn test_churn_through_tombstones() {
        let mut hash_table =
            ProbingHashTable::with_capacity_and_hasher(5, CollidingState::default()).unwrap();

        for i in 0..5 {
            hash_table.insert(i).unwrap();
            hash_table.remove(&i);
        }
        assert_eq!(hash_table.capacity(), 5);
        assert!(hash_table.is_empty());
        assert!(!hash_table.contains(&99));
        assert!(!hash_table.remove(&99));

        assert!(hash_table.insert(5).unwrap());
        assert_eq!(hash_table.capacity(), 11);
        assert!(hash_table.contains(&5));
        assert_eq!(hash_table.len(), 1);
    }

    #[test]
    fn test_grows_before_exceeding_half_full() {
        let mut hash_table = ProbingHashTable::with_capacity(7).unwrap();
        for i in 0..50 {
            let capacity = hash_table.capacity();
            let grows = hash_table.len() + 1 > capacity / 2;

            hash_table.insert(i).unwrap();
            assert!(hash_table.len() <= hash_table.capacity() / 2);
            assert_eq!(hash_table.capacity() != capacity, grows, "insert {i}");
        }

        // re-inserting a live element never grows
        let capacity = hash_table.capacity();
        for i in 0..50 {
            assert!(!hash_table.insert(i).unwrap());
        }
        assert_eq!(hash_table.capacity(), capacity);
    }

    #[test]
    fn test_allocation_failure_is_reported() {
        let result = allocate::<u64>(usize::MAX);
        assert!(matches!(
            result,
            Err(TableError::Allocation {
                capacity: usize::MAX,
                ..
            })
        ));
    }

    #[test]
    fn test_clear() {
        let mut hash_table = ProbingHashTable::with_capacity(5).unwrap();
        for i in 0..10 {
            hash_table.insert(i).unwrap();
        }
        let capacity = hash_table.capacity();

        hash_table.clear();
        assert!(hash_table.is_empty());
        assert_eq!(hash_table.capacity(), capacity);
        assert!(!hash_table.contains(&3));
        assert_eq!(hash_table.iter().count(), 0);
    }

    #[test]
    fn test_debug_lists_live_elements() {
        let mut hash_table =
            ProbingHashTable::with_capacity_and_hasher(7, CollidingState::default()).unwrap();
        hash_table.insert(1).unwrap();
        hash_table.insert(2).unwrap();
        hash_table.remove(&1);

        assert_eq!(format!("{hash_table:?}"), "{2}");
    }

    #[test]
    fn test_capacity_stays_prime() {
        let mut hash_table = ProbingHashTable::with_capacity(1).unwrap();
        let mut seen = vec![hash_table.capacity()];
        for i in 0..1_000 {
            hash_table.insert(i).unwrap();
            if seen.last() != Some(&hash_table.capacity()) {
                seen.push(hash_table.capacity());
            }
        }

        assert!(seen.len() > 1);
        assert!(seen.iter().all(|&capacity| is_prime(capacity)), "{seen:?}");
    }
}
