//! Open-addressing table keyed by string identity.
//!
//! Both halves of the knowledge base (the clause store and the inference
//! registry) sit on top of this one container. It is deliberately small:
//!
//! - a flat slot array (`Vec<Option<Entry<V>>>`); `None` marks an empty slot,
//!   so no key value is reserved as a sentinel
//! - linear probing with step 1 from `hash(key) % capacity`
//! - growth to `2 * capacity + 2` whenever a new key would push the load
//!   factor past the configured maximum
//! - no deletion
//!
//! ```text
//! capacity = 8, max load = 0.7
//!
//! slot:  0     1     2     3     4     5     6     7
//!       [p3]  [ ]   [p1]  [p9]  [p4]  [ ]   [ ]   [p2]
//!                    ^     ^
//!                    |     └─ "p9" hashed to 2, probed to 3
//!                    └─ home slot of "p1"
//!
//! inserting a 6th key: 6 / 8 = 0.75 > 0.7 -> grow to 18, reinsert all
//! ```
//!
//! ## Invariants
//!
//! - After every insertion `len / capacity <= max_load < 1`, so at least one
//!   slot is always empty and probing terminates.
//! - Growth recomputes every probe position. Nothing outside the table holds a
//!   slot index; callers only ever see borrows, which the borrow checker
//!   invalidates across a growing insert.
//! - Iteration is slot order ("storage order"). With the default deterministic
//!   hasher this order is stable from run to run.

use std::collections::hash_map::DefaultHasher;
use std::hash::{BuildHasher, BuildHasherDefault};

/// Capacity a table starts with unless configured otherwise.
pub const INITIAL_CAPACITY: usize = 100;

/// Load factor above which a table grows.
pub const MAX_LOAD_FACTOR: f64 = 0.7;

/// Smallest accepted load limit. Lower limits would size the slot array
/// far beyond the number of keys.
pub const MIN_LOAD_FACTOR: f64 = 0.1;

/// SipHash with fixed keys: storage order does not change between runs.
pub type DeterministicState = BuildHasherDefault<DefaultHasher>;

#[derive(Debug, Clone)]
struct Entry<V> {
    key: String,
    value: V,
}

/// Fixed-capacity, linearly probed, growable string-keyed table.
#[derive(Debug, Clone)]
pub struct OpenTable<V, S = DeterministicState> {
    slots: Vec<Option<Entry<V>>>,
    len: usize,
    max_load: f64,
    hasher: S,
}

impl<V> OpenTable<V> {
    /// Create an empty table with [`INITIAL_CAPACITY`] slots.
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_load(capacity, MAX_LOAD_FACTOR)
    }

    pub fn with_capacity_and_load(capacity: usize, max_load: f64) -> Self {
        Self::with_capacity_and_hasher(capacity, max_load, DeterministicState::default())
    }
}

impl<V> Default for OpenTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, S: BuildHasher> OpenTable<V, S> {
    /// Create a table with an explicit hasher.
    ///
    /// A zero capacity is bumped to one slot. A `max_load` outside
    /// `[MIN_LOAD_FACTOR, 1)` (NaN included) falls back to [`MAX_LOAD_FACTOR`].
    pub fn with_capacity_and_hasher(capacity: usize, max_load: f64, hasher: S) -> Self {
        let max_load = if (MIN_LOAD_FACTOR..1.0).contains(&max_load) { max_load } else { MAX_LOAD_FACTOR };
        OpenTable { slots: empty_slots(capacity.max(1)), len: 0, max_load, hasher }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the backing array.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.slots.len() as f64
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.slots[self.probe(key)].is_some()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.slots[self.probe(key)].as_ref().map(|entry| &entry.value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.probe(key);
        self.slots[index].as_mut().map(|entry| &mut entry.value)
    }

    /// Return the value stored under `key`, inserting `make()` first if the key
    /// is new. May grow the table.
    pub fn get_or_insert_with(&mut self, key: &str, make: impl FnOnce() -> V) -> &mut V {
        let mut index = self.probe(key);
        if self.slots[index].is_none() {
            if self.exceeds_load(self.len + 1) {
                self.grow_for(self.len + 1);
                index = self.probe(key);
            }
            self.len += 1;
        }
        let entry = self.slots[index].get_or_insert_with(|| Entry { key: key.to_owned(), value: make() });
        &mut entry.value
    }

    /// Insert or overwrite `key`, returning the previous value if there was one.
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        let mut index = self.probe(key);
        if let Some(entry) = self.slots[index].as_mut() {
            return Some(std::mem::replace(&mut entry.value, value));
        }
        if self.exceeds_load(self.len + 1) {
            self.grow_for(self.len + 1);
            index = self.probe(key);
        }
        self.slots[index] = Some(Entry { key: key.to_owned(), value });
        self.len += 1;
        None
    }

    /// Occupied entries in storage (slot) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.slots.iter().flatten().map(|entry| (entry.key.as_str(), &entry.value))
    }

    /// Slot holding `key`, or the empty slot where it would be inserted.
    fn probe(&self, key: &str) -> usize {
        let capacity = self.slots.len();
        let mut index = (self.hasher.hash_one(key) % capacity as u64) as usize;
        loop {
            match &self.slots[index] {
                None => return index,
                Some(entry) if entry.key == key => return index,
                Some(_) => index = (index + 1) % capacity,
            }
        }
    }

    fn exceeds_load(&self, len: usize) -> bool {
        len as f64 / self.slots.len() as f64 > self.max_load
    }

    /// Reallocate until `wanted` entries fit under the load limit, then
    /// reinsert every occupied entry at its recomputed probe position.
    fn grow_for(&mut self, wanted: usize) {
        let old_capacity = self.slots.len();
        let mut capacity = old_capacity;
        while wanted as f64 / capacity as f64 > self.max_load {
            match capacity.checked_mul(2).and_then(|doubled| doubled.checked_add(2)) {
                Some(next) => capacity = next,
                None => break,
            }
        }

        let old = std::mem::replace(&mut self.slots, empty_slots(capacity));
        for entry in old.into_iter().flatten() {
            let index = self.probe(&entry.key);
            self.slots[index] = Some(entry);
        }

        tracing::debug!(from = old_capacity, to = capacity, len = self.len, "grew open-addressing table");
    }
}

fn empty_slots<V>(capacity: usize) -> Vec<Option<Entry<V>>> {
    std::iter::repeat_with(|| None).take(capacity).collect()
}
