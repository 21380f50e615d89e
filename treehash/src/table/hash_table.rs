// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use log::debug;
use log::trace;
use log::warn;

use crate::common::random::RandomKeys;
use crate::common::random::XorShift64;
use crate::error::Error;
use crate::error::ErrorKind;
use crate::probe::home_address;
use crate::probe::probe_sequence;
use crate::table::Slot;
use crate::tree::CollisionTree;

/// Default capacity (and modulus) of a table.
pub const DEFAULT_CAPACITY: usize = 11;

/// Default exclusive upper bound for self-fill keys.
pub const DEFAULT_MAX_KEY: u64 = 999;

/// Default target fraction of capacity for self-fill.
pub const DEFAULT_PACKING_FACTOR: f64 = 0.9;

/// Self-fill draws at most this many keys per slot of capacity when no explicit limit is set.
const FILL_ATTEMPTS_PER_SLOT: usize = 100;

/// Where a key was found and how many probes it took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    pub address: usize,
    /// 1-based: a key found at its home address took one probe.
    pub probes: u32,
}

/// Fixed-capacity open-addressing table of `u64` keys that resolves collisions with binary trees.
///
/// The modulus equals the capacity and never changes. Keys are never removed.
///
/// # Examples
///
/// ```
/// # use treehash::table::BinaryTreeTable;
/// let mut table = BinaryTreeTable::new(11);
/// assert!(table.insert(27));
/// assert!(table.insert(16)); // home address 5 is taken by 27
/// assert!(!table.insert(27));
///
/// assert!(table.search(16));
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.collisions().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct BinaryTreeTable {
    slots: Vec<Slot>,
    len: usize,
    total_probe_count: u64,
    max_tree_nodes: Option<usize>,
    collisions: Vec<CollisionTree>,
}

impl BinaryTreeTable {
    /// Create a new builder for BinaryTreeTable
    ///
    /// # Examples
    ///
    /// ```
    /// # use treehash::table::BinaryTreeTable;
    /// let table = BinaryTreeTable::builder().capacity(47).build();
    /// assert_eq!(table.capacity(), 47);
    /// assert!(table.is_empty());
    /// ```
    pub fn builder() -> BinaryTreeTableBuilder {
        BinaryTreeTableBuilder::default()
    }

    /// Creates an empty table.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        Self::builder().capacity(capacity).build()
    }

    /// Creates a table and inserts `keys` in order, skipping rejected keys.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_keys(capacity: usize, keys: impl IntoIterator<Item = u64>) -> Self {
        Self::builder().capacity(capacity).build_with_keys(keys)
    }

    /// Creates a table filled with seeded pseudo-random keys until
    /// `round(capacity * packing_factor)` slots are occupied.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_packing_factor(
        capacity: usize,
        packing_factor: f64,
        seed: u64,
    ) -> Result<Self, Error> {
        Self::builder()
            .capacity(capacity)
            .seed(seed)
            .build_with_packing_factor(packing_factor)
    }

    /// Inserts `key`, returning whether it was stored.
    ///
    /// Duplicates, inserts into a full table and unresolvable collisions are rejected without
    /// touching the table. Use [`BinaryTreeTable::try_insert`] to learn why.
    pub fn insert(&mut self, key: u64) -> bool {
        self.try_insert(key).is_ok()
    }

    /// Inserts `key`.
    ///
    /// A key whose home address is free is placed there. Otherwise a [`CollisionTree`] is grown
    /// from the home address, its shift plan is written into the slots and the tree is appended
    /// to [`BinaryTreeTable::collisions`].
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::TableFull`] if every slot is occupied.
    /// - [`ErrorKind::DuplicateKey`] if `key` is already stored.
    /// - [`ErrorKind::UnresolvableCollision`] if no empty address is reachable from the home
    ///   address, or the collision tree reached [`BinaryTreeTable::max_tree_nodes`].
    ///
    /// The table is unchanged on error.
    pub fn try_insert(&mut self, key: u64) -> Result<(), Error> {
        if self.is_full() {
            return Err(Error::table_full(key, self.capacity()));
        }
        if self.search(key) {
            return Err(Error::duplicate_key(key));
        }

        let home = home_address(key, self.modulus());
        if self.slots[home].is_empty() {
            self.slots[home].place(key);
            self.len += 1;
            debug!("placed {key} at home address {home}");
            return Ok(());
        }

        let tree = CollisionTree::resolve(&self.slots, home, key, self.max_tree_nodes)
            .inspect_err(|err| warn!("rejected {key}: {err}"))?;
        let plan = tree.shift_plan();
        debug!(
            "collision between {key} and {} at {home} resolved with {} nodes and {} writes",
            tree.resident_key(),
            tree.node_count(),
            plan.len()
        );
        plan.apply(&mut self.slots);
        self.len += 1;
        self.collisions.push(tree);
        Ok(())
    }

    /// Inserts `keys` in order until the table is full, returning how many were stored.
    pub fn fill_with_keys(&mut self, keys: impl IntoIterator<Item = u64>) -> usize {
        let mut inserted = 0;
        for key in keys {
            if self.is_full() {
                break;
            }
            if self.insert(key) {
                inserted += 1;
            }
        }
        inserted
    }

    /// Inserts keys drawn from `keys` until `target` slots are occupied.
    ///
    /// Rejected keys are skipped. Returns how many keys were stored.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::ConfigInvalid`] if `target` exceeds the capacity.
    /// - [`ErrorKind::FillExhausted`] if `target` is not reached after `max_attempts` keys, or
    ///   `keys` runs dry first. Keys stored so far stay in the table.
    pub fn fill_to(
        &mut self,
        target: usize,
        keys: impl IntoIterator<Item = u64>,
        max_attempts: usize,
    ) -> Result<usize, Error> {
        if target > self.capacity() {
            return Err(
                Error::new(ErrorKind::ConfigInvalid, "fill target exceeds capacity")
                    .with_context("target", target)
                    .with_context("capacity", self.capacity()),
            );
        }

        let mut inserted = 0;
        let mut attempts = 0;
        let mut keys = keys.into_iter();
        while self.len < target && attempts < max_attempts {
            let Some(key) = keys.next() else {
                break;
            };
            attempts += 1;
            if self.insert(key) {
                inserted += 1;
            }
        }

        if self.len < target {
            warn!(
                "self-fill stopped at {} of {target} items after {attempts} keys",
                self.len
            );
            return Err(
                Error::new(ErrorKind::FillExhausted, "could not reach the fill target")
                    .with_context("target", target)
                    .with_context("len", self.len)
                    .with_context("attempts", attempts),
            );
        }
        debug!("filled {inserted} slots in {attempts} attempts");
        Ok(inserted)
    }

    /// Returns whether `key` is stored.
    pub fn search(&self, key: u64) -> bool {
        self.find(key).is_some()
    }

    /// Walks the probe sequence of `key` and reports where it was found.
    ///
    /// Empty slots do not end the walk; the whole cycle of the key is searched.
    ///
    /// # Examples
    ///
    /// ```
    /// # use treehash::table::{BinaryTreeTable, Probe};
    /// let table = BinaryTreeTable::with_keys(11, [27, 18, 29]);
    /// // 29 is home at 7, which 18 holds; one step of 2 later it is at 9.
    /// assert_eq!(table.find(29), Some(Probe { address: 9, probes: 2 }));
    /// assert_eq!(table.find(40), None);
    /// ```
    pub fn find(&self, key: u64) -> Option<Probe> {
        let found = probe_sequence(key, self.modulus())
            .zip(1u32..)
            .find(|&(address, _)| self.slots[address].holds(key))
            .map(|(address, probes)| Probe { address, probes });
        match found {
            Some(Probe { address, probes }) => {
                trace!("found {key} at {address}, probe count is {probes}")
            }
            None => trace!("{key} does not exist in the table"),
        }
        found
    }

    /// Re-runs the search for every stored key, recording each probe count in its slot and
    /// summing them into [`BinaryTreeTable::total_probe_count`].
    pub fn recompute_probe_statistics(&mut self) {
        self.total_probe_count = 0;
        for address in 0..self.slots.len() {
            let Some(key) = self.slots[address].key() else {
                continue;
            };
            if let Some(Probe { address, probes }) = self.find(key) {
                self.slots[address].record_probe_count(probes);
                self.total_probe_count += u64::from(probes);
            }
        }
    }

    /// Percentage of occupied slots.
    pub fn occupancy_percent(&self) -> f64 {
        self.len as f64 / self.capacity() as f64 * 100.0
    }

    /// Refreshes the probe statistics and returns the mean probe count per stored key.
    ///
    /// Returns 0 for an empty table.
    pub fn average_probe_count(&mut self) -> f64 {
        self.recompute_probe_statistics();
        if self.len == 0 {
            return 0.0;
        }
        self.total_probe_count as f64 / self.len as f64
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Modulus used by the probe arithmetic; always equal to the capacity.
    pub fn modulus(&self) -> usize {
        self.slots.len()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Sum of probe counts as of the last statistics refresh.
    pub fn total_probe_count(&self) -> u64 {
        self.total_probe_count
    }

    /// Node cap of each collision tree, if one was set.
    pub fn max_tree_nodes(&self) -> Option<usize> {
        self.max_tree_nodes
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, address: usize) -> Option<&Slot> {
        self.slots.get(address)
    }

    /// Stored keys in address order.
    pub fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.slots.iter().filter_map(Slot::key)
    }

    /// Trees of every resolved collision, oldest first.
    pub fn collisions(&self) -> &[CollisionTree] {
        &self.collisions
    }
}

/// Builder for BinaryTreeTable
#[derive(Debug, Clone)]
pub struct BinaryTreeTableBuilder {
    capacity: usize,
    max_key: u64,
    seed: Option<u64>,
    max_tree_nodes: Option<usize>,
    max_fill_attempts: Option<usize>,
}

impl Default for BinaryTreeTableBuilder {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_key: DEFAULT_MAX_KEY,
            seed: None,
            max_tree_nodes: None,
            max_fill_attempts: None,
        }
    }
}

impl BinaryTreeTableBuilder {
    /// Set the number of slots, which is also the modulus.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be positive");
        self.capacity = capacity;
        self
    }

    /// Set the exclusive upper bound of self-fill keys.
    ///
    /// # Panics
    ///
    /// Panics if `max_key` is zero.
    pub fn max_key(mut self, max_key: u64) -> Self {
        assert!(max_key > 0, "max_key must be positive");
        self.max_key = max_key;
        self
    }

    /// Set the self-fill seed. Without one, the generator is seeded from the clock.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Cap the number of nodes each collision tree may grow.
    ///
    /// Without a cap, growth stops only at an empty address or once every reachable
    /// `(address, carried key)` pair has been expanded.
    ///
    /// # Panics
    ///
    /// Panics if `max_tree_nodes` is zero.
    pub fn max_tree_nodes(mut self, max_tree_nodes: usize) -> Self {
        assert!(max_tree_nodes > 0, "max_tree_nodes must be positive");
        self.max_tree_nodes = Some(max_tree_nodes);
        self
    }

    /// Set how many keys self-fill may draw before giving up.
    /// Defaults to 100 draws per slot of capacity.
    pub fn max_fill_attempts(mut self, max_fill_attempts: usize) -> Self {
        self.max_fill_attempts = Some(max_fill_attempts);
        self
    }

    /// Build an empty table.
    pub fn build(self) -> BinaryTreeTable {
        BinaryTreeTable {
            slots: vec![Slot::empty(); self.capacity],
            len: 0,
            total_probe_count: 0,
            max_tree_nodes: self.max_tree_nodes,
            collisions: Vec::new(),
        }
    }

    /// Build a table holding `keys`, inserted in order. Rejected keys are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// # use treehash::table::BinaryTreeTable;
    /// let table = BinaryTreeTable::builder()
    ///     .capacity(3)
    ///     .build_with_keys([1, 2, 2, 3, 4]);
    /// assert_eq!(table.len(), 3);
    /// assert!(!table.search(4));
    /// ```
    pub fn build_with_keys(self, keys: impl IntoIterator<Item = u64>) -> BinaryTreeTable {
        let mut table = self.build();
        table.fill_with_keys(keys);
        table
    }

    /// Build a table self-filled with pseudo-random keys in `[0, max_key)` until
    /// `round(capacity * packing_factor)` slots are occupied.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::ConfigInvalid`] if `packing_factor` is not in `(0.0, 1.0]`.
    /// - [`ErrorKind::FillExhausted`] if the target is not reached within the fill attempts.
    ///
    /// # Examples
    ///
    /// ```
    /// # use treehash::table::BinaryTreeTable;
    /// let table = BinaryTreeTable::builder()
    ///     .capacity(47)
    ///     .seed(7)
    ///     .build_with_packing_factor(0.8)
    ///     .unwrap();
    /// assert_eq!(table.len(), 38);
    /// ```
    pub fn build_with_packing_factor(self, packing_factor: f64) -> Result<BinaryTreeTable, Error> {
        let in_range = packing_factor > 0.0 && packing_factor <= 1.0;
        if !in_range {
            return Err(Error::new(
                ErrorKind::ConfigInvalid,
                "packing factor must be in (0.0, 1.0]",
            )
            .with_context("packing_factor", packing_factor));
        }

        let target = (self.capacity as f64 * packing_factor).round() as usize;
        let max_attempts = self
            .max_fill_attempts
            .unwrap_or(self.capacity.saturating_mul(FILL_ATTEMPTS_PER_SLOT));
        let source = match self.seed {
            Some(seed) => XorShift64::seeded(seed),
            None => XorShift64::from_entropy(),
        };
        let keys = RandomKeys::new(source, self.max_key);

        let mut table = self.build();
        table.fill_to(target, keys, max_attempts)?;
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: [u64; 10] = [27, 18, 29, 28, 39, 13, 16, 41, 17, 19];

    #[test]
    fn test_new_table() {
        let table = BinaryTreeTable::new(11);
        assert_eq!(table.capacity(), 11);
        assert_eq!(table.modulus(), 11);
        assert!(table.is_empty());
        assert!(!table.is_full());
        assert_eq!(table.total_probe_count(), 0);
        assert_eq!(table.max_tree_nodes(), None);
        assert!(table.slots().iter().all(Slot::is_empty));
        assert_eq!(table.keys().count(), 0);
    }

    #[test]
    fn test_direct_placement() {
        let mut table = BinaryTreeTable::new(11);
        table.try_insert(27).unwrap();
        assert!(table.slot(5).unwrap().holds(27));
        assert_eq!(table.find(27), Some(Probe { address: 5, probes: 1 }));
        assert!(table.collisions().is_empty());
    }

    #[test]
    fn test_duplicate_is_rejected() {
        let mut table = BinaryTreeTable::with_keys(11, [27, 16]);
        let err = table.try_insert(16).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateKey);
        assert_eq!(table.len(), 2);
        assert_eq!(table.collisions().len(), 1);
    }

    #[test]
    fn test_scenario_layout() {
        let table = BinaryTreeTable::with_keys(11, SCENARIO);
        let layout: Vec<Option<u64>> = table.slots().iter().map(Slot::key).collect();
        assert_eq!(
            layout,
            vec![
                Some(29),
                Some(39),
                Some(13),
                Some(41),
                None,
                Some(27),
                Some(16),
                Some(18),
                Some(17),
                Some(19),
                Some(28),
            ]
        );
        assert_eq!(table.len(), 10);
        assert_eq!(table.collisions().len(), 6);
    }

    #[test]
    fn test_scenario_probe_statistics() {
        let mut table = BinaryTreeTable::with_keys(11, SCENARIO);
        assert_eq!(table.total_probe_count(), 0);
        assert!(table.slots().iter().all(|s| s.probe_count().is_none()));

        table.recompute_probe_statistics();
        assert_eq!(table.total_probe_count(), 22);
        assert_eq!(table.slot(0).unwrap().probe_count(), Some(3));
        assert_eq!(table.slot(4).unwrap().probe_count(), None);
        assert_eq!(table.slot(5).unwrap().probe_count(), Some(1));
        assert_eq!(table.slot(6).unwrap().probe_count(), Some(2));
        assert_eq!(table.average_probe_count(), 2.2);
    }

    #[test]
    fn test_full_table_rejects() {
        let mut table = BinaryTreeTable::with_keys(2, [0, 1]);
        assert!(table.is_full());
        let err = table.try_insert(2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TableFull);
        assert_eq!(err.context("capacity"), Some("2"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_unresolvable_collision_leaves_table_unchanged() {
        // 0 and 16 both have increment 0 in a table of 4, so neither can leave address 0.
        let mut table = BinaryTreeTable::with_keys(4, [0]);
        let before = table.slots().to_vec();

        let err = table.try_insert(16).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnresolvableCollision);
        assert_eq!(table.slots(), before.as_slice());
        assert_eq!(table.len(), 1);
        assert!(table.collisions().is_empty());
        assert!(!table.insert(16));
    }

    #[test]
    fn test_fill_to_rejects_oversized_target() {
        let mut table = BinaryTreeTable::new(5);
        let err = table.fill_to(6, 0..100, 100).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_fill_to_runs_dry() {
        let mut table = BinaryTreeTable::new(5);
        let err = table.fill_to(4, [1, 1, 2], 100).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FillExhausted);
        assert_eq!(err.context("attempts"), Some("3"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_packing_factor_out_of_range() {
        for factor in [0.0, -0.5, 1.5, f64::NAN] {
            let err = BinaryTreeTable::with_packing_factor(11, factor, 1).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        }
    }

    #[test]
    fn test_packing_factor_fill_is_seeded() {
        let a = BinaryTreeTable::with_packing_factor(23, 0.9, 99).unwrap();
        let b = BinaryTreeTable::with_packing_factor(23, 0.9, 99).unwrap();
        assert_eq!(a.len(), 21);
        assert_eq!(a.slots(), b.slots());
        assert!(a.keys().all(|k| k < DEFAULT_MAX_KEY));
    }

    #[test]
    fn test_fill_exhausted_with_tiny_key_range() {
        let err = BinaryTreeTable::builder()
            .capacity(11)
            .max_key(3)
            .seed(5)
            .max_fill_attempts(200)
            .build_with_packing_factor(0.9)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FillExhausted);
    }

    #[test]
    #[should_panic(expected = "capacity must be positive")]
    fn test_zero_capacity_panics() {
        let _ = BinaryTreeTable::new(0);
    }
}
