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

use crate::table::Slot;

/// One slot write of a [`ShiftPlan`]: `key` is moved into `address`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftMove {
    pub address: usize,
    pub key: u64,
}

/// The slot writes that commit a solved collision tree.
///
/// Moves are ordered from the empty address found by the tree back toward the collision
/// address. Each key appears at most once, at the last address it is carried to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShiftPlan {
    moves: Vec<ShiftMove>,
}

impl ShiftPlan {
    /// Builds a plan from the hops of a back-trace, given as `(address, carried key)` pairs
    /// starting at the solved node and ending at the root.
    ///
    /// Consecutive hops carrying the same key are waypoints of one relocation; only the first of
    /// them (the key's final destination) becomes a move.
    pub(crate) fn from_hops(hops: impl IntoIterator<Item = (usize, u64)>) -> Self {
        let mut moves: Vec<ShiftMove> = Vec::new();
        for (address, key) in hops {
            match moves.last() {
                Some(last) if last.key == key => {}
                _ => moves.push(ShiftMove { address, key }),
            }
        }
        Self { moves }
    }

    /// The moves, in application order.
    pub fn moves(&self) -> &[ShiftMove] {
        &self.moves
    }

    /// Number of slot writes.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Address a key ends up at after the plan is applied, if the plan moves it.
    pub fn destination_of(&self, key: u64) -> Option<usize> {
        self.moves.iter().find(|m| m.key == key).map(|m| m.address)
    }

    /// Writes every move into `slots`.
    ///
    /// The first move always targets an empty slot; every other target holds a key that an
    /// earlier move of the same plan has already relocated.
    pub(crate) fn apply(&self, slots: &mut [Slot]) {
        for ShiftMove { address, key } in &self.moves {
            slots[*address].place(*key);
        }
    }
}
