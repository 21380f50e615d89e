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

/// One cell of a [`BinaryTreeTable`](crate::table::BinaryTreeTable).
///
/// An empty slot never carries a probe count. The probe count of an occupied slot is the number
/// of probes the last statistics refresh needed to find its key, and is cleared whenever a key
/// is (re)placed in the slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Slot {
    key: Option<u64>,
    probe_count: Option<u32>,
}

impl Slot {
    /// An empty slot.
    pub const fn empty() -> Self {
        Self {
            key: None,
            probe_count: None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.key.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_none()
    }

    /// The stored key, if any.
    pub fn key(&self) -> Option<u64> {
        self.key
    }

    /// Whether this slot stores `key`.
    pub fn holds(&self, key: u64) -> bool {
        self.key == Some(key)
    }

    /// Probe count recorded by the last statistics refresh.
    pub fn probe_count(&self) -> Option<u32> {
        self.probe_count
    }

    pub(crate) fn place(&mut self, key: u64) {
        self.key = Some(key);
        self.probe_count = None;
    }

    pub(crate) fn record_probe_count(&mut self, probes: u32) {
        debug_assert!(self.is_occupied(), "empty slots have no probe count");
        self.probe_count = Some(probes);
    }
}
