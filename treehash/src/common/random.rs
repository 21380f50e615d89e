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

//! Seedable key sources for self-filling tables.

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

const FALLBACK_SEED: u64 = 0x9e3779b97f4a7c15;

/// Random number source used to draw keys.
pub trait RandomSource {
    /// Returns the next random 64-bit value.
    fn next_u64(&mut self) -> u64;

    /// Returns a value in `[0, bound)`.
    ///
    /// # Panics
    ///
    /// Panics if `bound` is zero.
    fn next_below(&mut self, bound: u64) -> u64 {
        assert!(bound > 0, "bound must be positive");
        self.next_u64() % bound
    }
}

/// Xorshift generator. Deterministic for a given seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Creates a new generator using the provided seed.
    ///
    /// A zero seed would lock the generator at zero, so it is replaced by a fixed constant.
    pub fn seeded(seed: u64) -> Self {
        let state = if seed == 0 { FALLBACK_SEED } else { seed };
        Self { state }
    }

    /// Creates a generator seeded from the clock and the process id.
    pub fn from_entropy() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        Self::seeded(nanos as u64 ^ (std::process::id() as u64))
    }
}

impl Default for XorShift64 {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for XorShift64 {
    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

/// Endless stream of keys drawn uniformly from `[0, max_key)`.
///
/// # Examples
///
/// ```
/// # use treehash::common::random::RandomKeys;
/// # use treehash::common::random::XorShift64;
/// let keys: Vec<u64> = RandomKeys::new(XorShift64::seeded(7), 999).take(5).collect();
/// assert_eq!(keys.len(), 5);
/// assert!(keys.iter().all(|&k| k < 999));
/// ```
#[derive(Debug, Clone)]
pub struct RandomKeys<R> {
    source: R,
    max_key: u64,
}

impl<R: RandomSource> RandomKeys<R> {
    /// Creates a key stream with an exclusive upper bound.
    ///
    /// # Panics
    ///
    /// Panics if `max_key` is zero.
    pub fn new(source: R, max_key: u64) -> Self {
        assert!(max_key > 0, "max_key must be positive");
        Self { source, max_key }
    }

    /// Exclusive upper bound of the produced keys.
    pub fn max_key(&self) -> u64 {
        self.max_key
    }
}

impl<R: RandomSource> Iterator for RandomKeys<R> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        Some(self.source.next_below(self.max_key))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
