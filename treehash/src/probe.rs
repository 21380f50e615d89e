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

//! Probe address arithmetic.
//!
//! A key `k` in a table of modulus `m` starts at its home address `k mod m` and then steps by
//! its increment `floor(k / m) mod m`, wrapping around the table, until it arrives back at home.
//! The increment depends on the key only, so every key walks its own fixed cycle. A key whose
//! increment is zero has a cycle of length one: its home address.

use std::iter::FusedIterator;

/// Returns the first address probed for `key`.
///
/// # Panics
///
/// Panics if `modulus` is zero.
#[inline]
pub fn home_address(key: u64, modulus: usize) -> usize {
    (key % modulus as u64) as usize
}

/// Returns the step added at every probe after the home address.
///
/// # Panics
///
/// Panics if `modulus` is zero.
///
/// # Examples
///
/// ```
/// # use treehash::probe::increment;
/// assert_eq!(increment(27, 11), 2);
/// assert_eq!(increment(5, 11), 0);
/// assert_eq!(increment(130, 11), 0);
/// ```
#[inline]
pub fn increment(key: u64, modulus: usize) -> usize {
    let m = modulus as u64;
    ((key / m) % m) as usize
}

/// Returns the address that follows `address` on the cycle of `key`.
#[inline]
pub fn next_address(address: usize, key: u64, modulus: usize) -> usize {
    (address + increment(key, modulus)) % modulus
}

/// Creates the probe sequence of `key` in a table of the given modulus.
///
/// # Examples
///
/// ```
/// # use treehash::probe::probe_sequence;
/// let addresses: Vec<usize> = probe_sequence(27, 11).collect();
/// assert_eq!(addresses, vec![5, 7, 9, 0, 2, 4, 6, 8, 10, 1, 3]);
///
/// // 10 has increment 2, so in a table of 4 its cycle only covers the even addresses.
/// assert_eq!(probe_sequence(10, 4).collect::<Vec<_>>(), vec![2, 0]);
/// ```
pub fn probe_sequence(key: u64, modulus: usize) -> ProbeSequence {
    ProbeSequence::new(key, modulus)
}

/// Iterator over the addresses visited when probing for a key.
///
/// Starts at the home address and stops before the home address would be visited again, so it
/// yields at most `modulus` addresses and never repeats one. The sequence is a pure function of
/// the key and the modulus, so building a new one restarts it from home.
#[derive(Debug, Clone)]
pub struct ProbeSequence {
    home: usize,
    step: usize,
    modulus: usize,
    next: Option<usize>,
}

impl ProbeSequence {
    /// # Panics
    ///
    /// Panics if `modulus` is zero.
    pub fn new(key: u64, modulus: usize) -> Self {
        assert!(modulus > 0, "modulus must be positive");
        let home = home_address(key, modulus);
        Self {
            home,
            step: increment(key, modulus),
            modulus,
            next: Some(home),
        }
    }

    /// The first address of the sequence.
    pub fn home(&self) -> usize {
        self.home
    }

    /// The step between consecutive addresses.
    pub fn step(&self) -> usize {
        self.step
    }
}

impl Iterator for ProbeSequence {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.next?;
        let following = (current + self.step) % self.modulus;
        self.next = (following != self.home).then_some(following);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next {
            Some(_) => (1, Some(self.modulus)),
            None => (0, Some(0)),
        }
    }
}

impl FusedIterator for ProbeSequence {}
