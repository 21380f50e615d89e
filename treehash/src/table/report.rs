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

use std::fmt;

use crate::table::BinaryTreeTable;

/// Text listing of a table: one line per slot followed by summary statistics.
///
/// Created by [`BinaryTreeTable::report`], which refreshes the probe statistics first.
#[derive(Debug)]
pub struct TableReport<'a> {
    table: &'a BinaryTreeTable,
    average_probe_count: f64,
}

/// Text listing of every collision a table resolved, with its tree.
///
/// Trees use the [`CollisionTree`](crate::tree::CollisionTree) rendering, where an address that
/// was empty prints as `address(-)` rather than a negative key.
///
/// Created by [`BinaryTreeTable::collision_report`].
#[derive(Debug)]
pub struct CollisionReport<'a> {
    table: &'a BinaryTreeTable,
}

impl BinaryTreeTable {
    /// Refreshes the probe statistics and returns a printable listing of the table.
    ///
    /// # Examples
    ///
    /// ```
    /// # use treehash::table::BinaryTreeTable;
    /// let mut table = BinaryTreeTable::with_keys(3, [3, 4]);
    /// let report = table.report().to_string();
    /// let lines: Vec<&str> = report.lines().collect();
    /// assert_eq!(lines[0], "Binary Tree Method");
    /// assert_eq!(lines[2], "  0    3 | #Probe 1");
    /// assert_eq!(lines[4], "  2  --- |");
    /// assert_eq!(lines[9], "Packing Factor      : %66.67");
    /// assert_eq!(lines[10], "Average Probe Count : 1");
    /// ```
    pub fn report(&mut self) -> TableReport<'_> {
        let average_probe_count = self.average_probe_count();
        TableReport {
            table: self,
            average_probe_count,
        }
    }

    /// Returns a printable listing of the resolved collisions.
    pub fn collision_report(&self) -> CollisionReport<'_> {
        CollisionReport { table: self }
    }
}

impl fmt::Display for TableReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table;
        writeln!(f, "Binary Tree Method")?;
        writeln!(f)?;
        for (address, slot) in table.slots().iter().enumerate() {
            match (slot.key(), slot.probe_count()) {
                (Some(key), Some(probes)) => writeln!(f, "{address:>3} {key:>4} | #Probe {probes}")?,
                (Some(key), None) => writeln!(f, "{address:>3} {key:>4} |")?,
                (None, _) => writeln!(f, "{address:>3} {:>4} |", "---")?,
            }
        }
        writeln!(f)?;
        writeln!(f, "Table Size          : {}", table.capacity())?;
        writeln!(f, "Table Mod           : {}", table.modulus())?;
        writeln!(f, "Number of Items     : {}", table.len())?;
        writeln!(
            f,
            "Packing Factor      : %{}",
            trim_decimal(table.occupancy_percent())
        )?;
        writeln!(
            f,
            "Average Probe Count : {}",
            trim_decimal(self.average_probe_count)
        )
    }
}

impl fmt::Display for CollisionReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let collisions = self.table.collisions();
        match collisions.len() {
            1 => writeln!(f, "1 collision has occurred.")?,
            n => writeln!(f, "{n} collisions have occurred.")?,
        }
        for tree in collisions {
            writeln!(f)?;
            writeln!(
                f,
                "Collision between {} and {} at index {} has occurred.",
                tree.incoming_key(),
                tree.resident_key(),
                tree.collision_address()
            )?;
            write!(f, "{tree}")?;
        }
        Ok(())
    }
}

/// Formats with at most two decimals and no trailing zeros.
fn trim_decimal(value: f64) -> String {
    let formatted = format!("{value:.2}");
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
