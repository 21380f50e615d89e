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

use googletest::assert_that;
use googletest::prelude::contains_substring;
use googletest::prelude::eq;
use googletest::prelude::ge;
use googletest::prelude::near;
use treehash::common::random::RandomKeys;
use treehash::common::random::XorShift64;
use treehash::error::ErrorKind;
use treehash::probe::increment;
use treehash::table::BinaryTreeTable;

const SCENARIO: [u64; 10] = [27, 18, 29, 28, 39, 13, 16, 41, 17, 19];

#[test]
fn test_scenario_counts() {
    let mut table = BinaryTreeTable::with_keys(11, SCENARIO);

    assert_eq!(table.len(), 10);
    assert_that!(table.occupancy_percent(), near(90.909, 0.001));
    assert_that!(table.average_probe_count(), near(2.2, 1e-12));
    assert_eq!(table.total_probe_count(), 22);
    for key in SCENARIO {
        assert!(table.search(key), "{key} should be found");
    }
    for key in [0, 38, 40, 999] {
        assert!(!table.search(key), "{key} should not be found");
    }
}

#[test]
fn test_scenario_collision_history() {
    let table = BinaryTreeTable::with_keys(11, SCENARIO);

    let summary: Vec<(u64, u64, usize)> = table
        .collisions()
        .iter()
        .map(|t| (t.incoming_key(), t.resident_key(), t.collision_address()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (29, 18, 7),
            (39, 28, 6),
            (16, 27, 5),
            (41, 28, 8),
            (17, 16, 6),
            (19, 17, 8),
        ]
    );

    let node_counts: Vec<usize> = table.collisions().iter().map(|t| t.node_count()).collect();
    assert_eq!(node_counts, vec![2, 3, 10, 2, 9, 11]);

    // Every solved tree ends on an address that was empty when it was grown.
    for tree in table.collisions() {
        assert_eq!(tree.node(tree.solution()).key(), None);
        assert_eq!(tree.modulus(), 11);
    }
}

#[test]
fn test_scenario_shift_moves_displaced_keys() {
    // Inserting 19 moves 29 from 9 to 0 and 41 from 0 to 3.
    let mut table = BinaryTreeTable::with_keys(11, SCENARIO[..9].iter().copied());
    assert_eq!(table.find(29).map(|p| p.address), Some(9));
    assert_eq!(table.find(41).map(|p| p.address), Some(0));

    assert!(table.insert(19));
    let plan = table.collisions().last().unwrap().shift_plan();
    assert_eq!(plan.destination_of(19), Some(9));
    assert_eq!(plan.destination_of(29), Some(0));
    assert_eq!(plan.destination_of(41), Some(3));
    assert_eq!(table.find(29).map(|p| p.address), Some(0));
    assert_eq!(table.find(41).map(|p| p.address), Some(3));
    assert_eq!(table.find(19).map(|p| p.address), Some(9));
}

#[test]
fn test_reports() {
    let mut table = BinaryTreeTable::with_keys(11, SCENARIO);

    let report = table.report().to_string();
    assert_that!(report.as_str(), contains_substring("  0   29 | #Probe 3\n"));
    assert_that!(report.as_str(), contains_substring("  4  --- |\n"));
    assert_that!(report.as_str(), contains_substring(" 10   28 | #Probe 3\n"));
    assert_that!(report.as_str(), contains_substring("Number of Items     : 10\n"));
    assert_that!(report.as_str(), contains_substring("Packing Factor      : %90.91\n"));
    assert_that!(report.as_str(), contains_substring("Average Probe Count : 2.2\n"));

    let collisions = table.collision_report().to_string();
    assert_that!(collisions.as_str(), contains_substring("6 collisions have occurred.\n"));
    assert_that!(
        collisions.as_str(),
        contains_substring("Collision between 16 and 27 at index 5 has occurred.\n")
    );
}

#[test]
fn test_full_table_state_is_unchanged() {
    let mut table = BinaryTreeTable::with_keys(11, SCENARIO);
    assert!(table.insert(4));
    assert!(table.is_full());

    let slots = table.slots().to_vec();
    let history = table.collisions().len();
    for key in [4, 5, 100, 998] {
        assert!(!table.insert(key));
        let err = table.try_insert(key).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TableFull);
    }
    assert_eq!(table.slots(), slots.as_slice());
    assert_eq!(table.collisions().len(), history);
    assert_eq!(table.len(), 11);
}

#[test]
fn test_duplicate_insert_keeps_counts() {
    let mut table = BinaryTreeTable::with_keys(11, SCENARIO);
    for key in SCENARIO {
        let err = table.try_insert(key).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateKey);
    }
    assert_eq!(table.len(), 10);
    assert_eq!(table.collisions().len(), 6);
}

#[test]
fn test_zero_increment_collision_terminates() {
    // 126 = 11 * 11 + 5: home 5 like 27, increment 0.
    assert_eq!(increment(126, 11), 0);
    let mut table = BinaryTreeTable::with_keys(11, [27]);
    assert!(table.insert(126));
    assert!(table.search(126));
    assert!(table.search(27));
    // 126 cannot leave its home, so 27 had to move along its own cycle.
    assert_eq!(table.find(126).map(|p| p.address), Some(5));
    assert_eq!(table.find(27).map(|p| p.address), Some(7));
}

#[test]
fn test_zero_increment_against_zero_increment() {
    // Both keys are pinned to address 5, so the tree runs out of new pairs to expand.
    let mut table = BinaryTreeTable::with_keys(11, [5]);
    let err = table.try_insert(126).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnresolvableCollision);
    assert_eq!(err.context("max_nodes"), None);
    assert_eq!(table.len(), 1);
    assert!(!table.search(126));
}

#[test]
fn test_deep_collisions_in_large_table() {
    let keys: Vec<u64> = RandomKeys::new(XorShift64::seeded(2), 999)
        .take(206)
        .collect();
    let table = BinaryTreeTable::with_keys(211, keys.iter().copied());

    // 16 of the keys are repeats; every distinct key is placed.
    assert_eq!(table.len(), 190);
    assert!(keys.iter().all(|&key| table.search(key)));
    assert_eq!(table.collisions().len(), 75);

    // A full binary tree this deep would hold more than 2^25 nodes.
    let deepest = table
        .collisions()
        .iter()
        .max_by_key(|tree| tree.depth())
        .unwrap();
    assert_eq!(deepest.depth(), 26);
    assert_eq!(deepest.node_count(), 1658);
    assert_eq!(deepest.node(deepest.solution()).key(), None);
}

#[test]
fn test_large_table_self_fill_rejects_nothing() {
    let table = BinaryTreeTable::builder()
        .capacity(211)
        .seed(2)
        .max_fill_attempts(206)
        .build_with_packing_factor(0.9)
        .unwrap();
    assert_eq!(table.len(), 190);
}

#[test]
fn test_recompute_is_idempotent() {
    let mut table = BinaryTreeTable::with_keys(11, SCENARIO);
    table.recompute_probe_statistics();
    let first = table.total_probe_count();
    let first_slots = table.slots().to_vec();
    table.recompute_probe_statistics();
    assert_eq!(table.total_probe_count(), first);
    assert_eq!(table.slots(), first_slots.as_slice());
}

#[test]
fn test_empty_table_statistics() {
    let mut table = BinaryTreeTable::new(7);
    assert_eq!(table.occupancy_percent(), 0.0);
    assert_eq!(table.average_probe_count(), 0.0);
    assert!(!table.search(3));
}

#[test]
fn test_self_fill_reaches_packing_factor() {
    for (capacity, factor) in [(11, 0.9), (47, 0.8), (101, 0.9), (10, 1.0)] {
        let mut table = BinaryTreeTable::builder()
            .capacity(capacity)
            .seed(capacity as u64)
            .build_with_packing_factor(factor)
            .unwrap();
        let target = (capacity as f64 * factor).round() as usize;
        assert_eq!(table.len(), target);
        assert_eq!(table.keys().count(), target);
        assert!(table.keys().all(|key| key < 999));
        assert_that!(table.average_probe_count(), ge(1.0));
        let keys: Vec<u64> = table.keys().collect();
        assert!(keys.iter().all(|&key| table.search(key)));
    }
}

#[test]
fn test_builder_options() {
    let table = BinaryTreeTable::builder()
        .capacity(13)
        .max_key(50)
        .max_tree_nodes(512)
        .seed(11)
        .build_with_packing_factor(0.5)
        .unwrap();
    assert_that!(table.len(), eq(7_usize));
    assert_eq!(table.max_tree_nodes(), Some(512));
    assert!(table.keys().all(|key| key < 50));
}
