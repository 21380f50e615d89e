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

//! Fixed-capacity hash table with binary-tree collision resolution.
//!
//! # Usage
//!
//! ```rust
//! use treehash::table::BinaryTreeTable;
//!
//! let mut table = BinaryTreeTable::with_keys(11, [27, 18, 29, 28, 39, 13, 16, 41, 17, 19]);
//!
//! assert_eq!(table.len(), 10);
//! assert!(table.search(39));
//! assert!(!table.search(40));
//! assert_eq!(table.average_probe_count(), 2.2);
//!
//! println!("{}", table.report());
//! println!("{}", table.collision_report());
//! ```

mod hash_table;
mod report;
mod slot;

pub use self::hash_table::BinaryTreeTable;
pub use self::hash_table::BinaryTreeTableBuilder;
pub use self::hash_table::Probe;
pub use self::hash_table::DEFAULT_CAPACITY;
pub use self::hash_table::DEFAULT_MAX_KEY;
pub use self::hash_table::DEFAULT_PACKING_FACTOR;
pub use self::report::CollisionReport;
pub use self::report::TableReport;
pub use self::slot::Slot;
