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

//! An open-addressing hash table of integer keys that resolves each collision by growing a small
//! binary tree of candidate addresses.
//!
//! Every key `k` in a table of modulus `m` probes from `k mod m` in steps of
//! `floor(k / m) mod m`. On a collision, the tree explores two moves per node: push the incoming
//! key one step further along its own cycle, or push the resident key one step along its cycle.
//! The first empty address reached decides a cascade of shifts, after which every key still sits
//! on its own probe cycle.
//!
//! - [`probe`]: probe address arithmetic.
//! - [`tree`]: collision trees and shift plans.
//! - [`table`]: the table, its builder and text reports.

pub mod common;
pub mod error;
pub mod probe;
pub mod table;
pub mod tree;
