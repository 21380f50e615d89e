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

//! Collision resolution with per-collision binary trees.
//!
//! When a key's home address is taken, a [`CollisionTree`] is grown breadth-first from that
//! address. Every node records the key found at its address and the key it would carry there:
//!
//! - the left child follows the carried key's own probe cycle one step further;
//! - the right child moves the resident key one step along *its* probe cycle, carrying it away.
//!
//! Growth stops at the first child whose address is empty. Walking back from that child to the
//! root yields a [`ShiftPlan`], a cascade of slot writes that frees room for the new key while
//! keeping every displaced key on its own probe cycle.

mod collision;
mod shift;

pub use self::collision::CollisionNode;
pub use self::collision::CollisionTree;
pub use self::collision::NodeId;
pub use self::collision::Preorder;
pub use self::shift::ShiftMove;
pub use self::shift::ShiftPlan;
