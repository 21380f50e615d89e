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

use std::collections::HashSet;
use std::collections::VecDeque;
use std::fmt;

use log::trace;

use crate::error::Error;
use crate::error::ErrorKind;
use crate::probe::next_address;
use crate::table::Slot;
use crate::tree::ShiftPlan;

/// Handle of a node inside its [`CollisionTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    const ROOT: NodeId = NodeId(0);

    /// Position of the node in creation order. The root is 0.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A candidate relocation address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionNode {
    key: Option<u64>,
    address: usize,
    carried_key: u64,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl CollisionNode {
    /// Key stored at this address when the tree was grown. `None` if the address was empty.
    pub fn key(&self) -> Option<u64> {
        self.key
    }

    pub fn address(&self) -> usize {
        self.address
    }

    /// Key this node would move into its address.
    pub fn carried_key(&self) -> u64 {
        self.carried_key
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child reached by stepping along the carried key's probe cycle.
    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    /// Child reached by stepping along the resident key's probe cycle.
    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// The binary tree grown to resolve one collision.
///
/// Nodes are kept in an arena in creation order; the root is the collision address. A solved
/// tree is kept by the table as a read-only record of how the collision was resolved.
///
/// # Examples
///
/// ```
/// # use treehash::table::BinaryTreeTable;
/// let table = BinaryTreeTable::with_keys(11, [27, 18, 29]);
/// let tree = &table.collisions()[0];
/// assert_eq!(tree.collision_address(), 7);
/// assert_eq!(tree.resident_key(), 18);
/// assert_eq!(tree.incoming_key(), 29);
/// assert_eq!(tree.to_string(), "7(18)\n\t9(-)\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionTree {
    modulus: usize,
    resident_key: u64,
    nodes: Vec<CollisionNode>,
    solution: NodeId,
}

impl CollisionTree {
    /// Grows a tree for inserting `incoming_key` at the occupied address `address` of `slots`.
    ///
    /// The slots are only read. A node's subtree depends only on its address and the key it
    /// carries, so a node repeating a pair that is already in the tree stays a leaf. This does
    /// not change which empty address is found first, and it bounds the tree by the number of
    /// distinct pairs.
    ///
    /// Returns an error of kind [`ErrorKind::UnresolvableCollision`] if no empty address is
    /// reachable, or if `max_nodes` is set and the tree reaches it first.
    ///
    /// # Panics
    ///
    /// Panics if `slots[address]` is empty or `max_nodes` is `Some(0)`.
    pub fn resolve(
        slots: &[Slot],
        address: usize,
        incoming_key: u64,
        max_nodes: Option<usize>,
    ) -> Result<Self, Error> {
        assert!(max_nodes != Some(0), "max_nodes must be positive");
        let Some(resident_key) = slots[address].key() else {
            panic!("no collision at address {address}: slot is empty");
        };

        let mut tree = Self {
            modulus: slots.len(),
            resident_key,
            nodes: vec![CollisionNode {
                key: Some(resident_key),
                address,
                carried_key: incoming_key,
                parent: None,
                left: None,
                right: None,
            }],
            solution: NodeId::ROOT,
        };

        // Leaves are expanded in creation order, one depth level at a time.
        let mut frontier: VecDeque<(NodeId, u64)> = VecDeque::from([(NodeId::ROOT, resident_key)]);
        let mut expanded: HashSet<(usize, u64)> = HashSet::from([(address, incoming_key)]);
        while let Some((leaf, resident)) = frontier.pop_front() {
            let carried = tree.nodes[leaf.0].carried_key;
            for (side, moved) in [(Side::Left, carried), (Side::Right, resident)] {
                if let Some(max_nodes) = max_nodes.filter(|&max| tree.nodes.len() >= max) {
                    return Err(Error::new(
                        ErrorKind::UnresolvableCollision,
                        "collision tree reached its node budget without finding an empty address",
                    )
                    .with_context("key", incoming_key)
                    .with_context("address", address)
                    .with_context("max_nodes", max_nodes));
                }
                let child = tree.expand(slots, leaf, side, moved);
                let node = &tree.nodes[child.0];
                match node.key {
                    None => {
                        tree.solution = child;
                        return Ok(tree);
                    }
                    Some(occupant) => {
                        if expanded.insert((node.address, moved)) {
                            frontier.push_back((child, occupant));
                        }
                    }
                }
            }
        }

        Err(Error::new(
            ErrorKind::UnresolvableCollision,
            "no empty address is reachable from the collision",
        )
        .with_context("key", incoming_key)
        .with_context("address", address)
        .with_context("nodes", tree.nodes.len()))
    }

    /// Attaches a child to `parent` at the next address on `moved`'s probe cycle.
    fn expand(&mut self, slots: &[Slot], parent: NodeId, side: Side, moved: u64) -> NodeId {
        let from = self.nodes[parent.0].address;
        let address = next_address(from, moved, self.modulus);
        let id = NodeId(self.nodes.len());
        self.nodes.push(CollisionNode {
            key: slots[address].key(),
            address,
            carried_key: moved,
            parent: Some(parent),
            left: None,
            right: None,
        });
        match side {
            Side::Left => self.nodes[parent.0].left = Some(id),
            Side::Right => self.nodes[parent.0].right = Some(id),
        }
        trace!(
            "expanded {side:?} from {from} to {address}, carrying {moved} (occupant {:?})",
            slots[address].key()
        );
        id
    }

    pub fn root(&self) -> &CollisionNode {
        &self.nodes[NodeId::ROOT.0]
    }

    /// # Panics
    ///
    /// Panics if `id` belongs to another tree and is out of range for this one.
    pub fn node(&self, id: NodeId) -> &CollisionNode {
        &self.nodes[id.0]
    }

    /// Number of nodes grown, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Address where the collision happened.
    pub fn collision_address(&self) -> usize {
        self.root().address
    }

    /// Key that occupied the collision address.
    pub fn resident_key(&self) -> u64 {
        self.resident_key
    }

    /// Key whose insertion caused the collision.
    pub fn incoming_key(&self) -> u64 {
        self.root().carried_key
    }

    /// Modulus of the table the tree was grown in.
    pub fn modulus(&self) -> usize {
        self.modulus
    }

    /// The node that reached an empty address.
    pub fn solution(&self) -> NodeId {
        self.solution
    }

    /// Nodes from the solution back to the root, both included.
    pub fn solution_path(&self) -> Vec<NodeId> {
        std::iter::successors(Some(self.solution), |id| self.nodes[id.0].parent).collect()
    }

    /// The slot writes that commit this tree.
    pub fn shift_plan(&self) -> ShiftPlan {
        ShiftPlan::from_hops(self.solution_path().into_iter().map(|id| {
            let node = &self.nodes[id.0];
            (node.address, node.carried_key)
        }))
    }

    /// Depth of the deepest node; a lone root has depth 0.
    pub fn depth(&self) -> usize {
        self.preorder().map(|(depth, _)| depth).max().unwrap_or(0)
    }

    /// Visits nodes in pre-order (node, left subtree, right subtree) with their depth.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![(NodeId::ROOT, 0)],
        }
    }
}

/// Renders one line per node in pre-order as `address(key)`, indented by one tab per level.
///
/// Addresses that were empty are rendered as `address(-)`. Keys are unsigned, so there is no
/// `-1` sentinel to print for them.
impl fmt::Display for CollisionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, node) in self.preorder() {
            for _ in 0..depth {
                f.write_str("\t")?;
            }
            match node.key {
                Some(key) => writeln!(f, "{}({key})", node.address)?,
                None => writeln!(f, "{}(-)", node.address)?,
            }
        }
        Ok(())
    }
}

/// Pre-order iterator returned by [`CollisionTree::preorder`].
#[derive(Debug)]
pub struct Preorder<'a> {
    tree: &'a CollisionTree,
    stack: Vec<(NodeId, usize)>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = (usize, &'a CollisionNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        let node = &self.tree.nodes[id.0];
        if let Some(right) = node.right {
            self.stack.push((right, depth + 1));
        }
        if let Some(left) = node.left {
            self.stack.push((left, depth + 1));
        }
        Some((depth, node))
    }
}
