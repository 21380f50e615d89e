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

//! Builds a table and prints its slot listing and collision trees.
//!
//! ```text
//! table_report                                   # capacity 11 with the sample keys
//! table_report --keys 27,18,29,28 --capacity 11
//! table_report --capacity 47 --packing-factor 0.8 --seed 7
//! RUST_LOG=treehash=debug table_report           # log every placement and collision
//! ```

mod logger;

use anyhow::ensure;
use clap::Parser;
use log::info;
use treehash::table::BinaryTreeTable;
use treehash::table::DEFAULT_CAPACITY;
use treehash::table::DEFAULT_MAX_KEY;

const SAMPLE_KEYS: [u64; 10] = [27, 18, 29, 28, 39, 13, 16, 41, 17, 19];

#[derive(Debug, Parser)]
#[command(
    name = "table_report",
    about = "Fill a binary-tree collision resolution table and print it"
)]
struct Args {
    /// Number of slots, also used as the modulus.
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,

    /// Self-fill with random keys up to this fraction of the capacity.
    #[arg(long, conflicts_with = "keys")]
    packing_factor: Option<f64>,

    /// Comma separated keys to insert in order.
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    keys: Vec<u64>,

    /// Seed for the self-fill generator.
    #[arg(long)]
    seed: Option<u64>,

    /// Exclusive upper bound of self-fill keys.
    #[arg(long, default_value_t = DEFAULT_MAX_KEY)]
    max_key: u64,

    /// Cap on the nodes of each collision tree. Uncapped by default.
    #[arg(long)]
    max_tree_nodes: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    logger::initialize_logger();
    let args = Args::parse();
    ensure!(args.capacity > 0, "--capacity must be positive");
    ensure!(args.max_key > 0, "--max-key must be positive");
    ensure!(
        args.max_tree_nodes != Some(0),
        "--max-tree-nodes must be positive"
    );

    let mut builder = BinaryTreeTable::builder()
        .capacity(args.capacity)
        .max_key(args.max_key);
    if let Some(max_tree_nodes) = args.max_tree_nodes {
        builder = builder.max_tree_nodes(max_tree_nodes);
    }
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }

    let mut table = match args.packing_factor {
        Some(factor) => builder.build_with_packing_factor(factor)?,
        None if args.keys.is_empty() => builder.build_with_keys(SAMPLE_KEYS),
        None => builder.build_with_keys(args.keys),
    };
    info!(
        "built a table of {} slots holding {} keys after {} collisions",
        table.capacity(),
        table.len(),
        table.collisions().len()
    );

    println!("{}", table.report());
    println!("{}", table.collision_report());
    Ok(())
}
