// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Cluster-wide GPU inventory from `sinfo --Node` output.

use std::collections::HashSet;

use crate::parsing::{parse_gpu_gres, three_field_rows};

/// One row of `sinfo -h --Node --Format=nodehost,gres,gresused`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRecord<'a> {
    pub hostname: &'a str,
    pub gres: &'a str,
    pub gres_used: &'a str,
}

impl<'a> NodeRecord<'a> {
    pub fn from_fields([hostname, gres, gres_used]: [&'a str; 3]) -> Self {
        Self {
            hostname,
            gres,
            gres_used,
        }
    }
}

/// GPU totals across all distinct nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InventoryCounters {
    pub alloc: f64,
    pub idle: f64,
    pub total: f64,
}

impl InventoryCounters {
    /// Add one node's share. Idle is computed per node, not from the totals.
    pub fn add_node(&mut self, avail: f64, alloc: f64) {
        self.alloc += alloc;
        self.total += avail;
        self.idle += avail - alloc;
    }
}

/// Parse a node listing into GPU inventory counters.
///
/// Nodes in more than one partition appear once per partition; only the
/// first row for each hostname is counted.
pub fn parse_inventory(input: &[u8]) -> InventoryCounters {
    let text = String::from_utf8_lossy(input);
    let mut counters = InventoryCounters::default();
    let mut seen = HashSet::new();

    for node in three_field_rows(&text).map(NodeRecord::from_fields) {
        if !seen.insert(node.hostname) {
            tracing::trace!(hostname = node.hostname, "skipping duplicate node row");
            continue;
        }

        let avail = parse_gpu_gres(node.gres);
        let alloc = parse_gpu_gres(node.gres_used);
        counters.add_node(avail, alloc);
    }

    counters
}
