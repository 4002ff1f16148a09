use std::collections::HashSet;

use crate::types::{DependencyMapping, Edge};

/// Which identifiers count as graph nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeMode {
    /// Every unit key plus every imported symbol, so external targets of an
    /// edge also appear as nodes.
    #[default]
    KeysAndTargets,
    /// Only the units that have at least one kept import.
    KeysOnly,
}

/// Derives node and edge sets from a dependency mapping.
///
/// All operations are pure reads; calling them repeatedly on an unchanged
/// mapping yields equal sets.
pub struct GraphQuery<'a> {
    mapping: &'a DependencyMapping,
}

impl<'a> GraphQuery<'a> {
    pub fn new(mapping: &'a DependencyMapping) -> Self {
        Self { mapping }
    }

    /// Returns the node set in [`NodeMode::KeysAndTargets`] mode.
    pub fn nodes(&self) -> HashSet<String> {
        self.nodes_with(NodeMode::KeysAndTargets)
    }

    pub fn nodes_with(&self, mode: NodeMode) -> HashSet<String> {
        let mut nodes: HashSet<String> = self.mapping.keys().cloned().collect();
        if mode == NodeMode::KeysAndTargets {
            nodes.extend(self.mapping.values().flatten().cloned());
        }
        nodes
    }

    /// Returns one edge per (unit, imported symbol) pair.
    pub fn edges(&self) -> HashSet<Edge> {
        self.mapping
            .iter()
            .flat_map(|(unit, symbols)| symbols.iter().map(move |symbol| Edge::new(unit, symbol)))
            .collect()
    }

    /// Number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.mapping.values().map(HashSet::len).sum()
    }
}
