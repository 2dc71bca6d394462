// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node positions for graph renderers.

use crate::node::NodeId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A 2D position in layout space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    /// Horizontal position
    pub x: f32,
    /// Vertical position
    pub y: f32,
}

impl Location {
    /// Create a new location
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Positions of nodes, with a fallback for nodes that were never placed
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphLayout {
    locations: IndexMap<NodeId, Location>,
    /// Used for any node missing from the map
    #[serde(default)]
    pub fallback: Location,
}

impl GraphLayout {
    /// Create an empty layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a node's location
    pub fn place(&mut self, node_id: NodeId, location: Location) {
        self.locations.insert(node_id, location);
    }

    /// Forget a node's location
    pub fn remove(&mut self, node_id: NodeId) -> Option<Location> {
        self.locations.shift_remove(&node_id)
    }

    /// Location of a node, or the fallback if it was never placed
    pub fn location(&self, node_id: NodeId) -> Location {
        self.locations.get(&node_id).copied().unwrap_or(self.fallback)
    }

    /// Check whether a node has an explicit location
    pub fn is_placed(&self, node_id: NodeId) -> bool {
        self.locations.contains_key(&node_id)
    }

    /// Iterate explicit placements
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Location)> + '_ {
        self.locations.iter().map(|(id, loc)| (*id, *loc))
    }
}

impl FromIterator<(NodeId, Location)> for GraphLayout {
    fn from_iter<I: IntoIterator<Item = (NodeId, Location)>>(iter: I) -> Self {
        Self {
            locations: iter.into_iter().collect(),
            fallback: Location::default(),
        }
    }
}
