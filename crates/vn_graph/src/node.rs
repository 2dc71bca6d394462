// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node and edge definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer identifier of a node, unique within a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Get the raw id value
    pub fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for NodeId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node carrying an arbitrary payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node<T> {
    /// Unique node ID
    pub id: NodeId,
    /// Payload (a label for the example graphs)
    pub data: T,
}

impl<T> Node<T> {
    /// Create a new node
    pub fn new(id: impl Into<NodeId>, data: T) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// A directed edge. Endpoints are not required to exist in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Source node ID
    pub from: NodeId,
    /// Target node ID
    pub to: NodeId,
}

impl Edge {
    /// Create a new edge
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Check if this edge touches a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.from == node_id || self.to == node_id
    }

    /// Check if this edge starts and ends at the same node
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}
