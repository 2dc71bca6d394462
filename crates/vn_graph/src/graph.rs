// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes and edges.

use crate::node::{Edge, Node, NodeId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A directed multigraph.
///
/// Self-loops and parallel edges are allowed, and edges may point at ids that
/// are not (or no longer) in the node set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph<T> {
    /// Nodes in insertion order
    nodes: IndexMap<NodeId, Node<T>>,
    /// Edges in the order they were added
    edges: Vec<Edge>,
}

impl<T> Graph<T> {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
            edges: Vec::new(),
        }
    }

    /// Build a graph from nodes and edges
    pub fn from_parts(
        nodes: impl IntoIterator<Item = Node<T>>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        for node in nodes {
            graph.insert_node(node)?;
        }
        graph.edges.extend(edges);
        Ok(graph)
    }

    /// Id the next added node would get: one past the largest existing id
    pub fn next_node_id(&self) -> NodeId {
        let max = self.nodes.keys().map(|id| id.0).max().unwrap_or(0);
        NodeId(max + 1)
    }

    /// Add a node with a freshly allocated id
    pub fn add_node(&mut self, data: T) -> NodeId {
        let id = self.next_node_id();
        self.nodes.insert(id, Node { id, data });
        id
    }

    /// Insert a node with a caller-chosen id
    pub fn insert_node(&mut self, node: Node<T>) -> Result<NodeId, GraphError> {
        if self.nodes.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        let id = node.id;
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Replace the payload of a node
    pub fn set_node_data(&mut self, node_id: NodeId, data: T) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&node_id)
            .ok_or(GraphError::NodeNotFound(node_id))?;
        node.data = data;
        Ok(())
    }

    /// Remove a node and every edge touching it
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node<T>> {
        let removed = self.nodes.shift_remove(&node_id)?;
        self.edges.retain(|e| !e.involves_node(node_id));
        Some(removed)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(&node_id)
    }

    /// Check whether a node exists
    pub fn contains_node(&self, node_id: NodeId) -> bool {
        self.nodes.contains_key(&node_id)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node<T>> {
        self.nodes.values()
    }

    /// Get all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Append an edge. Endpoints are not validated.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> usize {
        self.edges.push(Edge { from, to });
        self.edges.len() - 1
    }

    /// Replace the edge at `index`
    pub fn set_edge(&mut self, index: usize, edge: Edge) -> Result<Edge, GraphError> {
        let len = self.edges.len();
        let slot = self.edges.get_mut(index)
            .ok_or(GraphError::EdgeOutOfRange { index, len })?;
        Ok(std::mem::replace(slot, edge))
    }

    /// Remove the edge at `index`
    pub fn remove_edge(&mut self, index: usize) -> Result<Edge, GraphError> {
        if index >= self.edges.len() {
            return Err(GraphError::EdgeOutOfRange { index, len: self.edges.len() });
        }
        Ok(self.edges.remove(index))
    }

    /// Get all edges
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Get the number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Targets of every edge leaving `node_id`, in edge order.
    ///
    /// Not deduplicated: parallel edges yield the same target twice.
    pub fn out_neighbors(&self, node_id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.edges.iter()
            .filter(move |e| e.from == node_id)
            .map(|e| e.to)
    }

    /// Edges whose source or target is missing from the node set
    pub fn dangling_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
            .filter(|e| !self.nodes.contains_key(&e.from) || !self.nodes.contains_key(&e.to))
    }

    /// Drop every dangling edge, returning how many were removed
    pub fn retain_valid_edges(&mut self) -> usize {
        let before = self.edges.len();
        let nodes = &self.nodes;
        self.edges.retain(|e| nodes.contains_key(&e.from) && nodes.contains_key(&e.to));
        before - self.edges.len()
    }
}

impl<T> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Error when editing a graph
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Node not found
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Node id already taken
    #[error("Duplicate node id: {0}")]
    DuplicateNode(NodeId),

    /// Edge index past the end of the edge list
    #[error("Edge index {index} out of range (graph has {len} edges)")]
    EdgeOutOfRange {
        /// Requested index
        index: usize,
        /// Number of edges
        len: usize,
    },
}
