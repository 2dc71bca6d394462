// SPDX-License-Identifier: MIT OR Apache-2.0
//! The sample graph used by the BFS and graph editor demos.
//!
//! Fifteen nodes laid out on a 4x4 grid (id 6 is missing). The node labelled
//! `S` is the start and `E` is the goal.

use crate::graph::{Graph, GraphError};
use crate::layout::{GraphLayout, Location};
use crate::node::{Edge, Node, NodeId};

/// Label of the start node
pub const START_LABEL: &str = "S";

/// Label of the goal node
pub const GOAL_LABEL: &str = "E";

const NODES: [(u32, &str); 15] = [
    (1, START_LABEL), (2, "2"), (3, "3"), (4, "4"), (5, "5"),
    (7, "7"), (8, "8"), (9, "9"), (10, "10"), (11, "11"),
    (12, GOAL_LABEL), (13, "13"), (14, "14"), (15, "15"), (16, "16"),
];

const EDGES: [(u32, u32); 41] = [
    (1, 2), (2, 1), (3, 2), (2, 3), (4, 3), (3, 4), (5, 1), (1, 5),
    (7, 3), (3, 7), (8, 7), (8, 4), (4, 8), (7, 8), (9, 5), (9, 10),
    (9, 13), (5, 9), (10, 9), (13, 9), (10, 11), (10, 14), (11, 10), (14, 10),
    (11, 12), (11, 7), (11, 15), (11, 11), (12, 11), (7, 11), (12, 8), (12, 16),
    (16, 12), (8, 12), (13, 14), (14, 13), (14, 15), (15, 14), (15, 16), (16, 15),
    (15, 11),
];

const LOCATIONS: [(u32, f32, f32); 15] = [
    (1, 86.0, 60.0), (2, 226.0, 60.0), (3, 369.0, 60.0), (4, 513.0, 61.0),
    (5, 82.0, 189.0), (7, 366.0, 190.0), (8, 514.0, 193.0),
    (9, 79.0, 339.0), (10, 221.0, 335.0), (11, 371.0, 334.0), (12, 517.0, 331.0),
    (13, 80.0, 487.0), (14, 222.0, 481.0), (15, 373.0, 479.0), (16, 520.0, 475.0),
];

/// The sample graph with string labels
pub fn graph() -> Result<Graph<String>, GraphError> {
    Graph::from_parts(
        NODES.iter().map(|&(id, label)| Node::new(id, label.to_string())),
        EDGES.iter().map(|&(from, to)| Edge::new(from, to)),
    )
}

/// Positions for the sample graph
pub fn layout() -> GraphLayout {
    LOCATIONS.iter()
        .map(|&(id, x, y)| (NodeId(id), Location::new(x, y)))
        .collect()
}

/// Check whether a node is the sample start
pub fn is_start(node: &Node<String>) -> bool {
    node.data == START_LABEL
}

/// Check whether a node is the sample goal
pub fn is_goal(node: &Node<String>) -> bool {
    node.data == GOAL_LABEL
}
