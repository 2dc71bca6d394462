// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph model and traversal for the vn playground.
//!
//! This crate provides the data side of the graph experiments:
//! - Directed multigraphs with integer node ids
//! - Editing operations used by node/edge editors
//! - Multi-source BFS that records every step for later scrubbing
//! - Mazes that can be turned into graphs and solved
//!
//! ## Architecture
//!
//! Traversal never mutates the graph. Every dequeue produces an immutable
//! [`BfsState`] snapshot, and discovery routes are stored as shared
//! back-pointer chains ([`Path`]) so snapshots stay cheap.

pub mod node;
pub mod graph;
pub mod layout;
pub mod path;
pub mod traversal;
pub mod cursor;
pub mod example;
pub mod maze;

pub use node::{Edge, Node, NodeId};
pub use graph::{Graph, GraphError};
pub use layout::{GraphLayout, Location};
pub use path::Path;
pub use traversal::{traverse, Annotation, Annotations, BfsState, Marking, Traversal};
pub use cursor::HistoryCursor;
pub use maze::{Direction, Maze, MazeCell, MazeError};
