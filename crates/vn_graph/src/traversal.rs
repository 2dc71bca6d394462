// SPDX-License-Identifier: MIT OR Apache-2.0
//! Breadth-first search with a step-by-step history.
//!
//! [`traverse`] runs a multi-source BFS and records one [`BfsState`] per
//! dequeue, plus a final snapshot, so a visualizer can scrub back and forth
//! through the search without re-running it.

use crate::graph::Graph;
use crate::node::{Node, NodeId};
use crate::path::Path;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;

/// Traversal status of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Marking {
    /// Not reached yet
    #[default]
    Unexplored,
    /// Discovered and waiting in the queue
    Queued,
    /// Dequeued and expanded
    Done,
}

impl Marking {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unexplored => "Unexplored",
            Self::Queued => "Queued",
            Self::Done => "Done",
        }
    }
}

/// What the search knows about a node it has reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Route by which the node was first discovered
    pub path: Arc<Path>,
    /// Current status
    pub marking: Marking,
}

/// Annotations by node id. Nodes missing from the map are unexplored.
pub type Annotations = IndexMap<NodeId, Annotation>;

/// Snapshot of the search taken right after a dequeue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BfsState {
    /// Node just dequeued, `None` in the final snapshot of a failed search
    pub current: Option<NodeId>,
    /// Nodes still waiting, front first
    pub queue: Vec<NodeId>,
    /// Goal node, only set in the final snapshot of a successful search
    pub found: Option<NodeId>,
    /// Status of every reached node
    pub annotations: Annotations,
}

impl BfsState {
    /// Effective marking of a node
    pub fn marking(&self, node_id: NodeId) -> Marking {
        self.annotations.get(&node_id)
            .map_or(Marking::Unexplored, |a| a.marking)
    }

    /// Annotation of a node, if it has been reached
    pub fn annotation(&self, node_id: NodeId) -> Option<&Annotation> {
        self.annotations.get(&node_id)
    }

    /// Discovery route of a node, if it has been reached
    pub fn path(&self, node_id: NodeId) -> Option<&Arc<Path>> {
        self.annotations.get(&node_id).map(|a| &a.path)
    }

    /// Check if a node is the one just dequeued
    pub fn is_current(&self, node_id: NodeId) -> bool {
        self.current == Some(node_id)
    }
}

/// Result of a search: the goal found (if any) and every recorded step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Traversal {
    /// Goal node that ended the search
    pub found: Option<NodeId>,
    /// Snapshots, one per dequeue plus a final one
    pub history: Vec<BfsState>,
}

impl Traversal {
    /// Route from a start node to the goal
    pub fn path(&self) -> Option<Arc<Path>> {
        let found = self.found?;
        self.history.last()?.path(found).cloned()
    }

    /// Final snapshot
    pub fn last(&self) -> Option<&BfsState> {
        self.history.last()
    }

    /// Number of recorded snapshots
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Check whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

/// Run a multi-source BFS from every node matching `is_start` until a node
/// matching `is_goal` is dequeued.
///
/// Discovery follows edge-list order. Edges pointing at ids that are not in
/// the graph are skipped.
pub fn traverse<T>(
    graph: &Graph<T>,
    mut is_start: impl FnMut(&Node<T>) -> bool,
    mut is_goal: impl FnMut(&Node<T>) -> bool,
) -> Traversal {
    let mut annotations = Annotations::new();
    let mut queue = VecDeque::new();

    for node in graph.nodes().filter(|n| is_start(n)) {
        annotations.insert(node.id, Annotation {
            path: Path::root(node.id),
            marking: Marking::Queued,
        });
        queue.push_back(node.id);
    }
    tracing::debug!(starts = queue.len(), nodes = graph.node_count(), "Starting BFS");

    let mut history: Vec<BfsState> = Vec::new();

    while let Some(current_id) = queue.pop_front() {
        // Only ids that exist are ever queued
        let Some(current) = graph.node(current_id) else {
            continue;
        };

        annotations = mark_done(annotations, current_id);
        let snapshot = BfsState {
            current: Some(current_id),
            queue: queue.iter().copied().collect(),
            found: None,
            annotations: annotations.clone(),
        };
        tracing::trace!(current = %current_id, queued = snapshot.queue.len(), "BFS step");

        if is_goal(current) {
            let last = BfsState {
                found: Some(current_id),
                ..snapshot.clone()
            };
            history.push(snapshot);
            history.push(last);
            tracing::debug!(found = %current_id, steps = history.len(), "BFS reached goal");
            return Traversal {
                found: Some(current_id),
                history,
            };
        }
        history.push(snapshot);

        let Some(current_path) = annotations.get(&current_id).map(|a| Arc::clone(&a.path)) else {
            continue;
        };
        for neighbor in graph.out_neighbors(current_id) {
            if !graph.contains_node(neighbor) {
                tracing::warn!(from = %current_id, to = %neighbor, "Skipping edge to missing node");
                continue;
            }
            let unexplored = annotations.get(&neighbor)
                .map_or(true, |a| a.marking == Marking::Unexplored);
            if unexplored {
                annotations = mark_queued(annotations, neighbor, &current_path);
                queue.push_back(neighbor);
            }
        }
    }

    history.push(BfsState {
        current: None,
        queue: Vec::new(),
        found: None,
        annotations,
    });
    tracing::debug!(steps = history.len(), "BFS exhausted without reaching goal");

    Traversal {
        found: None,
        history,
    }
}

fn mark_done(mut annotations: Annotations, node_id: NodeId) -> Annotations {
    if let Some(annotation) = annotations.get_mut(&node_id) {
        annotation.marking = Marking::Done;
    }
    annotations
}

fn mark_queued(mut annotations: Annotations, node_id: NodeId, from: &Arc<Path>) -> Annotations {
    annotations.insert(node_id, Annotation {
        path: Path::extend(from, node_id),
        marking: Marking::Queued,
    });
    annotations
}
