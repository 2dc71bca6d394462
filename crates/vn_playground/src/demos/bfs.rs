// SPDX-License-Identifier: MIT OR Apache-2.0
//! Step-by-step BFS over the sample graph.

use super::{DemoError, Result};
use crate::config::BfsSettings;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use vn_graph::{example, traverse, BfsState, Graph, HistoryCursor, Marking, NodeId, Traversal};

/// How a node is drawn in one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeClass {
    /// Being expanded right now
    Current,
    /// Already expanded
    Done,
    /// Waiting in the queue
    Queued,
    /// Not reached yet
    Unexplored,
}

impl NodeClass {
    /// Classify `node_id` in `state`
    pub fn of(state: &BfsState, node_id: NodeId) -> Self {
        if state.is_current(node_id) {
            return Self::Current;
        }
        match state.marking(node_id) {
            Marking::Done => Self::Done,
            Marking::Queued => Self::Queued,
            Marking::Unexplored => Self::Unexplored,
        }
    }

    /// Single character used in step logs
    pub fn symbol(&self) -> char {
        match self {
            Self::Current => '@',
            Self::Done => '#',
            Self::Queued => '+',
            Self::Unexplored => '.',
        }
    }
}

/// Outcome of the BFS demo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BfsReport {
    /// Label of the node that was reached
    pub found: Option<String>,
    /// Route as labels joined by arrows
    pub route: Option<String>,
    /// Number of recorded steps
    pub steps: usize,
}

/// One row per step, each node rendered as its label and class symbol
pub fn describe_step(graph: &Graph<String>, state: &BfsState) -> String {
    graph.nodes()
        .map(|node| format!("{}{}", node.data, NodeClass::of(state, node.id).symbol()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Labels along the found route
pub fn route_labels(graph: &Graph<String>, traversal: &Traversal) -> Option<String> {
    let path = traversal.path()?;
    let labels = path.nodes()
        .into_iter()
        .map(|id| graph.node(id).map_or_else(|| id.to_string(), |node| node.data.clone()))
        .collect::<Vec<_>>();
    Some(labels.join(" -> "))
}

/// Run BFS between the configured labels and log every step
pub fn run(settings: &BfsSettings) -> Result<BfsReport> {
    let graph = example::graph()?;
    for label in [&settings.start_label, &settings.goal_label] {
        if !graph.nodes().any(|node| &node.data == label) {
            return Err(DemoError::UnknownLabel(label.clone()));
        }
    }

    let traversal = traverse(
        &graph,
        |node| node.data == settings.start_label,
        |node| node.data == settings.goal_label,
    );

    let mut cursor = HistoryCursor::new(&traversal);
    while let Some(state) = cursor.current() {
        tracing::debug!(step = cursor.index(), queue = state.queue.len(), "{}", describe_step(&graph, state));
        if cursor.at_end() {
            break;
        }
        cursor.next();
    }

    let found = traversal.found
        .and_then(|id| graph.node(id))
        .map(|node| node.data.clone());
    let route = route_labels(&graph, &traversal);
    match &route {
        Some(route) => tracing::info!(steps = traversal.len(), "Found route {}", route),
        None => tracing::info!(steps = traversal.len(), "No route from {} to {}", settings.start_label, settings.goal_label),
    }

    if let Some(path) = &settings.export_history {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &traversal.history)?;
        tracing::info!("Exported BFS history to {:?}", path);
    }

    Ok(BfsReport {
        found,
        route,
        steps: traversal.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_labels_find_route() {
        let report = run(&BfsSettings::default()).unwrap();
        assert_eq!(report.found.as_deref(), Some("E"));
        let route = report.route.unwrap();
        assert!(route.starts_with("S -> "));
        assert!(route.ends_with(" -> E"));
        assert!(report.steps > 1);
    }

    #[test]
    fn test_unknown_label() {
        let settings = BfsSettings {
            goal_label: "nope".to_string(),
            ..BfsSettings::default()
        };
        assert!(matches!(run(&settings), Err(DemoError::UnknownLabel(label)) if label == "nope"));
    }

    #[test]
    fn test_node_classes() {
        let graph = example::graph().unwrap();
        let traversal = traverse(&graph, example::is_start, example::is_goal);
        let first = &traversal.history[0];
        let start = first.current.unwrap();
        assert_eq!(NodeClass::of(first, start), NodeClass::Current);

        let last = traversal.last().unwrap();
        let goal = traversal.found.unwrap();
        assert_eq!(NodeClass::of(last, goal), NodeClass::Current);
        assert!(describe_step(&graph, first).contains("S@"));
    }

    #[test]
    fn test_export_history() {
        let path = std::env::temp_dir().join(format!("vn_bfs_history_{}.json", std::process::id()));
        let settings = BfsSettings {
            export_history: Some(path.clone()),
            ..BfsSettings::default()
        };
        let report = run(&settings).unwrap();

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(report.steps));
        std::fs::remove_file(&path).unwrap();
    }
}
