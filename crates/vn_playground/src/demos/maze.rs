// SPDX-License-Identifier: MIT OR Apache-2.0
//! Generate a binary-tree maze and solve it with BFS.

use super::Result;
use crate::config::MazeSettings;
use rand::rngs::StdRng;
use rand::SeedableRng;
use vn_graph::{traverse, Maze};

/// Outcome of the maze demo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeReport {
    /// ASCII drawing of the maze
    pub drawing: String,
    /// Cells from the bottom-left to the top-right corner, if connected
    pub route: Option<Vec<(usize, usize)>>,
    /// Number of BFS steps recorded
    pub steps: usize,
}

/// Generate the configured maze and solve it corner to corner
pub fn run(settings: &MazeSettings) -> Result<MazeReport> {
    let mut rng = StdRng::seed_from_u64(settings.seed);
    let maze = Maze::binary_tree(settings.width, settings.height, &mut rng)?;
    let drawing = maze.render_ascii();
    tracing::debug!("Generated maze:\n{}", drawing);

    let graph = maze.to_graph()?;
    let start = (0, maze.height() - 1);
    let goal = (maze.width() - 1, 0);
    let traversal = traverse(&graph, |node| node.data == start, |node| node.data == goal);

    let route = traversal.path().map(|path| {
        path.nodes()
            .into_iter()
            .filter_map(|id| graph.node(id).map(|node| node.data))
            .collect::<Vec<_>>()
    });
    match &route {
        Some(cells) => tracing::info!(hops = cells.len() - 1, steps = traversal.len(), "Solved maze"),
        None => tracing::warn!(steps = traversal.len(), "Maze has no route between corners"),
    }

    Ok(MazeReport {
        drawing,
        route,
        steps: traversal.len(),
    })
}
