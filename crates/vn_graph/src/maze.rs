// SPDX-License-Identifier: MIT OR Apache-2.0
//! Grid mazes that can be solved with the graph traversal.

use crate::graph::{Graph, GraphError};
use crate::node::{Node, NodeId};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Side of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards y - 1
    North,
    /// Towards y + 1
    South,
    /// Towards x + 1
    East,
    /// Towards x - 1
    West,
}

impl Direction {
    /// All directions
    pub const ALL: [Direction; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// The facing side of the neighbouring cell
    pub fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// Grid offset of the neighbour in this direction
    pub fn offset(self) -> (isize, isize) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }

    fn bit(self) -> u8 {
        match self {
            Self::North => 1,
            Self::South => 2,
            Self::East => 4,
            Self::West => 8,
        }
    }
}

/// One cell of a maze and the sides that have doors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeCell {
    /// Column
    pub x: usize,
    /// Row
    pub y: usize,
    doors: u8,
}

impl MazeCell {
    /// Check if there is a door on a side
    pub fn has_door(&self, direction: Direction) -> bool {
        self.doors & direction.bit() != 0
    }

    /// Sides with doors
    pub fn doors(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(|d| self.has_door(*d))
    }
}

/// A rectangular maze. Doors are always kept symmetric between neighbours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    width: usize,
    height: usize,
    cells: Vec<MazeCell>,
}

impl Maze {
    /// Create a maze with every wall closed.
    ///
    /// Every cell needs a 32-bit graph id, so at most `u32::MAX` cells fit.
    pub fn closed(width: usize, height: usize) -> Result<Self, MazeError> {
        if width == 0 || height == 0 {
            return Err(MazeError::Empty { width, height });
        }
        let fits = width.checked_mul(height)
            .is_some_and(|count| u32::try_from(count).is_ok());
        if !fits {
            return Err(MazeError::TooLarge { width, height });
        }
        let cells = (0..height)
            .flat_map(|y| (0..width).map(move |x| MazeCell { x, y, doors: 0 }))
            .collect();
        Ok(Self { width, height, cells })
    }

    /// Generate a perfect maze with the binary tree algorithm.
    ///
    /// Every cell opens either north or east, chosen at random where both are
    /// possible. The result always has a north row and east column corridor.
    pub fn binary_tree<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> Result<Self, MazeError> {
        let mut maze = Self::closed(width, height)?;
        for y in 0..height {
            for x in 0..width {
                let can_north = y > 0;
                let can_east = x + 1 < width;
                let direction = match (can_north, can_east) {
                    (true, true) if rng.gen_bool(0.5) => Direction::North,
                    (true, true) | (false, true) => Direction::East,
                    (true, false) => Direction::North,
                    (false, false) => continue,
                };
                maze.open(x, y, direction)?;
            }
        }
        tracing::debug!(width, height, "Generated binary tree maze");
        Ok(maze)
    }

    /// Width in cells
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells
    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: usize, y: usize) -> usize {
        self.width * y + x
    }

    /// Get a cell
    pub fn cell(&self, x: usize, y: usize) -> Option<&MazeCell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(self.index(x, y))
    }

    /// Get all cells, row by row
    pub fn cells(&self) -> &[MazeCell] {
        &self.cells
    }

    fn neighbor(&self, x: usize, y: usize, direction: Direction) -> Option<(usize, usize)> {
        let (dx, dy) = direction.offset();
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        (nx < self.width && ny < self.height).then_some((nx, ny))
    }

    /// Open a door between a cell and its neighbour
    pub fn open(&mut self, x: usize, y: usize, direction: Direction) -> Result<(), MazeError> {
        if x >= self.width || y >= self.height {
            return Err(MazeError::OutOfBounds { x, y });
        }
        let (nx, ny) = self.neighbor(x, y, direction)
            .ok_or(MazeError::OuterWall { x, y, direction })?;
        let here = self.index(x, y);
        let there = self.index(nx, ny);
        self.cells[here].doors |= direction.bit();
        self.cells[there].doors |= direction.opposite().bit();
        Ok(())
    }

    /// Graph id of a cell, or `None` outside the grid
    pub fn node_id(&self, x: usize, y: usize) -> Option<NodeId> {
        if x >= self.width || y >= self.height {
            return None;
        }
        u32::try_from(self.index(x, y) + 1).ok().map(NodeId)
    }

    fn cell_node(&self, x: usize, y: usize) -> Result<NodeId, MazeError> {
        self.node_id(x, y).ok_or(MazeError::OutOfBounds { x, y })
    }

    /// Convert to a graph with one node per cell and an edge per door side.
    ///
    /// Node data is the `(x, y)` cell position.
    pub fn to_graph(&self) -> Result<Graph<(usize, usize)>, MazeError> {
        let mut graph = Graph::new();
        for cell in &self.cells {
            graph.insert_node(Node::new(self.cell_node(cell.x, cell.y)?, (cell.x, cell.y)))?;
        }
        for cell in &self.cells {
            let from = self.cell_node(cell.x, cell.y)?;
            for direction in cell.doors() {
                if let Some((nx, ny)) = self.neighbor(cell.x, cell.y, direction) {
                    graph.add_edge(from, self.cell_node(nx, ny)?);
                }
            }
        }
        Ok(graph)
    }

    /// Text drawing of the maze
    pub fn render_ascii(&self) -> String {
        let mut out = String::new();
        for y in 0..self.height {
            let mut top = String::from("+");
            let mut middle = String::new();
            for x in 0..self.width {
                let Some(cell) = self.cell(x, y) else { continue };
                top.push_str(if cell.has_door(Direction::North) { "  +" } else { "--+" });
                middle.push(if cell.has_door(Direction::West) { ' ' } else { '|' });
                middle.push_str("  ");
            }
            middle.push('|');
            out.push_str(&top);
            out.push('\n');
            out.push_str(&middle);
            out.push('\n');
        }
        out.push('+');
        out.push_str(&"--+".repeat(self.width));
        out.push('\n');
        out
    }
}

/// Error when building a maze
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    /// Zero width or height
    #[error("Maze must have at least one cell, got {width}x{height}")]
    Empty {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
    },

    /// More cells than graph ids can number
    #[error("Maze of {width}x{height} cells is too large")]
    TooLarge {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
    },

    /// Cell outside the grid
    #[error("Cell ({x}, {y}) is outside the maze")]
    OutOfBounds {
        /// Column
        x: usize,
        /// Row
        y: usize,
    },

    /// Door would lead outside the grid
    #[error("Cannot open {direction:?} door of cell ({x}, {y}): outer wall")]
    OuterWall {
        /// Column
        x: usize,
        /// Row
        y: usize,
        /// Side
        direction: Direction,
    },

    /// Graph could not be built
    #[error("Maze graph error: {0}")]
    Graph(#[from] GraphError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traversal::traverse;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_doors_are_symmetric() {
        let mut maze = Maze::closed(2, 2).unwrap();
        maze.open(0, 0, Direction::South).unwrap();
        maze.open(1, 1, Direction::West).unwrap();

        assert!(maze.cell(0, 1).unwrap().has_door(Direction::North));
        assert!(maze.cell(0, 1).unwrap().has_door(Direction::East));
        assert_eq!(maze.cell(1, 0).unwrap().doors().count(), 0);
    }

    #[test]
    fn test_invalid_doors() {
        let mut maze = Maze::closed(2, 2).unwrap();
        assert_eq!(
            maze.open(0, 0, Direction::North),
            Err(MazeError::OuterWall { x: 0, y: 0, direction: Direction::North })
        );
        assert_eq!(maze.open(5, 0, Direction::West), Err(MazeError::OutOfBounds { x: 5, y: 0 }));
        assert!(Maze::closed(0, 3).is_err());
    }

    #[test]
    fn test_oversized_maze_is_rejected() {
        assert_eq!(
            Maze::closed(usize::MAX, 2),
            Err(MazeError::TooLarge { width: usize::MAX, height: 2 })
        );
        // One cell more than 32-bit ids can number
        assert_eq!(
            Maze::closed(1 << 16, 1 << 16),
            Err(MazeError::TooLarge { width: 1 << 16, height: 1 << 16 })
        );
    }

    #[test]
    fn test_node_ids() {
        let maze = Maze::closed(3, 2).unwrap();
        assert_eq!(maze.node_id(0, 0), Some(NodeId(1)));
        assert_eq!(maze.node_id(2, 1), Some(NodeId(6)));
        assert_eq!(maze.node_id(3, 0), None);
        assert_eq!(maze.node_id(0, 2), None);
    }

    #[test]
    fn test_binary_tree_is_a_spanning_tree() {
        let mut rng = StdRng::seed_from_u64(7);
        let maze = Maze::binary_tree(8, 6, &mut rng).unwrap();
        let graph = maze.to_graph().unwrap();

        // A perfect maze has cells - 1 passages, each stored as two edges
        assert_eq!(graph.node_count(), 48);
        assert_eq!(graph.edge_count(), 2 * 47);
        assert_eq!(graph.dangling_edges().count(), 0);
    }

    #[test]
    fn test_solve_maze_with_bfs() {
        let mut rng = StdRng::seed_from_u64(42);
        let maze = Maze::binary_tree(5, 5, &mut rng).unwrap();
        let graph = maze.to_graph().unwrap();

        let result = traverse(&graph, |n| n.data == (0, 4), |n| n.data == (4, 0));
        assert_eq!(result.found, maze.node_id(4, 0));
        let path = result.path().unwrap();
        assert_eq!(Some(path.origin()), maze.node_id(0, 4));
        assert!(path.hops() >= 8);
    }

    #[test]
    fn test_render_ascii() {
        let mut maze = Maze::closed(2, 1).unwrap();
        maze.open(0, 0, Direction::East).unwrap();
        assert_eq!(maze.render_ascii(), "+--+--+\n|     |\n+--+--+\n");
    }
}
