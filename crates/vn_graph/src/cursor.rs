// SPDX-License-Identifier: MIT OR Apache-2.0
//! Prev/next navigation through a recorded traversal.

use crate::traversal::{BfsState, Traversal};

/// Position within a traversal history.
///
/// The index always stays within `[0, len - 1]`; stepping past either end
/// stays on the boundary.
#[derive(Debug, Clone, Copy)]
pub struct HistoryCursor<'a> {
    history: &'a [BfsState],
    index: usize,
}

impl<'a> HistoryCursor<'a> {
    /// Create a cursor at the first snapshot
    pub fn new(traversal: &'a Traversal) -> Self {
        Self::over(&traversal.history)
    }

    /// Create a cursor over a raw slice of snapshots
    pub fn over(history: &'a [BfsState]) -> Self {
        Self { history, index: 0 }
    }

    /// Current index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of snapshots
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Check whether there is nothing to navigate
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Snapshot under the cursor
    pub fn current(&self) -> Option<&'a BfsState> {
        self.history.get(self.index)
    }

    /// Jump to an index, clamped to the history bounds
    pub fn seek(&mut self, index: usize) -> Option<&'a BfsState> {
        self.index = index.min(self.history.len().saturating_sub(1));
        self.current()
    }

    /// Step forward
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&'a BfsState> {
        self.seek(self.index.saturating_add(1))
    }

    /// Step back
    pub fn prev(&mut self) -> Option<&'a BfsState> {
        self.seek(self.index.saturating_sub(1))
    }

    /// Jump to the first snapshot
    pub fn first(&mut self) -> Option<&'a BfsState> {
        self.seek(0)
    }

    /// Jump to the final snapshot
    pub fn last(&mut self) -> Option<&'a BfsState> {
        self.seek(usize::MAX)
    }

    /// Check whether the cursor sits on the final snapshot
    pub fn at_end(&self) -> bool {
        self.index + 1 >= self.history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::node::{Edge, Node, NodeId};
    use crate::traversal::traverse;

    fn chain() -> Traversal {
        let graph = Graph::from_parts(
            (1..=3).map(|id| Node::new(id, ())),
            [Edge::new(1, 2), Edge::new(2, 3)],
        )
        .unwrap();
        traverse(&graph, |n| n.id == NodeId(1), |n| n.id == NodeId(3))
    }

    #[test]
    fn test_cursor_clamps_at_both_ends() {
        let traversal = chain();
        let mut cursor = HistoryCursor::new(&traversal);
        assert_eq!(cursor.len(), 4);

        assert_eq!(cursor.prev().unwrap().current, Some(NodeId(1)));
        assert_eq!(cursor.index(), 0);

        cursor.next();
        cursor.next();
        assert_eq!(cursor.current().unwrap().current, Some(NodeId(3)));
        assert!(!cursor.at_end());

        cursor.next();
        cursor.next();
        assert_eq!(cursor.index(), 3);
        assert!(cursor.at_end());
        assert_eq!(cursor.current().unwrap().found, Some(NodeId(3)));

        assert_eq!(cursor.seek(99).unwrap().found, Some(NodeId(3)));
        assert_eq!(cursor.first().unwrap().current, Some(NodeId(1)));
        assert_eq!(cursor.last().unwrap().found, Some(NodeId(3)));
    }

    #[test]
    fn test_empty_history() {
        let mut cursor = HistoryCursor::over(&[]);
        assert!(cursor.is_empty());
        assert!(cursor.next().is_none());
        assert!(cursor.prev().is_none());
        assert_eq!(cursor.index(), 0);
    }
}
