// SPDX-License-Identifier: MIT OR Apache-2.0
//! Discovery routes as shared back-pointer chains.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Route by which a node was discovered.
///
/// A path is either a traversal root or one step further than its parent
/// path. Parents are shared, so extending a path is O(1) and common prefixes
/// are stored once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Path {
    /// The node was a traversal start
    Root(NodeId),
    /// The node was reached from the end of `from`
    Step {
        /// Parent route
        from: Arc<Path>,
        /// Node at the end of this route
        node: NodeId,
    },
}

impl Path {
    /// Create a root path
    pub fn root(node: NodeId) -> Arc<Self> {
        Arc::new(Self::Root(node))
    }

    /// Extend a path by one node
    pub fn extend(from: &Arc<Self>, node: NodeId) -> Arc<Self> {
        Arc::new(Self::Step {
            from: Arc::clone(from),
            node,
        })
    }

    /// Node at the end of this path
    pub fn node(&self) -> NodeId {
        match self {
            Self::Root(node) | Self::Step { node, .. } => *node,
        }
    }

    /// Parent path, `None` for roots
    pub fn parent(&self) -> Option<&Arc<Path>> {
        match self {
            Self::Root(_) => None,
            Self::Step { from, .. } => Some(from),
        }
    }

    /// Node where the route started
    pub fn origin(&self) -> NodeId {
        let mut current = self;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current.node()
    }

    /// Number of edges walked from the origin
    pub fn hops(&self) -> usize {
        self.ancestors().count() - 1
    }

    /// Walk from this node back to the origin
    pub fn ancestors(&self) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(self), |p| p.parent().map(|a| &**a))
            .map(Path::node)
    }

    /// Node ids from origin to this node
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut nodes: Vec<_> = self.ancestors().collect();
        nodes.reverse();
        nodes
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes().iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{node}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extended_paths_share_prefix() {
        let root = Path::root(NodeId(1));
        let left = Path::extend(&root, NodeId(2));
        let right = Path::extend(&root, NodeId(3));

        assert!(Arc::ptr_eq(left.parent().unwrap(), right.parent().unwrap()));
        assert_eq!(left.origin(), NodeId(1));
        assert_eq!(right.nodes(), vec![NodeId(1), NodeId(3)]);
    }

    #[test]
    fn test_display_and_hops() {
        let path = Path::extend(&Path::extend(&Path::root(NodeId(1)), NodeId(2)), NodeId(3));
        assert_eq!(path.to_string(), "1 -> 2 -> 3");
        assert_eq!(path.hops(), 2);
        assert_eq!(Path::root(NodeId(5)).hops(), 0);
    }
}
