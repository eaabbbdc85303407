//! BSP tree node implementation.

use crate::{Hyperplane, SubHyperplane};

use super::boundary::BoundaryAttribute;

/// Index of a node inside a [`BspTree`](super::BspTree) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in its arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Content of a node: either a leaf or a cut with two children.
///
/// These are the only two shapes a node can take, so a leaf carrying a cut
/// or an internal node missing a child cannot be expressed.
#[derive(Debug, Clone)]
pub enum NodeKind<H: Hyperplane> {
    /// Leaf cell, tagged inside or outside the region.
    Leaf { inside: bool },
    /// Internal node split by a cut.
    Internal {
        /// The cut hyperplane restricted to the node's cell.
        cut: H::Sub,
        /// Child on the plus side of the cut.
        plus: NodeId,
        /// Child on the minus side of the cut.
        minus: NodeId,
        /// Parts of the cut belonging to the region boundary, once computed.
        boundary: Option<BoundaryAttribute<H::Sub>>,
    },
}

/// A node in the BSP tree arena.
///
/// The parent index is bookkeeping used to walk up to the root (for example
/// to fit a new cut to the node's cell). Ownership always flows from parent
/// to children.
#[derive(Debug, Clone)]
pub struct BspNode<H: Hyperplane> {
    pub(crate) kind: NodeKind<H>,
    pub(crate) parent: Option<NodeId>,
}

impl<H: Hyperplane> BspNode<H> {
    pub(crate) fn leaf(inside: bool, parent: Option<NodeId>) -> Self {
        Self {
            kind: NodeKind::Leaf { inside },
            parent,
        }
    }

    /// Returns the node content.
    #[inline]
    pub fn kind(&self) -> &NodeKind<H> {
        &self.kind
    }

    /// Returns the parent node, `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Checks if this node is a leaf.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Returns the inside tag of a leaf, `None` for internal nodes.
    #[inline]
    pub fn inside(&self) -> Option<bool> {
        match self.kind {
            NodeKind::Leaf { inside } => Some(inside),
            NodeKind::Internal { .. } => None,
        }
    }

    /// Returns the cut of an internal node.
    #[inline]
    pub fn cut(&self) -> Option<&H::Sub> {
        match &self.kind {
            NodeKind::Leaf { .. } => None,
            NodeKind::Internal { cut, .. } => Some(cut),
        }
    }

    /// Returns `(plus, minus)` children of an internal node.
    #[inline]
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match self.kind {
            NodeKind::Leaf { .. } => None,
            NodeKind::Internal { plus, minus, .. } => Some((plus, minus)),
        }
    }

    /// Returns the boundary attribute of an internal node, if computed.
    #[inline]
    pub fn boundary(&self) -> Option<&BoundaryAttribute<H::Sub>> {
        match &self.kind {
            NodeKind::Leaf { .. } => None,
            NodeKind::Internal { boundary, .. } => boundary.as_ref(),
        }
    }

    /// Returns the hyperplane supporting the cut of an internal node.
    #[inline]
    pub fn hyperplane(&self) -> Option<&H> {
        self.cut().map(|cut| cut.hyperplane().as_ref())
    }
}
