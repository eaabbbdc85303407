//! BSP tree container and structural operations.

use std::rc::Rc;

use crate::{Hyperplane, PointSide, Split, SubHyperplane};

use super::boundary::BoundaryAttribute;
use super::node::{BspNode, NodeId, NodeKind};

/// A Binary Space Partitioning tree over an abstract space.
///
/// Nodes live in an arena and are addressed by [`NodeId`]. A tree is either
/// a single leaf or an internal node cut by a sub-hyperplane with exactly
/// one plus and one minus child. Leaves carry an inside/outside tag, which is
/// how a tree describes a region of its space.
///
/// # Construction
///
/// Trees are grown from a single leaf with [`BspTree::insert_cut`], or
/// assembled bottom-up with [`BspTree::leaf`] and [`BspTree::internal`]:
///
/// ```ignore
/// use bsp_region::{BspTree, Hyperplane};
/// use bsp_region::euclidean::OrientedPoint;
/// use std::rc::Rc;
///
/// let cut = OrientedPoint::whole_hyperplane(Rc::new(OrientedPoint::new(0.0, true, 1e-10)));
/// // x <= 0 is inside
/// let tree = BspTree::internal(cut, BspTree::leaf(false), BspTree::leaf(true));
/// ```
#[derive(Debug, Clone)]
pub struct BspTree<H: Hyperplane> {
    nodes: Vec<BspNode<H>>,
    root: NodeId,
}

impl<H: Hyperplane> BspTree<H> {
    /// Creates a tree made of a single leaf.
    pub fn leaf(inside: bool) -> Self {
        Self {
            nodes: vec![BspNode::leaf(inside, None)],
            root: NodeId(0),
        }
    }

    /// Creates a tree cut by `cut`, with fully formed plus and minus subtrees.
    ///
    /// Boundary attributes of the children are kept, the new root has none.
    pub fn internal(cut: H::Sub, plus: BspTree<H>, minus: BspTree<H>) -> Self {
        let mut tree = Self {
            nodes: Vec::with_capacity(1 + plus.len() + minus.len()),
            root: NodeId(0),
        };
        tree.nodes.push(BspNode::leaf(false, None));
        let plus_id = tree.graft(&plus, plus.root, Some(tree.root));
        let minus_id = tree.graft(&minus, minus.root, Some(tree.root));
        tree.nodes[0].kind = NodeKind::Internal {
            cut,
            plus: plus_id,
            minus: minus_id,
            boundary: None,
        };
        tree
    }

    /// Copies the subtree of `source` rooted at `id` into this arena.
    fn graft(&mut self, source: &BspTree<H>, id: NodeId, parent: Option<NodeId>) -> NodeId {
        let new_id = NodeId(self.nodes.len());
        match source.node(id).kind() {
            NodeKind::Leaf { inside } => {
                self.nodes.push(BspNode::leaf(*inside, parent));
            }
            NodeKind::Internal {
                cut,
                plus,
                minus,
                boundary,
            } => {
                // Placeholder until the children have ids
                self.nodes.push(BspNode::leaf(false, parent));
                let plus_id = self.graft(source, *plus, Some(new_id));
                let minus_id = self.graft(source, *minus, Some(new_id));
                self.nodes[new_id.0].kind = NodeKind::Internal {
                    cut: cut.clone(),
                    plus: plus_id,
                    minus: minus_id,
                    boundary: boundary.clone(),
                };
            }
        }
        new_id
    }

    /// Returns the root node id.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns a node of the arena.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &BspNode<H> {
        &self.nodes[id.0]
    }

    /// Returns the number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree holds at least one leaf.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Returns the depth of the tree (1 for a single leaf).
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 1)];
        while let Some((id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some((plus, minus)) = self.children(id) {
                stack.push((plus, depth + 1));
                stack.push((minus, depth + 1));
            }
        }
        max_depth
    }

    /// Returns `(plus, minus)` children of an internal node.
    #[inline]
    pub fn children(&self, id: NodeId) -> Option<(NodeId, NodeId)> {
        self.node(id).children()
    }

    /// Returns the cut of an internal node.
    #[inline]
    pub fn cut(&self, id: NodeId) -> Option<&H::Sub> {
        self.node(id).cut()
    }

    /// Returns the inside tag of a leaf.
    #[inline]
    pub fn inside(&self, id: NodeId) -> Option<bool> {
        self.node(id).inside()
    }

    /// Returns the boundary attribute of an internal node.
    #[inline]
    pub fn boundary(&self, id: NodeId) -> Option<&BoundaryAttribute<H::Sub>> {
        self.node(id).boundary()
    }

    /// Copies the subtree rooted at `id` into a standalone tree.
    pub fn subtree(&self, id: NodeId) -> BspTree<H> {
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        tree.graft(self, id, None);
        tree
    }

    /// Finds the leaf whose cell contains `point`.
    ///
    /// Points strictly on the plus side of a cut descend into the plus child,
    /// everything else (including points within tolerance of the cut)
    /// descends into the minus child.
    pub fn leaf_containing(&self, point: &H::Point) -> NodeId {
        let mut id = self.root;
        while let NodeKind::Internal { cut, plus, minus, .. } = self.node(id).kind() {
            id = match cut.hyperplane().classify_point(point) {
                PointSide::Plus => *plus,
                PointSide::Minus | PointSide::On => *minus,
            };
        }
        id
    }

    /// Restricts `sub` to the cell of `node`, walking up to the root.
    ///
    /// Returns `None` if nothing of `sub` lies inside the cell.
    pub fn fit_to_cell(&self, node: NodeId, sub: H::Sub) -> Option<H::Sub> {
        let mut current = node;
        let mut sub = sub;
        while let Some(parent) = self.node(current).parent() {
            let NodeKind::Internal { cut, plus, .. } = self.node(parent).kind() else {
                return None;
            };
            let (plus_part, minus_part) = sub.split(cut.hyperplane()).into_parts();
            sub = if *plus == current { plus_part } else { minus_part }?;
            current = parent;
        }
        (!sub.is_empty()).then_some(sub)
    }

    /// Turns a leaf into an internal node cut by `plane`.
    ///
    /// The hyperplane is first restricted to the leaf's cell; both new
    /// children copy the leaf's tag. Returns `false` and leaves the tree
    /// untouched if `leaf` is not a leaf or if the hyperplane misses the cell.
    pub fn insert_cut(&mut self, leaf: NodeId, plane: Rc<H>) -> bool {
        let Some(inside) = self.inside(leaf) else {
            return false;
        };
        let Some(cut) = self.fit_to_cell(leaf, H::whole_hyperplane(plane)) else {
            return false;
        };

        let plus = NodeId(self.nodes.len());
        self.nodes.push(BspNode::leaf(inside, Some(leaf)));
        let minus = NodeId(self.nodes.len());
        self.nodes.push(BspNode::leaf(inside, Some(leaf)));
        self.nodes[leaf.0].kind = NodeKind::Internal {
            cut,
            plus,
            minus,
            boundary: None,
        };
        true
    }

    /// Changes the tag of a leaf. Internal nodes are ignored.
    pub(crate) fn set_inside(&mut self, leaf: NodeId, value: bool) {
        if let NodeKind::Leaf { inside } = &mut self.nodes[leaf.0].kind {
            *inside = value;
        }
    }

    /// Stores the boundary attribute of an internal node.
    pub(crate) fn set_boundary(&mut self, id: NodeId, attribute: BoundaryAttribute<H::Sub>) {
        if let NodeKind::Internal { boundary, .. } = &mut self.nodes[id.0].kind {
            *boundary = Some(attribute);
        }
    }

    /// Ids of every node, in arena order.
    pub(crate) fn ids(&self) -> impl Iterator<Item = NodeId> + use<H> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Collapses the root into a leaf if both children are leaves with the same tag.
    pub fn condensed(self) -> Self {
        if let Some((plus, minus)) = self.children(self.root) {
            if let (Some(a), Some(b)) = (self.inside(plus), self.inside(minus)) {
                if a == b {
                    return Self::leaf(a);
                }
            }
        }
        self
    }

    /// Splits the subtree rooted at `id` by a sub-hyperplane.
    ///
    /// Returns `(plus, minus)`: the parts of the subtree lying on each side
    /// of `sub`'s hyperplane. Cuts crossing `sub` are split and redistributed;
    /// cuts of the original tree are never mutated.
    pub fn split(&self, id: NodeId, sub: &H::Sub) -> (BspTree<H>, BspTree<H>) {
        let NodeKind::Internal { cut, plus, minus, .. } = self.node(id).kind() else {
            let inside = self.inside(id).unwrap_or(false);
            return (Self::leaf(inside), Self::leaf(inside));
        };
        let cut_plane = cut.hyperplane();
        let sub_plane = sub.hyperplane();

        match sub.split(cut_plane) {
            Split::Plus(_) => {
                // sub lives entirely in the plus child, the minus child lies
                // on the same side of sub as the cut does
                let (split_plus, split_minus) = self.split(*plus, sub);
                let minus_copy = self.subtree(*minus);
                if matches!(cut.split(sub_plane), Split::Plus(_)) {
                    let rebuilt = Self::internal(cut.clone(), split_plus, minus_copy).condensed();
                    (rebuilt, split_minus)
                } else {
                    let rebuilt = Self::internal(cut.clone(), split_minus, minus_copy).condensed();
                    (split_plus, rebuilt)
                }
            }
            Split::Minus(_) => {
                let (split_plus, split_minus) = self.split(*minus, sub);
                let plus_copy = self.subtree(*plus);
                if matches!(cut.split(sub_plane), Split::Plus(_)) {
                    let rebuilt = Self::internal(cut.clone(), plus_copy, split_plus).condensed();
                    (rebuilt, split_minus)
                } else {
                    let rebuilt = Self::internal(cut.clone(), plus_copy, split_minus).condensed();
                    (split_plus, rebuilt)
                }
            }
            Split::Spanning {
                plus: sub_plus,
                minus: sub_minus,
            } => {
                let (plus_plus, plus_minus) = self.split(*plus, &sub_plus);
                let (minus_plus, minus_minus) = self.split(*minus, &sub_minus);
                let (cut_plus, cut_minus) = cut.split(sub_plane).into_parts();
                let plus_side = match cut_plus {
                    Some(c) => Self::internal(c, plus_plus, minus_plus).condensed(),
                    None => plus_plus,
                };
                let minus_side = match cut_minus {
                    Some(c) => Self::internal(c, plus_minus, minus_minus).condensed(),
                    None => minus_minus,
                };
                (plus_side, minus_side)
            }
            Split::Coplanar => {
                if cut_plane.same_orientation_as(sub_plane) {
                    (self.subtree(*plus), self.subtree(*minus))
                } else {
                    (self.subtree(*minus), self.subtree(*plus))
                }
            }
        }
    }

    /// Returns a tree describing the complement region.
    ///
    /// Leaf tags are flipped and every boundary attribute has its
    /// `plus_outside` and `plus_inside` parts swapped; geometry is untouched.
    pub fn complement(&self) -> Self {
        let mut tree = self.clone();
        for node in &mut tree.nodes {
            match &mut node.kind {
                NodeKind::Leaf { inside } => *inside = !*inside,
                NodeKind::Internal { boundary, .. } => {
                    if let Some(attribute) = boundary {
                        attribute.swap();
                    }
                }
            }
        }
        tree
    }

    /// Checks if any leaf under `id` carries the given tag.
    pub fn has_leaf(&self, id: NodeId, inside: bool) -> bool {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            match self.node(current).kind() {
                NodeKind::Leaf { inside: tag } => {
                    if *tag == inside {
                        return true;
                    }
                }
                NodeKind::Internal { plus, minus, .. } => {
                    stack.push(*plus);
                    stack.push(*minus);
                }
            }
        }
        false
    }
}
