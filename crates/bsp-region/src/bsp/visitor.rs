//! Visitor pattern for BSP tree traversal.
//!
//! Visitors allow custom aggregation over a tree (sizes, boundary measures,
//! leaf collection) without coupling traversal logic to specific use cases.

use crate::{Hyperplane, SubHyperplane};

use super::node::NodeId;
use super::tree::BspTree;

/// Order in which an internal node, its cut and its children are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitOrder {
    PlusMinusCut,
    PlusCutMinus,
    MinusPlusCut,
    MinusCutPlus,
    CutPlusMinus,
    CutMinusPlus,
}

/// Visitor for processing nodes during BSP tree traversal.
///
/// The traversal asks the visitor for an order at every internal node, so
/// a visitor may choose a different order depending on the node.
pub trait BspVisitor<H: Hyperplane> {
    /// Chooses the order for an internal node.
    fn order(&mut self, _tree: &BspTree<H>, _node: NodeId) -> VisitOrder {
        VisitOrder::MinusCutPlus
    }

    /// Called for the cut of each internal node.
    fn visit_internal(&mut self, tree: &BspTree<H>, node: NodeId);

    /// Called for each leaf.
    fn visit_leaf(&mut self, tree: &BspTree<H>, node: NodeId);
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Enter(NodeId),
    Cut(NodeId),
}

impl<H: Hyperplane> BspTree<H> {
    /// Traverses the whole tree with the given visitor.
    ///
    /// Uses an explicit work list, so very deep trees do not exhaust the
    /// call stack.
    pub fn visit<V: BspVisitor<H>>(&self, visitor: &mut V) {
        let mut stack = vec![Step::Enter(self.root())];
        while let Some(step) = stack.pop() {
            match step {
                Step::Cut(id) => visitor.visit_internal(self, id),
                Step::Enter(id) => match self.children(id) {
                    None => visitor.visit_leaf(self, id),
                    Some((plus, minus)) => {
                        let (p, m, c) = (Step::Enter(plus), Step::Enter(minus), Step::Cut(id));
                        let steps = match visitor.order(self, id) {
                            VisitOrder::PlusMinusCut => [p, m, c],
                            VisitOrder::PlusCutMinus => [p, c, m],
                            VisitOrder::MinusPlusCut => [m, p, c],
                            VisitOrder::MinusCutPlus => [m, c, p],
                            VisitOrder::CutPlusMinus => [c, p, m],
                            VisitOrder::CutMinusPlus => [c, m, p],
                        };
                        // last pushed is handled first
                        stack.extend(steps.into_iter().rev());
                    }
                },
            }
        }
    }
}

/// Sums the sizes of every boundary attribute in the tree.
///
/// Leaves contribute nothing. The result is the boundary measure of the
/// region represented by an annotated tree.
#[derive(Debug, Default)]
pub struct BoundarySizeVisitor {
    size: f64,
}

impl BoundarySizeVisitor {
    /// Creates a visitor with a zero total.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the accumulated boundary size.
    pub fn size(&self) -> f64 {
        self.size
    }
}

impl<H: Hyperplane> BspVisitor<H> for BoundarySizeVisitor {
    fn visit_internal(&mut self, tree: &BspTree<H>, node: NodeId) {
        if let Some(attribute) = tree.boundary(node) {
            if let Some(piece) = attribute.plus_outside() {
                self.size += piece.size();
            }
            if let Some(piece) = attribute.plus_inside() {
                self.size += piece.size();
            }
        }
    }

    fn visit_leaf(&mut self, _tree: &BspTree<H>, _node: NodeId) {}
}
