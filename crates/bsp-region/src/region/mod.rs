//! Regions: BSP trees whose leaves are tagged inside or outside.

mod factory;

use std::rc::Rc;

use tracing::debug;

use crate::bsp::{BoundarySizeVisitor, BspTree, CutSelector, FirstCut, NodeId, NodeKind};
use crate::{Hyperplane, PointSide, Split, SubHyperplane};

use factory::LeafMerger;

/// Position of a point with respect to a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Inside,
    Outside,
    Boundary,
}

/// A space whose regions have a measurable size.
pub trait Measure: Hyperplane {
    /// Size of the region described by an annotated tree.
    fn region_size(tree: &BspTree<Self>) -> f64;

    /// Rebuilds a region with as few cuts as the space allows.
    ///
    /// The default returns the region unchanged.
    fn compact(region: Region<Self>) -> Region<Self> {
        region
    }
}

/// A region of space described by a BSP tree.
///
/// The tree of a region always carries boundary attributes on its internal
/// nodes. Regions are never modified: boolean operations build new ones.
#[derive(Debug, Clone)]
pub struct Region<H: Hyperplane> {
    tree: BspTree<H>,
    tolerance: f64,
}

impl<H: Hyperplane> Region<H> {
    /// Wraps a tree, computing its boundary attributes.
    pub fn new(tree: BspTree<H>, tolerance: f64) -> Self {
        let mut tree = tree;
        tree.annotate_boundaries();
        Self { tree, tolerance }
    }

    /// The region covering the whole space.
    pub fn whole_space(tolerance: f64) -> Self {
        Self::new(BspTree::leaf(true), tolerance)
    }

    /// The empty region.
    pub fn empty(tolerance: f64) -> Self {
        Self::new(BspTree::leaf(false), tolerance)
    }

    /// Builds a region from the pieces of its boundary, in input order.
    ///
    /// Every piece must have the outside of the region on its plus side.
    /// An empty boundary gives the whole space.
    pub fn from_boundary(boundary: Vec<H::Sub>, tolerance: f64) -> Self {
        Self::from_boundary_with(boundary, tolerance, &FirstCut)
    }

    /// Builds a region from its boundary, picking cuts with `selector`.
    ///
    /// The selector only changes the shape of the tree, not the region.
    pub fn from_boundary_with<C: CutSelector>(
        boundary: Vec<H::Sub>,
        tolerance: f64,
        selector: &C,
    ) -> Self {
        if boundary.is_empty() {
            return Self::whole_space(tolerance);
        }
        let pieces = boundary.len();

        let mut tree = BspTree::leaf(false);
        let root = tree.root();
        insert_cuts(&mut tree, root, boundary, selector);

        let leaves: Vec<NodeId> = tree.ids().filter(|&id| tree.node(id).is_leaf()).collect();
        for leaf in leaves {
            let inside = match tree.node(leaf).parent() {
                None => true,
                Some(parent) => tree.children(parent).is_some_and(|(_, minus)| minus == leaf),
            };
            tree.set_inside(leaf, inside);
        }

        debug!(pieces, nodes = tree.len(), depth = tree.depth(), "built region from boundary");
        Self::new(tree, tolerance)
    }

    /// Returns the annotated tree.
    #[inline]
    pub fn tree(&self) -> &BspTree<H> {
        &self.tree
    }

    /// Returns the tolerance shared by every operation on this region.
    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Consumes the region, returning its tree.
    pub fn into_tree(self) -> BspTree<H> {
        self.tree
    }

    /// Locates a point with respect to the region.
    ///
    /// A point lying on a cut is checked on both sides of it: it is on the
    /// boundary unless both sides agree.
    pub fn check_point(&self, point: &H::Point) -> Location {
        self.check_node(self.tree.root(), point)
    }

    fn check_node(&self, id: NodeId, point: &H::Point) -> Location {
        match self.tree.node(id).kind() {
            NodeKind::Leaf { inside: true } => Location::Inside,
            NodeKind::Leaf { inside: false } => Location::Outside,
            NodeKind::Internal { cut, plus, minus, .. } => {
                match cut.hyperplane().classify_point(point) {
                    PointSide::Plus => self.check_node(*plus, point),
                    PointSide::Minus => self.check_node(*minus, point),
                    PointSide::On => {
                        let plus = self.check_node(*plus, point);
                        let minus = self.check_node(*minus, point);
                        if plus == minus { plus } else { Location::Boundary }
                    }
                }
            }
        }
    }

    /// Total size of the region boundary.
    pub fn boundary_size(&self) -> f64 {
        let mut visitor = BoundarySizeVisitor::new();
        self.tree.visit(&mut visitor);
        visitor.size()
    }

    /// Checks if no cell of the region is inside.
    pub fn is_empty(&self) -> bool {
        !self.tree.has_leaf(self.tree.root(), true)
    }

    /// Checks if every cell of the region is inside.
    pub fn is_full(&self) -> bool {
        !self.tree.has_leaf(self.tree.root(), false)
    }

    /// Checks if `other` lies entirely within this region.
    pub fn contains(&self, other: &Region<H>) -> bool {
        other.difference(self).is_empty()
    }

    /// Returns the complement of the region.
    pub fn complement(&self) -> Self {
        Self {
            tree: self.tree.complement(),
            tolerance: self.tolerance,
        }
    }

    /// Points inside either region.
    ///
    /// # Panics
    /// Panics if both regions do not share the same tolerance.
    pub fn union(&self, other: &Region<H>) -> Self {
        factory::combine(self, other, LeafMerger::Union)
    }

    /// Points inside both regions.
    ///
    /// # Panics
    /// Panics if both regions do not share the same tolerance.
    pub fn intersection(&self, other: &Region<H>) -> Self {
        factory::combine(self, other, LeafMerger::Intersection)
    }

    /// Points inside this region but not inside `other`.
    ///
    /// # Panics
    /// Panics if both regions do not share the same tolerance.
    pub fn difference(&self, other: &Region<H>) -> Self {
        factory::combine(self, other, LeafMerger::Difference)
    }

    /// Points inside exactly one of the regions.
    ///
    /// # Panics
    /// Panics if both regions do not share the same tolerance.
    pub fn xor(&self, other: &Region<H>) -> Self {
        factory::combine(self, other, LeafMerger::Xor)
    }
}

impl<H: Measure> Region<H> {
    /// Size of the region, infinite for unbounded regions.
    pub fn size(&self) -> f64 {
        H::region_size(&self.tree)
    }
}

/// Grows `node` with the boundary pieces falling in its cell.
fn insert_cuts<H, C>(tree: &mut BspTree<H>, node: NodeId, mut cuts: Vec<H::Sub>, selector: &C)
where
    H: Hyperplane,
    C: CutSelector,
{
    loop {
        let Some(index) = selector.select(&cuts) else {
            return;
        };
        let candidate = cuts.remove(index);
        if tree.insert_cut(node, Rc::clone(candidate.hyperplane())) {
            break;
        }
    }

    let (Some((plus, minus)), Some(plane)) = (tree.children(node), tree.node(node).hyperplane())
    else {
        return;
    };
    let plane = plane.clone();

    let mut plus_cuts = Vec::new();
    let mut minus_cuts = Vec::new();
    for cut in cuts {
        match cut.split(&plane) {
            Split::Plus(part) => plus_cuts.push(part),
            Split::Minus(part) => minus_cuts.push(part),
            Split::Spanning {
                plus: plus_part,
                minus: minus_part,
            } => {
                plus_cuts.push(plus_part);
                minus_cuts.push(minus_part);
            }
            Split::Coplanar => {}
        }
    }

    insert_cuts(tree, plus, plus_cuts, selector);
    insert_cuts(tree, minus, minus_cuts, selector);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::LargestCut;
    use crate::euclidean::{Line, OrientedPoint, Polygon};
    use approx::assert_relative_eq;
    use nalgebra::Point2;

    const TOL: f64 = 1e-10;

    fn unit_square() -> Region<Line> {
        Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ])
        .to_region(TOL)
        .unwrap()
    }

    #[test]
    fn empty_boundary_is_whole_space() {
        let region: Region<OrientedPoint> = Region::from_boundary(Vec::new(), TOL);
        assert!(region.is_full());
        assert!(!region.is_empty());
        assert_eq!(region.check_point(&3.0), Location::Inside);
    }

    #[test]
    fn interval_locations() {
        let region = Region::interval(0.0, 10.0, TOL);

        assert_eq!(region.check_point(&5.0), Location::Inside);
        assert_eq!(region.check_point(&0.0), Location::Boundary);
        assert_eq!(region.check_point(&10.0), Location::Boundary);
        assert_eq!(region.check_point(&-1.0), Location::Outside);
        assert_eq!(region.check_point(&(10.0 + 2.0 * TOL)), Location::Outside);
        assert_relative_eq!(region.size(), 10.0);
    }

    #[test]
    fn square_from_boundary() {
        let square = unit_square();

        assert_eq!(square.check_point(&Point2::new(0.5, 0.5)), Location::Inside);
        assert_eq!(square.check_point(&Point2::new(1.0, 0.5)), Location::Boundary);
        assert_eq!(square.check_point(&Point2::new(1.0, 1.0)), Location::Boundary);
        assert_eq!(square.check_point(&Point2::new(2.0, 0.5)), Location::Outside);
        assert_relative_eq!(square.size(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(square.boundary_size(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn selector_changes_shape_not_region() {
        let polygon = Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 1.0),
            Point2::new(0.0, 1.0),
        ]);
        let edges = polygon.edges(TOL).unwrap();
        let first: Region<Line> = Region::from_boundary(edges.clone(), TOL);
        let largest: Region<Line> = Region::from_boundary_with(edges, TOL, &LargestCut);

        assert_relative_eq!(first.size(), largest.size(), epsilon = 1e-12);
        for point in [Point2::new(2.0, 0.5), Point2::new(-1.0, 0.5), Point2::new(4.0, 0.2)] {
            assert_eq!(first.check_point(&point), largest.check_point(&point));
        }
    }

    #[test]
    fn contains_and_emptiness() {
        let outer = Region::interval(0.0, 10.0, TOL);
        let inner = Region::interval(2.0, 3.0, TOL);

        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(Region::<OrientedPoint>::empty(TOL).is_empty());
        assert!(outer.intersection(&Region::interval(20.0, 30.0, TOL)).is_empty());
    }

    #[test]
    fn complement_of_square_is_infinite() {
        let outside = unit_square().complement();
        assert_eq!(outside.check_point(&Point2::new(0.5, 0.5)), Location::Outside);
        assert!(outside.size().is_infinite());
        assert_relative_eq!(outside.boundary_size(), 4.0, epsilon = 1e-12);
    }
}
