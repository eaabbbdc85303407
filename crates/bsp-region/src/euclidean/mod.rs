//! Euclidean spaces: the real line and the plane.
//!
//! - [`OrientedPoint`]: hyperplanes of the line, regions are sets of intervals
//! - [`Line`]: hyperplanes of the plane, pieces are sets of segments
//! - [`Polygon`] and [`NestedLoops`]: building plane regions from loops

mod line;
mod nested_loops;
mod oriented_point;
mod polygon;

pub use line::Line;
pub use nested_loops::{NestedLoops, OrientedLoop};
pub use oriented_point::{Interval, OrientedPoint, SubOrientedPoint};
pub use polygon::{Polygon, polygon_region, polygon_region_from_loops};

use nalgebra::Point2;

use crate::bsp::{BspTree, BspVisitor, NodeId};
use crate::region::Measure;
use crate::{Hyperplane, SubHyperplane};

/// Computes the area of a plane region from its boundary.
///
/// Each boundary piece contributes the signed area of the triangle fan it
/// forms with the origin. An unbounded region is detected either by an
/// infinite piece or by a negative total.
#[derive(Debug, Default)]
pub struct AreaVisitor {
    sum: f64,
    pieces: usize,
    infinite: bool,
}

impl AreaVisitor {
    /// Creates a visitor with a zero total.
    pub fn new() -> Self {
        Self::default()
    }

    /// Area of the visited region, infinite if unbounded.
    ///
    /// `tree` must be the visited tree; it only decides between the whole
    /// plane and nothing when no boundary was found.
    pub fn area(&self, tree: &BspTree<Line>) -> f64 {
        if self.pieces == 0 {
            return if tree.has_leaf(tree.root(), true) {
                f64::INFINITY
            } else {
                0.0
            };
        }
        if self.infinite || self.sum < 0.0 {
            f64::INFINITY
        } else {
            self.sum / 2.0
        }
    }

    fn add(&mut self, length: f64, height: f64) {
        self.pieces += 1;
        if length.is_infinite() {
            self.infinite = true;
        } else {
            self.sum += length * height;
        }
    }
}

impl BspVisitor<Line> for AreaVisitor {
    fn visit_internal(&mut self, tree: &BspTree<Line>, node: NodeId) {
        let Some(attribute) = tree.boundary(node) else {
            return;
        };
        let origin = Point2::origin();
        if let Some(piece) = attribute.plus_outside() {
            // inside is on the minus side
            self.add(piece.size(), -piece.hyperplane().offset(&origin));
        }
        if let Some(piece) = attribute.plus_inside() {
            self.add(piece.size(), piece.hyperplane().offset(&origin));
        }
    }

    fn visit_leaf(&mut self, _tree: &BspTree<Line>, _node: NodeId) {}
}

impl Measure for Line {
    fn region_size(tree: &BspTree<Self>) -> f64 {
        let mut visitor = AreaVisitor::new();
        tree.visit(&mut visitor);
        visitor.area(tree)
    }
}
