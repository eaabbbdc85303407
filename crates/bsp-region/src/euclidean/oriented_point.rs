//! Oriented points: the hyperplanes of the real line.

use std::rc::Rc;

use crate::bsp::{BspTree, NodeId};
use crate::region::{Measure, Region};
use crate::{Hyperplane, PointSide, Split, SubHyperplane};

/// A point of the real line with a direction.
///
/// A direct point has its plus side towards increasing abscissas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedPoint {
    location: f64,
    direct: bool,
    tolerance: f64,
}

impl OrientedPoint {
    /// Creates an oriented point.
    pub fn new(location: f64, direct: bool, tolerance: f64) -> Self {
        Self {
            location,
            direct,
            tolerance,
        }
    }

    /// Abscissa of the point.
    #[inline]
    pub fn location(&self) -> f64 {
        self.location
    }

    /// Checks if the plus side is towards increasing abscissas.
    #[inline]
    pub fn is_direct(&self) -> bool {
        self.direct
    }
}

impl Hyperplane for OrientedPoint {
    type Point = f64;
    type Sub = SubOrientedPoint;

    fn offset(&self, point: &f64) -> f64 {
        if self.direct {
            point - self.location
        } else {
            self.location - point
        }
    }

    fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn reversed(&self) -> Self {
        Self {
            direct: !self.direct,
            ..*self
        }
    }

    fn same_orientation_as(&self, other: &Self) -> bool {
        self.direct == other.direct
    }

    fn whole_hyperplane(plane: Rc<Self>) -> SubOrientedPoint {
        SubOrientedPoint { plane }
    }
}

/// The only piece of an oriented point: the point itself.
#[derive(Debug, Clone)]
pub struct SubOrientedPoint {
    plane: Rc<OrientedPoint>,
}

impl SubHyperplane for SubOrientedPoint {
    type Plane = OrientedPoint;

    fn hyperplane(&self) -> &Rc<OrientedPoint> {
        &self.plane
    }

    fn size(&self) -> f64 {
        0.0
    }

    fn is_empty(&self) -> bool {
        false
    }

    fn split(&self, cut: &OrientedPoint) -> Split<Self> {
        match cut.classify_point(&self.plane.location) {
            PointSide::Plus => Split::Plus(self.clone()),
            PointSide::Minus => Split::Minus(self.clone()),
            PointSide::On => Split::Coplanar,
        }
    }

    fn reunite(&self, _other: &Self) -> Self {
        self.clone()
    }
}

/// A closed interval of the real line; bounds may be infinite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    /// Length of the interval.
    pub fn size(&self) -> f64 {
        self.upper - self.lower
    }
}

impl Region<OrientedPoint> {
    /// The interval `[lower, upper]` of the real line.
    ///
    /// Either bound may be infinite. An interval whose upper bound is not
    /// above its lower bound is empty.
    pub fn interval(lower: f64, upper: f64, tolerance: f64) -> Self {
        if !(lower < upper) {
            return Self::empty(tolerance);
        }
        Self::from_intervals(&[Interval { lower, upper }], tolerance)
    }

    /// Region made of sorted, disjoint intervals.
    ///
    /// Each finite bound gives one cut, infinite bounds none.
    pub fn from_intervals(intervals: &[Interval], tolerance: f64) -> Self {
        Self::new(intervals_tree(intervals, tolerance), tolerance)
    }

    /// Disjoint intervals making up the region, in increasing order.
    pub fn intervals(&self) -> Vec<Interval> {
        intervals_of(self.tree(), self.tolerance())
    }
}

fn intervals_tree(intervals: &[Interval], tolerance: f64) -> BspTree<OrientedPoint> {
    let Some((first, rest)) = intervals.split_first() else {
        return BspTree::leaf(false);
    };
    let cut = |location: f64, direct: bool| {
        OrientedPoint::whole_hyperplane(Rc::new(OrientedPoint::new(location, direct, tolerance)))
    };

    // x > upper holds the remaining intervals, x < lower is outside
    let above_lower = if first.upper.is_finite() {
        let rest = intervals_tree(rest, tolerance);
        BspTree::internal(cut(first.upper, true), rest, BspTree::leaf(true))
    } else {
        BspTree::leaf(true)
    };
    if first.lower.is_finite() {
        BspTree::internal(cut(first.lower, false), BspTree::leaf(false), above_lower)
    } else {
        above_lower
    }
}

/// Collects the inside cells of a 1-D tree as sorted, merged intervals.
fn intervals_of(tree: &BspTree<OrientedPoint>, tolerance: f64) -> Vec<Interval> {
    let mut intervals: Vec<Interval> = tree
        .ids()
        .filter(|&id| tree.inside(id) == Some(true))
        .map(|leaf| cell_bounds(tree, leaf))
        .filter(|interval| interval.lower < interval.upper)
        .collect();
    intervals.sort_by(|a, b| a.lower.total_cmp(&b.lower));

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match merged.last_mut() {
            Some(last) if interval.lower <= last.upper + tolerance => {
                last.upper = last.upper.max(interval.upper);
            }
            _ => merged.push(interval),
        }
    }
    merged
}

/// Bounds of a leaf cell, from the cuts of its ancestors.
fn cell_bounds(tree: &BspTree<OrientedPoint>, leaf: NodeId) -> Interval {
    let mut interval = Interval {
        lower: f64::NEG_INFINITY,
        upper: f64::INFINITY,
    };
    let mut current = leaf;
    while let Some(parent) = tree.node(current).parent() {
        if let (Some(point), Some((plus, _))) =
            (tree.node(parent).hyperplane(), tree.children(parent))
        {
            // the plus side of a direct point lies above it
            if (plus == current) == point.is_direct() {
                interval.lower = interval.lower.max(point.location());
            } else {
                interval.upper = interval.upper.min(point.location());
            }
        }
        current = parent;
    }
    interval
}

impl Measure for OrientedPoint {
    fn region_size(tree: &BspTree<Self>) -> f64 {
        let tolerance = tree
            .ids()
            .find_map(|id| tree.node(id).hyperplane().map(|h| h.tolerance()))
            .unwrap_or(0.0);
        intervals_of(tree, tolerance).iter().map(Interval::size).sum()
    }

    fn compact(region: Region<Self>) -> Region<Self> {
        Region::from_intervals(&region.intervals(), region.tolerance())
    }
}
