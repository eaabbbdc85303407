//! Hyperplane and sub-hyperplane contracts shared by every space.
//!
//! A hyperplane cuts its space into a *plus* and a *minus* half. Regions are
//! always built with the convention that the plus side of a boundary piece
//! faces the outside of the region.

use std::fmt::Debug;
use std::rc::Rc;

/// Default tolerance for offset comparisons.
/// Points whose offset to a hyperplane is below this value are considered on it.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Which side of a hyperplane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointSide {
    /// Offset strictly greater than the tolerance
    Plus,
    /// Offset strictly lower than minus the tolerance
    Minus,
    /// Point lies on the hyperplane (within tolerance)
    On,
}

/// An (n-1)-dimensional affine cut of an n-dimensional space.
pub trait Hyperplane: Clone + Debug + Sized {
    /// Point type of the space being cut.
    type Point: Clone + Debug;

    /// Restriction of this hyperplane to a measurable subset of itself.
    type Sub: SubHyperplane<Plane = Self>;

    /// Signed offset of a point.
    ///
    /// The sign gives the side, the magnitude is a distance-like quantity.
    fn offset(&self, point: &Self::Point) -> f64;

    /// Tolerance below which offsets are considered null.
    fn tolerance(&self) -> f64;

    /// Returns the same hyperplane with plus and minus sides swapped.
    fn reversed(&self) -> Self;

    /// Checks if both hyperplanes have their plus sides on the same side.
    ///
    /// Only meaningful for hyperplanes that are (nearly) identical.
    fn same_orientation_as(&self, other: &Self) -> bool;

    /// Builds the sub-hyperplane covering the whole hyperplane.
    fn whole_hyperplane(plane: Rc<Self>) -> Self::Sub;

    /// Classifies which side of the hyperplane a point lies on.
    fn classify_point(&self, point: &Self::Point) -> PointSide {
        let offset = self.offset(point);
        if offset > self.tolerance() {
            PointSide::Plus
        } else if offset < -self.tolerance() {
            PointSide::Minus
        } else {
            PointSide::On
        }
    }
}

/// A hyperplane restricted to a subset of itself.
///
/// The defining hyperplane is shared: many pieces may point at the same one.
pub trait SubHyperplane: Clone + Debug + Sized {
    /// Hyperplane supporting this piece.
    type Plane: Hyperplane;

    /// Returns the shared supporting hyperplane.
    fn hyperplane(&self) -> &Rc<Self::Plane>;

    /// Measure of the piece, in the hyperplane's own dimension.
    ///
    /// May be infinite; pieces of 1-D points measure zero.
    fn size(&self) -> f64;

    /// Returns `true` if the piece contains nothing at all.
    fn is_empty(&self) -> bool;

    /// Splits the piece by another hyperplane.
    fn split(&self, cut: &Self::Plane) -> Split<Self>;

    /// Union of two pieces lying on the same hyperplane.
    fn reunite(&self, other: &Self) -> Self;
}

/// Result of splitting a sub-hyperplane by a hyperplane.
#[derive(Debug, Clone)]
pub enum Split<S> {
    /// Entirely on the plus side
    Plus(S),
    /// Entirely on the minus side
    Minus(S),
    /// Parts on both sides
    Spanning { plus: S, minus: S },
    /// Lies on the cutting hyperplane itself (or is empty)
    Coplanar,
}

impl<S> Split<S> {
    /// Returns `(plus, minus)` parts.
    ///
    /// Coplanar pieces have neither.
    pub fn into_parts(self) -> (Option<S>, Option<S>) {
        match self {
            Split::Plus(s) => (Some(s), None),
            Split::Minus(s) => (None, Some(s)),
            Split::Spanning { plus, minus } => (Some(plus), Some(minus)),
            Split::Coplanar => (None, None),
        }
    }

    /// Builds a split from optional parts, classifying by what is present.
    pub fn from_parts(plus: Option<S>, minus: Option<S>) -> Self {
        match (plus, minus) {
            (Some(plus), Some(minus)) => Split::Spanning { plus, minus },
            (Some(plus), None) => Split::Plus(plus),
            (None, Some(minus)) => Split::Minus(minus),
            (None, None) => Split::Coplanar,
        }
    }
}
