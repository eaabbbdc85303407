//! Errors raised while turning caller input into regions.

use nalgebra::{Point2, Vector3};

/// Everything that can go wrong while building a region from a boundary.
///
/// None of these are recoverable: they all point at invalid input or at
/// geometry that is inconsistent at the requested tolerance.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegionError {
    /// A boundary loop was given as open (no closing first point).
    #[error("boundary loop is open")]
    OpenLoop,

    /// A closed boundary loop with too few vertices to enclose anything.
    #[error("boundary loop has {0} vertices, at least 3 are required")]
    TooFewVertices(usize),

    /// Paired coordinate arrays of different lengths.
    #[error("dimension mismatch: {first} != {second}")]
    DimensionMismatch { first: usize, second: usize },

    /// Two loops neither nested nor disjoint.
    #[error("some outline boundary loops cross each other")]
    CrossingBoundaryLoops,

    /// A line through two points closer than the tolerance.
    #[error("cannot build a line through coincident points {start} and {end}")]
    DegenerateLine { start: Point2<f64>, end: Point2<f64> },

    /// A great circle through two identical or antipodal points.
    #[error("cannot build a great circle through {first} and {second}")]
    DegenerateCircle {
        first: Vector3<f64>,
        second: Vector3<f64>,
    },
}
