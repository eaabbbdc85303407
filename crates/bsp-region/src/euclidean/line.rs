//! Oriented lines: the hyperplanes of the Euclidean plane.

use std::f64::consts::{PI, TAU};
use std::rc::Rc;

use nalgebra::Point2;

use crate::embedding::{Embedding, SubPlane, Trace};
use crate::error::RegionError;
use crate::region::Region;
use crate::{Hyperplane, PointSide};

use super::OrientedPoint;

/// An oriented line of the plane.
///
/// The plus side is on the right when walking along the line direction, so
/// the interior of a counter-clockwise loop lies on the minus side of its
/// edges. Points on the line are located by their abscissa along the
/// direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    angle: f64,
    cos: f64,
    sin: f64,
    origin_offset: f64,
    tolerance: f64,
}

impl Line {
    /// Creates the line going from `start` towards `end`.
    ///
    /// # Errors
    /// Returns [`RegionError::DegenerateLine`] if both points are closer
    /// than the tolerance.
    pub fn through(
        start: Point2<f64>,
        end: Point2<f64>,
        tolerance: f64,
    ) -> Result<Self, RegionError> {
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        let d = dx.hypot(dy);
        if !(d > tolerance) {
            return Err(RegionError::DegenerateLine { start, end });
        }
        Ok(Self {
            angle: PI + (-dy).atan2(-dx),
            cos: dx / d,
            sin: dy / d,
            origin_offset: (end.x * start.y - start.x * end.y) / d,
            tolerance,
        })
    }

    /// Creates the line through `point` with direction `angle`.
    pub fn new(point: Point2<f64>, angle: f64, tolerance: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            angle: angle.rem_euclid(TAU),
            cos,
            sin,
            origin_offset: cos * point.y - sin * point.x,
            tolerance,
        }
    }

    /// Direction angle, in `[0, 2pi]`.
    #[inline]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Offset of the origin, negated.
    #[inline]
    pub fn origin_offset(&self) -> f64 {
        self.origin_offset
    }

    /// Abscissa of the projection of a point on the line.
    pub fn abscissa(&self, point: &Point2<f64>) -> f64 {
        self.cos * point.x + self.sin * point.y
    }

    /// Point of the line at the given abscissa.
    pub fn point_at(&self, abscissa: f64) -> Point2<f64> {
        Point2::new(
            abscissa * self.cos - self.origin_offset * self.sin,
            abscissa * self.sin + self.origin_offset * self.cos,
        )
    }

    /// Intersection point with another line, `None` if they are parallel.
    pub fn intersection(&self, other: &Line) -> Option<Point2<f64>> {
        let d = self.sin * other.cos - other.sin * self.cos;
        if d.abs() < self.tolerance {
            return None;
        }
        Some(Point2::new(
            (self.cos * other.origin_offset - other.cos * self.origin_offset) / d,
            (self.sin * other.origin_offset - other.sin * self.origin_offset) / d,
        ))
    }

    /// Checks if both lines are parallel, in either direction.
    pub fn is_parallel_to(&self, other: &Line) -> bool {
        (self.sin * other.cos - other.sin * self.cos).abs() < self.tolerance
    }
}

impl Hyperplane for Line {
    type Point = Point2<f64>;
    type Sub = SubPlane<Line>;

    fn offset(&self, point: &Point2<f64>) -> f64 {
        self.sin * point.x - self.cos * point.y + self.origin_offset
    }

    fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn reversed(&self) -> Self {
        Self {
            angle: (self.angle + PI).rem_euclid(TAU),
            cos: -self.cos,
            sin: -self.sin,
            origin_offset: -self.origin_offset,
            tolerance: self.tolerance,
        }
    }

    fn same_orientation_as(&self, other: &Self) -> bool {
        self.cos * other.cos + self.sin * other.sin >= 0.0
    }

    fn whole_hyperplane(plane: Rc<Self>) -> SubPlane<Line> {
        SubPlane::whole(plane)
    }
}

impl Embedding for Line {
    type SubSpace = OrientedPoint;

    fn to_sub_space(&self, point: &Point2<f64>) -> f64 {
        self.abscissa(point)
    }

    fn to_space(&self, abscissa: &f64) -> Point2<f64> {
        self.point_at(*abscissa)
    }

    fn whole_extent(&self) -> Region<OrientedPoint> {
        Region::whole_space(self.tolerance)
    }

    fn trace(&self, cut: &Line) -> Trace<OrientedPoint> {
        let Some(crossing) = self.intersection(cut) else {
            return match cut.classify_point(&self.point_at(0.0)) {
                PointSide::Plus => Trace::Plus,
                PointSide::Minus => Trace::Minus,
                PointSide::On => Trace::Coplanar,
            };
        };
        let x = self.abscissa(&crossing);
        // rate of change of the cut offset along this line
        let slope = cut.sin * self.cos - cut.cos * self.sin;
        let minus_part = if slope < 0.0 {
            Region::interval(x, f64::INFINITY, self.tolerance)
        } else {
            Region::interval(f64::NEG_INFINITY, x, self.tolerance)
        };
        Trace::Crossing(minus_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TOL: f64 = 1e-10;

    #[test]
    fn right_side_is_plus() {
        let line = Line::through(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), TOL).unwrap();
        assert_eq!(line.classify_point(&Point2::new(0.5, -1.0)), PointSide::Plus);
        assert_eq!(line.classify_point(&Point2::new(0.5, 1.0)), PointSide::Minus);
        assert_relative_eq!(line.angle(), 0.0);
    }

    #[test]
    fn through_matches_point_and_angle() {
        let a = Point2::new(1.0, 2.0);
        let b = Point2::new(3.0, 4.0);
        let through = Line::through(a, b, TOL).unwrap();
        let angled = Line::new(a, PI / 4.0, TOL);

        assert_relative_eq!(through.angle(), angled.angle(), epsilon = 1e-12);
        assert_relative_eq!(through.origin_offset(), angled.origin_offset(), epsilon = 1e-12);
        assert_relative_eq!(through.offset(&b), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn abscissa_and_point_at_are_inverse() {
        let line = Line::through(Point2::new(1.0, 0.0), Point2::new(0.0, 2.0), TOL).unwrap();
        let p = line.point_at(1.5);
        assert_relative_eq!(line.offset(&p), 0.0, epsilon = 1e-12);
        assert_relative_eq!(line.abscissa(&p), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn reversed_flips_sides() {
        let line = Line::through(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0), TOL).unwrap();
        let reversed = line.reversed();
        let p = Point2::new(2.0, 0.0);

        assert_relative_eq!(reversed.offset(&p), -line.offset(&p), epsilon = 1e-12);
        assert!(!line.same_orientation_as(&reversed));
        assert_relative_eq!(reversed.angle(), line.angle() + PI, epsilon = 1e-12);
    }

    #[test]
    fn intersection_of_axes() {
        let horizontal = Line::through(Point2::new(0.0, 3.0), Point2::new(1.0, 3.0), TOL).unwrap();
        let vertical = Line::through(Point2::new(2.0, 0.0), Point2::new(2.0, 1.0), TOL).unwrap();

        let p = horizontal.intersection(&vertical).unwrap();
        assert_relative_eq!(p.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 3.0, epsilon = 1e-12);
        assert!(horizontal.intersection(&horizontal.reversed()).is_none());
        assert!(horizontal.is_parallel_to(&horizontal.reversed()));
    }

    #[test]
    fn degenerate_line() {
        let p = Point2::new(1.0, 1.0);
        assert_eq!(
            Line::through(p, p, TOL),
            Err(RegionError::DegenerateLine { start: p, end: p })
        );
    }

    #[test]
    fn trace_keeps_minus_side() {
        let x_axis = Line::through(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), TOL).unwrap();
        // going down: its plus side is x < 2
        let down = Line::through(Point2::new(2.0, 1.0), Point2::new(2.0, 0.0), TOL).unwrap();

        let Trace::Crossing(minus) = x_axis.trace(&down) else {
            panic!("lines should cross");
        };
        let intervals = minus.intervals();
        assert_eq!(intervals.len(), 1);
        assert_relative_eq!(intervals[0].lower, 2.0, epsilon = 1e-12);
        assert!(intervals[0].upper.is_infinite());
    }
}
