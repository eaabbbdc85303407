//! Great circles: the hyperplanes of the 2-sphere.

use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::rc::Rc;

use nalgebra::Vector3;

use crate::Hyperplane;
use crate::embedding::{Embedding, SubPlane, Trace};
use crate::error::RegionError;
use crate::euclidean::{Interval, OrientedPoint};
use crate::region::Region;

/// An arc of a circle, as a phase interval.
///
/// `sup - inf` never exceeds a full turn; `inf` is not normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub inf: f64,
    pub sup: f64,
}

impl Arc {
    /// Angular length of the arc.
    pub fn size(&self) -> f64 {
        self.sup - self.inf
    }
}

/// An oriented great circle.
///
/// The minus side is the hemisphere around the pole. Points of the circle
/// are located by their phase, measured from the `x` axis towards the `y`
/// axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pole: Vector3<f64>,
    x: Vector3<f64>,
    y: Vector3<f64>,
    tolerance: f64,
}

impl Circle {
    /// Creates the circle with the given pole, which need not be normalized.
    ///
    /// # Panics
    /// Panics if the pole is the zero vector.
    pub fn new(pole: Vector3<f64>, tolerance: f64) -> Self {
        let norm = pole.norm();
        assert!(norm > 0.0, "circle pole must not be the zero vector");
        let pole = pole / norm;
        let x = orthogonal(&pole);
        let y = pole.cross(&x);
        Self {
            pole,
            x,
            y,
            tolerance,
        }
    }

    /// Creates the circle going from `first` to `second` the short way.
    ///
    /// # Errors
    /// Returns [`RegionError::DegenerateCircle`] if both directions are
    /// aligned, which leaves the circle undefined.
    pub fn through(
        first: Vector3<f64>,
        second: Vector3<f64>,
        tolerance: f64,
    ) -> Result<Self, RegionError> {
        let pole = first.cross(&second);
        if !(pole.norm() > tolerance) {
            return Err(RegionError::DegenerateCircle { first, second });
        }
        Ok(Self::new(pole, tolerance))
    }

    /// Unit pole of the circle.
    #[inline]
    pub fn pole(&self) -> &Vector3<f64> {
        &self.pole
    }

    /// Unit vector at phase 0.
    #[inline]
    pub fn x_axis(&self) -> &Vector3<f64> {
        &self.x
    }

    /// Unit vector at phase pi/2.
    #[inline]
    pub fn y_axis(&self) -> &Vector3<f64> {
        &self.y
    }

    /// Phase of the projection of a direction on the circle, in `[0, 2pi]`.
    pub fn phase(&self, direction: &Vector3<f64>) -> f64 {
        PI + (-direction.dot(&self.y)).atan2(-direction.dot(&self.x))
    }

    /// Unit vector of the circle at the given phase.
    pub fn point_at(&self, phase: f64) -> Vector3<f64> {
        let (sin, cos) = phase.sin_cos();
        self.x * cos + self.y * sin
    }

    /// Arc of this circle lying on the minus side of `other`.
    pub fn inside_arc(&self, other: &Circle) -> Arc {
        let alpha = self.phase(&other.pole);
        Arc {
            inf: alpha - FRAC_PI_2,
            sup: alpha + FRAC_PI_2,
        }
    }
}

/// A unit vector orthogonal to `v`, picking the most stable construction.
fn orthogonal(v: &Vector3<f64>) -> Vector3<f64> {
    let threshold = 0.6 * v.norm();
    if v.x.abs() <= threshold {
        let inverse = 1.0 / v.y.hypot(v.z);
        Vector3::new(0.0, inverse * v.z, -inverse * v.y)
    } else if v.y.abs() <= threshold {
        let inverse = 1.0 / v.x.hypot(v.z);
        Vector3::new(-inverse * v.z, 0.0, inverse * v.x)
    } else {
        let inverse = 1.0 / v.x.hypot(v.y);
        Vector3::new(inverse * v.y, -inverse * v.x, 0.0)
    }
}

impl Hyperplane for Circle {
    type Point = Vector3<f64>;
    type Sub = SubPlane<Circle>;

    fn offset(&self, point: &Vector3<f64>) -> f64 {
        self.pole.angle(point) - FRAC_PI_2
    }

    fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn reversed(&self) -> Self {
        Self {
            pole: -self.pole,
            x: self.x,
            y: -self.y,
            tolerance: self.tolerance,
        }
    }

    fn same_orientation_as(&self, other: &Self) -> bool {
        self.pole.dot(&other.pole) >= 0.0
    }

    fn whole_hyperplane(plane: Rc<Self>) -> SubPlane<Circle> {
        SubPlane::whole(plane)
    }
}

impl Embedding for Circle {
    type SubSpace = OrientedPoint;

    fn to_sub_space(&self, point: &Vector3<f64>) -> f64 {
        self.phase(point)
    }

    fn to_space(&self, phase: &f64) -> Vector3<f64> {
        self.point_at(*phase)
    }

    fn whole_extent(&self) -> Region<OrientedPoint> {
        Region::interval(0.0, TAU, self.tolerance)
    }

    fn trace(&self, cut: &Circle) -> Trace<OrientedPoint> {
        if self.pole.cross(&cut.pole).norm() <= self.tolerance {
            return Trace::Coplanar;
        }
        let arc = self.inside_arc(cut);
        let start = arc.inf.rem_euclid(TAU);
        let end = start + arc.size();
        let minus_part = if end <= TAU {
            Region::interval(start, end, self.tolerance)
        } else {
            let wrapped = [
                Interval {
                    lower: 0.0,
                    upper: end - TAU,
                },
                Interval {
                    lower: start,
                    upper: TAU,
                },
            ];
            Region::from_intervals(&wrapped, self.tolerance)
        };
        Trace::Crossing(minus_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PointSide, Split, SubHyperplane};
    use approx::assert_relative_eq;

    const TOL: f64 = 1e-10;

    fn equator() -> Circle {
        Circle::new(Vector3::z(), TOL)
    }

    #[test]
    fn axes_are_orthonormal() {
        for pole in [Vector3::x(), Vector3::new(1.0, 2.0, 3.0), Vector3::new(-0.2, 0.1, 0.0)] {
            let circle = Circle::new(pole, TOL);
            assert_relative_eq!(circle.x_axis().norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(circle.y_axis().norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(circle.x_axis().dot(circle.pole()), 0.0, epsilon = 1e-12);
            assert_relative_eq!(circle.x_axis().dot(circle.y_axis()), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn pole_hemisphere_is_minus() {
        let circle = equator();
        assert_eq!(circle.classify_point(&Vector3::z()), PointSide::Minus);
        assert_eq!(circle.classify_point(&-Vector3::z()), PointSide::Plus);
        assert_eq!(circle.classify_point(&Vector3::x()), PointSide::On);
        assert_relative_eq!(circle.offset(&Vector3::z()), -FRAC_PI_2);
    }

    #[test]
    fn phase_and_point_at_are_inverse() {
        let circle = Circle::new(Vector3::new(1.0, 1.0, 0.5), TOL);
        for phase in [0.1, 1.0, 3.0, 6.0] {
            assert_relative_eq!(circle.phase(&circle.point_at(phase)), phase, epsilon = 1e-12);
        }
    }

    #[test]
    fn through_goes_the_short_way() {
        let circle = Circle::through(Vector3::x(), Vector3::y(), TOL).unwrap();
        let start = circle.phase(&Vector3::x());
        let end = circle.phase(&Vector3::y());
        assert_relative_eq!((end - start).rem_euclid(TAU), FRAC_PI_2, epsilon = 1e-12);
        assert!(Circle::through(Vector3::x(), -Vector3::x(), TOL).is_err());
    }

    #[test]
    fn reversed_swaps_hemispheres() {
        let circle = equator().reversed();
        assert_eq!(circle.classify_point(&Vector3::z()), PointSide::Plus);
        assert!(!circle.same_orientation_as(&equator()));
        let handedness = circle.y_axis().dot(&circle.pole().cross(circle.x_axis()));
        assert_relative_eq!(handedness, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn equator_split_by_meridian() {
        let whole = Circle::whole_hyperplane(Rc::new(equator()));
        assert_relative_eq!(whole.size(), TAU, epsilon = 1e-12);

        let meridian = Circle::new(Vector3::x(), TOL);
        let Split::Spanning { plus, minus } = whole.split(&meridian) else {
            panic!("a meridian crosses the equator");
        };
        assert_relative_eq!(plus.size(), PI, epsilon = 1e-12);
        assert_relative_eq!(minus.size(), PI, epsilon = 1e-12);
        assert!(matches!(whole.split(&equator().reversed()), Split::Coplanar));
    }
}
