//! The 2-sphere: regions bounded by great circle arcs.
//!
//! Points are unit vectors of 3-D space. Hyperplanes are oriented
//! [`Circle`]s; their pieces are arcs, described as regions of the circle's
//! phase line.

mod circle;
mod edge;
mod polygon;
mod size;

pub use circle::{Arc, Circle};
pub use edge::{Edge, Vertex, VertexArena, VertexId};
pub use polygon::spherical_polygon_region;
pub use size::AreaVisitor;

use std::f64::consts::{PI, TAU};

use nalgebra::Vector3;

/// Unit vector from spherical coordinates.
///
/// `theta` is the azimuth in the x-y plane from the +x axis, `phi` the polar
/// angle from the +z axis.
pub fn s2_point(theta: f64, phi: f64) -> Vector3<f64> {
    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_phi, cos_phi) = phi.sin_cos();
    Vector3::new(cos_theta * sin_phi, sin_theta * sin_phi, cos_phi)
}

/// Shifts an angle by whole turns into `[center - pi, center + pi)`.
pub fn normalize_angle(angle: f64, center: f64) -> f64 {
    angle - TAU * ((angle + PI - center) / TAU).floor()
}
