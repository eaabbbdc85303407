//! Area of spherical regions.
//!
//! Every leaf cell of a tree over the sphere is an intersection of
//! hemispheres, hence a convex spherical polygon. Its area follows from the
//! Gauss-Bonnet formula: a full turn minus the turning angles at its
//! vertices, the turning angle between two consecutive edges being the angle
//! between their inward poles.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use nalgebra::Vector3;

use crate::Hyperplane;
use crate::bsp::{BspTree, BspVisitor, NodeId};
use crate::region::Measure;

use super::Circle;

/// Sums the areas of the inside cells of a spherical tree.
#[derive(Debug, Default)]
pub struct AreaVisitor {
    area: f64,
}

impl AreaVisitor {
    /// Creates a visitor with a zero total.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated area.
    pub fn area(&self) -> f64 {
        self.area
    }
}

impl BspVisitor<Circle> for AreaVisitor {
    fn visit_internal(&mut self, _tree: &BspTree<Circle>, _node: NodeId) {}

    fn visit_leaf(&mut self, tree: &BspTree<Circle>, node: NodeId) {
        if tree.inside(node) != Some(true) {
            return;
        }
        let mut poles = Vec::new();
        let mut tolerance = 0.0;
        let mut current = node;
        while let Some(parent) = tree.node(current).parent() {
            if let (Some(circle), Some((_, minus))) =
                (tree.node(parent).hyperplane(), tree.children(parent))
            {
                tolerance = circle.tolerance();
                // the minus side surrounds the pole
                poles.push(if minus == current { *circle.pole() } else { -circle.pole() });
            }
            current = parent;
        }
        self.area += convex_cell_area(&poles, tolerance);
    }
}

impl Measure for Circle {
    fn region_size(tree: &BspTree<Self>) -> f64 {
        let mut visitor = AreaVisitor::new();
        tree.visit(&mut visitor);
        visitor.area()
    }
}

/// Area of the intersection of the hemispheres around the given unit poles.
pub(crate) fn convex_cell_area(poles: &[Vector3<f64>], tolerance: f64) -> f64 {
    let mut unique: Vec<Vector3<f64>> = Vec::with_capacity(poles.len());
    for pole in poles {
        if unique.iter().any(|u| (u - pole).norm() <= tolerance) {
            continue;
        }
        if unique.iter().any(|u| (u + pole).norm() <= tolerance) {
            // opposite hemispheres only share a circle
            return 0.0;
        }
        unique.push(*pole);
    }

    match unique.len() {
        0 => return 2.0 * TAU,
        1 => return TAU,
        _ => {}
    }

    let mut turning = 0.0;
    let mut edges = 0;
    for (i, pole) in unique.iter().enumerate() {
        let circle = Circle::new(*pole, tolerance);
        let others: Vec<&Vector3<f64>> =
            unique.iter().enumerate().filter(|&(j, _)| j != i).map(|(_, p)| p).collect();
        let Some(end) = edge_end(&circle, &others, tolerance) else {
            continue;
        };

        // the next edge is the constraint active at the end vertex that
        // turns the most
        let turn = others
            .iter()
            .filter(|p| (p.angle(&end) - FRAC_PI_2).abs() <= tolerance.max(1e-9))
            .map(|p| pole.angle(p))
            .fold(0.0, f64::max);
        turning += turn;
        edges += 1;
    }

    if edges == 0 {
        return 0.0;
    }
    (TAU - turning).max(0.0)
}

/// End vertex of the part of `circle` lying in every other hemisphere,
/// following increasing phases. `None` if that part is shorter than the
/// tolerance.
fn edge_end(circle: &Circle, others: &[&Vector3<f64>], tolerance: f64) -> Option<Vector3<f64>> {
    let (first, rest) = others.split_first()?;
    let mut start = circle.phase(first) - FRAC_PI_2;
    let mut length = PI;
    for pole in rest {
        // start of this hemisphere's half circle, relative to the current arc
        let d = (circle.phase(pole) - FRAC_PI_2 - start).rem_euclid(TAU);
        if d <= length {
            start += d;
            length -= d;
        } else if d > PI {
            length = length.min(d - PI);
        } else {
            return None;
        }
    }
    (length > tolerance).then(|| circle.point_at(start + length))
}
