//! Spherical polygons built from a loop of vertices.

use std::rc::Rc;

use nalgebra::Vector3;
use tracing::debug;

use crate::Hyperplane;
use crate::bsp::{BspTree, NodeId};
use crate::error::RegionError;
use crate::region::Region;

use super::Circle;
use super::edge::{Edge, VertexArena};

/// Builds the region bounded by a loop of unit vectors.
///
/// The interior is on the left when walking along the loop, seen from
/// outside the sphere. No vertex at all gives the whole sphere.
///
/// # Errors
/// - [`RegionError::TooFewVertices`] for one or two vertices
/// - [`RegionError::DegenerateCircle`] for consecutive vertices that are
///   identical or antipodal
pub fn spherical_polygon_region(
    vertices: &[Vector3<f64>],
    tolerance: f64,
) -> Result<Region<Circle>, RegionError> {
    let n = vertices.len();
    if n == 0 {
        return Ok(Region::whole_space(tolerance));
    }
    if n < 3 {
        return Err(RegionError::TooFewVertices(n));
    }

    let mut arena = VertexArena::new();
    let ids: Vec<_> = vertices.iter().map(|v| arena.add(v.normalize())).collect();

    let mut edges = Vec::with_capacity(n);
    let mut end = ids[n - 1];
    for &id in &ids {
        let start = end;
        end = id;

        let start_location = *arena.get(start).location();
        let end_location = *arena.get(end).location();
        let through = Circle::through(start_location, end_location, tolerance)?;

        // reuse the circle of an aligned edge built earlier
        let circle = match arena.get(start).shared_circle_with(arena.get(end)) {
            Some(circle) => circle,
            None => Rc::new(through),
        };
        arena.get_mut(start).bind_with(&circle);
        arena.get_mut(end).bind_with(&circle);
        for &other in &ids {
            let on_circle = circle.offset(arena.get(other).location()).abs() <= tolerance;
            if other != start && other != end && on_circle {
                arena.get_mut(other).bind_with(&circle);
            }
        }

        let length = start_location.angle(&end_location);
        edges.push(Edge::new(start, end, length, circle));
    }

    let mut tree = BspTree::leaf(false);
    let root = tree.root();
    insert_edges(&mut tree, root, edges, &mut arena);
    debug!(
        vertices = n,
        split_vertices = arena.len() - n,
        nodes = tree.len(),
        "built spherical polygon"
    );
    Ok(Region::new(tree, tolerance))
}

impl Region<Circle> {
    /// Builds the region bounded by a loop of unit vectors.
    ///
    /// # Errors
    /// See [`spherical_polygon_region`].
    pub fn from_vertices(vertices: &[Vector3<f64>], tolerance: f64) -> Result<Self, RegionError> {
        spherical_polygon_region(vertices, tolerance)
    }
}

fn insert_edges(
    tree: &mut BspTree<Circle>,
    node: NodeId,
    edges: Vec<Edge>,
    arena: &mut VertexArena,
) {
    let Some(index) = edges
        .iter()
        .position(|edge| tree.insert_cut(node, Rc::clone(edge.circle())))
    else {
        // nothing left to cut with
        let inside = match tree.node(node).parent() {
            None => true,
            Some(parent) => tree.children(parent).is_some_and(|(_, minus)| minus == node),
        };
        tree.set_inside(node, inside);
        return;
    };

    let splitter = Rc::clone(edges[index].circle());
    let mut outside = Vec::new();
    let mut inside = Vec::new();
    for (i, edge) in edges.iter().enumerate() {
        if i != index && !Rc::ptr_eq(edge.circle(), &splitter) {
            edge.split(&splitter, arena, &mut outside, &mut inside);
        }
    }

    let Some((plus, minus)) = tree.children(node) else {
        return;
    };
    if outside.is_empty() {
        tree.set_inside(plus, false);
    } else {
        insert_edges(tree, plus, outside, arena);
    }
    if inside.is_empty() {
        tree.set_inside(minus, true);
    } else {
        insert_edges(tree, minus, inside, arena);
    }
}
