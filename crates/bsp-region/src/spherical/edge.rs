//! Edges and vertices of spherical polygon boundaries.
//!
//! Vertices live in an arena addressed by [`VertexId`]; edges refer to their
//! endpoints by id and share their supporting circle. Splitting an edge
//! creates new edges (and new vertices where the edge is cut) and never
//! modifies the original.

use std::f64::consts::{PI, TAU};
use std::rc::Rc;

use nalgebra::Vector3;

use crate::Hyperplane;

use super::{Circle, normalize_angle};

/// Index of a vertex inside a [`VertexArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexId(usize);

/// A point of a spherical boundary, with the circles known to pass through it.
#[derive(Debug, Clone)]
pub struct Vertex {
    location: Vector3<f64>,
    circles: Vec<Rc<Circle>>,
}

impl Vertex {
    /// Unit vector of the vertex.
    #[inline]
    pub fn location(&self) -> &Vector3<f64> {
        &self.location
    }

    /// Records that `circle` passes through this vertex.
    pub fn bind_with(&mut self, circle: &Rc<Circle>) {
        if !self.is_bound_to(circle) {
            self.circles.push(Rc::clone(circle));
        }
    }

    /// Checks if `circle` was bound to this vertex.
    pub fn is_bound_to(&self, circle: &Rc<Circle>) -> bool {
        self.circles.iter().any(|c| Rc::ptr_eq(c, circle))
    }

    /// Returns a circle bound to both vertices, if any.
    pub fn shared_circle_with(&self, other: &Vertex) -> Option<Rc<Circle>> {
        self.circles.iter().find(|c| other.is_bound_to(c)).cloned()
    }
}

/// Storage for the vertices of a boundary under construction.
#[derive(Debug, Clone, Default)]
pub struct VertexArena {
    vertices: Vec<Vertex>,
}

impl VertexArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an unbound vertex.
    pub fn add(&mut self, location: Vector3<f64>) -> VertexId {
        let id = VertexId(self.vertices.len());
        self.vertices.push(Vertex {
            location,
            circles: Vec::new(),
        });
        id
    }

    /// Returns a vertex.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this arena.
    #[inline]
    pub fn get(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }

    /// Returns a vertex for binding.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this arena.
    #[inline]
    pub fn get_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[id.0]
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Checks if the arena holds no vertex.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// An arc of a great circle between two vertices.
///
/// The edge runs from `start` along increasing phases of its circle.
#[derive(Debug, Clone)]
pub struct Edge {
    start: VertexId,
    end: VertexId,
    length: f64,
    circle: Rc<Circle>,
}

impl Edge {
    /// Creates an edge.
    pub fn new(start: VertexId, end: VertexId, length: f64, circle: Rc<Circle>) -> Self {
        Self {
            start,
            end,
            length,
            circle,
        }
    }

    /// First vertex of the edge.
    #[inline]
    pub fn start(&self) -> VertexId {
        self.start
    }

    /// Last vertex of the edge.
    #[inline]
    pub fn end(&self) -> VertexId {
        self.end
    }

    /// Angular length of the edge.
    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Supporting circle.
    #[inline]
    pub fn circle(&self) -> &Rc<Circle> {
        &self.circle
    }

    /// Splits the edge by `splitter`, appending the pieces to `outside` (plus
    /// side of the splitter) and `inside` (minus side).
    ///
    /// Pieces come out in edge order and alternate sides; there are at most
    /// three. Pieces shorter than the tolerance are dropped. An edge that
    /// does not cross the splitter is pushed whole to a single list.
    pub fn split(
        &self,
        splitter: &Rc<Circle>,
        vertices: &mut VertexArena,
        outside: &mut Vec<Edge>,
        inside: &mut Vec<Edge>,
    ) {
        let circle = &self.circle;
        let tolerance = circle.tolerance();
        let edge_start = circle.phase(vertices.get(self.start).location());
        let arc = circle.inside_arc(splitter);
        // phases relative to the edge start, the inside arc begins in [0, 2pi)
        let arc_start = normalize_angle(arc.inf, edge_start + PI) - edge_start;
        let arc_end = arc_start + arc.size();
        let unwrapped_end = arc_end - TAU;

        if unwrapped_end >= self.length - tolerance {
            inside.push(self.clone());
            return;
        }

        let mut splitting = Splitting {
            edge: self,
            splitter,
            vertices,
            previous: self.start,
            managed: 0.0,
        };

        if unwrapped_end >= 0.0 {
            // the edge starts inside
            splitting.add_until(Some(unwrapped_end), inside);
        }

        if arc_start >= self.length - tolerance {
            if unwrapped_end >= 0.0 {
                splitting.add_until(None, outside);
            } else {
                outside.push(self.clone());
            }
        } else {
            splitting.add_until(Some(arc_start), outside);
            if arc_end >= self.length - tolerance {
                splitting.add_until(None, inside);
            } else {
                splitting.add_until(Some(arc_end), inside);
                splitting.add_until(None, outside);
            }
        }
    }
}

/// Progress along an edge being split.
struct Splitting<'a> {
    edge: &'a Edge,
    splitter: &'a Rc<Circle>,
    vertices: &'a mut VertexArena,
    previous: VertexId,
    managed: f64,
}

impl Splitting<'_> {
    /// Adds the piece from the last cut to the relative phase `until`, or to
    /// the edge end for `None`.
    fn add_until(&mut self, until: Option<f64>, list: &mut Vec<Edge>) {
        let edge = self.edge;
        let circle = &edge.circle;
        let position = until.unwrap_or(edge.length);
        let length = position - self.managed;
        self.managed = position;
        if length <= circle.tolerance() {
            return;
        }

        let sub_end = match until {
            Some(position) => {
                let edge_start = circle.phase(self.vertices.get(edge.start).location());
                self.vertices.add(circle.point_at(edge_start + position))
            }
            None => edge.end,
        };
        let end = self.vertices.get_mut(sub_end);
        end.bind_with(self.splitter);
        end.bind_with(circle);
        self.vertices.get_mut(self.previous).bind_with(circle);
        list.push(Edge::new(self.previous, sub_end, length, Rc::clone(circle)));
        self.previous = sub_end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    const TOL: f64 = 1e-10;

    /// Quarter of the equator from +x to +y.
    fn quarter(vertices: &mut VertexArena) -> Edge {
        let start = vertices.add(Vector3::x());
        let end = vertices.add(Vector3::y());
        let circle = Rc::new(Circle::through(Vector3::x(), Vector3::y(), TOL).unwrap());
        Edge::new(start, end, FRAC_PI_2, circle)
    }

    #[test]
    fn non_crossing_edge_passes_through() {
        let mut vertices = VertexArena::new();
        let edge = quarter(&mut vertices);
        let mut outside = Vec::new();
        let mut inside = Vec::new();

        // minus side is the hemisphere around (-1, -1, 0), away from the edge
        let splitter = Rc::new(Circle::new(Vector3::new(-1.0, -1.0, 0.0), TOL));
        edge.split(&splitter, &mut vertices, &mut outside, &mut inside);

        assert!(inside.is_empty());
        assert_eq!(outside.len(), 1);
        assert_eq!(outside[0].start(), edge.start());
        assert_eq!(outside[0].end(), edge.end());
        assert_eq!(outside[0].length(), edge.length());
        assert_eq!(vertices.len(), 2);
    }

    #[test]
    fn edge_inside_goes_to_inside_list() {
        let mut vertices = VertexArena::new();
        let edge = quarter(&mut vertices);
        let mut outside = Vec::new();
        let mut inside = Vec::new();

        let splitter = Rc::new(Circle::new(Vector3::new(1.0, 1.0, 0.0), TOL));
        edge.split(&splitter, &mut vertices, &mut outside, &mut inside);

        assert!(outside.is_empty());
        assert_eq!(inside.len(), 1);
        assert_eq!(inside[0].length(), edge.length());
    }

    #[test]
    fn crossing_edge_is_cut_in_two() {
        let mut vertices = VertexArena::new();
        let edge = quarter(&mut vertices);
        let mut outside = Vec::new();
        let mut inside = Vec::new();

        // meridian through the middle of the edge, minus side towards +x
        let splitter = Rc::new(Circle::new(Vector3::new(1.0, -1.0, 0.0), TOL));
        edge.split(&splitter, &mut vertices, &mut outside, &mut inside);

        assert_eq!(inside.len(), 1);
        assert_eq!(outside.len(), 1);
        assert_relative_eq!(inside[0].length(), FRAC_PI_2 / 2.0, epsilon = 1e-12);
        assert_relative_eq!(outside[0].length(), FRAC_PI_2 / 2.0, epsilon = 1e-12);
        assert_eq!(inside[0].start(), edge.start());
        assert_eq!(inside[0].end(), outside[0].start());
        assert_eq!(outside[0].end(), edge.end());

        let middle = vertices.get(inside[0].end());
        assert!(middle.is_bound_to(&splitter));
        assert!(middle.is_bound_to(edge.circle()));
        assert_relative_eq!(splitter.offset(middle.location()), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn long_edge_crossing_twice_gives_three_pieces() {
        let mut vertices = VertexArena::new();
        let circle = Rc::new(Circle::new(Vector3::z(), TOL));
        let length = 7.0 * PI / 4.0;
        let start = vertices.add(circle.point_at(0.0));
        let end = vertices.add(circle.point_at(length));
        let edge = Edge::new(start, end, length, Rc::clone(&circle));

        // inside arc of the equator is [pi/2, 3pi/2]
        let splitter = Rc::new(Circle::new(circle.point_at(PI), TOL));
        let mut outside = Vec::new();
        let mut inside = Vec::new();
        edge.split(&splitter, &mut vertices, &mut outside, &mut inside);

        assert_eq!(inside.len(), 1);
        assert_eq!(outside.len(), 2);
        assert_relative_eq!(outside[0].length(), FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(inside[0].length(), PI, epsilon = 1e-12);
        assert_relative_eq!(outside[1].length(), PI / 4.0, epsilon = 1e-12);
        assert_eq!(outside[0].end(), inside[0].start());
        assert_eq!(inside[0].end(), outside[1].start());
        assert_eq!(outside[1].end(), end);
    }

    #[test]
    fn edge_ending_on_splitter_gives_two_pieces() {
        let mut vertices = VertexArena::new();
        let circle = Rc::new(Circle::new(Vector3::z(), TOL));
        let start = vertices.add(circle.point_at(0.0));
        let end = vertices.add(circle.point_at(3.0 * FRAC_PI_2));
        let edge = Edge::new(start, end, 3.0 * FRAC_PI_2, Rc::clone(&circle));

        // the edge leaves the inside arc exactly at its end
        let splitter = Rc::new(Circle::new(circle.point_at(PI), TOL));
        let mut outside = Vec::new();
        let mut inside = Vec::new();
        edge.split(&splitter, &mut vertices, &mut outside, &mut inside);

        assert_eq!(outside.len(), 1);
        assert_eq!(inside.len(), 1);
        assert_eq!(inside[0].end(), end);
    }

    #[test]
    fn edge_starting_on_splitter_adds_no_vertex() {
        let mut vertices = VertexArena::new();
        let circle = Rc::new(Circle::new(Vector3::z(), TOL));
        let start = vertices.add(circle.point_at(FRAC_PI_2));
        let end = vertices.add(circle.point_at(PI));
        let edge = Edge::new(start, end, FRAC_PI_2, Rc::clone(&circle));

        // inside arc of the equator is [pi/2, 3pi/2], the edge only touches
        // the splitter at its start
        let splitter = Rc::new(Circle::new(circle.point_at(PI), TOL));
        let mut outside = Vec::new();
        let mut inside = Vec::new();
        edge.split(&splitter, &mut vertices, &mut outside, &mut inside);

        assert!(outside.is_empty());
        assert_eq!(inside.len(), 1);
        assert_eq!(inside[0].start(), start);
        assert_eq!(inside[0].end(), end);
        assert_eq!(vertices.len(), 2);
    }

    #[test]
    fn shared_circle() {
        let mut vertices = VertexArena::new();
        let edge = quarter(&mut vertices);
        vertices.get_mut(edge.start()).bind_with(edge.circle());
        vertices.get_mut(edge.start()).bind_with(edge.circle());
        vertices.get_mut(edge.end()).bind_with(edge.circle());

        let shared = vertices.get(edge.start()).shared_circle_with(vertices.get(edge.end()));
        assert!(shared.is_some_and(|c| Rc::ptr_eq(&c, edge.circle())));
    }
}
