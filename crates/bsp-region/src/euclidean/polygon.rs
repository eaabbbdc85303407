//! Polygon loops and regions bounded by them.

use std::rc::Rc;

use nalgebra::{Point2, Vector2};

use crate::embedding::SubPlane;
use crate::error::RegionError;
use crate::region::Region;

use super::{Line, NestedLoops};

/// A loop of vertices in the plane.
///
/// A closed loop has an implicit edge from its last vertex back to its first
/// one. Counter-clockwise loops bound their interior, clockwise loops bound
/// its complement.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point2<f64>>,
    closed: bool,
}

impl Polygon {
    /// Creates a closed loop from a list of vertices.
    pub fn new(vertices: Vec<Point2<f64>>) -> Self {
        Self {
            vertices,
            closed: true,
        }
    }

    /// Creates an open chain of vertices.
    ///
    /// Open chains have a length but cannot bound a region.
    pub fn open(vertices: Vec<Point2<f64>>) -> Self {
        Self {
            vertices,
            closed: false,
        }
    }

    /// Creates a closed loop from separate coordinate arrays.
    ///
    /// # Errors
    /// Returns [`RegionError::DimensionMismatch`] if the arrays differ in length.
    pub fn from_coordinates(xs: &[f64], ys: &[f64]) -> Result<Self, RegionError> {
        if xs.len() != ys.len() {
            return Err(RegionError::DimensionMismatch {
                first: xs.len(),
                second: ys.len(),
            });
        }
        let vertices = xs.iter().zip(ys).map(|(&x, &y)| Point2::new(x, y)).collect();
        Ok(Self::new(vertices))
    }

    /// Returns the vertices of the loop.
    #[inline]
    pub fn vertices(&self) -> &[Point2<f64>] {
        &self.vertices
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the loop has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Checks if the last vertex connects back to the first one.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Pairs of consecutive vertices, including the closing pair.
    fn segments(&self) -> impl Iterator<Item = (&Point2<f64>, &Point2<f64>)> {
        let closing = match (self.closed, self.vertices.last()) {
            (true, Some(last)) if self.vertices.len() > 1 => Some((last, &self.vertices[0])),
            _ => None,
        };
        closing
            .into_iter()
            .chain(self.vertices.iter().zip(self.vertices.iter().skip(1)))
    }

    /// Signed area enclosed by the loop, positive for counter-clockwise loops.
    ///
    /// Open chains are closed implicitly.
    pub fn signed_area(&self) -> f64 {
        let n = self.vertices.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let a = &self.vertices[i];
                let b = &self.vertices[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice / 2.0
    }

    /// Total length of the edges.
    pub fn perimeter(&self) -> f64 {
        self.segments().map(|(a, b)| (b - a).norm()).sum()
    }

    /// Computes the centroid (average of the vertices).
    pub fn centroid(&self) -> Point2<f64> {
        let sum: Vector2<f64> = self.vertices.iter().map(|p| p.coords).sum();
        Point2::from(sum / self.vertices.len() as f64)
    }

    /// Returns the same loop walked the other way around.
    pub fn reversed(&self) -> Self {
        Self {
            vertices: self.vertices.iter().rev().copied().collect(),
            closed: self.closed,
        }
    }

    /// Builds the boundary pieces of the loop, one segment per edge.
    ///
    /// Each segment lies on the line running from its start vertex towards
    /// its end vertex, so the region bounded by the segments is on the left.
    ///
    /// # Errors
    /// - [`RegionError::OpenLoop`] for open chains
    /// - [`RegionError::TooFewVertices`] for loops with fewer than 3 vertices
    /// - [`RegionError::DegenerateLine`] for consecutive identical vertices
    pub fn edges(&self, tolerance: f64) -> Result<Vec<SubPlane<Line>>, RegionError> {
        if !self.closed {
            return Err(RegionError::OpenLoop);
        }
        if self.vertices.len() < 3 {
            return Err(RegionError::TooFewVertices(self.vertices.len()));
        }
        self.segments()
            .map(|(start, end)| -> Result<SubPlane<Line>, RegionError> {
                let line = Line::through(*start, *end, tolerance)?;
                let extent = Region::interval(line.abscissa(start), line.abscissa(end), tolerance);
                Ok(SubPlane::new(Rc::new(line), extent))
            })
            .collect()
    }

    /// Builds the region bounded by this loop, taking its winding as given.
    ///
    /// # Errors
    /// See [`Polygon::edges`].
    pub fn to_region(&self, tolerance: f64) -> Result<Region<Line>, RegionError> {
        polygon_region(self, tolerance)
    }
}

/// Builds the region bounded by a single loop, taking its winding as given.
///
/// A clockwise loop gives the unbounded region outside it.
///
/// # Errors
/// See [`Polygon::edges`].
pub fn polygon_region(polygon: &Polygon, tolerance: f64) -> Result<Region<Line>, RegionError> {
    Ok(Region::from_boundary(polygon.edges(tolerance)?, tolerance))
}

/// Builds the region bounded by several loops, whatever their winding.
///
/// Loops are nested by containment and re-oriented so that the outermost
/// ones bound an interior, the ones directly inside them bound holes, and
/// so on. No loop at all gives the whole plane.
///
/// # Errors
/// - [`RegionError::CrossingBoundaryLoops`] if two loops partially overlap
/// - any error from [`Polygon::edges`]
pub fn polygon_region_from_loops(
    loops: &[Polygon],
    tolerance: f64,
) -> Result<Region<Line>, RegionError> {
    let mut nested = NestedLoops::new(tolerance);
    for polygon in loops {
        nested.add(polygon)?;
    }

    let mut boundary = Vec::new();
    for oriented in nested.correct_orientation() {
        boundary.extend(oriented.polygon().edges(tolerance)?);
    }
    Ok(Region::from_boundary(boundary, tolerance))
}

impl Region<Line> {
    /// Builds the region bounded by several loops, whatever their winding.
    ///
    /// # Errors
    /// See [`polygon_region_from_loops`].
    pub fn from_loops(loops: &[Polygon], tolerance: f64) -> Result<Self, RegionError> {
        polygon_region_from_loops(loops, tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Location, SubHyperplane};
    use approx::assert_relative_eq;

    const TOL: f64 = 1e-10;

    fn square(x: f64, y: f64, side: f64) -> Polygon {
        Polygon::new(vec![
            Point2::new(x, y),
            Point2::new(x + side, y),
            Point2::new(x + side, y + side),
            Point2::new(x, y + side),
        ])
    }

    #[test]
    fn signed_area_and_perimeter() {
        let ccw = square(0.0, 0.0, 2.0);
        assert_relative_eq!(ccw.signed_area(), 4.0);
        assert_relative_eq!(ccw.reversed().signed_area(), -4.0);
        assert_relative_eq!(ccw.perimeter(), 8.0);
        assert_relative_eq!(ccw.centroid().x, 1.0);
        assert_relative_eq!(ccw.centroid().y, 1.0);

        let chain = Polygon::open(ccw.vertices().to_vec());
        assert_relative_eq!(chain.perimeter(), 6.0);
        assert!(!chain.is_closed());
    }

    #[test]
    fn from_coordinates_checks_lengths() {
        let polygon = Polygon::from_coordinates(&[0.0, 1.0, 0.0], &[0.0, 0.0, 1.0]).unwrap();
        assert_eq!(polygon.len(), 3);
        assert_eq!(
            Polygon::from_coordinates(&[0.0, 1.0], &[0.0]),
            Err(RegionError::DimensionMismatch { first: 2, second: 1 })
        );
    }

    #[test]
    fn edge_errors() {
        assert_eq!(
            Polygon::open(square(0.0, 0.0, 1.0).vertices().to_vec()).edges(TOL).unwrap_err(),
            RegionError::OpenLoop
        );
        let two = Polygon::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]);
        assert_eq!(two.edges(TOL).unwrap_err(), RegionError::TooFewVertices(2));
    }

    #[test]
    fn edges_have_edge_lengths() {
        let triangle = Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 0.0),
            Point2::new(0.0, 4.0),
        ]);
        let mut lengths: Vec<f64> = triangle.edges(TOL).unwrap().iter().map(|e| e.size()).collect();
        lengths.sort_by(f64::total_cmp);
        assert_relative_eq!(lengths[0], 3.0, epsilon = 1e-12);
        assert_relative_eq!(lengths[1], 4.0, epsilon = 1e-12);
        assert_relative_eq!(lengths[2], 5.0, epsilon = 1e-12);
    }

    #[test]
    fn clockwise_loop_gives_outside() {
        let cw = square(0.0, 0.0, 1.0).reversed().to_region(TOL).unwrap();
        assert_eq!(cw.check_point(&Point2::new(0.5, 0.5)), Location::Outside);
        assert_eq!(cw.check_point(&Point2::new(5.0, 5.0)), Location::Inside);
        assert!(cw.size().is_infinite());
    }

    #[test]
    fn triangle_region() {
        let triangle = Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 0.0),
            Point2::new(0.0, 4.0),
        ])
        .to_region(TOL)
        .unwrap();

        assert_relative_eq!(triangle.size(), 6.0, epsilon = 1e-9);
        assert_relative_eq!(triangle.boundary_size(), 12.0, epsilon = 1e-9);
        assert_eq!(triangle.check_point(&Point2::new(1.0, 1.0)), Location::Inside);
        assert_eq!(triangle.check_point(&Point2::new(3.0, 3.0)), Location::Outside);
    }

    #[test]
    fn square_with_hole_from_loops() {
        // both loops given clockwise
        let outer = square(0.0, 0.0, 4.0).reversed();
        let hole = square(1.0, 1.0, 2.0).reversed();

        let region = Region::from_loops(&[hole, outer], TOL).unwrap();
        assert_relative_eq!(region.size(), 12.0, epsilon = 1e-9);
        assert_relative_eq!(region.boundary_size(), 24.0, epsilon = 1e-9);
        assert_eq!(region.check_point(&Point2::new(2.0, 2.0)), Location::Outside);
        assert_eq!(region.check_point(&Point2::new(0.5, 2.0)), Location::Inside);
    }

    #[test]
    fn cut_segments_stay_compact_on_large_polygons() {
        let n = 256;
        let step = std::f64::consts::TAU / n as f64;
        let polygon = Polygon::new(
            (0..n)
                .map(|i| Point2::new((i as f64 * step).cos(), (i as f64 * step).sin()))
                .collect(),
        );
        let region = polygon.to_region(TOL).unwrap();
        let tree = region.tree();

        // a line meets a convex cell in one segment: two bounds, three leaves
        for id in tree.ids() {
            if let Some(cut) = tree.cut(id) {
                let nodes = cut.remaining().tree().len();
                assert!(nodes <= 5, "segment described by {nodes} nodes");
            }
        }
        assert_relative_eq!(region.size(), polygon.signed_area(), epsilon = 1e-9);
        assert_relative_eq!(region.boundary_size(), polygon.perimeter(), epsilon = 1e-9);
    }

    #[test]
    fn no_loops_is_whole_plane() {
        assert!(Region::from_loops(&[], TOL).unwrap().is_full());
    }
}
