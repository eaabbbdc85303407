//! Nesting of boundary loops and correction of their winding.
//!
//! Loops given by a caller may be wound either way. Once nested by
//! containment, the outermost loops must be counter-clockwise, the loops
//! directly inside them clockwise, and so on alternating with depth.

use tracing::{debug, trace};

use crate::error::RegionError;
use crate::region::Region;

use super::{Line, Polygon};

/// A loop of the forest, with the loops it directly surrounds.
#[derive(Debug, Clone)]
struct LoopNode {
    polygon: Polygon,
    /// Bounded region enclosed by the loop, whatever its winding.
    region: Region<Line>,
    originally_ccw: bool,
    surrounded: Vec<LoopNode>,
}

impl LoopNode {
    fn new(polygon: &Polygon, tolerance: f64) -> Result<Self, RegionError> {
        if !polygon.is_closed() {
            return Err(RegionError::OpenLoop);
        }
        let region = polygon.to_region(tolerance)?;
        let (region, originally_ccw) = if region.size().is_infinite() {
            (region.complement(), false)
        } else {
            (region, true)
        };
        Ok(Self {
            polygon: polygon.clone(),
            region,
            originally_ccw,
            surrounded: Vec::new(),
        })
    }

    fn count(&self) -> usize {
        1 + self.surrounded.iter().map(LoopNode::count).sum::<usize>()
    }
}

/// A loop with the winding it needs inside the final boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientedLoop {
    polygon: Polygon,
    reversed: bool,
    depth: usize,
}

impl OrientedLoop {
    /// The loop with its corrected winding.
    #[inline]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Checks if the winding differs from the loop as it was given.
    #[inline]
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Nesting depth, 0 for outermost loops.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Forest of loops nested by containment.
#[derive(Debug, Clone)]
pub struct NestedLoops {
    tolerance: f64,
    roots: Vec<LoopNode>,
}

impl NestedLoops {
    /// Creates an empty forest.
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            roots: Vec::new(),
        }
    }

    /// Number of loops in the forest.
    pub fn len(&self) -> usize {
        self.roots.iter().map(LoopNode::count).sum()
    }

    /// Checks if no loop was added.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Adds a loop, placing it according to containment.
    ///
    /// # Errors
    /// - [`RegionError::OpenLoop`] if the loop is not closed
    /// - [`RegionError::CrossingBoundaryLoops`] if the loop partially
    ///   overlaps a loop already added
    /// - any error from [`Polygon::edges`]
    ///
    /// On error the forest is left unchanged.
    pub fn add(&mut self, polygon: &Polygon) -> Result<(), RegionError> {
        let node = LoopNode::new(polygon, self.tolerance)?;
        insert(&mut self.roots, node)
    }

    /// Returns every loop with the winding required by its depth.
    ///
    /// The loops held by the forest are left untouched.
    pub fn correct_orientation(&self) -> Vec<OrientedLoop> {
        let mut oriented = Vec::with_capacity(self.len());
        let mut stack: Vec<(&LoopNode, usize)> = self.roots.iter().rev().map(|n| (n, 0)).collect();
        while let Some((node, depth)) = stack.pop() {
            let wants_ccw = depth % 2 == 0;
            let reversed = node.originally_ccw != wants_ccw;
            trace!(depth, reversed, vertices = node.polygon.len(), "oriented loop");
            oriented.push(OrientedLoop {
                polygon: if reversed {
                    node.polygon.reversed()
                } else {
                    node.polygon.clone()
                },
                reversed,
                depth,
            });
            stack.extend(node.surrounded.iter().rev().map(|child| (child, depth + 1)));
        }

        debug!(
            loops = oriented.len(),
            reversed = oriented.iter().filter(|l| l.reversed).count(),
            "corrected loop orientation"
        );
        oriented
    }
}

fn insert(siblings: &mut Vec<LoopNode>, mut node: LoopNode) -> Result<(), RegionError> {
    if let Some(parent) = siblings.iter_mut().find(|s| s.region.contains(&node.region)) {
        return insert(&mut parent.surrounded, node);
    }

    let (contained, others): (Vec<usize>, Vec<usize>) =
        (0..siblings.len()).partition(|&i| node.region.contains(&siblings[i].region));
    if others
        .iter()
        .any(|&i| !node.region.intersection(&siblings[i].region).is_empty())
    {
        return Err(RegionError::CrossingBoundaryLoops);
    }

    for i in contained.into_iter().rev() {
        node.surrounded.push(siblings.remove(i));
    }
    node.surrounded.reverse();
    siblings.push(node);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point2;

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
    fn nested_squares_alternate() {
        let mut loops = NestedLoops::new(TOL);
        // innermost first, all counter-clockwise
        loops.add(&square(2.0, 2.0, 1.0)).unwrap();
        loops.add(&square(1.0, 1.0, 3.0)).unwrap();
        loops.add(&square(0.0, 0.0, 5.0)).unwrap();
        assert_eq!(loops.len(), 3);

        let oriented = loops.correct_orientation();
        let depths: Vec<usize> = oriented.iter().map(OrientedLoop::depth).collect();
        assert_eq!(depths, vec![0, 1, 2]);
        assert!(!oriented[0].is_reversed());
        assert!(oriented[1].is_reversed());
        assert!(!oriented[2].is_reversed());
        assert_relative_eq!(oriented[1].polygon().signed_area(), -9.0);
    }

    #[test]
    fn siblings_stay_at_same_depth() {
        let mut loops = NestedLoops::new(TOL);
        loops.add(&square(0.0, 0.0, 10.0).reversed()).unwrap();
        loops.add(&square(1.0, 1.0, 1.0)).unwrap();
        loops.add(&square(5.0, 5.0, 1.0).reversed()).unwrap();

        let oriented = loops.correct_orientation();
        assert_eq!(oriented.len(), 3);
        assert!(oriented[0].is_reversed());
        assert_eq!(oriented[1].depth(), 1);
        assert_eq!(oriented[2].depth(), 1);
        for hole in &oriented[1..] {
            assert!(hole.polygon().signed_area() < 0.0);
        }
    }

    #[test]
    fn crossing_loops_are_rejected() {
        let mut loops = NestedLoops::new(TOL);
        loops.add(&square(0.0, 0.0, 2.0)).unwrap();

        let result = loops.add(&square(1.0, 1.0, 2.0));
        assert_eq!(result, Err(RegionError::CrossingBoundaryLoops));
        assert_eq!(loops.len(), 1);
    }

    #[test]
    fn open_loops_are_rejected() {
        let mut loops = NestedLoops::new(TOL);
        let open = Polygon::open(square(0.0, 0.0, 1.0).vertices().to_vec());
        assert_eq!(loops.add(&open), Err(RegionError::OpenLoop));
        assert!(loops.is_empty());
    }
}
