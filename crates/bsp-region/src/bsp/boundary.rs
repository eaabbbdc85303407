//! Boundary attributes: which parts of each cut belong to the region boundary.

use crate::{Hyperplane, Split, SubHyperplane};

use super::node::{NodeId, NodeKind};
use super::tree::BspTree;

/// Boundary portions carried by an internal node.
///
/// Both pieces are carved from the node's cut. `plus_outside` has the
/// outside of the region on its plus side and the inside on its minus side,
/// `plus_inside` is the opposite. They never overlap.
#[derive(Debug, Clone)]
pub struct BoundaryAttribute<S> {
    plus_outside: Option<S>,
    plus_inside: Option<S>,
}

impl<S: SubHyperplane> BoundaryAttribute<S> {
    /// Creates an attribute, discarding empty pieces.
    pub fn new(plus_outside: Option<S>, plus_inside: Option<S>) -> Self {
        Self {
            plus_outside: plus_outside.filter(|s| !s.is_empty()),
            plus_inside: plus_inside.filter(|s| !s.is_empty()),
        }
    }

    /// Part of the cut with the outside on its plus side.
    #[inline]
    pub fn plus_outside(&self) -> Option<&S> {
        self.plus_outside.as_ref()
    }

    /// Part of the cut with the inside on its plus side.
    #[inline]
    pub fn plus_inside(&self) -> Option<&S> {
        self.plus_inside.as_ref()
    }

    /// Total size of both pieces.
    pub fn size(&self) -> f64 {
        self.plus_outside.as_ref().map_or(0.0, |s| s.size())
            + self.plus_inside.as_ref().map_or(0.0, |s| s.size())
    }

    /// Checks if no part of the cut belongs to the boundary.
    pub fn is_empty(&self) -> bool {
        self.plus_outside.is_none() && self.plus_inside.is_none()
    }
}

impl<S> BoundaryAttribute<S> {
    pub(crate) fn swap(&mut self) {
        std::mem::swap(&mut self.plus_outside, &mut self.plus_inside);
    }
}

/// Parts of a sub-hyperplane touching inside and outside leaves of a subtree.
struct Characterization<S> {
    outside_touching: Option<S>,
    inside_touching: Option<S>,
}

impl<S: SubHyperplane> Characterization<S> {
    fn new<H>(tree: &BspTree<H>, node: NodeId, sub: S) -> Self
    where
        H: Hyperplane<Sub = S>,
    {
        let mut characterization = Self {
            outside_touching: None,
            inside_touching: None,
        };
        characterization.characterize(tree, node, sub);
        characterization
    }

    fn characterize<H>(&mut self, tree: &BspTree<H>, node: NodeId, sub: S)
    where
        H: Hyperplane<Sub = S>,
    {
        if sub.is_empty() {
            return;
        }
        match tree.node(node).kind() {
            NodeKind::Leaf { inside: true } => add(&mut self.inside_touching, sub),
            NodeKind::Leaf { inside: false } => add(&mut self.outside_touching, sub),
            NodeKind::Internal { cut, plus, minus, .. } => match sub.split(cut.hyperplane()) {
                Split::Plus(part) => self.characterize(tree, *plus, part),
                Split::Minus(part) => self.characterize(tree, *minus, part),
                Split::Spanning {
                    plus: plus_part,
                    minus: minus_part,
                } => {
                    self.characterize(tree, *plus, plus_part);
                    self.characterize(tree, *minus, minus_part);
                }
                // cannot happen with cuts fitted to their cells, follow the
                // classification tie-break
                Split::Coplanar => self.characterize(tree, *minus, sub),
            },
        }
    }
}

fn add<S: SubHyperplane>(slot: &mut Option<S>, sub: S) {
    *slot = Some(match slot.take() {
        Some(existing) => existing.reunite(&sub),
        None => sub,
    });
}

impl<H: Hyperplane> BspTree<H> {
    /// Computes the boundary attribute of an internal node from scratch.
    ///
    /// The cut is pushed down the plus subtree to find the parts touching
    /// outside (resp. inside) cells, then each of those is pushed down the
    /// minus subtree to keep only what touches the opposite kind of cell.
    pub fn compute_boundary(&self, id: NodeId) -> Option<BoundaryAttribute<H::Sub>> {
        let NodeKind::Internal { cut, plus, minus, .. } = self.node(id).kind() else {
            return None;
        };
        let plus_char = Characterization::new(self, *plus, cut.clone());

        let plus_outside = plus_char
            .outside_touching
            .and_then(|part| Characterization::new(self, *minus, part).inside_touching);
        let plus_inside = plus_char
            .inside_touching
            .and_then(|part| Characterization::new(self, *minus, part).outside_touching);

        Some(BoundaryAttribute::new(plus_outside, plus_inside))
    }

    /// Recomputes the boundary attribute of every internal node.
    pub fn annotate_boundaries(&mut self) {
        let attributes: Vec<_> = self
            .ids()
            .filter_map(|id| self.compute_boundary(id).map(|attribute| (id, attribute)))
            .collect();
        for (id, attribute) in attributes {
            self.set_boundary(id, attribute);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::euclidean::Polygon;
    use crate::{Region, SubHyperplane};
    use nalgebra::Point2;

    const TOL: f64 = 1e-10;

    #[test]
    fn interval_cuts_are_plus_outside() {
        let region = Region::interval(0.0, 10.0, TOL);
        let tree = region.tree();

        let mut count = 0;
        for id in tree.ids() {
            if let Some(attribute) = tree.boundary(id) {
                assert!(attribute.plus_outside().is_some());
                assert!(attribute.plus_inside().is_none());
                count += 1;
            }
        }
        assert_eq!(count, 2);
    }

    #[test]
    fn complement_swaps_attribute_parts() {
        let region = Region::interval(0.0, 10.0, TOL).complement();
        let tree = region.tree();

        for id in tree.ids() {
            if let Some(attribute) = tree.boundary(id) {
                assert!(attribute.plus_outside().is_none());
                assert!(attribute.plus_inside().is_some());
            }
        }
    }

    #[test]
    fn square_boundary_pieces_are_unit_segments() {
        let square = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let region = Polygon::new(square.to_vec())
            .to_region(TOL)
            .unwrap();
        let tree = region.tree();

        let mut sizes = Vec::new();
        for id in tree.ids() {
            if let Some(attribute) = tree.boundary(id) {
                if let Some(piece) = attribute.plus_outside() {
                    sizes.push(piece.size());
                }
                assert!(attribute.plus_inside().is_none());
            }
        }
        assert_eq!(sizes.len(), 4);
        for size in sizes {
            approx::assert_relative_eq!(size, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn interior_cut_has_no_boundary() {
        // two unit squares side by side share the x = 1 line
        let left = Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ])
        .to_region(TOL)
        .unwrap();
        let right = Polygon::new(vec![
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.0),
        ])
        .to_region(TOL)
        .unwrap();

        let union = left.union(&right);
        approx::assert_relative_eq!(union.boundary_size(), 6.0, epsilon = 1e-9);
        approx::assert_relative_eq!(union.size(), 2.0, epsilon = 1e-9);
    }
}
