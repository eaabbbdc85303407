//! Boolean operations between regions.
//!
//! Both trees are merged top-down: the second tree is split by every cut of
//! the first, and once a leaf is reached on either side the operation
//! decides what replaces it. Subtrees moved into a smaller cell have their
//! cuts re-fitted to that cell.

use std::rc::Rc;

use tracing::trace;

use crate::bsp::{BspTree, NodeId, NodeKind};
use crate::{Hyperplane, Split, SubHyperplane};

use super::Region;

/// Resolution of a leaf against the other operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LeafMerger {
    Union,
    Intersection,
    Difference,
    Xor,
}

impl LeafMerger {
    /// Tree replacing a leaf tagged `inside` facing the `other` subtree.
    ///
    /// `leaf_from_first` tells which operand the leaf comes from, which only
    /// matters for the difference.
    fn resolve<H: Hyperplane>(
        self,
        inside: bool,
        leaf_from_first: bool,
        other: BspTree<H>,
    ) -> BspTree<H> {
        match self {
            LeafMerger::Union => {
                if inside {
                    BspTree::leaf(true)
                } else {
                    other
                }
            }
            LeafMerger::Intersection => {
                if inside {
                    other
                } else {
                    BspTree::leaf(false)
                }
            }
            LeafMerger::Xor => {
                if inside {
                    other.complement()
                } else {
                    other
                }
            }
            LeafMerger::Difference => match (leaf_from_first, inside) {
                (true, true) => other.complement(),
                (true, false) | (false, true) => BspTree::leaf(false),
                (false, false) => other,
            },
        }
    }
}

/// A cell as the chain of cuts leading to it, with the side taken at each.
type Cell<S> = Vec<(S, bool)>;

pub(super) fn combine<H: Hyperplane>(
    a: &Region<H>,
    b: &Region<H>,
    merger: LeafMerger,
) -> Region<H> {
    assert_eq!(
        a.tolerance(),
        b.tolerance(),
        "cannot combine regions with different tolerances"
    );
    let (first, second) = (a.tree(), b.tree());
    let mut cell = Vec::new();
    let tree = merge(first, first.root(), second, second.root(), merger, &mut cell);
    trace!(?merger, nodes = tree.len(), "combined regions");
    Region::new(tree, a.tolerance())
}

fn merge<H: Hyperplane>(
    a: &BspTree<H>,
    a_id: NodeId,
    b: &BspTree<H>,
    b_id: NodeId,
    merger: LeafMerger,
    cell: &mut Cell<H::Sub>,
) -> BspTree<H> {
    if let Some(inside) = a.inside(a_id) {
        return refit(&merger.resolve(inside, true, b.subtree(b_id)), cell);
    }
    if let Some(inside) = b.inside(b_id) {
        return refit(&merger.resolve(inside, false, a.subtree(a_id)), cell);
    }
    let (Some(cut), Some((a_plus, a_minus))) = (a.cut(a_id), a.children(a_id)) else {
        return BspTree::leaf(false);
    };
    let plane = cut.hyperplane();

    let Some(sub) = fit_in_cell(H::whole_hyperplane(Rc::clone(plane)), cell.iter()) else {
        let child = if cell_side(plane.as_ref(), cell) { a_plus } else { a_minus };
        return merge(a, child, b, b_id, merger, cell);
    };

    let (b_plus, b_minus) = b.split(b_id, &sub);

    cell.push((sub.clone(), true));
    let plus = merge(a, a_plus, &b_plus, b_plus.root(), merger, cell);
    cell.pop();

    cell.push((sub.clone(), false));
    let minus = merge(a, a_minus, &b_minus, b_minus.root(), merger, cell);
    cell.pop();

    BspTree::internal(sub, plus, minus).condensed()
}

/// Copies `tree` into `cell`, restricting every cut to it.
///
/// A cut missing the cell is replaced by its child on the cell's side.
fn refit<H: Hyperplane>(tree: &BspTree<H>, cell: &mut Cell<H::Sub>) -> BspTree<H> {
    refit_node(tree, tree.root(), cell)
}

fn refit_node<H: Hyperplane>(tree: &BspTree<H>, id: NodeId, cell: &mut Cell<H::Sub>) -> BspTree<H> {
    let NodeKind::Internal { cut, plus, minus, .. } = tree.node(id).kind() else {
        return BspTree::leaf(tree.inside(id).unwrap_or(false));
    };
    let Some(fitted) = fit_in_cell(cut.clone(), cell.iter()) else {
        let child = if cell_side(cut.hyperplane().as_ref(), cell) { *plus } else { *minus };
        return refit_node(tree, child, cell);
    };

    cell.push((fitted.clone(), true));
    let plus_tree = refit_node(tree, *plus, cell);
    cell.pop();

    cell.push((fitted.clone(), false));
    let minus_tree = refit_node(tree, *minus, cell);
    cell.pop();

    BspTree::internal(fitted, plus_tree, minus_tree).condensed()
}

/// Restricts `sub` to the side of each constraint the cell lies on.
fn fit_in_cell<'a, S, I>(sub: S, constraints: I) -> Option<S>
where
    S: SubHyperplane + 'a,
    I: IntoIterator<Item = &'a (S, bool)>,
{
    let mut sub = sub;
    for (constraint, plus_side) in constraints {
        let (plus, minus) = sub.split(constraint.hyperplane()).into_parts();
        sub = if *plus_side { plus } else { minus }?;
    }
    (!sub.is_empty()).then_some(sub)
}

/// Side of `plane` a cell lies on, for a plane missing the cell.
///
/// Each constraint is first restricted to the cell, giving one of its
/// faces; the first face found on one side of the plane decides. Returns
/// `true` for the plus side.
fn cell_side<H: Hyperplane>(plane: &H, cell: &[(H::Sub, bool)]) -> bool {
    for (index, (piece, plus_side)) in cell.iter().enumerate().rev() {
        let others = cell
            .iter()
            .enumerate()
            .filter(|(other, _)| *other != index)
            .map(|(_, constraint)| constraint);
        let Some(face) = fit_in_cell(piece.clone(), others) else {
            continue;
        };
        match face.split(plane) {
            Split::Plus(_) => return true,
            Split::Minus(_) => return false,
            Split::Coplanar => {
                return face.hyperplane().same_orientation_as(plane) == *plus_side;
            }
            Split::Spanning { .. } => continue,
        }
    }
    false
}
