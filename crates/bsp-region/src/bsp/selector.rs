//! Cut selection strategies for building trees from a boundary.
//!
//! The order in which boundary pieces are inserted changes the shape of the
//! tree (its depth and how many pieces get split) but never the region it
//! describes.

use crate::SubHyperplane;

/// Strategy for selecting which boundary piece to insert next.
pub trait CutSelector {
    /// Select a piece from the slice, returning its index.
    ///
    /// Returns `None` if the slice is empty.
    fn select<S: SubHyperplane>(&self, cuts: &[S]) -> Option<usize>;
}

/// Selects pieces in input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCut;

impl CutSelector for FirstCut {
    fn select<S: SubHyperplane>(&self, cuts: &[S]) -> Option<usize> {
        (!cuts.is_empty()).then_some(0)
    }
}

/// Selects the largest remaining piece first.
///
/// Large pieces tend to separate the boundary into balanced halves.
#[derive(Debug, Clone, Copy, Default)]
pub struct LargestCut;

impl CutSelector for LargestCut {
    fn select<S: SubHyperplane>(&self, cuts: &[S]) -> Option<usize> {
        cuts.iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.size().total_cmp(&b.size()))
            .map(|(index, _)| index)
    }
}
