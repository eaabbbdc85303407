//! Hyperplanes that carry their own lower-dimensional coordinate system.
//!
//! A line is a 1-D space, a great circle is a 1-D space of phases. Pieces of
//! such hyperplanes are described by a [`Region`] of that sub-space, which
//! turns splitting and reuniting pieces into boolean operations one
//! dimension lower.

use std::fmt;
use std::rc::Rc;

use crate::region::{Measure, Region};
use crate::{Hyperplane, Split, SubHyperplane};

/// How a cutting hyperplane crosses another hyperplane.
#[derive(Debug, Clone)]
pub enum Trace<S: Hyperplane> {
    /// The whole hyperplane lies on the plus side of the cut.
    Plus,
    /// The whole hyperplane lies on the minus side of the cut.
    Minus,
    /// Both hyperplanes are the same, up to orientation.
    Coplanar,
    /// The cut crosses the hyperplane; the region is the part of the
    /// hyperplane lying on the minus side of the cut.
    Crossing(Region<S>),
}

/// A hyperplane with a sub-space in which its pieces are measured.
pub trait Embedding: Hyperplane {
    /// Hyperplane type of the sub-space.
    type SubSpace: Measure;

    /// Expresses a point of the space in sub-space coordinates.
    fn to_sub_space(&self, point: &Self::Point) -> <Self::SubSpace as Hyperplane>::Point;

    /// Maps a sub-space point back into the space.
    fn to_space(&self, point: &<Self::SubSpace as Hyperplane>::Point) -> Self::Point;

    /// Region of the sub-space covering the whole hyperplane.
    fn whole_extent(&self) -> Region<Self::SubSpace>;

    /// Computes how `cut` crosses this hyperplane.
    fn trace(&self, cut: &Self) -> Trace<Self::SubSpace>;
}

/// A piece of an embedded hyperplane: the hyperplane plus the region of its
/// sub-space that remains.
pub struct SubPlane<H: Embedding> {
    plane: Rc<H>,
    remaining: Region<H::SubSpace>,
}

impl<H: Embedding> SubPlane<H> {
    /// Creates a piece from a hyperplane and the sub-space region it covers.
    ///
    /// The region is compacted with [`Measure::compact`].
    pub fn new(plane: Rc<H>, remaining: Region<H::SubSpace>) -> Self {
        let remaining = <H::SubSpace as Measure>::compact(remaining);
        Self { plane, remaining }
    }

    /// Creates the piece covering the whole hyperplane.
    pub fn whole(plane: Rc<H>) -> Self {
        let remaining = plane.whole_extent();
        Self { plane, remaining }
    }

    /// Region of the sub-space covered by this piece.
    #[inline]
    pub fn remaining(&self) -> &Region<H::SubSpace> {
        &self.remaining
    }
}

impl<H: Embedding> Clone for SubPlane<H> {
    fn clone(&self) -> Self {
        Self {
            plane: Rc::clone(&self.plane),
            remaining: self.remaining.clone(),
        }
    }
}

impl<H: Embedding> fmt::Debug for SubPlane<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubPlane")
            .field("plane", &self.plane)
            .field("size", &self.remaining.size())
            .finish()
    }
}

impl<H> SubHyperplane for SubPlane<H>
where
    H: Embedding<Sub = SubPlane<H>>,
{
    type Plane = H;

    fn hyperplane(&self) -> &Rc<H> {
        &self.plane
    }

    fn size(&self) -> f64 {
        self.remaining.size()
    }

    fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    fn split(&self, cut: &H) -> Split<Self> {
        let part = match self.plane.trace(cut) {
            Trace::Coplanar => return Split::Coplanar,
            Trace::Plus => return Split::Plus(self.clone()),
            Trace::Minus => return Split::Minus(self.clone()),
            Trace::Crossing(part) => part,
        };

        let piece = |remaining: Region<H::SubSpace>| {
            (!remaining.is_empty()).then(|| Self::new(Rc::clone(&self.plane), remaining))
        };
        let minus = piece(self.remaining.intersection(&part));
        let plus = piece(self.remaining.difference(&part));
        match (plus, minus) {
            (None, None) => Split::Coplanar,
            (plus, minus) => Split::from_parts(plus, minus),
        }
    }

    fn reunite(&self, other: &Self) -> Self {
        Self::new(Rc::clone(&self.plane), self.remaining.union(&other.remaining))
    }
}
