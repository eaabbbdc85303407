//! Binary Space Partitioning tree over an abstract space.
//!
//! The tree knows nothing about the geometry of the space it cuts: it only
//! relies on the [`Hyperplane`](crate::Hyperplane) and
//! [`SubHyperplane`](crate::SubHyperplane) contracts. It supports:
//!
//! - Point location with a fixed tie-break for points on a cut
//! - Growing a leaf with a cut fitted to its cell
//! - Splitting a whole subtree by a sub-hyperplane
//! - Boundary attributes telling which parts of each cut separate inside
//!   from outside
//!
//! # Architecture
//!
//! - [`BspTree`]: arena of nodes addressed by [`NodeId`]
//! - [`BspNode`] / [`NodeKind`]: a leaf or a cut with two children
//! - [`BoundaryAttribute`]: boundary portions carried by a cut
//! - [`CutSelector`]: strategy for choosing the next cut when building
//! - [`BspVisitor`]: visitor trait for custom traversal behavior

mod boundary;
mod node;
mod selector;
mod tree;
mod visitor;

pub use boundary::BoundaryAttribute;
pub use node::{BspNode, NodeId, NodeKind};
pub use selector::{CutSelector, FirstCut, LargestCut};
pub use tree::BspTree;
pub use visitor::{BoundarySizeVisitor, BspVisitor, VisitOrder};
