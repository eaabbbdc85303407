//! BSP (Binary Space Partitioning) regions with boolean set algebra.
//!
//! The tree, region and merge machinery is generic over a space, described
//! by its [`Hyperplane`] and [`SubHyperplane`] types. Three spaces are
//! provided: the real line ([`euclidean::OrientedPoint`]), the plane
//! ([`euclidean::Line`]) and the sphere ([`spherical::Circle`]).

pub mod bsp;
pub mod embedding;
mod error;
pub mod euclidean;
mod hyperplane;
pub mod region;
pub mod spherical;

pub use bsp::{BspTree, CutSelector, FirstCut, LargestCut};
pub use embedding::{Embedding, SubPlane, Trace};
pub use error::RegionError;
pub use hyperplane::{DEFAULT_TOLERANCE, Hyperplane, PointSide, Split, SubHyperplane};
pub use region::{Location, Measure, Region};
