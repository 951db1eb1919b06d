//! The planar geometry used to describe lane corridors and agent footprints. Everything is in
//! meters, in a local Cartesian frame. Exact polygon predicates are delegated to the `geo` crate.

pub use crate::angle::Angle;
pub use crate::bounds::Bounds;
pub use crate::distance::Distance;
pub use crate::polygon::Polygon;
pub use crate::polyline::PolyLine;
pub use crate::pt::Pt2D;

mod angle;
mod bounds;
mod distance;
mod polygon;
mod polyline;
mod pt;

/// Points closer than this are considered the same.
pub const EPSILON_DIST: Distance = Distance::const_meters(0.0001);
