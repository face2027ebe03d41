//! Geometry primitives: scalar units, paths, and coordinate transforms.
//!
//! These are the types every other module in the crate builds on — see
//! spec.md §3.1.

pub mod path;
pub mod transform;
pub mod units;

pub use path::{NonEmptyPath, Path, Vertex};
pub use transform::Transform;
pub use units::{
    Angle, Length, Point, PositiveLength, Ratio, UnsignedLength, UnsignedLimitedRatio,
    UnsignedRatio, ARC_TOLERANCE_SLACK_NM, MAX_ARC_TOLERANCE_NM,
};
