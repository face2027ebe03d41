//! Scalar value types shared by every geometry and data-model entity.
//!
//! All distances are signed 64-bit nanometers. The design domain is bounded
//! to roughly ±1 m (±1e9 nm), comfortably inside both `i64` and the
//! `f64` values the polygon kernel hands to `geo-clipper`.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Neg, Sub};

/// A signed distance in nanometers.
pub type Length = i64;

/// Maximum chord error permitted when flattening arcs into straight segments
/// for integer boolean operations, in nanometers.
///
/// Fixed so that persisted designs remain bit-compatible across releases.
/// Do not change this — see spec.md §9 and §4.1.
pub const MAX_ARC_TOLERANCE_NM: Length = 5_000;

/// The canonical "arc-tolerance slack" subtracted from outward offsets when a
/// check grows an object by a clearance to build a forbidden zone, to avoid
/// false positives from arc-flattening error. Applied identically everywhere
/// this pattern appears (spec.md §4.5 preamble, §9).
pub const ARC_TOLERANCE_SLACK_NM: Length = MAX_ARC_TOLERANCE_NM + 1;

/// A distance strictly greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Length", into = "Length")]
pub struct PositiveLength(Length);

impl PositiveLength {
    /// Builds a `PositiveLength`, returning `None` if `value <= 0`.
    #[must_use]
    pub fn new(value: Length) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    #[must_use]
    pub const fn get(self) -> Length {
        self.0
    }
}

impl TryFrom<Length> for PositiveLength {
    type Error = &'static str;

    fn try_from(value: Length) -> Result<Self, Self::Error> {
        Self::new(value).ok_or("length must be > 0")
    }
}

impl From<PositiveLength> for Length {
    fn from(value: PositiveLength) -> Self {
        value.0
    }
}

/// A distance that may be zero but never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Length", into = "Length")]
pub struct UnsignedLength(Length);

impl UnsignedLength {
    /// Builds an `UnsignedLength`, returning `None` if `value < 0`.
    #[must_use]
    pub fn new(value: Length) -> Option<Self> {
        (value >= 0).then_some(Self(value))
    }

    #[must_use]
    pub const fn get(self) -> Length {
        self.0
    }

    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }

    /// `true` iff the underlying value is `0` — used pervasively by the
    /// zero-tolerance short-circuit idiom (spec.md §4.5 preamble).
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<Length> for UnsignedLength {
    type Error = &'static str;

    fn try_from(value: Length) -> Result<Self, Self::Error> {
        Self::new(value).ok_or("length must be >= 0")
    }
}

impl From<UnsignedLength> for Length {
    fn from(value: UnsignedLength) -> Self {
        value.0
    }
}

impl PartialEq<Length> for UnsignedLength {
    fn eq(&self, other: &Length) -> bool {
        self.0 == *other
    }
}

impl PartialOrd<Length> for UnsignedLength {
    fn partial_cmp(&self, other: &Length) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(other)
    }
}

/// A signed ratio in parts-per-million (1_000_000 ppm == 1.0).
pub type Ratio = i64;

/// A ratio that is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnsignedRatio(Ratio);

impl UnsignedRatio {
    #[must_use]
    pub fn new(value: Ratio) -> Option<Self> {
        (value >= 0).then_some(Self(value))
    }

    #[must_use]
    pub const fn get(self) -> Ratio {
        self.0
    }
}

/// A ratio clamped to the closed interval `[0.0, 1.0]` (i.e. `0..=1_000_000`
/// ppm). Used for pad corner radii.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnsignedLimitedRatio(Ratio);

impl UnsignedLimitedRatio {
    #[must_use]
    pub fn new(value: Ratio) -> Option<Self> {
        (0..=1_000_000).contains(&value).then_some(Self(value))
    }

    #[must_use]
    pub const fn get(self) -> Ratio {
        self.0
    }

    #[must_use]
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }
}

/// A signed angle in microdegrees (1_000_000 == 1 degree, 360_000_000 == a
/// full turn).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Angle(i64);

impl Angle {
    #[must_use]
    pub const fn from_microdegrees(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn microdegrees(self) -> i64 {
        self.0
    }

    #[must_use]
    pub fn radians(self) -> f64 {
        (self.0 as f64 / 1_000_000.0).to_radians()
    }
}

impl Add for Angle {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Angle {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Angle {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

/// A point in the board coordinate system, in nanometers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: Length,
    pub y: Length,
}

impl Point {
    #[must_use]
    pub const fn new(x: Length, y: Length) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn origin() -> Self {
        Self { x: 0, y: 0 }
    }

    #[must_use]
    pub fn translated(self, dx: Length, dy: Length) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    #[must_use]
    pub fn mirrored(self, about_x: bool) -> Self {
        if about_x {
            Self { x: -self.x, y: self.y }
        } else {
            Self { x: self.x, y: -self.y }
        }
    }

    /// Rotates about the origin by `angle`.
    #[must_use]
    pub fn rotated(self, angle: Angle) -> Self {
        let rad = angle.radians();
        let (sin, cos) = rad.sin_cos();
        let x = self.x as f64;
        let y = self.y as f64;
        Self {
            x: (x * cos - y * sin).round() as Length,
            y: (x * sin + y * cos).round() as Length,
        }
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        dx.hypot(dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_length_rejects_non_positive() {
        assert!(PositiveLength::new(0).is_none());
        assert!(PositiveLength::new(-1).is_none());
        assert!(PositiveLength::new(1).is_some());
    }

    #[test]
    fn unsigned_length_allows_zero() {
        assert!(UnsignedLength::new(0).is_some());
        assert!(UnsignedLength::new(-1).is_none());
        assert!(UnsignedLength::new(0).unwrap().is_zero());
    }

    #[test]
    fn limited_ratio_clamps_range() {
        assert!(UnsignedLimitedRatio::new(-1).is_none());
        assert!(UnsignedLimitedRatio::new(1_000_001).is_none());
        assert!((UnsignedLimitedRatio::new(500_000).unwrap().as_f64() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn point_rotation_quarter_turn() {
        let p = Point::new(1_000_000, 0);
        let rotated = p.rotated(Angle::from_microdegrees(90_000_000));
        assert!((rotated.x).abs() < 2);
        assert!((rotated.y - 1_000_000).abs() < 2);
    }
}
