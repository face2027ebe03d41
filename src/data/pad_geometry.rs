//! Pad shapes (spec.md §3.4).

use serde::{Deserialize, Serialize};

use crate::geometry::{Length, Path, PositiveLength, UnsignedLimitedRatio};
use crate::kernel;

/// A pad's 2-D shape on one layer, plus the clearance-growing `offset` used
/// by [`PadGeometry::with_offset`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum PadGeometry {
    RoundedRect {
        width: Length,
        height: Length,
        corner_ratio: UnsignedLimitedRatio,
        offset: Length,
    },
    RoundedOctagon {
        width: Length,
        height: Length,
        corner_ratio: UnsignedLimitedRatio,
        offset: Length,
    },
    Stroke {
        diameter: PositiveLength,
        centerline: Path,
        offset: Length,
    },
    Custom {
        outline: Path,
        offset: Length,
    },
}

impl PadGeometry {
    /// A circular pad: a `RoundedRect` with equal sides and a full corner
    /// radius, the common shape for round THT pads.
    #[must_use]
    pub fn round(diameter: Length) -> Self {
        Self::RoundedRect {
            width: diameter,
            height: diameter,
            corner_ratio: UnsignedLimitedRatio::new(1_000_000).expect("1.0 is in range"),
            offset: 0,
        }
    }

    /// This geometry with any drill holes it implies excluded from the
    /// outline — used by checks that need a pad's bare copper outline
    /// without also subtracting its own drill area (e.g. the annular-ring
    /// check, which measures the ring left around the hole). `PadGeometry`
    /// never encodes holes itself, so this is the identity; it exists so
    /// call sites read the same way the original does.
    #[must_use]
    pub fn without_holes(&self) -> Self {
        self.clone()
    }

    /// Returns a copy with `offset` increased by `delta` — used by clearance
    /// checks to grow a pad's geometry by the controlling clearance before
    /// intersecting it with neighbouring copper (spec.md §4.5.1).
    #[must_use]
    pub fn with_offset(&self, delta: Length) -> Self {
        match self.clone() {
            Self::RoundedRect { width, height, corner_ratio, offset } => {
                Self::RoundedRect { width, height, corner_ratio, offset: offset + delta }
            }
            Self::RoundedOctagon { width, height, corner_ratio, offset } => {
                Self::RoundedOctagon { width, height, corner_ratio, offset: offset + delta }
            }
            Self::Stroke { diameter, centerline, offset } => {
                Self::Stroke { diameter, centerline, offset: offset + delta }
            }
            Self::Custom { outline, offset } => Self::Custom { outline, offset: offset + delta },
        }
    }

    /// Filled polygon(s) after applying `offset`, in the pad's own local
    /// coordinate system (origin at the pad anchor).
    #[must_use]
    pub fn to_outlines(&self) -> Vec<Path> {
        match self {
            Self::RoundedRect { width, height, corner_ratio, offset } => {
                let radius = corner_radius(*width, *height, *corner_ratio);
                vec![offset_closed(&Path::centered_rect(*width, *height, radius), *offset)]
            }
            Self::RoundedOctagon { width, height, corner_ratio, offset } => {
                let radius = corner_radius(*width, *height, *corner_ratio);
                vec![offset_closed(&Path::octagon(*width, *height, radius), *offset)]
            }
            Self::Stroke { diameter, centerline, offset } => {
                let stroked = centerline.to_outline_strokes(*diameter);
                let united: Vec<Path> = stroked
                    .into_iter()
                    .map(|path| offset_closed(&path, *offset))
                    .collect();
                united
            }
            Self::Custom { outline, offset } => {
                // Always offset, even at zero, to normalize self-intersections.
                vec![offset_closed(outline, *offset)]
            }
        }
    }
}

fn corner_radius(width: Length, height: Length, ratio: UnsignedLimitedRatio) -> Length {
    let min_side = width.min(height) as f64;
    ((min_side / 2.0) * ratio.as_f64()).round() as Length
}

fn offset_closed(path: &Path, offset: Length) -> Path {
    if offset == 0 {
        return path.clone();
    }
    let tol = PositiveLength::new(crate::geometry::MAX_ARC_TOLERANCE_NM).expect("fixed positive constant");
    let int_path = kernel::convert(path, tol);
    let offset_paths = kernel::offset(&[int_path], offset, tol);
    offset_paths
        .into_iter()
        .next()
        .map(|ring| kernel::convert_back(&ring))
        .unwrap_or_else(|| path.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounded_rect_outline_nonempty() {
        let geom = PadGeometry::RoundedRect {
            width: 1_000_000,
            height: 600_000,
            corner_ratio: UnsignedLimitedRatio::new(250_000).unwrap(),
            offset: 0,
        };
        let outlines = geom.to_outlines();
        assert_eq!(outlines.len(), 1);
        assert!(outlines[0].vertex_count() >= 4);
    }

    #[test]
    fn round_is_a_square_rounded_rect() {
        let geom = PadGeometry::round(800_000);
        let outlines = geom.to_outlines();
        assert_eq!(outlines.len(), 1);
        assert!(outlines[0].is_curved());
    }

    #[test]
    fn with_offset_accumulates() {
        let geom = PadGeometry::Custom { outline: Path::centered_rect(1_000_000, 1_000_000, 0), offset: 0 };
        let grown = geom.with_offset(50_000);
        if let PadGeometry::Custom { offset, .. } = grown {
            assert_eq!(offset, 50_000);
        } else {
            panic!("expected Custom");
        }
    }
}
