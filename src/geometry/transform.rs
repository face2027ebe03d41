//! Position/rotation/mirror transform applied when mapping a device's
//! library-local geometry into board (absolute) coordinates.

use serde::{Deserialize, Serialize};

use super::path::Path;
use super::units::{Angle, Point};

/// Composes translation, rotation (about the origin, applied before
/// translation) and an optional mirror (about the device's local Y axis,
/// applied before rotation) — the same order the original path generator
/// uses when placing device geometry (spec.md §4.2 step 4).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Transform {
    pub position: Point,
    pub rotation: Angle,
    pub mirror: bool,
}

impl Transform {
    #[must_use]
    pub const fn new(position: Point, rotation: Angle, mirror: bool) -> Self {
        Self {
            position,
            rotation,
            mirror,
        }
    }

    #[must_use]
    pub const fn identity() -> Self {
        Self {
            position: Point::origin(),
            rotation: Angle::zero(),
            mirror: false,
        }
    }

    #[must_use]
    pub fn map_point(&self, p: Point) -> Point {
        let p = if self.mirror { p.mirrored(false) } else { p };
        let p = p.rotated(self.rotation);
        p.translated(self.position.x, self.position.y)
    }

    #[must_use]
    pub fn map_path(&self, path: &Path) -> Path {
        let path = if self.mirror { path.mirrored() } else { path.clone() };
        let path = path.rotated(self.rotation);
        path.translated(self.position.x, self.position.y)
    }

    #[must_use]
    pub fn map_paths(&self, paths: &[Path]) -> Vec<Path> {
        paths.iter().map(|p| self.map_path(p)).collect()
    }
}
