//! Board-wide and net-class-level rule settings (spec.md §3.3).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{PositiveLength, UnsignedLength};

/// Policy for how many segments a slot-shaped hole may have before it must
/// be flagged (spec.md §4.5.13).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowedSlots {
    None,
    SingleSegmentStraight,
    MultiSegmentStraight,
    Any,
}

/// Board-wide minimum clearances and manufacturing limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub min_copper_copper_clearance: UnsignedLength,
    pub min_copper_board_clearance: UnsignedLength,
    pub min_copper_npth_clearance: UnsignedLength,
    pub min_drill_drill_clearance: UnsignedLength,
    pub min_drill_board_clearance: UnsignedLength,
    pub min_silkscreen_stopmask_clearance: UnsignedLength,

    pub min_copper_width: UnsignedLength,
    pub min_pth_annular_ring: UnsignedLength,

    pub min_npth_drill_diameter: UnsignedLength,
    pub min_pth_drill_diameter: UnsignedLength,
    pub min_npth_slot_width: UnsignedLength,
    pub min_pth_slot_width: UnsignedLength,

    pub min_silkscreen_width: UnsignedLength,
    pub min_silkscreen_text_height: UnsignedLength,

    /// Smallest outline-routing tool diameter the fab can use; the
    /// resulting minimum inner-corner radius is half of this.
    pub min_outline_tool_diameter: PositiveLength,

    pub allowed_npth_slots: AllowedSlots,
    pub allowed_pth_slots: AllowedSlots,

    pub blind_vias_allowed: bool,
    pub buried_vias_allowed: bool,
}

impl Settings {
    /// Minimum edge radius a board outline tool can cut, derived from
    /// `min_outline_tool_diameter` (spec.md §4.5.16).
    #[must_use]
    pub fn min_edge_radius(&self) -> UnsignedLength {
        UnsignedLength::new(self.min_outline_tool_diameter.get() / 2).unwrap_or(UnsignedLength::zero())
    }
}

/// Per-net overrides of the board-wide minimums (spec.md §3.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetClass {
    pub uuid: Uuid,
    pub name: String,
    pub min_copper_copper_clearance: Option<UnsignedLength>,
    pub min_copper_width: Option<UnsignedLength>,
    pub min_via_drill_diameter: Option<UnsignedLength>,
    pub min_pth_annular_ring: Option<UnsignedLength>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_settings() -> Settings {
        Settings {
            min_copper_copper_clearance: UnsignedLength::new(200_000).unwrap(),
            min_copper_board_clearance: UnsignedLength::zero(),
            min_copper_npth_clearance: UnsignedLength::zero(),
            min_drill_drill_clearance: UnsignedLength::zero(),
            min_drill_board_clearance: UnsignedLength::zero(),
            min_silkscreen_stopmask_clearance: UnsignedLength::zero(),
            min_copper_width: UnsignedLength::zero(),
            min_pth_annular_ring: UnsignedLength::zero(),
            min_npth_drill_diameter: UnsignedLength::zero(),
            min_pth_drill_diameter: UnsignedLength::zero(),
            min_npth_slot_width: UnsignedLength::zero(),
            min_pth_slot_width: UnsignedLength::zero(),
            min_silkscreen_width: UnsignedLength::zero(),
            min_silkscreen_text_height: UnsignedLength::zero(),
            min_outline_tool_diameter: PositiveLength::new(2_000_000).unwrap(),
            allowed_npth_slots: AllowedSlots::Any,
            allowed_pth_slots: AllowedSlots::Any,
            blind_vias_allowed: true,
            buried_vias_allowed: true,
        }
    }

    #[test]
    fn min_edge_radius_is_half_tool_diameter() {
        let settings = base_settings();
        assert_eq!(settings.min_edge_radius(), UnsignedLength::new(1_000_000).unwrap());
    }
}
