//! Shared `Data` fixture for rule-check unit tests.

use std::sync::Arc;

use crate::data::{AllowedSlots, Data, Settings};
use crate::geometry::{PositiveLength, UnsignedLength};
use crate::layer::Layer;

#[must_use]
pub fn minimal_settings() -> Settings {
    Settings {
        min_copper_copper_clearance: UnsignedLength::zero(),
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

#[must_use]
pub fn minimal_data() -> Data {
    Data {
        settings: Arc::new(minimal_settings()),
        stack_depth: 2,
        top_silkscreen_enabled: true,
        bottom_silkscreen_enabled: true,
        enabled_copper_layers: Arc::new(vec![Layer::top_copper(2), Layer::bot_copper(2)]),
        net_classes: Arc::new(Vec::new()),
        segments: Arc::new(Vec::new()),
        planes: Arc::new(Vec::new()),
        board_polygons: Arc::new(Vec::new()),
        board_circles: Arc::new(Vec::new()),
        board_stroke_texts: Arc::new(Vec::new()),
        board_holes: Arc::new(Vec::new()),
        board_zones: Arc::new(Vec::new()),
        devices: Arc::new(Vec::new()),
        air_wires: Arc::new(Vec::new()),
        unplaced_components: Arc::new(Vec::new()),
        quick: false,
    }
}
