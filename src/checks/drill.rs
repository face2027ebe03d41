//! Shared drill enumeration for the drill↔drill (§4.5.4) and drill↔board-edge
//! (§4.5.5) checks: every hole-bearing object on the board, placed in
//! absolute coordinates.

use uuid::Uuid;

use crate::data::Data;
use crate::geometry::{Path, Vertex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillKind {
    Via,
    BoardHole,
    DeviceHole,
    PadHole,
}

pub struct DrillItem {
    pub uuid: Uuid,
    pub kind: DrillKind,
    pub diameter: crate::geometry::Length,
    /// Absolute-coordinate path: a single vertex for a round drill, two or
    /// more for a slot (spec.md §4.5.9's `Hole::is_slot`).
    pub path: Path,
}

/// Every via, board hole, device hole, and pad hole on the board, each
/// already placed in absolute board coordinates.
#[must_use]
pub fn collect_drill_items(data: &Data) -> Vec<DrillItem> {
    let mut items = Vec::new();

    for segment in data.segments.iter() {
        for via in &segment.vias {
            items.push(DrillItem {
                uuid: via.uuid,
                kind: DrillKind::Via,
                diameter: via.drill_diameter.get(),
                path: Path::new(vec![Vertex::straight(via.position)]),
            });
        }
    }

    for hole in data.board_holes.iter() {
        items.push(DrillItem {
            uuid: hole.uuid,
            kind: DrillKind::BoardHole,
            diameter: hole.diameter.get(),
            path: hole.path.path().clone(),
        });
    }

    for device in data.devices.iter() {
        for hole in &device.holes {
            items.push(DrillItem {
                uuid: hole.uuid,
                kind: DrillKind::DeviceHole,
                diameter: hole.diameter.get(),
                path: device.transform.map_path(hole.path.path()),
            });
        }
        for pad in &device.pads {
            for hole in &pad.holes {
                items.push(DrillItem {
                    uuid: hole.uuid,
                    kind: DrillKind::PadHole,
                    diameter: hole.diameter.get(),
                    path: pad.transform.map_path(hole.path.path()),
                });
            }
        }
    }

    items
}
