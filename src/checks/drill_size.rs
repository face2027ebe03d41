//! Minimum drill diameter / slot width (spec.md §4.5.9). Sequential.
//!
//! Holes with a single vertex are round drills; two or more, slots. Board
//! and device holes are non-plated (`minNpth…`); pad holes and via drills are
//! plated (`minPth…`).

use crate::data::{Data, Hole};
use crate::error::DrcResult;
use crate::message::{IdentityField, IdentityValue, Message, Severity};

fn check_hole(messages: &mut Vec<Message>, hole: &Hole, min_drill: crate::geometry::Length, min_slot: crate::geometry::Length) {
    if hole.is_slot() {
        if min_slot > 0 && hole.diameter.get() < min_slot {
            messages.push(size_message("min_slot_width", hole.uuid, min_slot, hole.diameter.get()));
        }
    } else if min_drill > 0 && hole.diameter.get() < min_drill {
        messages.push(size_message("min_drill_diameter", hole.uuid, min_drill, hole.diameter.get()));
    }
}

fn size_message(kind: &str, uuid: uuid::Uuid, min_nm: crate::geometry::Length, got_nm: crate::geometry::Length) -> Message {
    Message::new(
        kind,
        vec![IdentityField { name: "hole", value: IdentityValue::Uuid(uuid) }],
        Severity::Error,
        "drill below minimum size",
        format!("Diameter {got_nm} nm is below the required minimum of {min_nm} nm."),
        Vec::new(),
    )
}

pub fn check(data: &Data) -> DrcResult<Vec<Message>> {
    let npth_drill = data.settings.min_npth_drill_diameter.get();
    let npth_slot = data.settings.min_npth_slot_width.get();
    let pth_drill = data.settings.min_pth_drill_diameter.get();
    let pth_slot = data.settings.min_pth_slot_width.get();

    let mut messages = Vec::new();
    for hole in data.board_holes.iter() {
        check_hole(&mut messages, hole, npth_drill, npth_slot);
    }
    for device in data.devices.iter() {
        for hole in &device.holes {
            check_hole(&mut messages, hole, npth_drill, npth_slot);
        }
        for pad in &device.pads {
            for hole in &pad.holes {
                check_hole(&mut messages, hole, pth_drill, pth_slot);
            }
        }
    }

    for segment in data.segments.iter() {
        let min = data.min_via_drill_diameter(segment.net_class.as_ref());
        if min.is_zero() {
            continue;
        }
        for via in &segment.vias {
            if via.drill_diameter.get() < min.get() {
                messages.push(size_message("min_drill_diameter", via.uuid, min.get(), via.drill_diameter.get()));
            }
        }
    }

    Ok(messages)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use super::*;
    use crate::geometry::{NonEmptyPath, Path, Point, PositiveLength, UnsignedLength, Vertex};
    use crate::testutil::minimal_data;

    #[test]
    fn undersized_board_drill_flagged() {
        let mut data = minimal_data();
        Arc::get_mut(&mut data.settings).unwrap().min_npth_drill_diameter = UnsignedLength::new(400_000).unwrap();
        Arc::get_mut(&mut data.board_holes).unwrap().push(Hole {
            uuid: Uuid::new_v4(),
            diameter: PositiveLength::new(300_000).unwrap(),
            path: NonEmptyPath::new(Path::new(vec![Vertex::straight(Point::origin())])).unwrap(),
            stop_mask_offset: None,
        });

        let messages = check(&data).unwrap();
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn slot_uses_slot_minimum() {
        let mut data = minimal_data();
        Arc::get_mut(&mut data.settings).unwrap().min_npth_drill_diameter = UnsignedLength::new(400_000).unwrap();
        Arc::get_mut(&mut data.settings).unwrap().min_npth_slot_width = UnsignedLength::new(200_000).unwrap();
        Arc::get_mut(&mut data.board_holes).unwrap().push(Hole {
            uuid: Uuid::new_v4(),
            diameter: PositiveLength::new(300_000).unwrap(),
            path: NonEmptyPath::new(Path::new(vec![
                Vertex::straight(Point::origin()),
                Vertex::straight(Point::new(1_000_000, 0)),
            ]))
            .unwrap(),
            stop_mask_offset: None,
        });

        assert!(check(&data).unwrap().is_empty());
    }
}
