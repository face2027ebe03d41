//! Disallowed slot shapes (spec.md §4.5.13). Sequential.
//!
//! A hole "requires a warning" against a policy if it is curved and the
//! policy is below `Any`, has more than two vertices and the policy is below
//! `MultiSegmentStraight`, or has more than one vertex and the policy is
//! below `SingleSegmentStraight`.

use crate::data::{AllowedSlots, Data, Hole};
use crate::error::DrcResult;
use crate::message::{IdentityField, IdentityValue, Message, Severity};

fn exceeds_policy(hole: &Hole, policy: AllowedSlots) -> bool {
    let path = hole.path.path();
    let vertex_count = path.vertex_count();
    (path.is_curved() && policy < AllowedSlots::Any)
        || (vertex_count > 2 && policy < AllowedSlots::MultiSegmentStraight)
        || (vertex_count > 1 && policy < AllowedSlots::SingleSegmentStraight)
}

fn slot_message(hole: uuid::Uuid) -> Message {
    Message::new(
        "disallowed_slot",
        vec![IdentityField { name: "hole", value: IdentityValue::Uuid(hole) }],
        Severity::Error,
        "slot shape not allowed",
        "This hole's shape is not permitted by the board's slot policy.",
        Vec::new(),
    )
}

pub fn check(data: &Data) -> DrcResult<Vec<Message>> {
    let mut messages = Vec::new();

    for hole in data.board_holes.iter().filter(|h| h.is_slot()) {
        if exceeds_policy(hole, data.settings.allowed_npth_slots) {
            messages.push(slot_message(hole.uuid));
        }
    }
    for device in data.devices.iter() {
        for hole in device.holes.iter().filter(|h| h.is_slot()) {
            if exceeds_policy(hole, data.settings.allowed_npth_slots) {
                messages.push(slot_message(hole.uuid));
            }
        }
        for pad in &device.pads {
            for hole in pad.holes.iter().filter(|h| h.is_slot()) {
                if exceeds_policy(hole, data.settings.allowed_pth_slots) {
                    messages.push(slot_message(hole.uuid));
                }
            }
        }
    }

    Ok(messages)
}
