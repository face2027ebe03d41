//! Useless and forbidden vias (spec.md §4.5.12). Sequential: a single pass
//! over every via with no geometry involved.

use crate::data::Data;
use crate::error::DrcResult;
use crate::message::{IdentityField, IdentityValue, Message, Severity};

pub fn check(data: &Data) -> DrcResult<Vec<Message>> {
    let mut messages = Vec::new();

    for segment in data.segments.iter() {
        for via in &segment.vias {
            if via.drill_layer_span.is_none() {
                messages.push(Message::new(
                    "useless_via",
                    vec![IdentityField { name: "via", value: IdentityValue::Uuid(via.uuid) }],
                    Severity::Warning,
                    "useless via",
                    "This via is not drilled through any layer and has no effect.",
                    Vec::new(),
                ));
                continue;
            }

            if via.is_blind(data.stack_depth) && !data.settings.blind_vias_allowed {
                messages.push(forbidden_via_message(via.uuid, "blind vias are not allowed on this board"));
            }
            if via.is_buried(data.stack_depth) && !data.settings.buried_vias_allowed {
                messages.push(forbidden_via_message(via.uuid, "buried vias are not allowed on this board"));
            }
        }
    }

    Ok(messages)
}

fn forbidden_via_message(via: uuid::Uuid, reason: &str) -> Message {
    Message::new(
        "forbidden_via",
        vec![IdentityField { name: "via", value: IdentityValue::Uuid(via) }],
        Severity::Error,
        "forbidden via",
        reason,
        Vec::new(),
    )
}
