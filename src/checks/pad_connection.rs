//! Invalid pad connections (spec.md §4.5.14). Independent job.
//!
//! A pad is only actually connected to a trace layer if the trace endpoint
//! at the pad's own anchor (its local origin) falls inside some geometry the
//! pad carries on that layer. A pad whose `layers_with_traces` includes a
//! layer it has no covering geometry under is flagged.

use crate::data::Data;
use crate::error::DrcResult;
use crate::kernel;
use crate::message::{IdentityField, IdentityValue, Message, Severity};
use crate::pathgen::PathGenerator;

pub fn check(data: &Data) -> DrcResult<Vec<Message>> {
    let mut messages = Vec::new();

    for device in data.devices.iter() {
        for pad in &device.pads {
            let anchor = pad.transform.map_point(crate::geometry::Point::origin());
            for layer in &pad.layers_with_traces {
                let mut gen = PathGenerator::new();
                gen.add_pad(pad, *layer, 0);
                let area = gen.into_paths();
                if !kernel::contains_point(&area, anchor.x, anchor.y) {
                    messages.push(Message::new(
                        "invalid_pad_connection",
                        vec![
                            IdentityField { name: "pad", value: IdentityValue::Uuid(pad.uuid) },
                            IdentityField { name: "layer", value: IdentityValue::Layer(*layer) },
                        ],
                        Severity::Error,
                        "invalid pad connection",
                        "This pad carries a trace on a layer where it has no connecting copper.",
                        vec![crate::geometry::Path::circle(
                            crate::geometry::PositiveLength::new(100_000).unwrap(),
                        )
                        .translated(anchor.x, anchor.y)],
                    ));
                }
            }
        }
    }

    Ok(messages)
}
