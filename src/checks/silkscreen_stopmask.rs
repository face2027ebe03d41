//! Silkscreen ↔ stop-mask clearance (spec.md §4.5.6). Independent job.
//!
//! Only stroke texts are checked against the grown stop-mask opening area —
//! checking every silkscreen polygon too would flood the report (spec.md §9).

use crate::checks::common::{clearance_growth, locations};
use crate::data::Data;
use crate::error::DrcResult;
use crate::kernel;
use crate::layer::Layer;
use crate::message::{IdentityField, IdentityValue, Message, Severity};
use crate::pathgen::PathGenerator;

pub fn check(data: &Data) -> DrcResult<Vec<Message>> {
    let clearance = data.settings.min_silkscreen_stopmask_clearance;
    if clearance.is_zero() {
        return Ok(Vec::new());
    }
    let growth = clearance_growth(clearance);

    let mut messages = Vec::new();
    for top in [true, false] {
        let enabled = if top { data.top_silkscreen_enabled } else { data.bottom_silkscreen_enabled };
        if !enabled {
            continue;
        }
        let legend_layer = if top { Layer::TopLegend } else { Layer::BotLegend };
        let stop_mask_layer = Layer::stop_mask_for(top);

        let mut restricted_gen = PathGenerator::new();
        restricted_gen.add_stop_mask_openings(data, stop_mask_layer, growth);
        let restricted = restricted_gen.into_paths();
        if restricted.is_empty() {
            continue;
        }

        for st in data.board_stroke_texts.iter().filter(|s| s.layer == legend_layer) {
            let mut gen = PathGenerator::new();
            gen.add_stroke_text(st, 0);
            let overlap = kernel::intersect(&gen.into_paths(), &restricted);
            if overlap.is_empty() {
                continue;
            }
            messages.push(message(st.uuid, clearance.get(), &overlap));
        }
        for device in data.devices.iter() {
            for st in device.stroke_texts.iter().filter(|s| s.layer == legend_layer) {
                let mut gen = PathGenerator::new();
                gen.add_stroke_text(st, 0);
                let overlap = kernel::intersect(&gen.into_paths(), &restricted);
                if overlap.is_empty() {
                    continue;
                }
                messages.push(message(st.uuid, clearance.get(), &overlap));
            }
        }
    }
    Ok(messages)
}

fn message(stroke_text: uuid::Uuid, clearance_nm: crate::geometry::Length, overlap: &kernel::IntPaths) -> Message {
    Message::new(
        "silkscreen_stopmask_clearance",
        vec![IdentityField { name: "stroke_text", value: IdentityValue::Uuid(stroke_text) }],
        Severity::Error,
        "silkscreen too close to stop-mask opening",
        format!("Silkscreen must keep at least {clearance_nm} nm from stop-mask openings."),
        locations(overlap),
    )
}
