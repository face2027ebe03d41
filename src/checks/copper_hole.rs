//! Copper↔hole clearance (spec.md §4.5.3). Stage-2: consumes
//! [`CalculatedData::copper_everywhere`], so it must run after every Stage-1
//! job has populated its layer.
//!
//! Only non-plated holes (board and device mechanical holes) are checked
//! here; plated holes (pad holes, via drills) are copper themselves and are
//! covered by the annular-ring check (spec.md §4.5.8) instead.

use crate::calculated::CalculatedData;
use crate::checks::common::{clearance_growth, locations};
use crate::data::Data;
use crate::error::DrcResult;
use crate::geometry::Transform;
use crate::kernel;
use crate::message::{IdentityField, IdentityValue, Message, Severity};
use crate::pathgen::PathGenerator;

pub fn check(data: &Data, calc: &CalculatedData) -> DrcResult<Vec<Message>> {
    let clearance = data.settings.min_copper_npth_clearance;
    if clearance.is_zero() {
        return Ok(Vec::new());
    }
    let copper = calc.copper_everywhere();
    if copper.is_empty() {
        return Ok(Vec::new());
    }
    let growth = clearance_growth(clearance);

    let mut messages = Vec::new();
    for hole in data.board_holes.iter() {
        let mut gen = PathGenerator::new();
        gen.add_hole(hole.diameter.get(), hole.path.path(), &Transform::identity(), growth);
        push_if_overlapping(&mut messages, &copper, &gen.into_paths(), hole.uuid, clearance.get());
    }
    for device in data.devices.iter() {
        for hole in &device.holes {
            let mut gen = PathGenerator::new();
            gen.add_hole(hole.diameter.get(), hole.path.path(), &device.transform, growth);
            push_if_overlapping(&mut messages, &copper, &gen.into_paths(), hole.uuid, clearance.get());
        }
    }
    Ok(messages)
}

fn push_if_overlapping(
    messages: &mut Vec<Message>,
    copper: &kernel::IntPaths,
    restricted: &kernel::IntPaths,
    hole_uuid: uuid::Uuid,
    clearance_nm: crate::geometry::Length,
) {
    let overlap = kernel::intersect(copper, restricted);
    if overlap.is_empty() {
        return;
    }
    messages.push(Message::new(
        "copper_hole_clearance",
        vec![IdentityField { name: "hole", value: IdentityValue::Uuid(hole_uuid) }],
        Severity::Error,
        "copper too close to a non-plated hole",
        format!("Copper must keep at least {clearance_nm} nm from this hole."),
        locations(&overlap),
    ));
}
