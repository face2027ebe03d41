//! Board outline sanity (spec.md §4.5.16). Independent job: open outlines,
//! missing/multiple outlines, and inner corners tighter than the outline
//! tool can cut.

use crate::data::Data;
use crate::error::DrcResult;
use crate::kernel::{self, IntPaths};
use crate::layer::Layer;
use crate::message::{IdentityField, IdentityValue, Message, Severity};
use crate::pathgen::PathGenerator;

const MIN_RADIUS_SLACK_NM: i64 = 10_000;

pub fn check(data: &Data) -> DrcResult<Vec<Message>> {
    let mut messages = Vec::new();

    let outlines: Vec<_> = data.board_polygons.iter().filter(|p| p.layer == Layer::BoardOutlines).collect();

    let mut closed_count = 0;
    for poly in &outlines {
        if poly.path.is_closed() {
            closed_count += 1;
        } else {
            messages.push(Message::new(
                "open_board_outline",
                vec![IdentityField { name: "polygon", value: IdentityValue::Uuid(poly.uuid) }],
                Severity::Error,
                "open polygon on board outline layer",
                "Board outline polygons must be closed.",
                vec![poly.path.clone()],
            ));
        }
    }

    if closed_count == 0 {
        messages.push(Message::new(
            "missing_board_outline",
            Vec::new(),
            Severity::Error,
            "missing board outline",
            "The board has no closed outline polygon.",
            Vec::new(),
        ));
    } else if closed_count > 1 {
        messages.push(Message::new(
            "multiple_board_outlines",
            Vec::new(),
            Severity::Error,
            "multiple board outlines",
            "The board has more than one closed outline polygon.",
            Vec::new(),
        ));
    }

    if closed_count > 0 {
        check_inner_radius(data, &outlines, &mut messages);
    }

    Ok(messages)
}

fn check_inner_radius(data: &Data, outlines: &[&crate::data::Polygon], messages: &mut Vec<Message>) {
    let min_radius = data.settings.min_edge_radius();
    if min_radius.is_zero() {
        return;
    }

    let mut gen = PathGenerator::new();
    for poly in outlines.iter().filter(|p| p.path.is_closed()) {
        gen.add_polygon(&poly.path, 0, true, 0);
    }
    let original = gen.into_paths();
    if original.is_empty() {
        return;
    }

    let tolerance = crate::geometry::PositiveLength::new(crate::geometry::MAX_ARC_TOLERANCE_NM).unwrap();
    let grow = (min_radius.get() - MIN_RADIUS_SLACK_NM).max(0);
    let grown = kernel::offset(&original, grow, tolerance);
    let reduced = kernel::offset(&grown, -min_radius.get(), tolerance);
    let residue: IntPaths = kernel::subtract(&original, &reduced);
    if residue.is_empty() {
        return;
    }

    messages.push(Message::new(
        "board_outline_inner_radius_too_small",
        Vec::new(),
        Severity::Error,
        "board outline inner radius too small",
        format!("Some inner corners are tighter than the {} nm the outline tool can cut.", min_radius.get()),
        kernel::convert_back_paths(&residue),
    ));
}
