//! Copper↔board-edge (spec.md §4.5.2) and drill↔board-edge (spec.md §4.5.5)
//! clearance. Both Independent jobs sharing the restricted-area construction.

use crate::checks::common::{board_edge_restricted_area, locations, object_uuid};
use crate::checks::drill::{collect_drill_items, DrillKind};
use crate::data::Data;
use crate::error::DrcResult;
use crate::geometry::Transform;
use crate::kernel::{self, IntPaths};
use crate::message::{IdentityField, IdentityValue, Message, Object, ObjectKind, Severity};
use crate::pathgen::PathGenerator;

/// Every copper-bearing board object's exact area, unconditional on any
/// Cu↔Cu clearance setting (the original's `checkCopperBoardClearances`,
/// `boarddesignrulecheck.cpp:654-735`, enumerates independently of
/// `checkCopperCopperClearances` for the same reason): segment vias/traces,
/// planes (unless quick), board/device polygons/circles/stroke-texts, and
/// device pads.
fn collect_copper_areas(data: &Data) -> Vec<(Object, IntPaths)> {
    let mut items = Vec::new();

    for segment in data.segments.iter() {
        let net = segment.net.as_ref().map(|n| n.uuid);
        for via in &segment.vias {
            let mut gen = PathGenerator::new();
            gen.add_via(via, 0);
            items.push((Object { kind: ObjectKind::Via { via: via.uuid }, layer: None, net }, gen.into_paths()));
        }
        for trace in &segment.traces {
            if trace.layer.copper_number().is_none() {
                continue;
            }
            let mut gen = PathGenerator::new();
            gen.add_trace(trace, 0);
            items.push((
                Object { kind: ObjectKind::Trace { trace: trace.uuid }, layer: Some(trace.layer), net },
                gen.into_paths(),
            ));
        }
    }

    if !data.quick {
        for plane in data.planes.iter() {
            if plane.layer.copper_number().is_none() {
                continue;
            }
            let net = plane.net.as_ref().map(|n| n.uuid);
            let mut gen = PathGenerator::new();
            gen.add_plane(&plane.fragments);
            items.push((
                Object { kind: ObjectKind::Plane { plane: plane.uuid }, layer: Some(plane.layer), net },
                gen.into_paths(),
            ));
        }
    }

    for poly in data.board_polygons.iter() {
        if poly.layer.copper_number().is_none() {
            continue;
        }
        let mut gen = PathGenerator::new();
        gen.add_polygon(&poly.path, poly.line_width.get(), poly.filled, 0);
        items.push((
            Object { kind: ObjectKind::Polygon { polygon: poly.uuid }, layer: Some(poly.layer), net: None },
            gen.into_paths(),
        ));
    }
    for st in data.board_stroke_texts.iter() {
        if st.layer.copper_number().is_none() {
            continue;
        }
        let mut gen = PathGenerator::new();
        gen.add_stroke_text(st, 0);
        items.push((
            Object { kind: ObjectKind::StrokeText { stroke_text: st.uuid }, layer: Some(st.layer), net: None },
            gen.into_paths(),
        ));
    }

    for device in data.devices.iter() {
        for poly in &device.polygons {
            if poly.layer.copper_number().is_none() {
                continue;
            }
            let placed = device.transform.map_path(&poly.path);
            let mut gen = PathGenerator::new();
            gen.add_polygon(&placed, poly.line_width.get(), poly.filled, 0);
            items.push((
                Object { kind: ObjectKind::Polygon { polygon: poly.uuid }, layer: Some(poly.layer), net: None },
                gen.into_paths(),
            ));
        }
        for circle in &device.circles {
            if circle.layer.copper_number().is_none() {
                continue;
            }
            let mut gen = PathGenerator::new();
            gen.add_circle(circle, &device.transform, 0);
            items.push((
                Object { kind: ObjectKind::Circle { circle: circle.uuid }, layer: Some(circle.layer), net: None },
                gen.into_paths(),
            ));
        }
        for st in &device.stroke_texts {
            if st.layer.copper_number().is_none() {
                continue;
            }
            let mut gen = PathGenerator::new();
            gen.add_stroke_text(st, 0);
            items.push((
                Object { kind: ObjectKind::StrokeText { stroke_text: st.uuid }, layer: Some(st.layer), net: None },
                gen.into_paths(),
            ));
        }
        for pad in &device.pads {
            let net = pad.net.as_ref().map(|n| n.uuid);
            for (layer, _) in &pad.geometries {
                if layer.copper_number().is_none() {
                    continue;
                }
                let mut gen = PathGenerator::new();
                gen.add_pad(pad, *layer, 0);
                items.push((
                    Object { kind: ObjectKind::Pad { pad: pad.uuid, device: Some(device.uuid) }, layer: Some(*layer), net },
                    gen.into_paths(),
                ));
            }
        }
    }

    items
}

/// Every copper object's exact area intersected against the board-edge
/// restricted area; any nonempty result is a message.
pub fn copper_board_edge(data: &Data) -> DrcResult<Vec<Message>> {
    let clearance = data.settings.min_copper_board_clearance;
    if clearance.is_zero() {
        return Ok(Vec::new());
    }
    let restricted = board_edge_restricted_area(data, clearance);
    if restricted.is_empty() {
        return Ok(Vec::new());
    }

    let mut messages = Vec::new();
    for (object, copper_area) in collect_copper_areas(data) {
        let overlap = kernel::intersect(&copper_area, &restricted);
        if overlap.is_empty() {
            continue;
        }
        messages.push(Message::new(
            "copper_board_clearance",
            vec![IdentityField { name: "object", value: IdentityValue::Uuid(object_uuid(&object)) }],
            Severity::Error,
            "copper too close to board edge",
            format!("Copper must keep at least {} nm from the board outline.", clearance.get()),
            locations(&overlap),
        ));
    }
    Ok(messages)
}

/// Every drill-bearing object's disc/slot outline intersected against the
/// restricted area.
pub fn drill_board_edge(data: &Data) -> DrcResult<Vec<Message>> {
    let clearance = data.settings.min_drill_board_clearance;
    if clearance.is_zero() {
        return Ok(Vec::new());
    }
    let restricted = board_edge_restricted_area(data, clearance);
    if restricted.is_empty() {
        return Ok(Vec::new());
    }

    let mut messages = Vec::new();
    for drill in collect_drill_items(data) {
        let mut gen = PathGenerator::new();
        gen.add_hole(drill.diameter, &drill.path, &Transform::identity(), 0);
        let area = gen.into_paths();
        let overlap = kernel::intersect(&area, &restricted);
        if overlap.is_empty() {
            continue;
        }
        let kind = match drill.kind {
            DrillKind::Via => "via",
            DrillKind::PadHole => "pad hole",
            DrillKind::BoardHole => "board hole",
            DrillKind::DeviceHole => "device hole",
        };
        messages.push(Message::new(
            "drill_board_clearance",
            vec![
                IdentityField { name: "object", value: IdentityValue::Uuid(drill.uuid) },
                IdentityField { name: "kind", value: IdentityValue::Str(kind.to_string()) },
            ],
            Severity::Error,
            "drill too close to board edge",
            format!("Drills must keep at least {} nm from the board outline.", clearance.get()),
            locations(&overlap),
        ));
    }
    Ok(messages)
}
