//! Copper↔copper clearance (spec.md §4.5.1). Runs as an Independent job.

use std::collections::HashMap;

use uuid::Uuid;

use crate::checks::common::{clearance_growth, locations, object_uuid, CopperItem};
use crate::data::Data;
use crate::error::DrcResult;
use crate::kernel;
use crate::layer::LayerSpan;
use crate::message::{IdentityField, IdentityValue, Message, Object, ObjectKind, Severity};
use crate::pathgen::PathGenerator;

/// Every copper-bearing board object (segment vias/traces, planes unless
/// quick, board/device polygons/circles/stroke-texts, device pads), each with
/// its exact area and its clearance-grown area. Shared with the Cu↔board-edge
/// check, which only needs the exact areas.
pub(crate) fn collect_items(data: &Data) -> Vec<CopperItem> {
    let mut items = Vec::new();

    for segment in data.segments.iter() {
        let net = segment.net.as_ref().map(|n| n.uuid);
        let clearance = data.settings.min_copper_copper_clearance;
        if clearance.is_zero() {
            continue;
        }
        let growth = clearance_growth(clearance);
        for via in &segment.vias {
            let mut exact = PathGenerator::new();
            exact.add_via(via, 0);
            let mut grown = PathGenerator::new();
            grown.add_via(via, growth);
            items.push(CopperItem {
                object: Object { kind: ObjectKind::Via { via: via.uuid }, layer: None, net },
                net,
                layer_span: via.span(),
                clearance,
                copper_area: exact.into_paths(),
                clearance_area: grown.into_paths(),
            });
        }
        for trace in &segment.traces {
            let Some(ordinal) = trace.layer.copper_number() else { continue };
            let mut exact = PathGenerator::new();
            exact.add_trace(trace, 0);
            let mut grown = PathGenerator::new();
            grown.add_trace(trace, growth);
            items.push(CopperItem {
                object: Object { kind: ObjectKind::Trace { trace: trace.uuid }, layer: Some(trace.layer), net },
                net,
                layer_span: LayerSpan::new(ordinal, ordinal),
                clearance,
                copper_area: exact.into_paths(),
                clearance_area: grown.into_paths(),
            });
        }
    }

    if !data.quick {
        for plane in data.planes.iter() {
            let Some(ordinal) = plane.layer.copper_number() else { continue };
            let net = plane.net.as_ref().map(|n| n.uuid);
            let clearance = data.settings.min_copper_copper_clearance;
            if clearance.is_zero() {
                continue;
            }
            let growth = clearance_growth(clearance);
            let mut exact = PathGenerator::new();
            exact.add_plane(&plane.fragments);
            let mut grown = PathGenerator::new();
            grown.add_plane(&plane.fragments);
            let grown_paths = if growth == 0 {
                grown.into_paths()
            } else {
                kernel::offset(&grown.into_paths(), growth, crate::pathgen::flatten_tolerance())
            };
            items.push(CopperItem {
                object: Object { kind: ObjectKind::Plane { plane: plane.uuid }, layer: Some(plane.layer), net },
                net,
                layer_span: LayerSpan::new(ordinal, ordinal),
                clearance,
                copper_area: exact.into_paths(),
                clearance_area: grown_paths,
            });
        }
    }

    let base_clearance = data.min_copper_copper_clearance(None);
    if !base_clearance.is_zero() {
        let growth = clearance_growth(base_clearance);
        for poly in data.board_polygons.iter() {
            let Some(ordinal) = poly.layer.copper_number() else { continue };
            let mut exact = PathGenerator::new();
            exact.add_polygon(&poly.path, poly.line_width.get(), poly.filled, 0);
            let exact_paths = exact.into_paths();
            let clearance_area = if growth == 0 {
                exact_paths.clone()
            } else {
                kernel::offset(&exact_paths, growth, crate::pathgen::flatten_tolerance())
            };
            items.push(CopperItem {
                object: Object { kind: ObjectKind::Polygon { polygon: poly.uuid }, layer: Some(poly.layer), net: None },
                net: None,
                layer_span: LayerSpan::new(ordinal, ordinal),
                clearance: base_clearance,
                copper_area: exact_paths,
                clearance_area,
            });
        }
        for st in data.board_stroke_texts.iter() {
            let Some(ordinal) = st.layer.copper_number() else { continue };
            let mut exact = PathGenerator::new();
            exact.add_stroke_text(st, 0);
            let mut grown = PathGenerator::new();
            grown.add_stroke_text(st, growth);
            items.push(CopperItem {
                object: Object { kind: ObjectKind::StrokeText { stroke_text: st.uuid }, layer: Some(st.layer), net: None },
                net: None,
                layer_span: LayerSpan::new(ordinal, ordinal),
                clearance: base_clearance,
                copper_area: exact.into_paths(),
                clearance_area: grown.into_paths(),
            });
        }
        for device in data.devices.iter() {
            for poly in &device.polygons {
                let Some(ordinal) = poly.layer.copper_number() else { continue };
                let placed = device.transform.map_path(&poly.path);
                let mut exact = PathGenerator::new();
                exact.add_polygon(&placed, poly.line_width.get(), poly.filled, 0);
                let exact_paths = exact.into_paths();
                let clearance_area = if growth == 0 {
                    exact_paths.clone()
                } else {
                    kernel::offset(&exact_paths, growth, crate::pathgen::flatten_tolerance())
                };
                items.push(CopperItem {
                    object: Object { kind: ObjectKind::Polygon { polygon: poly.uuid }, layer: Some(poly.layer), net: None },
                    net: None,
                    layer_span: LayerSpan::new(ordinal, ordinal),
                    clearance: base_clearance,
                    copper_area: exact_paths,
                    clearance_area,
                });
            }
            for circle in &device.circles {
                let Some(ordinal) = circle.layer.copper_number() else { continue };
                let mut exact = PathGenerator::new();
                exact.add_circle(circle, &device.transform, 0);
                let mut grown = PathGenerator::new();
                grown.add_circle(circle, &device.transform, growth);
                items.push(CopperItem {
                    object: Object { kind: ObjectKind::Circle { circle: circle.uuid }, layer: Some(circle.layer), net: None },
                    net: None,
                    layer_span: LayerSpan::new(ordinal, ordinal),
                    clearance: base_clearance,
                    copper_area: exact.into_paths(),
                    clearance_area: grown.into_paths(),
                });
            }
            for st in &device.stroke_texts {
                let Some(ordinal) = st.layer.copper_number() else { continue };
                let mut exact = PathGenerator::new();
                exact.add_stroke_text(st, 0);
                let mut grown = PathGenerator::new();
                grown.add_stroke_text(st, growth);
                items.push(CopperItem {
                    object: Object { kind: ObjectKind::StrokeText { stroke_text: st.uuid }, layer: Some(st.layer), net: None },
                    net: None,
                    layer_span: LayerSpan::new(ordinal, ordinal),
                    clearance: base_clearance,
                    copper_area: exact.into_paths(),
                    clearance_area: grown.into_paths(),
                });
            }
        }
    }

    // Pad clearance is independent of the board-wide `base_clearance` short
    // circuit above: a pad's own net-class/override clearance may be
    // nonzero even when the bare board setting is zero.
    for device in data.devices.iter() {
        for pad in &device.pads {
            let net = pad.net.as_ref().map(|n| n.uuid);
            let base = data.settings.min_copper_copper_clearance;
            let clearance = match pad.copper_clearance_override {
                Some(over) => base.max(over),
                None => base,
            };
            if clearance.is_zero() {
                continue;
            }
            let growth = clearance_growth(clearance);
            for (layer, _) in &pad.geometries {
                let Some(ordinal) = layer.copper_number() else { continue };
                let mut exact = PathGenerator::new();
                exact.add_pad(pad, *layer, 0);
                let mut grown = PathGenerator::new();
                grown.add_pad(pad, *layer, growth);
                items.push(CopperItem {
                    object: Object { kind: ObjectKind::Pad { pad: pad.uuid, device: Some(device.uuid) }, layer: Some(*layer), net },
                    net,
                    layer_span: LayerSpan::new(ordinal, ordinal),
                    clearance,
                    copper_area: exact.into_paths(),
                    clearance_area: grown.into_paths(),
                });
            }
        }
    }

    items
}

struct Merged {
    a: Object,
    b: Object,
    layers: LayerSpan,
    clearance: crate::geometry::UnsignedLength,
    regions: kernel::IntPaths,
}

fn ordinal_key(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a < b { (a, b) } else { (b, a) }
}

/// Copper↔copper clearance: pairwise intersection of each object's exact
/// area against its neighbour's clearance-grown area, skipping same-net
/// pairs and layer-disjoint pairs, merging repeat detections between the
/// same unordered pair (spec.md §4.5.1).
pub fn check(data: &Data) -> DrcResult<Vec<Message>> {
    let items = collect_items(data);
    let mut merged: HashMap<(Uuid, Uuid), Merged> = HashMap::new();

    for i in 0..items.len() {
        for j in (i + 1)..items.len() {
            let (a, b) = (&items[i], &items[j]);
            if a.net.is_some() && a.net == b.net {
                continue;
            }
            if a.layer_span.intersect(b.layer_span).is_none() {
                continue;
            }

            let mut regions = kernel::intersect(&a.copper_area, &b.clearance_area);
            let needs_reverse = a.clearance > b.clearance || !regions.is_empty();
            if needs_reverse {
                let reverse = kernel::intersect(&b.copper_area, &a.clearance_area);
                regions = kernel::unite_with(&regions, &reverse);
            }
            if regions.is_empty() {
                continue;
            }

            let key = ordinal_key(object_uuid(&a.object), object_uuid(&b.object));
            let clearance = a.clearance.max(b.clearance);
            let span = a.layer_span.intersect(b.layer_span).expect("checked above");
            merged
                .entry(key)
                .and_modify(|m| {
                    m.layers = LayerSpan::new(m.layers.start.min(span.start), m.layers.end.max(span.end));
                    m.clearance = m.clearance.max(clearance);
                    m.regions = kernel::unite_with(&m.regions, &regions);
                })
                .or_insert(Merged { a: a.object.clone(), b: b.object.clone(), layers: span, clearance, regions });
        }
    }

    let mut messages = Vec::with_capacity(merged.len());
    for m in merged.into_values() {
        messages.push(Message::new(
            "copper_copper_clearance",
            vec![
                IdentityField { name: "a", value: IdentityValue::Uuid(object_uuid(&m.a)) },
                IdentityField { name: "b", value: IdentityValue::Uuid(object_uuid(&m.b)) },
            ],
            Severity::Error,
            "copper clearance violation",
            format!(
                "Clearance between these objects is below the required {} nm.",
                m.clearance.get()
            ),
            locations(&m.regions),
        ));
    }
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Net, Segment, Trace};
    use crate::geometry::{Point, PositiveLength, UnsignedLength};
    use crate::layer::Layer;
    use crate::testutil::minimal_data;

    #[test]
    fn two_close_traces_different_nets_clash() {
        let mut data = minimal_data();
        std::sync::Arc::get_mut(&mut data.settings).unwrap().min_copper_copper_clearance =
            UnsignedLength::new(200_000).unwrap();
        let layer = Layer::top_copper(2);
        let seg_a = Segment {
            uuid: Uuid::new_v4(),
            net: Some(Net { uuid: Uuid::new_v4(), name: "a".into() }),
            net_class: None,
            junctions: Vec::new(),
            traces: vec![Trace {
                uuid: Uuid::new_v4(),
                p1: Point::new(0, 0),
                p2: Point::new(10_000_000, 0),
                width: PositiveLength::new(200_000).unwrap(),
                layer,
            }],
            vias: Vec::new(),
        };
        let seg_b = Segment {
            uuid: Uuid::new_v4(),
            net: Some(Net { uuid: Uuid::new_v4(), name: "b".into() }),
            net_class: None,
            junctions: Vec::new(),
            traces: vec![Trace {
                uuid: Uuid::new_v4(),
                p1: Point::new(0, 100_000),
                p2: Point::new(10_000_000, 100_000),
                width: PositiveLength::new(200_000).unwrap(),
                layer,
            }],
            vias: Vec::new(),
        };
        std::sync::Arc::get_mut(&mut data.segments).unwrap().extend([seg_a, seg_b]);

        let messages = check(&data).unwrap();
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn same_net_traces_never_clash() {
        let mut data = minimal_data();
        std::sync::Arc::get_mut(&mut data.settings).unwrap().min_copper_copper_clearance =
            UnsignedLength::new(200_000).unwrap();
        let layer = Layer::top_copper(2);
        let net = Some(Net { uuid: Uuid::new_v4(), name: "a".into() });
        let seg = Segment {
            uuid: Uuid::new_v4(),
            net: net.clone(),
            net_class: None,
            junctions: Vec::new(),
            traces: vec![
                Trace {
                    uuid: Uuid::new_v4(),
                    p1: Point::new(0, 0),
                    p2: Point::new(10_000_000, 0),
                    width: PositiveLength::new(200_000).unwrap(),
                    layer,
                },
                Trace {
                    uuid: Uuid::new_v4(),
                    p1: Point::new(0, 100_000),
                    p2: Point::new(10_000_000, 100_000),
                    width: PositiveLength::new(200_000).unwrap(),
                    layer,
                },
            ],
            vias: Vec::new(),
        };
        std::sync::Arc::get_mut(&mut data.segments).unwrap().push(seg);

        let messages = check(&data).unwrap();
        assert!(messages.is_empty());
    }

    #[test]
    fn zero_clearance_short_circuits() {
        let data = minimal_data();
        let messages = check(&data).unwrap();
        assert!(messages.is_empty());
    }
}
