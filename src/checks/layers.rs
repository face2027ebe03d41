//! Used-layer sanity (spec.md §4.5.17). Sequential: collects which copper
//! layers are actually drawn on and compares against which are enabled.
//! Top and bottom copper are never warned about, since every board uses them.

use std::collections::HashSet;

use crate::data::Data;
use crate::error::DrcResult;
use crate::layer::Layer;
use crate::message::{IdentityField, IdentityValue, Message, Severity};

fn collect_used_layers(data: &Data) -> HashSet<Layer> {
    let mut used = HashSet::new();

    for poly in data.board_polygons.iter().filter(|p| p.layer.is_copper()) {
        used.insert(poly.layer);
    }
    for st in data.board_stroke_texts.iter().filter(|s| s.layer.is_copper()) {
        used.insert(st.layer);
    }
    for plane in data.planes.iter() {
        used.insert(plane.layer);
    }
    for segment in data.segments.iter() {
        for trace in &segment.traces {
            used.insert(trace.layer);
        }
        for via in &segment.vias {
            let span = via.span();
            for ordinal in span.start..=span.end {
                used.insert(Layer::Copper { ordinal, stack_depth: data.stack_depth });
            }
        }
    }
    for device in data.devices.iter() {
        for poly in device.polygons.iter().filter(|p| p.layer.is_copper()) {
            used.insert(poly.layer);
        }
        for circle in device.circles.iter().filter(|c| c.layer.is_copper()) {
            used.insert(circle.layer);
        }
        for pad in &device.pads {
            for (layer, _) in &pad.geometries {
                if layer.is_copper() {
                    used.insert(*layer);
                }
            }
        }
    }

    used
}

pub fn check(data: &Data) -> DrcResult<Vec<Message>> {
    let used = collect_used_layers(data);
    let enabled: HashSet<Layer> = data.enabled_copper_layers.iter().copied().collect();

    let mut messages = Vec::new();
    for layer in used.iter().filter(|l| !l.is_top() && !l.is_bottom() && !enabled.contains(l)) {
        messages.push(layer_message("disabled_copper_layer_used", *layer, "layer used but disabled"));
    }
    for layer in enabled.iter().filter(|l| !l.is_top() && !l.is_bottom() && !used.contains(l)) {
        messages.push(layer_message("unused_copper_layer", *layer, "layer enabled but unused"));
    }

    Ok(messages)
}

fn layer_message(kind: &str, layer: Layer, text: &str) -> Message {
    Message::new(
        kind,
        vec![IdentityField { name: "layer", value: IdentityValue::Layer(layer) }],
        Severity::Warning,
        text,
        format!("Copper layer {} {text}.", layer.as_str()),
        Vec::new(),
    )
}
