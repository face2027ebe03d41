//! Device-to-device clearances (spec.md §4.5.15). Independent job.
//!
//! Per board side, every pair of devices is checked two ways: do their
//! package outlines overlap ("overlapping devices"), and does one device's
//! outline intrude into another's courtyard ("device in courtyard").

use crate::data::{Data, Device};
use crate::error::DrcResult;
use crate::kernel::{self, IntPaths};
use crate::layer::Layer;
use crate::message::{IdentityField, IdentityValue, Message, Severity};
use crate::pathgen::PathGenerator;

struct DeviceAreas {
    outline: IntPaths,
    courtyard: IntPaths,
}

fn areas_on(device: &Device, outline_layer: Layer, courtyard_layer: Layer) -> DeviceAreas {
    let mut outline_gen = PathGenerator::new();
    for poly in device.polygons.iter().filter(|p| p.layer == outline_layer) {
        let placed = device.transform.map_path(&poly.path);
        outline_gen.add_polygon(&placed, poly.line_width.get(), poly.filled, 0);
    }
    for circle in device.circles.iter().filter(|c| c.layer == outline_layer) {
        outline_gen.add_circle(circle, &device.transform, 0);
    }

    let mut courtyard_gen = PathGenerator::new();
    for poly in device.polygons.iter().filter(|p| p.layer == courtyard_layer) {
        let placed = device.transform.map_path(&poly.path);
        courtyard_gen.add_polygon(&placed, poly.line_width.get(), poly.filled, 0);
    }
    for circle in device.circles.iter().filter(|c| c.layer == courtyard_layer) {
        courtyard_gen.add_circle(circle, &device.transform, 0);
    }

    DeviceAreas { outline: outline_gen.into_paths(), courtyard: courtyard_gen.into_paths() }
}

pub fn check(data: &Data) -> DrcResult<Vec<Message>> {
    let mut messages = Vec::new();

    for top in [true, false] {
        let outline_layer = Layer::package_outlines_for(top);
        let courtyard_layer = if top { Layer::TopCourtyard } else { Layer::BotCourtyard };

        let devices: Vec<(&Device, DeviceAreas)> = data
            .devices
            .iter()
            .map(|d| (d, areas_on(d, outline_layer, courtyard_layer)))
            .filter(|(_, a)| !a.outline.is_empty() || !a.courtyard.is_empty())
            .collect();

        for i in 0..devices.len() {
            for j in (i + 1)..devices.len() {
                let (a, a_areas) = &devices[i];
                let (b, b_areas) = &devices[j];

                let overlap = kernel::intersect(&a_areas.outline, &b_areas.outline);
                if !overlap.is_empty() {
                    messages.push(pair_message("overlapping_devices", a.uuid, b.uuid, "overlapping devices"));
                }

                let a_in_b_courtyard = kernel::intersect(&a_areas.outline, &b_areas.courtyard);
                if !a_in_b_courtyard.is_empty() {
                    messages.push(pair_message("device_in_courtyard", a.uuid, b.uuid, "device in courtyard"));
                }
                let b_in_a_courtyard = kernel::intersect(&b_areas.outline, &a_areas.courtyard);
                if !b_in_a_courtyard.is_empty() {
                    messages.push(pair_message("device_in_courtyard", b.uuid, a.uuid, "device in courtyard"));
                }
            }
        }
    }

    Ok(messages)
}

fn pair_message(kind: &str, a: uuid::Uuid, b: uuid::Uuid, text: &str) -> Message {
    Message::new(
        kind,
        vec![
            IdentityField { name: "device_a", value: IdentityValue::Uuid(a) },
            IdentityField { name: "device_b", value: IdentityValue::Uuid(b) },
        ],
        Severity::Error,
        text,
        format!("Devices {a} and {b} clash: {text}."),
        Vec::new(),
    )
}
