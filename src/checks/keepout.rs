//! Keepout zones (spec.md §4.5.11). Independent job.
//!
//! A zone (board-owned or device-owned) prohibits some combination of
//! copper, solder-mask exposure, and device placement on the layers its
//! rules resolve to. "Exposure in keepout" is approximated against a pad's
//! or via's own copper/stop-mask-diameter presence on the corresponding
//! copper layer, since this snapshot does not carry a pad's stop-mask
//! opening as independent geometry (see DESIGN.md).

use std::collections::HashSet;

use uuid::Uuid;

use crate::checks::common::locations;
use crate::data::{Data, Device, Zone};
use crate::error::DrcResult;
use crate::kernel::{self, IntPaths};
use crate::layer::Layer;
use crate::message::{IdentityField, IdentityValue, Message, Severity};
use crate::pathgen::PathGenerator;

struct ZoneCtx {
    uuid: Uuid,
    owning_device: Option<Uuid>,
    no_copper: Vec<Layer>,
    no_exposure: Vec<Layer>,
    no_devices: Vec<Layer>,
    area: IntPaths,
}

fn stop_mask_layers(copper_layers: &[Layer]) -> Vec<Layer> {
    let mut out = Vec::new();
    for layer in copper_layers {
        if layer.is_top() {
            out.push(Layer::TopStopMask);
        }
        if layer.is_bottom() {
            out.push(Layer::BotStopMask);
        }
    }
    out
}

fn device_layers(copper_layers: &[Layer]) -> Vec<Layer> {
    let mut out = Vec::new();
    for layer in copper_layers {
        if layer.is_top() {
            out.extend([Layer::TopPackageOutlines, Layer::TopDocumentation]);
        }
        if layer.is_bottom() {
            out.extend([Layer::BotPackageOutlines, Layer::BotDocumentation]);
        }
    }
    out
}

fn zone_area(outline: &crate::geometry::Path) -> IntPaths {
    let mut gen = PathGenerator::new();
    gen.add_polygon(outline, 0, true, 0);
    gen.into_paths()
}

fn build_ctx(zone: &Zone, owning_device: Option<Uuid>, stack_depth: u32, mirrored: bool) -> ZoneCtx {
    let copper_layers = zone.effective_copper_layers(stack_depth, mirrored);
    ZoneCtx {
        uuid: zone.uuid,
        owning_device,
        no_copper: if zone.rules.no_copper { copper_layers.clone() } else { Vec::new() },
        no_exposure: if zone.rules.no_exposure { stop_mask_layers(&copper_layers) } else { Vec::new() },
        no_devices: if zone.rules.no_devices { device_layers(&copper_layers) } else { Vec::new() },
        area: zone_area(&zone.outline),
    }
}

pub fn check(data: &Data) -> DrcResult<Vec<Message>> {
    let mut messages = Vec::new();
    let mut zones = Vec::new();

    for zone in data.board_zones.iter() {
        if zone.is_useless(data.stack_depth, false) {
            messages.push(useless_zone_message(zone.uuid));
            continue;
        }
        zones.push(build_ctx(zone, None, data.stack_depth, false));
    }
    for device in data.devices.iter() {
        for zone in &device.zones {
            if zone.is_useless(data.stack_depth, device.transform.mirror) {
                messages.push(useless_zone_message(zone.uuid));
                continue;
            }
            zones.push(build_ctx(zone, Some(device.uuid), data.stack_depth, device.transform.mirror));
        }
    }

    for zone in &zones {
        if zone.area.is_empty() {
            continue;
        }
        check_devices(data, zone, &mut messages);
        check_segments(data, zone, &mut messages);
        check_board_polygons(data, zone, &mut messages);
    }

    Ok(messages)
}

fn useless_zone_message(zone: Uuid) -> Message {
    Message::new(
        "useless_keepout_zone",
        vec![IdentityField { name: "zone", value: IdentityValue::Uuid(zone) }],
        Severity::Warning,
        "keepout zone has no effect",
        "This zone's rules have no effect on any layer of the current board.",
        Vec::new(),
    )
}

fn copper_in_keepout(zone: Uuid, object: Uuid, overlap: &IntPaths) -> Message {
    Message::new(
        "copper_in_keepout_zone",
        vec![
            IdentityField { name: "zone", value: IdentityValue::Uuid(zone) },
            IdentityField { name: "object", value: IdentityValue::Uuid(object) },
        ],
        Severity::Error,
        "copper inside a keepout zone",
        "This copper object lies inside a zone that forbids copper.",
        locations(overlap),
    )
}

fn exposure_in_keepout(zone: Uuid, object: Uuid, overlap: &IntPaths) -> Message {
    Message::new(
        "exposure_in_keepout_zone",
        vec![
            IdentityField { name: "zone", value: IdentityValue::Uuid(zone) },
            IdentityField { name: "object", value: IdentityValue::Uuid(object) },
        ],
        Severity::Error,
        "solder-mask exposure inside a keepout zone",
        "This object's stop-mask opening lies inside a zone that forbids exposure.",
        locations(overlap),
    )
}

fn device_in_keepout(zone: Uuid, device: Uuid, overlap: &IntPaths) -> Message {
    Message::new(
        "device_in_keepout_zone",
        vec![
            IdentityField { name: "zone", value: IdentityValue::Uuid(zone) },
            IdentityField { name: "device", value: IdentityValue::Uuid(device) },
        ],
        Severity::Error,
        "device placed inside a keepout zone",
        "This device's outline or documentation lies inside a zone that forbids devices.",
        locations(overlap),
    )
}

/// The intersection of `area` with the zone's outline, or `None` if they
/// don't overlap.
fn overlap(area: &IntPaths, zone: &IntPaths) -> Option<IntPaths> {
    let regions = kernel::intersect(area, zone);
    if regions.is_empty() {
        None
    } else {
        Some(regions)
    }
}

fn check_devices(data: &Data, zone: &ZoneCtx, messages: &mut Vec<Message>) {
    for device in data.devices.iter() {
        if Some(device.uuid) == zone.owning_device {
            continue;
        }
        for pad in &device.pads {
            for (layer, _) in &pad.geometries {
                if !zone.no_copper.contains(layer) && !zone.no_exposure.contains(layer) {
                    continue;
                }
                let mut gen = PathGenerator::new();
                gen.add_pad(pad, *layer, 0);
                let area = gen.into_paths();
                if zone.no_copper.contains(layer) {
                    if let Some(ov) = overlap(&area, &zone.area) {
                        messages.push(copper_in_keepout(zone.uuid, pad.uuid, &ov));
                    }
                }
                if zone.no_exposure.contains(layer) {
                    if let Some(ov) = overlap(&area, &zone.area) {
                        messages.push(exposure_in_keepout(zone.uuid, pad.uuid, &ov));
                    }
                }
            }
        }

        let device_flagged = check_device_geometry(device, zone, messages);
        if let Some(ov) = device_flagged {
            messages.push(device_in_keepout(zone.uuid, device.uuid, &ov));
        }
    }
}

/// Checks copper/exposure overlap for every device polygon and circle,
/// returning the union of whatever overlaps triggered `no_devices` (if any),
/// for the single `device_in_keepout` message this device may still earn.
fn check_device_geometry(device: &Device, zone: &ZoneCtx, messages: &mut Vec<Message>) -> Option<IntPaths> {
    let mut device_overlap: Option<IntPaths> = None;
    for poly in &device.polygons {
        let placed = device.transform.map_path(&poly.path);
        let mut gen = PathGenerator::new();
        gen.add_polygon(&placed, poly.line_width.get(), poly.filled, 0);
        let area = gen.into_paths();
        let ov = overlap(&area, &zone.area);
        if zone.no_copper.contains(&poly.layer) {
            if let Some(ov) = &ov {
                messages.push(copper_in_keepout(zone.uuid, poly.uuid, ov));
            }
        }
        if zone.no_exposure.contains(&poly.layer) {
            if let Some(ov) = &ov {
                messages.push(exposure_in_keepout(zone.uuid, poly.uuid, ov));
            }
        }
        if zone.no_devices.contains(&poly.layer) {
            if let Some(ov) = ov {
                device_overlap = Some(match device_overlap {
                    Some(existing) => kernel::unite_with(&existing, &ov),
                    None => ov,
                });
            }
        }
    }
    for circle in &device.circles {
        let mut gen = PathGenerator::new();
        gen.add_circle(circle, &device.transform, 0);
        let area = gen.into_paths();
        let ov = overlap(&area, &zone.area);
        if zone.no_copper.contains(&circle.layer) {
            if let Some(ov) = &ov {
                messages.push(copper_in_keepout(zone.uuid, circle.uuid, ov));
            }
        }
        if zone.no_exposure.contains(&circle.layer) {
            if let Some(ov) = &ov {
                messages.push(exposure_in_keepout(zone.uuid, circle.uuid, ov));
            }
        }
        if zone.no_devices.contains(&circle.layer) {
            if let Some(ov) = ov {
                device_overlap = Some(match device_overlap {
                    Some(existing) => kernel::unite_with(&existing, &ov),
                    None => ov,
                });
            }
        }
    }
    device_overlap
}

fn check_segments(data: &Data, zone: &ZoneCtx, messages: &mut Vec<Message>) {
    let no_copper_ordinals: HashSet<u32> = zone.no_copper.iter().filter_map(|l| l.copper_number()).collect();
    if no_copper_ordinals.is_empty() && zone.no_exposure.is_empty() {
        return;
    }
    for segment in data.segments.iter() {
        for via in &segment.vias {
            if no_copper_ordinals.iter().any(|&ord| via.span().contains(ord)) {
                let mut gen = PathGenerator::new();
                gen.add_via(via, 0);
                if let Some(ov) = overlap(&gen.into_paths(), &zone.area) {
                    messages.push(copper_in_keepout(zone.uuid, via.uuid, &ov));
                }
            }
            let has_top_stopmask = via.stop_mask_diameter_top.is_some() && zone.no_exposure.contains(&Layer::TopStopMask);
            let has_bot_stopmask = via.stop_mask_diameter_bottom.is_some() && zone.no_exposure.contains(&Layer::BotStopMask);
            if has_top_stopmask || has_bot_stopmask {
                let mut gen = PathGenerator::new();
                gen.add_via(via, 0);
                if let Some(ov) = overlap(&gen.into_paths(), &zone.area) {
                    messages.push(exposure_in_keepout(zone.uuid, via.uuid, &ov));
                }
            }
        }
        for trace in &segment.traces {
            let Some(ordinal) = trace.layer.copper_number() else { continue };
            if no_copper_ordinals.contains(&ordinal) {
                let mut gen = PathGenerator::new();
                gen.add_trace(trace, 0);
                if let Some(ov) = overlap(&gen.into_paths(), &zone.area) {
                    messages.push(copper_in_keepout(zone.uuid, trace.uuid, &ov));
                }
            }
        }
    }
}

fn check_board_polygons(data: &Data, zone: &ZoneCtx, messages: &mut Vec<Message>) {
    if zone.no_copper.is_empty() {
        return;
    }
    for poly in data.board_polygons.iter().filter(|p| zone.no_copper.contains(&p.layer)) {
        let mut gen = PathGenerator::new();
        gen.add_polygon(&poly.path, poly.line_width.get(), poly.filled, 0);
        if let Some(ov) = overlap(&gen.into_paths(), &zone.area) {
            messages.push(copper_in_keepout(zone.uuid, poly.uuid, &ov));
        }
    }
}
