//! Minimum PTH annular ring (spec.md §4.5.8). Stage-2: the pad half needs
//! [`CalculatedData::copper_on_every_layer`], the through-hole copper area.

use crate::calculated::CalculatedData;
use crate::checks::common::locations;
use crate::data::Data;
use crate::error::DrcResult;
use crate::geometry::PositiveLength;
use crate::kernel;
use crate::message::{IdentityField, IdentityValue, Message, Severity};
use crate::pathgen::PathGenerator;

pub fn check(data: &Data, calc: &CalculatedData) -> DrcResult<Vec<Message>> {
    let mut messages = Vec::new();

    for segment in data.segments.iter() {
        let min_annular = data.min_pth_annular_ring(segment.net_class.as_ref());
        if min_annular.is_zero() {
            continue;
        }
        for via in &segment.vias {
            let annular = (via.pad_size.get() - via.drill_diameter.get()) / 2;
            if annular < min_annular.get() {
                messages.push(Message::new(
                    "min_pth_annular_ring",
                    vec![IdentityField { name: "via", value: IdentityValue::Uuid(via.uuid) }],
                    Severity::Error,
                    "annular ring too small",
                    format!(
                        "Annular ring {annular} nm is below the required minimum of {} nm.",
                        min_annular.get()
                    ),
                    Vec::new(),
                ));
            }
        }
    }

    let tht_copper = calc.copper_on_every_layer();
    for device in data.devices.iter() {
        for pad in &device.pads {
            let min_annular = data.min_pth_annular_ring(pad.net_class.as_ref());
            if min_annular.is_zero() || pad.holes.is_empty() {
                continue;
            }
            let Some(stroke_width) = PositiveLength::new(
                pad.holes.iter().map(|h| h.diameter.get()).max().unwrap_or(0) + 2 * min_annular.get() - 1,
            ) else {
                continue;
            };
            let mut gen = PathGenerator::new();
            for hole in &pad.holes {
                gen.add_hole(stroke_width.get(), hole.path.path(), &pad.transform, 0);
            }
            let required = gen.into_paths();
            let missing = kernel::subtract(&required, &tht_copper);
            if missing.is_empty() {
                continue;
            }
            messages.push(Message::new(
                "min_pth_annular_ring",
                vec![IdentityField { name: "pad", value: IdentityValue::Uuid(pad.uuid) }],
                Severity::Error,
                "annular ring too small",
                format!("This pad's annular ring is below the required minimum of {} nm on some layer.", min_annular.get()),
                locations(&missing),
            ));
        }
    }

    Ok(messages)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use super::*;
    use crate::data::{Segment, Via};
    use crate::geometry::{Point, UnsignedLength};
    use crate::testutil::minimal_data;

    #[test]
    fn thin_via_ring_flagged() {
        let mut data = minimal_data();
        Arc::get_mut(&mut data.settings).unwrap().min_pth_annular_ring = UnsignedLength::new(100_000).unwrap();
        let seg = Segment {
            uuid: Uuid::new_v4(),
            net: None,
            net_class: None,
            junctions: Vec::new(),
            traces: Vec::new(),
            vias: vec![Via {
                uuid: Uuid::new_v4(),
                position: Point::origin(),
                drill_diameter: PositiveLength::new(500_000).unwrap(),
                pad_size: PositiveLength::new(600_000).unwrap(),
                stop_mask_diameter_top: None,
                stop_mask_diameter_bottom: None,
                start_layer: 0,
                end_layer: 1,
                drill_layer_span: None,
                connected_layers: Vec::new(),
            }],
        };
        Arc::get_mut(&mut data.segments).unwrap().push(seg);

        let calc = CalculatedData::new();
        let messages = check(&data, &calc).unwrap();
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn zero_clearance_short_circuits() {
        let data = minimal_data();
        let calc = CalculatedData::new();
        assert!(check(&data, &calc).unwrap().is_empty());
    }
}
