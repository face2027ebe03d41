//! Minimum copper width (spec.md §4.5.7) and minimum silkscreen width / text
//! height (spec.md §4.5.10). Both Sequential: cheap, single-pass scans.

use crate::data::Data;
use crate::error::DrcResult;
use crate::layer::Layer;
use crate::message::{IdentityField, IdentityValue, Message, Severity};

fn width_message(kind: &str, uuid: uuid::Uuid, min_nm: crate::geometry::Length, got_nm: crate::geometry::Length) -> Message {
    Message::new(
        kind,
        vec![IdentityField { name: "object", value: IdentityValue::Uuid(uuid) }],
        Severity::Error,
        "copper width below minimum",
        format!("Width {got_nm} nm is below the required minimum of {min_nm} nm."),
        Vec::new(),
    )
}

/// spec.md §4.5.7: trace/stroke-text/polygon/plane/device-geometry widths
/// against `Data::min_copper_width`.
pub fn min_copper_width(data: &Data) -> DrcResult<Vec<Message>> {
    let mut messages = Vec::new();

    for segment in data.segments.iter() {
        let min = data.min_copper_width(segment.net_class.as_ref());
        if min.is_zero() {
            continue;
        }
        for trace in &segment.traces {
            if trace.width.get() < min.get() {
                messages.push(width_message("min_copper_width", trace.uuid, min.get(), trace.width.get()));
            }
        }
    }

    let base_min = data.min_copper_width(None);
    if !base_min.is_zero() {
        for st in data.board_stroke_texts.iter().filter(|s| s.layer.is_copper()) {
            if st.stroke_width.get() < base_min.get() {
                messages.push(width_message("min_copper_width", st.uuid, base_min.get(), st.stroke_width.get()));
            }
        }
        for poly in data.board_polygons.iter().filter(|p| p.layer.is_copper()) {
            if poly.filled && poly.path.is_closed() && poly.line_width.is_zero() {
                continue;
            }
            if poly.line_width.get() < base_min.get() {
                messages.push(width_message("min_copper_width", poly.uuid, base_min.get(), poly.line_width.get()));
            }
        }
        for device in data.devices.iter() {
            for poly in device.polygons.iter().filter(|p| p.layer.is_copper()) {
                if poly.filled && poly.path.is_closed() && poly.line_width.is_zero() {
                    continue;
                }
                if poly.line_width.get() < base_min.get() {
                    messages.push(width_message("min_copper_width", poly.uuid, base_min.get(), poly.line_width.get()));
                }
            }
            for circle in device.circles.iter().filter(|c| c.layer.is_copper()) {
                let effective = if circle.filled { circle.diameter.get() } else { circle.line_width.get() };
                if effective < base_min.get() {
                    messages.push(width_message("min_copper_width", circle.uuid, base_min.get(), effective));
                }
            }
        }
    }

    for plane in data.planes.iter() {
        let min = data.min_copper_width(plane.net_class.as_ref());
        if !min.is_zero() && plane.min_width.get() < min.get() {
            messages.push(width_message("min_copper_width", plane.uuid, min.get(), plane.min_width.get()));
        }
    }

    Ok(messages)
}

/// spec.md §4.5.10 (width half): board and device polygon line widths on the
/// silkscreen layers, same zero-width-fill exemption as §4.5.7.
pub fn min_silkscreen_width(data: &Data) -> DrcResult<Vec<Message>> {
    let min = data.settings.min_silkscreen_width;
    if min.is_zero() {
        return Ok(Vec::new());
    }
    let is_silkscreen = |l: Layer| matches!(l, Layer::TopLegend | Layer::BotLegend);

    let mut messages = Vec::new();
    for poly in data.board_polygons.iter().filter(|p| is_silkscreen(p.layer)) {
        if poly.filled && poly.path.is_closed() && poly.line_width.is_zero() {
            continue;
        }
        if poly.line_width.get() < min.get() {
            messages.push(width_message("min_silkscreen_width", poly.uuid, min.get(), poly.line_width.get()));
        }
    }
    for device in data.devices.iter() {
        for poly in device.polygons.iter().filter(|p| is_silkscreen(p.layer)) {
            if poly.filled && poly.path.is_closed() && poly.line_width.is_zero() {
                continue;
            }
            if poly.line_width.get() < min.get() {
                messages.push(width_message("min_silkscreen_width", poly.uuid, min.get(), poly.line_width.get()));
            }
        }
    }
    Ok(messages)
}

/// spec.md §4.5.10 (text-height half): every silkscreen stroke text whose
/// `height` is below the minimum, located at its own stroked outline.
pub fn min_silkscreen_text_height(data: &Data) -> DrcResult<Vec<Message>> {
    let min = data.settings.min_silkscreen_text_height;
    if min.is_zero() {
        return Ok(Vec::new());
    }
    let is_silkscreen = |l: Layer| matches!(l, Layer::TopLegend | Layer::BotLegend);

    let mut messages = Vec::new();
    for st in data.board_stroke_texts.iter().filter(|s| is_silkscreen(s.layer)) {
        if st.height.get() < min.get() {
            messages.push(text_height_message(st.uuid, min.get(), st.height.get(), &st.stroked_paths));
        }
    }
    for device in data.devices.iter() {
        for st in device.stroke_texts.iter().filter(|s| is_silkscreen(s.layer)) {
            if st.height.get() < min.get() {
                messages.push(text_height_message(st.uuid, min.get(), st.height.get(), &st.stroked_paths));
            }
        }
    }
    Ok(messages)
}

fn text_height_message(
    uuid: uuid::Uuid,
    min_nm: crate::geometry::Length,
    got_nm: crate::geometry::Length,
    stroked_paths: &[crate::geometry::Path],
) -> Message {
    Message::new(
        "min_silkscreen_text_height",
        vec![IdentityField { name: "stroke_text", value: IdentityValue::Uuid(uuid) }],
        Severity::Error,
        "silkscreen text too short",
        format!("Text height {got_nm} nm is below the required minimum of {min_nm} nm."),
        stroked_paths.to_vec(),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use super::*;
    use crate::data::{Net, Segment, Trace};
    use crate::geometry::{Point, PositiveLength, UnsignedLength};
    use crate::layer::Layer as L;
    use crate::testutil::minimal_data;

    #[test]
    fn narrow_trace_flagged() {
        let mut data = minimal_data();
        Arc::get_mut(&mut data.settings).unwrap().min_copper_width = UnsignedLength::new(250_000).unwrap();
        let seg = Segment {
            uuid: Uuid::new_v4(),
            net: Some(Net { uuid: Uuid::new_v4(), name: "a".into() }),
            net_class: None,
            junctions: Vec::new(),
            traces: vec![Trace {
                uuid: Uuid::new_v4(),
                p1: Point::new(0, 0),
                p2: Point::new(1_000_000, 0),
                width: PositiveLength::new(150_000).unwrap(),
                layer: L::top_copper(2),
            }],
            vias: Vec::new(),
        };
        Arc::get_mut(&mut data.segments).unwrap().push(seg);

        let messages = min_copper_width(&data).unwrap();
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn wide_trace_ok() {
        let mut data = minimal_data();
        Arc::get_mut(&mut data.settings).unwrap().min_copper_width = UnsignedLength::new(150_000).unwrap();
        let seg = Segment {
            uuid: Uuid::new_v4(),
            net: None,
            net_class: None,
            junctions: Vec::new(),
            traces: vec![Trace {
                uuid: Uuid::new_v4(),
                p1: Point::new(0, 0),
                p2: Point::new(1_000_000, 0),
                width: PositiveLength::new(250_000).unwrap(),
                layer: L::top_copper(2),
            }],
            vias: Vec::new(),
        };
        Arc::get_mut(&mut data.segments).unwrap().push(seg);

        assert!(min_copper_width(&data).unwrap().is_empty());
    }

    #[test]
    fn short_text_flagged() {
        let mut data = minimal_data();
        Arc::get_mut(&mut data.settings).unwrap().min_silkscreen_text_height =
            UnsignedLength::new(1_000_000).unwrap();
        let text = crate::data::StrokeText {
            uuid: Uuid::new_v4(),
            position: Point::origin(),
            rotation: crate::geometry::Angle::zero(),
            mirror: false,
            layer: L::TopLegend,
            stroke_width: PositiveLength::new(100_000).unwrap(),
            height: UnsignedLength::new(500_000).unwrap(),
            stroked_paths: Vec::new(),
        };
        Arc::get_mut(&mut data.board_stroke_texts).unwrap().push(text);

        let messages = min_silkscreen_text_height(&data).unwrap();
        assert_eq!(messages.len(), 1);
    }
}
