//! Unplaced, missing, and stale board state (spec.md §4.5.18). Sequential.

use crate::data::Data;
use crate::error::DrcResult;
use crate::geometry::{Path, PositiveLength};
use crate::message::{IdentityField, IdentityValue, Message, Severity};

const AIRWIRE_WIDTH_NM: i64 = 50_000;

pub fn check(data: &Data) -> DrcResult<Vec<Message>> {
    let mut messages = Vec::new();

    for (uuid, name) in data.unplaced_components.iter() {
        messages.push(Message::new(
            "unplaced_component",
            vec![IdentityField { name: "device", value: IdentityValue::Uuid(*uuid) }],
            Severity::Error,
            "unplaced component",
            format!("Component \"{name}\" has not been placed on the board."),
            Vec::new(),
        ));
    }

    for air_wire in data.air_wires.iter() {
        let width = PositiveLength::new(AIRWIRE_WIDTH_NM).expect("fixed positive constant");
        let obround = Path::obround(air_wire.a_position, air_wire.b_position, 0);
        let location = obround.to_outline_strokes(width);
        messages.push(Message::new(
            "missing_connection",
            vec![
                IdentityField { name: "a", value: IdentityValue::Str(format!("{:?}", air_wire.a)) },
                IdentityField { name: "b", value: IdentityValue::Str(format!("{:?}", air_wire.b)) },
            ],
            Severity::Error,
            "missing connection",
            format!("Net \"{}\" has an unrouted connection.", air_wire.net_name),
            location,
        ));
    }

    for segment in data.segments.iter() {
        if segment.is_empty() {
            messages.push(Message::new(
                "empty_segment",
                vec![IdentityField { name: "segment", value: IdentityValue::Uuid(segment.uuid) }],
                Severity::Warning,
                "empty segment",
                "This net segment carries no geometry.",
                Vec::new(),
            ));
        }
        for junction in &segment.junctions {
            if junction.connected_traces == 0 {
                messages.push(Message::new(
                    "unconnected_junction",
                    vec![IdentityField { name: "junction", value: IdentityValue::Uuid(junction.uuid) }],
                    Severity::Warning,
                    "unconnected junction",
                    "This junction has no traces connected to it.",
                    vec![Path::circle(PositiveLength::new(50_000).unwrap()).translated(junction.position.x, junction.position.y)],
                ));
            }
        }
    }

    Ok(messages)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use super::*;
    use crate::data::{AirWire, AirWireAnchor, Junction, Segment};
    use crate::geometry::Point;
    use crate::testutil::minimal_data;

    #[test]
    fn unplaced_component_flagged() {
        let mut data = minimal_data();
        Arc::get_mut(&mut data.unplaced_components).unwrap().push((Uuid::new_v4(), "U1".into()));

        let messages = check(&data).unwrap();
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn air_wire_flagged() {
        let mut data = minimal_data();
        Arc::get_mut(&mut data.air_wires).unwrap().push(AirWire {
            a: AirWireAnchor::Pad(Uuid::new_v4()),
            b: AirWireAnchor::Pad(Uuid::new_v4()),
            a_position: Point::origin(),
            b_position: Point::new(1_000_000, 0),
            net_name: "GND".into(),
        });

        let messages = check(&data).unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].message.contains("missing connection"));
    }

    #[test]
    fn empty_segment_and_unconnected_junction_flagged() {
        let mut data = minimal_data();
        let seg = Segment {
            uuid: Uuid::new_v4(),
            net: None,
            net_class: None,
            junctions: vec![Junction { uuid: Uuid::new_v4(), position: Point::origin(), connected_traces: 0 }],
            traces: Vec::new(),
            vias: Vec::new(),
        };
        Arc::get_mut(&mut data.segments).unwrap().push(seg);

        let messages = check(&data).unwrap();
        assert_eq!(messages.len(), 2);
    }
}
