//! Drill↔drill clearance (spec.md §4.5.4). Independent job: pairwise check
//! over every via, board hole, device hole, and pad hole on the board.

use std::collections::HashMap;

use rstar::{RTree, RTreeObject, AABB};
use uuid::Uuid;

use crate::checks::common::{clearance_growth, locations};
use crate::checks::drill::{collect_drill_items, DrillItem};
use crate::data::Data;
use crate::error::DrcResult;
use crate::geometry::Transform;
use crate::kernel::{self, IntPaths};
use crate::message::{IdentityField, IdentityValue, Message, Severity};
use crate::pathgen::PathGenerator;

struct Areas {
    uuid: Uuid,
    exact: IntPaths,
    grown: IntPaths,
}

fn areas(item: &DrillItem, growth: crate::geometry::Length) -> Areas {
    let mut exact_gen = PathGenerator::new();
    exact_gen.add_hole(item.diameter, &item.path, &Transform::identity(), 0);
    let mut grown_gen = PathGenerator::new();
    grown_gen.add_hole(item.diameter, &item.path, &Transform::identity(), growth);
    Areas {
        uuid: item.uuid,
        exact: exact_gen.into_paths(),
        grown: grown_gen.into_paths(),
    }
}

fn ordinal_key(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a < b { (a, b) } else { (b, a) }
}

/// Broad-phase candidate: a drill item's index, indexed by the bounding box
/// of its grown (clearance-inflated) area. Two items can only possibly clash
/// if these boxes overlap, so the `RTree` lets us skip the expensive
/// polygon-boolean check entirely for everything far away.
struct DrillBox {
    index: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for DrillBox {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn item_envelope(item: &DrillItem, growth: crate::geometry::Length) -> AABB<[f64; 2]> {
    let radius = item.diameter / 2 + growth.max(0);
    let mut min = [f64::MAX, f64::MAX];
    let mut max = [f64::MIN, f64::MIN];
    for vertex in item.path.vertices() {
        min[0] = min[0].min((vertex.position.x - radius) as f64);
        min[1] = min[1].min((vertex.position.y - radius) as f64);
        max[0] = max[0].max((vertex.position.x + radius) as f64);
        max[1] = max[1].max((vertex.position.y + radius) as f64);
    }
    AABB::from_corners(min, max)
}

/// Every pair of indices whose grown bounding boxes overlap, `i < j`.
fn candidate_pairs(items: &[DrillItem], growth: crate::geometry::Length) -> Vec<(usize, usize)> {
    let boxes: Vec<DrillBox> =
        items.iter().enumerate().map(|(index, item)| DrillBox { index, envelope: item_envelope(item, growth) }).collect();
    let tree = RTree::bulk_load(boxes);

    let mut pairs = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let envelope = item_envelope(item, growth);
        for candidate in tree.locate_in_envelope_intersecting(&envelope) {
            if candidate.index > i {
                pairs.push((i, candidate.index));
            }
        }
    }
    pairs
}

pub fn check(data: &Data) -> DrcResult<Vec<Message>> {
    let clearance = data.settings.min_drill_drill_clearance;
    if clearance.is_zero() {
        return Ok(Vec::new());
    }
    let growth = clearance_growth(clearance);
    let items = collect_drill_items(data);
    let pairs = candidate_pairs(&items, growth);
    let areas: Vec<Areas> = items.iter().map(|item| areas(item, growth)).collect();

    let mut merged: HashMap<(Uuid, Uuid), IntPaths> = HashMap::new();
    for (i, j) in pairs {
        let (a, b) = (&areas[i], &areas[j]);
        let mut regions = kernel::intersect(&a.exact, &b.grown);
        let reverse = kernel::intersect(&b.exact, &a.grown);
        regions = kernel::unite_with(&regions, &reverse);
        if regions.is_empty() {
            continue;
        }
        let key = ordinal_key(a.uuid, b.uuid);
        merged
            .entry(key)
            .and_modify(|existing| *existing = kernel::unite_with(existing, &regions))
            .or_insert(regions);
    }

    let mut messages = Vec::with_capacity(merged.len());
    for ((a, b), regions) in merged {
        messages.push(Message::new(
            "drill_drill_clearance",
            vec![
                IdentityField { name: "a", value: IdentityValue::Uuid(a) },
                IdentityField { name: "b", value: IdentityValue::Uuid(b) },
            ],
            Severity::Error,
            "drills too close together",
            format!("Clearance between these drills is below the required {} nm.", clearance.get()),
            locations(&regions),
        ));
    }
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use super::*;
    use crate::data::{Segment, Via};
    use crate::geometry::{Point, PositiveLength, UnsignedLength};
    use crate::testutil::minimal_data;

    fn via_at(x: crate::geometry::Length) -> Via {
        Via {
            uuid: Uuid::new_v4(),
            position: Point::new(x, 0),
            drill_diameter: PositiveLength::new(300_000).unwrap(),
            pad_size: PositiveLength::new(500_000).unwrap(),
            stop_mask_diameter_top: None,
            stop_mask_diameter_bottom: None,
            start_layer: 0,
            end_layer: 1,
            drill_layer_span: None,
            connected_layers: Vec::new(),
        }
    }

    #[test]
    fn close_vias_clash() {
        let mut data = minimal_data();
        Arc::get_mut(&mut data.settings).unwrap().min_drill_drill_clearance =
            UnsignedLength::new(200_000).unwrap();
        let seg = Segment {
            uuid: Uuid::new_v4(),
            net: None,
            net_class: None,
            junctions: Vec::new(),
            traces: Vec::new(),
            vias: vec![via_at(0), via_at(400_000)],
        };
        Arc::get_mut(&mut data.segments).unwrap().push(seg);

        let messages = check(&data).unwrap();
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn far_vias_ok() {
        let mut data = minimal_data();
        Arc::get_mut(&mut data.settings).unwrap().min_drill_drill_clearance =
            UnsignedLength::new(200_000).unwrap();
        let seg = Segment {
            uuid: Uuid::new_v4(),
            net: None,
            net_class: None,
            junctions: Vec::new(),
            traces: Vec::new(),
            vias: vec![via_at(0), via_at(10_000_000)],
        };
        Arc::get_mut(&mut data.segments).unwrap().push(seg);

        assert!(check(&data).unwrap().is_empty());
    }

    #[test]
    fn zero_clearance_short_circuits() {
        let data = minimal_data();
        assert!(check(&data).unwrap().is_empty());
    }
}
