//! Shared idioms every rule check uses (spec.md §4.5 preamble):
//! zero-tolerance short-circuiting, arc-tolerance slack, and turning kernel
//! output back into message locations.

use uuid::Uuid;

use crate::data::Data;
use crate::geometry::{Length, Path, UnsignedLength, ARC_TOLERANCE_SLACK_NM};
use crate::kernel::{self, IntPaths};
use crate::layer::{Layer, LayerSpan};
use crate::message::{Object, ObjectKind};

/// Grows an offset by `clearance` minus the arc-tolerance slack, the pattern
/// used everywhere a check builds a "forbidden zone" by offsetting an object
/// outward (spec.md §4.5 preamble).
#[must_use]
pub fn clearance_growth(clearance: UnsignedLength) -> Length {
    clearance.get() - ARC_TOLERANCE_SLACK_NM
}

/// Converts a kernel polygon set into the `Vec<Path>` a [`crate::message::Message`]
/// carries as its `locations`, after a union/intersection/flatten pass.
#[must_use]
pub fn locations(paths: &IntPaths) -> Vec<Path> {
    kernel::convert_back_paths(paths)
}

/// One fully-generated copper-bearing object used by the Cu↔Cu, Cu↔board,
/// and drill-style pairwise checks: its identity, net, layer span, and two
/// polygon sets (exact outline and the same outline grown by its effective
/// clearance).
pub struct CopperItem {
    pub object: Object,
    pub net: Option<Uuid>,
    pub layer_span: LayerSpan,
    pub clearance: UnsignedLength,
    pub copper_area: IntPaths,
    pub clearance_area: IntPaths,
}

/// Board outline + cutout area stroked at `2*clearance - 2*maxArcTol`
/// (floored at 1 nm) and united — the restricted area Cu↔board-edge and
/// drill↔board-edge both intersect against (spec.md §4.5.2, §4.5.5).
#[must_use]
pub fn board_edge_restricted_area(data: &Data, clearance: UnsignedLength) -> IntPaths {
    use crate::geometry::PositiveLength;

    let stroke_width = (2 * clearance.get() - 2 * crate::geometry::MAX_ARC_TOLERANCE_NM).max(1);
    let Some(width) = PositiveLength::new(stroke_width) else {
        return IntPaths::new();
    };

    let mut gen = crate::pathgen::PathGenerator::new();
    for poly in data.board_polygons.iter().filter(|p| matches!(p.layer, Layer::BoardOutlines | Layer::BoardCutouts)) {
        for stroke in poly.path.to_outline_strokes(width) {
            gen.add_polygon(&stroke, 0, true, 0);
        }
    }
    gen.into_paths()
}

/// `true` iff `span` touches any of the board's copper layers — used to skip
/// work for items that can never participate in a copper-layer check.
#[must_use]
pub fn has_copper_overlap(a: LayerSpan, b: LayerSpan) -> bool {
    a.intersect(b).is_some()
}

/// Pulls the identifying uuid out of an [`Object`]'s kind, the way every
/// pairwise check needs to key a `HashMap` or report an identity field.
#[must_use]
pub fn object_uuid(object: &Object) -> Uuid {
    match &object.kind {
        ObjectKind::Pad { pad, .. } => *pad,
        ObjectKind::Via { via } => *via,
        ObjectKind::Trace { trace } => *trace,
        ObjectKind::Plane { plane } => *plane,
        ObjectKind::Polygon { polygon } => *polygon,
        ObjectKind::Circle { circle } => *circle,
        ObjectKind::StrokeText { stroke_text } => *stroke_text,
        ObjectKind::Device { device } => *device,
        ObjectKind::Zone { zone } => *zone,
        ObjectKind::Segment { segment } => *segment,
        ObjectKind::Junction { junction } => *junction,
    }
}
