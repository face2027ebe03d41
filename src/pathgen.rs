//! The path generator (spec.md §4.2): accumulates a per-layer polygon set
//! from the `Data` snapshot. Every rule check builds its working polygons
//! through this module so arc tolerance and orientation stay consistent
//! everywhere (spec.md §4.1 rationale).

use std::collections::HashSet;

use uuid::Uuid;

use crate::data::{Circle, Data, Hole, Pad, StrokeText, Trace, Via};
use crate::geometry::{Length, Path, PositiveLength, Transform, MAX_ARC_TOLERANCE_NM};
use crate::kernel::{self, IntPaths};
use crate::layer::Layer;

/// Which nets a generator call should include. `All` matches every object
/// regardless of net; `Nets` matches only the given set, where `None` in the
/// set denotes "no net" (planeless polygons, stroke texts, board polygons).
#[derive(Debug, Clone)]
pub enum NetFilter {
    All,
    Nets(HashSet<Option<Uuid>>),
}

impl NetFilter {
    #[must_use]
    pub fn one(net: Option<Uuid>) -> Self {
        let mut set = HashSet::new();
        set.insert(net);
        Self::Nets(set)
    }

    #[must_use]
    pub fn matches(&self, net: Option<Uuid>) -> bool {
        match self {
            Self::All => true,
            Self::Nets(set) => set.contains(&net),
        }
    }
}

pub(crate) fn flatten_tolerance() -> PositiveLength {
    PositiveLength::new(MAX_ARC_TOLERANCE_NM).expect("fixed positive constant")
}

/// Stateless-per-call polygon accumulator. Every `add_*` method unions its
/// shape into the internal buffer; [`PathGenerator::take_paths_to`] moves the
/// accumulated set out and resets the generator for reuse.
#[derive(Debug, Default)]
pub struct PathGenerator {
    paths: IntPaths,
}

impl PathGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn union_path(&mut self, path: &Path) {
        let ring = kernel::convert(path, flatten_tolerance());
        if ring.len() >= 3 {
            self.paths = kernel::unite_with(&self.paths, &[ring]);
        }
    }

    fn union_paths(&mut self, paths: &[Path]) {
        let rings = kernel::convert_paths(paths, flatten_tolerance());
        self.paths = kernel::unite_with(&self.paths, &rings);
    }

    /// Moves the accumulated polygon set into `out`, replacing it, and
    /// resets this generator to empty (spec.md §4.2).
    pub fn take_paths_to(&mut self, out: &mut IntPaths) {
        *out = std::mem::take(&mut self.paths);
    }

    #[must_use]
    pub fn into_paths(self) -> IntPaths {
        self.paths
    }

    /// `addCopper`: unions, in order, board polygons, board stroke texts,
    /// plane fragments (unless `ignore_planes`), device geometry, and
    /// segment vias/traces on `layer` whose net matches `net_filter`
    /// (spec.md §4.2).
    pub fn add_copper(&mut self, data: &Data, layer: Layer, net_filter: &NetFilter, ignore_planes: bool) {
        if net_filter.matches(None) {
            for poly in data.board_polygons.iter().filter(|p| p.layer == layer) {
                self.add_polygon(&poly.path, poly.line_width.get(), poly.filled, 0);
            }
            for st in data.board_stroke_texts.iter().filter(|s| s.layer == layer) {
                self.add_stroke_text(st, 0);
            }
        }

        if !ignore_planes {
            for plane in data.planes.iter().filter(|p| p.layer == layer) {
                let net = plane.net.as_ref().map(|n| n.uuid);
                if net_filter.matches(net) {
                    self.add_plane(&plane.fragments);
                }
            }
        }

        for device in data.devices.iter() {
            for pad in &device.pads {
                let net = pad.net.as_ref().map(|n| n.uuid);
                if net_filter.matches(net) {
                    self.add_pad(pad, layer, 0);
                }
            }
            if net_filter.matches(None) {
                for poly in device.polygons.iter().filter(|p| p.layer == layer) {
                    let placed = device.transform.map_path(&poly.path);
                    self.add_polygon(&placed, poly.line_width.get(), poly.filled, 0);
                }
                for circle in device.circles.iter().filter(|c| c.layer == layer) {
                    self.add_circle(circle, &device.transform, 0);
                }
                // Stroke-text layers are independent of the device's mirror
                // (spec.md §4.2 step 4) and `StrokeText` positions are
                // already absolute, so no device transform is applied here.
                for st in device.stroke_texts.iter().filter(|s| s.layer == layer) {
                    self.add_stroke_text(st, 0);
                }
            }
        }

        for segment in data.segments.iter() {
            let net = segment.net.as_ref().map(|n| n.uuid);
            if !net_filter.matches(net) {
                continue;
            }
            for via in &segment.vias {
                if via.on_layer(layer) {
                    self.add_via(via, 0);
                }
            }
            for trace in &segment.traces {
                if trace.layer == layer {
                    self.add_trace(trace, 0);
                }
            }
        }
    }

    /// `addStopMaskOpenings`: board polygons/stroke-texts on `stop_mask_layer`,
    /// holes carrying a stop-mask offset, and device equivalents, each grown
    /// by `offset` (spec.md §4.2).
    pub fn add_stop_mask_openings(&mut self, data: &Data, stop_mask_layer: Layer, offset: Length) {
        let top = stop_mask_layer.is_top();

        for poly in data.board_polygons.iter().filter(|p| p.layer == stop_mask_layer) {
            self.add_polygon(&poly.path, poly.line_width.get(), poly.filled, offset);
        }
        for st in data.board_stroke_texts.iter().filter(|s| s.layer == stop_mask_layer) {
            self.add_stroke_text(st, offset);
        }
        for hole in data.board_holes.iter() {
            if let Some(hole_offset) = hole.stop_mask_offset {
                self.add_hole(hole.diameter.get(), hole.path.path(), &Transform::identity(), hole_offset + offset);
            }
        }

        for device in data.devices.iter() {
            for poly in device.polygons.iter().filter(|p| p.layer == stop_mask_layer) {
                let placed = device.transform.map_path(&poly.path);
                self.add_polygon(&placed, poly.line_width.get(), poly.filled, offset);
            }
            for circle in device.circles.iter().filter(|c| c.layer == stop_mask_layer) {
                self.add_circle(circle, &device.transform, offset);
            }
            for st in device.stroke_texts.iter().filter(|s| s.layer == stop_mask_layer) {
                self.add_stroke_text(st, offset);
            }
            for hole in &device.holes {
                if let Some(hole_offset) = hole.stop_mask_offset {
                    self.add_hole(hole.diameter.get(), hole.path.path(), &device.transform, hole_offset + offset);
                }
            }
            for pad in &device.pads {
                self.add_pad(pad, stop_mask_layer, offset);
            }
        }

        for segment in data.segments.iter() {
            for via in &segment.vias {
                let stop_mask_diameter = if top { via.stop_mask_diameter_top } else { via.stop_mask_diameter_bottom };
                if let Some(diameter) = stop_mask_diameter {
                    self.add_disc(via.position, diameter + 2 * offset);
                }
            }
        }
    }

    /// Unions a via's copper disc (pad size grown by `2*offset`).
    pub fn add_via(&mut self, via: &Via, offset: Length) {
        self.add_disc(via.position, via.pad_size.get() + 2 * offset);
    }

    /// Unions a trace's stroked obround (width grown by `2*offset`).
    pub fn add_trace(&mut self, trace: &Trace, offset: Length) {
        let centerline = Path::obround(trace.p1, trace.p2, 0);
        let width = (trace.width.get() + 2 * offset).max(1);
        let width = PositiveLength::new(width).expect("trace width stays positive after offset");
        for stroke in centerline.to_outline_strokes(width) {
            self.union_path(&stroke);
        }
    }

    /// Unions precomputed plane fragments verbatim.
    pub fn add_plane(&mut self, fragments: &[Path]) {
        self.union_paths(fragments);
    }

    /// Unions a polygon's outline stroke (if `line_width > 0`) and its filled
    /// area (if `filled` and the path is closed), both grown by `offset`.
    pub fn add_polygon(&mut self, path: &Path, line_width: Length, filled: bool, offset: Length) {
        let stroke_width = line_width + 2 * offset;
        if stroke_width > 0 {
            if let Some(width) = PositiveLength::new(stroke_width) {
                for stroke in path.to_outline_strokes(width) {
                    self.union_path(&stroke);
                }
            }
        }
        if filled && path.is_closed() {
            self.add_offset_area(path, offset);
        }
    }

    /// Unions a circle's filled disc, grown by `2*offset`, optionally
    /// repositioned by `transform` (device-local circles).
    pub fn add_circle(&mut self, circle: &Circle, transform: &Transform, offset: Length) {
        let center = transform.map_point(circle.center);
        self.add_disc(center, circle.diameter.get() + 2 * offset);
    }

    /// Unions a stroke text's pre-stroked glyph outlines, grown by `offset`.
    pub fn add_stroke_text(&mut self, text: &StrokeText, offset: Length) {
        if offset == 0 {
            self.union_paths(&text.stroked_paths);
        } else {
            for path in &text.stroked_paths {
                self.add_offset_area(path, offset);
            }
        }
    }

    /// Unions a hole's stroked outline (round or slot), grown by `2*offset`,
    /// optionally repositioned by `transform` (device-local holes).
    pub fn add_hole(&mut self, diameter: Length, path: &Path, transform: &Transform, offset: Length) {
        let placed = transform.map_path(path);
        let width = (diameter + 2 * offset).max(1);
        let width = PositiveLength::new(width).expect("hole width stays positive after offset");
        if placed.vertex_count() <= 1 {
            self.add_disc(placed.vertices().first().map_or(transform.position, |v| v.position), width.get());
        } else {
            for stroke in placed.to_outline_strokes(width) {
                self.union_path(&stroke);
            }
        }
    }

    /// Unions every `PadGeometry` a pad carries on `layer`, grown by
    /// `offset`, placed by the pad's own (already absolute) transform.
    pub fn add_pad(&mut self, pad: &Pad, layer: Layer, offset: Length) {
        for geometry in pad.geometries_on(layer) {
            let grown = geometry.with_offset(offset);
            for outline in grown.to_outlines() {
                let placed = pad.transform.map_path(&outline);
                self.union_path(&placed);
            }
        }
    }

    fn add_disc(&mut self, center: crate::geometry::Point, diameter: Length) {
        if let Some(diameter) = PositiveLength::new(diameter) {
            let circle = Path::circle(diameter).translated(center.x, center.y);
            self.union_path(&circle);
        }
    }

    fn add_offset_area(&mut self, path: &Path, offset: Length) {
        if offset == 0 {
            self.union_path(path);
            return;
        }
        let ring = kernel::convert(path, flatten_tolerance());
        let grown = kernel::offset(&[ring], offset, flatten_tolerance());
        self.paths = kernel::unite_with(&self.paths, &grown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Polygon, Settings, AllowedSlots};
    use crate::geometry::UnsignedLength;
    use std::sync::Arc;

    fn minimal_data() -> Data {
        Data {
            settings: Arc::new(Settings {
                min_copper_copper_clearance: UnsignedLength::zero(),
                min_copper_board_clearance: UnsignedLength::zero(),
                min_copper_npth_clearance: UnsignedLength::zero(),
                min_drill_drill_clearance: UnsignedLength::zero(),
                min_drill_board_clearance: UnsignedLength::zero(),
                min_silkscreen_stopmask_clearance: UnsignedLength::zero(),
                min_copper_width: UnsignedLength::zero(),
                min_pth_annular_ring: UnsignedLength::zero(),
                min_npth_drill_diameter: UnsignedLength::zero(),
                min_pth_drill_diameter: UnsignedLength::zero(),
                min_npth_slot_width: UnsignedLength::zero(),
                min_pth_slot_width: UnsignedLength::zero(),
                min_silkscreen_width: UnsignedLength::zero(),
                min_silkscreen_text_height: UnsignedLength::zero(),
                min_outline_tool_diameter: PositiveLength::new(2_000_000).unwrap(),
                allowed_npth_slots: AllowedSlots::Any,
                allowed_pth_slots: AllowedSlots::Any,
                blind_vias_allowed: true,
                buried_vias_allowed: true,
            }),
            stack_depth: 2,
            top_silkscreen_enabled: true,
            bottom_silkscreen_enabled: true,
            enabled_copper_layers: Arc::new(vec![Layer::top_copper(2), Layer::bot_copper(2)]),
            net_classes: Arc::new(Vec::new()),
            segments: Arc::new(Vec::new()),
            planes: Arc::new(Vec::new()),
            board_polygons: Arc::new(Vec::new()),
            board_circles: Arc::new(Vec::new()),
            board_stroke_texts: Arc::new(Vec::new()),
            board_holes: Arc::new(Vec::new()),
            board_zones: Arc::new(Vec::new()),
            devices: Arc::new(Vec::new()),
            air_wires: Arc::new(Vec::new()),
            unplaced_components: Arc::new(Vec::new()),
            quick: false,
        }
    }

    #[test]
    fn add_copper_collects_board_polygon() {
        let mut data = minimal_data();
        let layer = Layer::top_copper(2);
        let poly = Polygon {
            uuid: Uuid::new_v4(),
            layer,
            line_width: UnsignedLength::zero(),
            filled: true,
            path: Path::centered_rect(1_000_000, 1_000_000, 0).to_closed_path(),
        };
        Arc::get_mut(&mut data.board_polygons).unwrap().push(poly);

        let mut gen = PathGenerator::new();
        gen.add_copper(&data, layer, &NetFilter::All, false);
        assert!(!gen.into_paths().is_empty());
    }

    #[test]
    fn add_trace_produces_nonempty_stroke() {
        let trace = Trace {
            uuid: Uuid::new_v4(),
            p1: crate::geometry::Point::new(0, 0),
            p2: crate::geometry::Point::new(10_000_000, 0),
            width: PositiveLength::new(200_000).unwrap(),
            layer: Layer::top_copper(2),
        };
        let mut gen = PathGenerator::new();
        gen.add_trace(&trace, 0);
        assert!(!gen.into_paths().is_empty());
    }

    #[test]
    fn take_paths_to_resets_generator() {
        let trace = Trace {
            uuid: Uuid::new_v4(),
            p1: crate::geometry::Point::new(0, 0),
            p2: crate::geometry::Point::new(10_000_000, 0),
            width: PositiveLength::new(200_000).unwrap(),
            layer: Layer::top_copper(2),
        };
        let mut gen = PathGenerator::new();
        gen.add_trace(&trace, 0);
        let mut out = IntPaths::new();
        gen.take_paths_to(&mut out);
        assert!(!out.is_empty());
    }
}
