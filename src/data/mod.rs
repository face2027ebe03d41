//! The input snapshot `Data`: the only source of truth the DRC sees once a
//! run has started (spec.md §3.3, §4.3).
//!
//! `Data` is built once, on the caller's thread, from a live board; every
//! worker thread then holds its own `Arc`-cheap clone. Nothing in this module
//! is ever mutated after [`Data`] is constructed — see the snapshot-immutability
//! invariant in spec.md §3.6 and SPEC_FULL.md §3.

pub mod pad_geometry;
pub mod settings;

pub use pad_geometry::PadGeometry;
pub use settings::{AllowedSlots, NetClass, Settings};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Length, NonEmptyPath, Path, PositiveLength, Transform, UnsignedLength};
use crate::layer::{Layer, LayerSpan};

/// A board net, referenced by its uuid and (for display/ordering) its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Net {
    pub uuid: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Junction {
    pub uuid: Uuid,
    pub position: crate::geometry::Point,
    pub connected_traces: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trace {
    pub uuid: Uuid,
    pub p1: crate::geometry::Point,
    pub p2: crate::geometry::Point,
    pub width: PositiveLength,
    pub layer: Layer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Via {
    pub uuid: Uuid,
    pub position: crate::geometry::Point,
    pub drill_diameter: PositiveLength,
    pub pad_size: PositiveLength,
    pub stop_mask_diameter_top: Option<Length>,
    pub stop_mask_diameter_bottom: Option<Length>,
    pub start_layer: u32,
    pub end_layer: u32,
    pub drill_layer_span: Option<LayerSpan>,
    pub connected_layers: Vec<Layer>,
}

impl Via {
    #[must_use]
    pub fn span(&self) -> LayerSpan {
        LayerSpan::new(self.start_layer, self.end_layer)
    }

    #[must_use]
    pub fn is_blind(&self, stack_depth: u32) -> bool {
        self.span().is_blind(stack_depth)
    }

    #[must_use]
    pub fn is_buried(&self, stack_depth: u32) -> bool {
        self.span().is_buried(stack_depth)
    }

    #[must_use]
    pub fn on_layer(&self, layer: Layer) -> bool {
        layer.copper_number().is_some_and(|n| self.span().contains(n))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hole {
    pub uuid: Uuid,
    pub diameter: PositiveLength,
    pub path: NonEmptyPath,
    pub stop_mask_offset: Option<Length>,
}

impl Hole {
    /// A drill has a single vertex; `>= 2` vertices is a slot (spec.md §4.5.9).
    #[must_use]
    pub fn is_slot(&self) -> bool {
        self.path.path().vertex_count() >= 2
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pad {
    pub uuid: Uuid,
    pub lib_pkg_pad_name: Option<String>,
    pub transform: Transform,
    pub holes: Vec<Hole>,
    /// Geometry per layer this pad has copper on.
    pub geometries: Vec<(Layer, Vec<PadGeometry>)>,
    pub layers_with_traces: Vec<Layer>,
    pub copper_clearance_override: Option<UnsignedLength>,
    pub net: Option<Net>,
    pub net_class: Option<NetClass>,
}

impl Pad {
    #[must_use]
    pub fn geometries_on(&self, layer: Layer) -> &[PadGeometry] {
        self.geometries
            .iter()
            .find(|(l, _)| *l == layer)
            .map_or(&[], |(_, g)| g.as_slice())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub uuid: Uuid,
    pub net: Option<Net>,
    pub net_class: Option<NetClass>,
    pub junctions: Vec<Junction>,
    pub traces: Vec<Trace>,
    pub vias: Vec<Via>,
}

impl Segment {
    /// `true` iff the segment carries no geometry at all (spec.md §4.5.18).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.junctions.is_empty() && self.traces.is_empty() && self.vias.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plane {
    pub uuid: Uuid,
    pub net: Option<Net>,
    pub net_class: Option<NetClass>,
    pub layer: Layer,
    pub min_width: UnsignedLength,
    pub outline: Path,
    /// Pre-computed by the external plane-fragment builder; consumed as-is.
    pub fragments: Vec<Path>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polygon {
    pub uuid: Uuid,
    pub layer: Layer,
    pub line_width: UnsignedLength,
    pub filled: bool,
    pub path: Path,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circle {
    pub uuid: Uuid,
    pub center: crate::geometry::Point,
    pub diameter: PositiveLength,
    pub layer: Layer,
    pub line_width: UnsignedLength,
    pub filled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrokeText {
    pub uuid: Uuid,
    pub position: crate::geometry::Point,
    pub rotation: crate::geometry::Angle,
    pub mirror: bool,
    pub layer: Layer,
    pub stroke_width: PositiveLength,
    pub height: UnsignedLength,
    pub stroked_paths: Vec<Path>,
}

/// Which prohibitions a [`Zone`] enforces (spec.md §3.3, §4.5.11). Any
/// combination may be set, so this is a small set of independent flags
/// rather than an enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ZoneRules {
    pub no_copper: bool,
    pub no_exposure: bool,
    pub no_devices: bool,
}

/// Which side(s) of the board a device-owned zone applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FootprintLayers {
    pub top: bool,
    pub inner: bool,
    pub bottom: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ZoneLayers {
    Board(Vec<Layer>),
    Footprint(FootprintLayers),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub uuid: Uuid,
    pub layers: ZoneLayers,
    pub rules: ZoneRules,
    pub outline: Path,
}

impl Zone {
    /// Resolves this zone's copper layers given the board's `stack_depth`
    /// and, for device zones, the owning device's mirror state.
    #[must_use]
    pub fn effective_copper_layers(&self, stack_depth: u32, device_mirrored: bool) -> Vec<Layer> {
        match &self.layers {
            ZoneLayers::Board(layers) => layers.iter().copied().filter(|l| l.is_copper()).collect(),
            ZoneLayers::Footprint(flags) => {
                let mut out = Vec::new();
                let top_is_physically_top = !device_mirrored;
                if (flags.top && top_is_physically_top) || (flags.bottom && !top_is_physically_top) {
                    out.push(Layer::top_copper(stack_depth));
                }
                if (flags.bottom && top_is_physically_top) || (flags.top && !top_is_physically_top) {
                    out.push(Layer::bot_copper(stack_depth));
                }
                let _ = flags.inner; // inner-layer zones are not modeled by ordinal span here.
                out
            }
        }
    }

    #[must_use]
    pub fn is_useless(&self, stack_depth: u32, device_mirrored: bool) -> bool {
        let no_rules = !self.rules.no_copper && !self.rules.no_exposure && !self.rules.no_devices;
        no_rules || self.effective_copper_layers(stack_depth, device_mirrored).is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub uuid: Uuid,
    pub instance_name: String,
    pub transform: Transform,
    pub pads: Vec<Pad>,
    pub polygons: Vec<Polygon>,
    pub circles: Vec<Circle>,
    pub stroke_texts: Vec<StrokeText>,
    pub holes: Vec<Hole>,
    pub zones: Vec<Zone>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum AirWireAnchor {
    Pad(Uuid),
    Junction(Uuid),
    Via(Uuid),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirWire {
    pub a: AirWireAnchor,
    pub b: AirWireAnchor,
    pub a_position: crate::geometry::Point,
    pub b_position: crate::geometry::Point,
    pub net_name: String,
}

/// The full, immutable board snapshot. Cheap to clone: every collection is
/// wrapped in an [`Arc`] so cloning `Data` for a worker thread never copies
/// the payload (SPEC_FULL.md §3, "Deep shared input" in spec.md §9).
///
/// Derives `Serialize`/`Deserialize` so a snapshot can be read from the JSON
/// file the stand-alone binary consumes (SPEC_FULL.md §4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Data {
    pub settings: Arc<Settings>,
    pub stack_depth: u32,
    pub top_silkscreen_enabled: bool,
    pub bottom_silkscreen_enabled: bool,
    pub enabled_copper_layers: Arc<Vec<Layer>>,
    pub net_classes: Arc<Vec<NetClass>>,
    pub segments: Arc<Vec<Segment>>,
    pub planes: Arc<Vec<Plane>>,
    pub board_polygons: Arc<Vec<Polygon>>,
    pub board_circles: Arc<Vec<Circle>>,
    pub board_stroke_texts: Arc<Vec<StrokeText>>,
    pub board_holes: Arc<Vec<Hole>>,
    pub board_zones: Arc<Vec<Zone>>,
    pub devices: Arc<Vec<Device>>,
    pub air_wires: Arc<Vec<AirWire>>,
    pub unplaced_components: Arc<Vec<(Uuid, String)>>,
    pub quick: bool,
}

impl Data {
    /// `max(settings.cuCu, netClass?.minCuCu)`, falling back to the board
    /// setting when there is no override (spec.md §4.3).
    #[must_use]
    pub fn min_copper_copper_clearance(&self, net_class: Option<&NetClass>) -> UnsignedLength {
        let base = self.settings.min_copper_copper_clearance;
        match net_class.and_then(|nc| nc.min_copper_copper_clearance) {
            Some(over) => base.max(over),
            None => base,
        }
    }

    #[must_use]
    pub fn min_copper_width(&self, net_class: Option<&NetClass>) -> UnsignedLength {
        let base = self.settings.min_copper_width;
        match net_class.and_then(|nc| nc.min_copper_width) {
            Some(over) => base.max(over),
            None => base,
        }
    }

    #[must_use]
    pub fn min_via_drill_diameter(&self, net_class: Option<&NetClass>) -> UnsignedLength {
        let base = self.settings.min_pth_drill_diameter;
        match net_class.and_then(|nc| nc.min_via_drill_diameter) {
            Some(over) => base.max(over),
            None => base,
        }
    }

    #[must_use]
    pub fn min_pth_annular_ring(&self, net_class: Option<&NetClass>) -> UnsignedLength {
        let base = self.settings.min_pth_annular_ring;
        match net_class.and_then(|nc| nc.min_pth_annular_ring) {
            Some(over) => base.max(over),
            None => base,
        }
    }

    #[must_use]
    pub fn copper_layers(&self) -> Vec<Layer> {
        (0..self.stack_depth)
            .map(|ordinal| Layer::Copper { ordinal, stack_depth: self.stack_depth })
            .collect()
    }
}
