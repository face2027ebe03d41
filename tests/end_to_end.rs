//! End-to-end scenarios run through the full scheduler, mirroring the
//! worked examples in spec.md's testable-properties section.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use uuid::Uuid;

use pcb_drc::checks::build_scheduler;
use pcb_drc::data::{
    AllowedSlots, Data, Device, Net, NetClass, Pad, PadGeometry, Polygon, Segment, Settings, Trace, Via,
    Zone, ZoneLayers, ZoneRules,
};
use pcb_drc::geometry::{Path, PositiveLength, Point, Transform, UnsignedLength, Vertex};
use pcb_drc::layer::{Layer, LayerSpan};
use pcb_drc::scheduler::NullSink;

fn zero_settings() -> Settings {
    Settings {
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
    }
}

fn bare_board() -> Data {
    Data {
        settings: Arc::new(zero_settings()),
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

fn trace_segment(net: Option<Net>, net_class: Option<NetClass>, y: i64, layer: Layer) -> Segment {
    Segment {
        uuid: Uuid::new_v4(),
        net,
        net_class,
        junctions: Vec::new(),
        traces: vec![Trace {
            uuid: Uuid::new_v4(),
            p1: Point::new(0, y),
            p2: Point::new(10_000_000, y),
            width: PositiveLength::new(200_000).unwrap(),
            layer,
        }],
        vias: Vec::new(),
    }
}

fn run(data: &Data) -> pcb_drc::scheduler::RunResult {
    let scheduler = build_scheduler();
    let abort = AtomicBool::new(false);
    scheduler.run(data, &NullSink, &abort)
}

/// Scenario 1: two traces on the same layer, 100 um apart, belonging to
/// different nets, with a 200 um clearance rule — too close, must clash.
#[test]
fn two_close_traces_different_nets_clash() {
    let mut data = bare_board();
    Arc::get_mut(&mut data.settings).unwrap().min_copper_copper_clearance = UnsignedLength::new(200_000).unwrap();
    let layer = Layer::top_copper(2);
    let net_a = Some(Net { uuid: Uuid::new_v4(), name: "NET_A".into() });
    let net_b = Some(Net { uuid: Uuid::new_v4(), name: "NET_B".into() });
    let segments = Arc::get_mut(&mut data.segments).unwrap();
    segments.push(trace_segment(net_a, None, 0, layer));
    segments.push(trace_segment(net_b, None, 100_000, layer));

    let result = run(&data);
    assert!(result.errors.is_empty());
    let hits: Vec<_> = result.messages.iter().filter(|m| m.message.contains("copper")).collect();
    assert_eq!(hits.len(), 1);
}

/// Scenario 2: the same geometry, but both traces now belong to the same
/// net — the same-net exemption means no clash is reported.
#[test]
fn two_close_traces_same_net_ok() {
    let mut data = bare_board();
    Arc::get_mut(&mut data.settings).unwrap().min_copper_copper_clearance = UnsignedLength::new(200_000).unwrap();
    let layer = Layer::top_copper(2);
    let net = Some(Net { uuid: Uuid::new_v4(), name: "NET_A".into() });
    let segments = Arc::get_mut(&mut data.segments).unwrap();
    segments.push(trace_segment(net.clone(), None, 0, layer));
    segments.push(trace_segment(net, None, 100_000, layer));

    let result = run(&data);
    assert!(result.errors.is_empty());
    assert!(result.messages.iter().all(|m| !m.message.contains("too close")));
}

/// Scenario 3: a via whose annular ring falls below the board's minimum,
/// with a net class override making the effective minimum even stricter.
#[test]
fn minimum_pth_annular_ring_with_net_class_override() {
    let mut data = bare_board();
    Arc::get_mut(&mut data.settings).unwrap().min_pth_annular_ring = UnsignedLength::new(50_000).unwrap();
    let net_class = NetClass {
        uuid: Uuid::new_v4(),
        name: "power".into(),
        min_copper_copper_clearance: None,
        min_copper_width: None,
        min_via_drill_diameter: None,
        min_pth_annular_ring: Some(UnsignedLength::new(150_000).unwrap()),
    };
    let seg = Segment {
        uuid: Uuid::new_v4(),
        net: None,
        net_class: Some(net_class),
        junctions: Vec::new(),
        traces: Vec::new(),
        vias: vec![Via {
            uuid: Uuid::new_v4(),
            position: Point::origin(),
            drill_diameter: PositiveLength::new(500_000).unwrap(),
            pad_size: PositiveLength::new(700_000).unwrap(),
            stop_mask_diameter_top: None,
            stop_mask_diameter_bottom: None,
            start_layer: 0,
            end_layer: 1,
            drill_layer_span: None,
            connected_layers: Vec::new(),
        }],
    };
    Arc::get_mut(&mut data.segments).unwrap().push(seg);

    // Ring here is (700_000 - 500_000) / 2 = 100_000, below the net
    // class's overridden 150_000 minimum but above the board's 50_000.
    let result = run(&data);
    assert!(result.errors.is_empty());
    assert!(result.messages.iter().any(|m| m.message.to_lowercase().contains("annular")));
}

/// Scenario 4: a blind via on a board that forbids blind vias.
#[test]
fn forbidden_blind_via_policy() {
    let mut data = bare_board();
    data.stack_depth = 4;
    Arc::get_mut(&mut data.settings).unwrap().blind_vias_allowed = false;
    let seg = Segment {
        uuid: Uuid::new_v4(),
        net: None,
        net_class: None,
        junctions: Vec::new(),
        traces: Vec::new(),
        vias: vec![Via {
            uuid: Uuid::new_v4(),
            position: Point::origin(),
            drill_diameter: PositiveLength::new(300_000).unwrap(),
            pad_size: PositiveLength::new(600_000).unwrap(),
            stop_mask_diameter_top: None,
            stop_mask_diameter_bottom: None,
            start_layer: 0,
            end_layer: 1,
            drill_layer_span: Some(LayerSpan::new(0, 1)),
            connected_layers: Vec::new(),
        }],
    };
    Arc::get_mut(&mut data.segments).unwrap().push(seg);

    let result = run(&data);
    assert!(result.errors.is_empty());
    assert!(result.messages.iter().any(|m| m.message.contains("forbidden")));
}

/// Scenario 5: a device pad placed inside a board keepout zone that
/// forbids copper.
#[test]
fn keepout_zone_catches_device_copper() {
    let mut data = bare_board();
    let zone = Zone {
        uuid: Uuid::new_v4(),
        layers: ZoneLayers::Board(vec![Layer::top_copper(2)]),
        rules: ZoneRules { no_copper: true, no_exposure: false, no_devices: false },
        outline: Path::centered_rect(10_000_000, 10_000_000, 0).to_closed_path(),
    };
    Arc::get_mut(&mut data.board_zones).unwrap().push(zone);

    let device = Device {
        uuid: Uuid::new_v4(),
        instance_name: "U1".into(),
        transform: Transform::identity(),
        pads: vec![Pad {
            uuid: Uuid::new_v4(),
            lib_pkg_pad_name: None,
            transform: Transform::identity(),
            holes: Vec::new(),
            geometries: vec![(
                Layer::top_copper(2),
                vec![PadGeometry::Custom { outline: Path::centered_rect(1_000_000, 1_000_000, 0), offset: 0 }],
            )],
            layers_with_traces: Vec::new(),
            copper_clearance_override: None,
            net: None,
            net_class: None,
        }],
        polygons: Vec::new(),
        circles: Vec::new(),
        stroke_texts: Vec::new(),
        holes: Vec::new(),
        zones: Vec::new(),
    };
    Arc::get_mut(&mut data.devices).unwrap().push(device);

    let result = run(&data);
    assert!(result.errors.is_empty());
    assert!(result.messages.iter().any(|m| m.message.contains("keepout")));
}

/// Scenario 6: a board outline with an inner notch tighter than the
/// configured outline tool can cut.
#[test]
fn board_outline_inner_radius_too_small() {
    let mut data = bare_board();
    Arc::get_mut(&mut data.settings).unwrap().min_outline_tool_diameter = PositiveLength::new(3_000_000).unwrap();

    // A square with a sharp inward notch cut into one edge: the notch's
    // inner corners are perfectly square, far tighter than the ~1.5mm
    // radius the 3mm tool could cut.
    let notch = Path::new(vec![
        Vertex::straight(Point::new(0, 0)),
        Vertex::straight(Point::new(4_000_000, 0)),
        Vertex::straight(Point::new(4_000_000, 200_000)),
        Vertex::straight(Point::new(4_500_000, 200_000)),
        Vertex::straight(Point::new(4_500_000, 800_000)),
        Vertex::straight(Point::new(4_000_000, 800_000)),
        Vertex::straight(Point::new(4_000_000, 10_000_000)),
        Vertex::straight(Point::new(0, 10_000_000)),
    ])
    .to_closed_path();

    Arc::get_mut(&mut data.board_polygons).unwrap().push(Polygon {
        uuid: Uuid::new_v4(),
        layer: Layer::BoardOutlines,
        line_width: UnsignedLength::zero(),
        filled: false,
        path: notch,
    });

    let result = run(&data);
    assert!(result.errors.is_empty());
    assert!(result.messages.iter().any(|m| m.message.contains("inner radius")));
}
