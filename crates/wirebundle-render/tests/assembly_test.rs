use std::path::PathBuf;
use wirebundle_core::{DescriptionLoader, Gauge, LayoutConfig};
use wirebundle_render::model::PartRole;
use wirebundle_render::{
    Assembly, AssemblyLayout, Error, Part, SvgRenderOptions, render_assembly,
    render_assembly_svg,
};

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn loader() -> DescriptionLoader {
    DescriptionLoader::new(workspace_root().join("fixtures").join("assets"))
}

fn load_part(loader: &DescriptionLoader, config: &LayoutConfig, id: &str) -> Part {
    let record = loader
        .load_part(id, &config.connection_types)
        .expect("part description");
    Part::from_record(record).expect("part drawing")
}

fn controller_layout() -> (Assembly, AssemblyLayout) {
    let config = LayoutConfig::default();
    let mut assembly = Assembly::load(&loader(), "controller.json5", &config).expect("assembly");
    let layout = assembly.layout(&config).expect("layout");
    (assembly, layout)
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn each_main_wire_set_resolves_to_its_own_socket() {
    let config = LayoutConfig::default();
    let assembly = Assembly::load(&loader(), "controller.json5", &config).expect("assembly");
    assert_eq!(assembly.name(), "controller");
    assert_eq!(assembly.main().id(), "controller.json5");
    assert_eq!(assembly.sockets().len(), 2);

    let connections = assembly.connections();
    assert_eq!(connections.len(), 2);

    let power = &connections[0];
    assert_eq!(power.tag(), "power");
    assert_eq!(power.target().part.index(), 1);
    // 12 on the controller, wildcard on the battery.
    assert_eq!(power.gauge(), Gauge::from(12));
    assert_close(power.wire_width(), 15.0);

    let can = &connections[1];
    assert_eq!(can.tag(), "can_a");
    assert_eq!(can.target().part.index(), 2);
    // Wildcard on the controller inherits the bus gauge.
    assert_eq!(can.gauge(), Gauge::from(22));
    assert_close(can.wire_width(), 2.0);
}

#[test]
fn gauge_class_overrides_socket_stroke_width() {
    let config = LayoutConfig::default();
    let assembly = Assembly::load(&loader(), "controller.json5", &config).expect("assembly");
    let battery = assembly.sockets()[0].drawing();
    let class = battery.mapped_class("cls-power").expect("battery defines cls-power");

    let overrides = battery.style_overrides();
    let props = overrides.get(&format!(".{class}")).expect("override");
    assert_eq!(props.get("stroke-width").map(String::as_str), Some("15px"));

    // The bus has no gauge class on the main side of its connection.
    assert!(assembly.sockets()[1].drawing().style_overrides().is_empty());
}

#[test]
fn unmatched_wire_set_is_a_configuration_error() {
    let config = LayoutConfig::default();
    let err = Assembly::load(&loader(), "missing_bus.json5", &config).unwrap_err();
    match &err {
        Error::UnmatchedWireSet { tag, main_part } => {
            assert_eq!(tag, "can_a");
            assert_eq!(main_part, "controller.json5");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.is_configuration_error());
}

#[test]
fn concrete_gauge_mismatch_is_a_configuration_error() {
    let config = LayoutConfig::default();
    let loader = loader();
    let main = load_part(&loader, &config, "controller.json5");
    let sockets = vec![
        load_part(&loader, &config, "thin_battery.json5"),
        load_part(&loader, &config, "bus.json5"),
    ];

    let err = Assembly::new("conflict", main, sockets, &config.gauge_widths).unwrap_err();
    match &err {
        Error::GaugeConflict {
            tag,
            socket_part,
            main_gauge,
            socket_gauge,
            ..
        } => {
            assert_eq!(tag, "power");
            assert_eq!(socket_part, "thin_battery.json5");
            assert_eq!(*main_gauge, Gauge::from(12));
            assert_eq!(*socket_gauge, Gauge::from(22));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.is_configuration_error());
}

#[test]
fn unregistered_gauge_is_a_configuration_error() {
    let mut config = LayoutConfig::default();
    config.gauge_widths = wirebundle_core::GaugeTable::from_entries([(22, 2.0)]);
    let err = Assembly::load(&loader(), "controller.json5", &config).unwrap_err();
    assert!(
        matches!(
            err,
            Error::Core(wirebundle_core::Error::UnregisteredGauge { .. })
        ),
        "{err}"
    );
    assert!(err.is_configuration_error());
}

#[test]
fn missing_description_is_not_a_configuration_error() {
    let config = LayoutConfig::default();
    let err = Assembly::load(&loader(), "nope.json5", &config).unwrap_err();
    assert!(matches!(err, Error::Core(wirebundle_core::Error::Io { .. })), "{err}");
    assert!(!err.is_configuration_error());
}

#[test]
fn parts_are_centred_and_sockets_follow_the_routing_region() {
    let (_, layout) = controller_layout();

    let main = &layout.parts[0];
    assert_eq!(main.role, PartRole::Main);
    assert_close(main.x, 20.0);
    assert_close(main.y, 20.0);

    // Two 60px sockets with a 60px gap, centred against the 200px controller.
    let battery = &layout.parts[1];
    let bus = &layout.parts[2];
    assert_eq!(battery.role, PartRole::Socket);
    assert_close(battery.y, 30.0);
    assert_close(bus.y, 150.0);

    // The widest group is the gauge-12 power bundle: 2 * 15 + 7.5.
    assert_close(layout.routing_region.x, 160.0);
    assert_close(layout.routing_region.width, 37.5);
    assert_close(battery.x, 160.0 + 37.5 + 20.0);
    assert_close(bus.x, battery.x);

    assert_close(layout.width, 217.5 + 80.0 + 20.0);
    assert_close(layout.height, 220.0 + 20.0);
}

#[test]
fn separate_bands_form_separate_groups() {
    let (_, layout) = controller_layout();
    assert_eq!(layout.groups.len(), 2);

    let power = &layout.groups[0];
    assert_eq!(power.tracks.len(), 1);
    assert_eq!(power.tracks[0].tag, "power");
    assert_eq!(power.tracks[0].target_part, "battery.json5");
    assert_close(power.tracks[0].x, 160.0);
    assert_close(power.width, 37.5);
    assert_eq!(power.collisions, 0);
    assert!(!power.approximate);

    let can = &layout.groups[1];
    assert_eq!(can.tracks[0].tag, "can_a");
    assert_close(can.width, 6.0);
}

#[test]
fn wires_are_routed_through_their_track() {
    let (_, layout) = controller_layout();
    assert_eq!(layout.wires.len(), 4);

    let red = layout
        .wires
        .iter()
        .find(|w| w.tag == "power" && w.key == "red")
        .expect("red wire");
    assert_eq!(red.color, "#e6282b");
    assert_close(red.stroke_width, 15.0);
    let pts: Vec<(f64, f64)> = red.points.iter().map(|p| (p.x, p.y)).collect();
    // The bundle rises towards the battery, so red (the upper wire) takes the first lane.
    assert_eq!(
        pts,
        vec![(139.0, 60.0), (167.5, 60.0), (167.5, 50.0), (218.5, 50.0)]
    );

    let black = layout
        .wires
        .iter()
        .find(|w| w.tag == "power" && w.key == "black")
        .expect("black wire");
    assert_close(black.points[1].x, 190.0);
    assert_close(black.points[3].y, 70.0);

    let green = layout
        .wires
        .iter()
        .find(|w| w.tag == "can_a" && w.key == "green")
        .expect("green wire");
    assert_eq!(green.color, "#37b04a");
    assert_close(green.points[1].x, 161.0);
}

#[test]
fn shared_band_takes_the_crossing_free_track_order() {
    let config = LayoutConfig::default();
    let mut assembly = Assembly::load(&loader(), "hub.json5", &config).expect("assembly");
    let layout = assembly.layout(&config).expect("layout");

    // can_b leaves inside the band can_a sweeps up through, so both share one group.
    assert_eq!(layout.groups.len(), 1);
    let group = &layout.groups[0];
    assert_eq!(group.collisions, 0);
    assert!(!group.approximate);
    assert_close(group.min_y, 23.0);
    assert_close(group.max_y, 191.0);

    // The long bundle to the lower bus goes on the inside track.
    let tags: Vec<&str> = group.tracks.iter().map(|t| t.tag.as_str()).collect();
    assert_eq!(tags, vec!["can_b", "can_a"]);
    assert_eq!(group.tracks[0].target_part, "bus_b.json5");
    assert_close(group.tracks[0].x, 160.0);
    assert_close(group.tracks[1].x, 176.0);

    assert_close(layout.routing_region.width, 22.0);
    assert_close(layout.parts[2].x, 202.0);
    assert_close(layout.parts[2].y, 150.0);

    let green = layout
        .wires
        .iter()
        .find(|w| w.tag == "can_b" && w.key == "green")
        .expect("green wire");
    let pts: Vec<(f64, f64)> = green.points.iter().map(|p| (p.x, p.y)).collect();
    assert_eq!(
        pts,
        vec![(139.0, 64.0), (161.0, 64.0), (161.0, 190.0), (203.0, 190.0)]
    );
}

#[test]
fn layout_is_stable_across_passes() {
    let config = LayoutConfig::default();
    let mut assembly = Assembly::load(&loader(), "controller.json5", &config).expect("assembly");
    let first = assembly.layout(&config).expect("layout");
    let second = assembly.layout(&config).expect("layout");
    assert_eq!(
        first.to_json(false).expect("json"),
        second.to_json(false).expect("json")
    );
}

#[test]
fn layout_json_round_trips_through_serde() {
    let (_, layout) = controller_layout();
    let json = layout.to_json(true).expect("json");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["parts"][0]["role"], "main");
    assert_eq!(value["wires"].as_array().map(Vec::len), Some(4));
}

#[test]
fn rendered_svg_composes_drawings_and_wires() {
    let (assembly, layout) = controller_layout();
    let svg = render_assembly_svg(&assembly, &layout, &SvgRenderOptions::default());

    let doc = roxmltree::Document::parse(&svg).expect("valid SVG");
    let root = doc.root_element();
    assert_eq!(root.attribute("width"), Some("317.5"));
    assert_eq!(root.attribute("height"), Some("240"));

    let paths: Vec<_> = root
        .children()
        .filter(|n| n.has_tag_name("path"))
        .collect();
    assert_eq!(paths.len(), 4);
    let style = paths[0].attribute("style").unwrap_or_default();
    assert!(style.contains("stroke-width:15px"), "{style}");
    assert!(style.contains("stroke-linejoin:round"), "{style}");
    assert_eq!(paths[0].attribute("d"), Some("M139,60 H167.5 V50 H218.5"));

    let groups: Vec<_> = root.children().filter(|n| n.has_tag_name("g")).collect();
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0].attribute("transform"), Some("translate(20, 20)"));
    assert_eq!(groups[1].attribute("transform"), Some("translate(217.5, 30)"));

    assert!(!root.children().any(|n| n.has_tag_name("rect")));
}

#[test]
fn debug_regions_are_optional_overlays() {
    let (assembly, layout) = controller_layout();
    let options = SvgRenderOptions {
        include_debug_regions: true,
    };
    let svg = render_assembly_svg(&assembly, &layout, &options);
    let doc = roxmltree::Document::parse(&svg).expect("valid SVG");
    let rects: Vec<_> = doc
        .root_element()
        .children()
        .filter(|n| n.has_tag_name("rect"))
        .collect();
    assert_eq!(rects.len(), 3);
    assert_eq!(rects[0].attribute("fill"), Some("#00aaff60"));
    assert_eq!(rects[1].attribute("x"), Some("140"));
    assert_eq!(rects[1].attribute("width"), Some("77.5"));
    assert_eq!(rects[2].attribute("x"), Some("217.5"));

    // Overlays stay inside the canvas.
    assert_eq!(doc.root_element().attribute("height"), Some("240"));
}

#[test]
fn render_assembly_runs_the_whole_pipeline() {
    let svg = render_assembly(
        &loader(),
        "controller.json5",
        &LayoutConfig::default(),
        &SvgRenderOptions::default(),
    )
    .expect("render");
    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
    assert!(svg.contains("stroke-width:15px !important;"));
}
