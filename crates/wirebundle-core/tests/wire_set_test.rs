use wirebundle_core::geom::point;
use wirebundle_core::{Error, Gauge, Wire, WireRegistry, WireSet};

fn power(positions: &[(&str, f64, f64)]) -> Result<WireSet, Error> {
    WireSet::new(
        &WireRegistry::standard(),
        "controller.json5",
        "power",
        Gauge::new(12),
        Some("cls-power".to_string()),
        positions
            .iter()
            .map(|(k, x, y)| (k.to_string(), point(*x, *y))),
    )
}

#[test]
fn wire_set_orders_endpoints_by_bundle_position() {
    let set = power(&[("black", 0.0, 40.0), ("red", 0.0, 20.0)]).unwrap();
    let keys: Vec<&str> = set.endpoints().iter().map(|e| e.wire.key()).collect();
    assert_eq!(keys, vec!["red", "black"]);
    assert_eq!(set.y_bounds(), Some((20.0, 40.0)));
    assert_eq!(set.mean_y(), Some(30.0));
    assert_eq!(set.gauge_class(), Some("cls-power"));
}

#[test]
fn wire_set_reports_missing_and_unexpected_keys() {
    let err = power(&[("red", 0.0, 20.0), ("blue", 0.0, 30.0)]).unwrap_err();
    match err {
        Error::WireSetMismatch {
            tag,
            part,
            missing,
            unexpected,
        } => {
            assert_eq!(tag, "power");
            assert_eq!(part, "controller.json5");
            assert_eq!(missing, vec!["black".to_string()]);
            assert_eq!(unexpected, vec!["blue".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn wire_set_rejects_unknown_connection_type() {
    let err = WireSet::new(
        &WireRegistry::standard(),
        "x.json5",
        "lin",
        Gauge::ANY,
        None,
        Vec::new(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::UnknownConnectionType { ref tag, .. } if tag == "lin"));
    assert!(err.is_configuration_error());
}

#[test]
fn wire_identity_ignores_presentation() {
    let a = Wire::new("power", "red", 0xff0000, 0);
    let b = Wire::new("power", "red", 0x00ff00, 3);
    let c = Wire::new("can_a", "red", 0xff0000, 0);
    assert_eq!(a, b);
    assert_ne!(a, c);

    let mut set = std::collections::HashSet::new();
    set.insert(a);
    assert!(set.contains(&b));
}

#[test]
fn wire_registry_lists_standard_types() {
    let registry = WireRegistry::standard();
    let tags: Vec<&str> = registry.tags().collect();
    assert_eq!(tags, vec!["power", "can_a", "can_b"]);
    let can = registry.wires("can_b").unwrap();
    assert_eq!(can[1].key(), "green");
    assert_eq!(can[1].index(), 1);
    assert_eq!(can[1].color_hex(), "#37b04a");
}
