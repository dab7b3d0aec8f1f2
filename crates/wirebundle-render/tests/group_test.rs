use spindle::SearchStatus;
use wirebundle_core::geom::point;
use wirebundle_core::{Gauge, WireRegistry, WireSet};
use wirebundle_render::{
    BundledConnection, Drawing, DrawingGroup, Part, PartId, PlacedConnection, WireSetRef,
    group_connections,
};

const BLANK: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"/>"#;
const WIRE_WIDTH: f64 = 2.0;

/// Power wire set whose span (including half the wire width) is exactly `[top, bottom]`.
fn power(top: f64, bottom: f64) -> WireSet {
    let inset = WIRE_WIDTH / 2.0;
    WireSet::new(
        &WireRegistry::standard(),
        "test",
        "power",
        Gauge::from(22),
        None,
        [
            ("red".to_string(), point(0.0, top + inset)),
            ("black".to_string(), point(0.0, bottom - inset)),
        ],
    )
    .expect("power wire set")
}

struct Fixture {
    parts: Vec<Part>,
    connections: Vec<BundledConnection>,
}

impl Fixture {
    /// One connection per `(source span, target span)` pair, main part and socket both at the origin.
    fn new(spans: &[((f64, f64), (f64, f64))]) -> Self {
        let sources = spans.iter().map(|&(s, _)| power(s.0, s.1)).collect();
        let targets = spans.iter().map(|&(_, t)| power(t.0, t.1)).collect();
        let drawing = |name: &str| Drawing::parse(BLANK, name).expect("drawing");
        let parts = vec![
            Part::new("main", drawing("main"), sources),
            Part::new("socket", drawing("socket"), targets),
        ];
        let connections = (0..spans.len())
            .map(|i| {
                BundledConnection::new(
                    "power",
                    WireSetRef::new(PartId::new(0), i),
                    WireSetRef::new(PartId::new(1), i),
                    Gauge::from(22),
                    WIRE_WIDTH,
                )
            })
            .collect();
        Self { parts, connections }
    }

    fn placed(&self) -> Vec<PlacedConnection<'_>> {
        self.connections.iter().map(|c| c.place(&self.parts)).collect()
    }

    fn group(&self) -> DrawingGroup<'_> {
        let mut placed = self.placed().into_iter();
        let mut group = DrawingGroup::new(placed.next().expect("at least one connection"));
        for c in placed {
            group.push(c);
        }
        group
    }
}

fn all_orders(n: usize) -> Vec<Vec<usize>> {
    if n == 0 {
        return vec![Vec::new()];
    }
    let mut out = Vec::new();
    for rest in all_orders(n - 1) {
        for pos in 0..=rest.len() {
            let mut order = rest.clone();
            order.insert(pos, n - 1);
            out.push(order);
        }
    }
    out
}

#[test]
fn sweep_splits_on_first_gap() {
    let f = Fixture::new(&[
        ((20.0, 30.0), (20.0, 30.0)),
        ((0.0, 10.0), (0.0, 10.0)),
        ((5.0, 15.0), (5.0, 15.0)),
    ]);
    let groups = group_connections(f.placed());
    assert_eq!(groups.len(), 2);

    let spans = |g: &DrawingGroup<'_>| -> Vec<(f64, f64)> {
        g.members()
            .iter()
            .map(|c| (c.source_span().min(), c.source_span().max()))
            .collect()
    };
    assert_eq!(spans(&groups[0]), vec![(0.0, 10.0), (5.0, 15.0)]);
    assert_eq!(spans(&groups[1]), vec![(20.0, 30.0)]);

    let bounds = groups[0].bounds().expect("bounds");
    assert_eq!((bounds.min(), bounds.max()), (0.0, 15.0));
}

#[test]
fn target_side_extends_group_occupancy() {
    // The first bundle descends to 40..50, so a connection leaving at 30..35 still joins it.
    let f = Fixture::new(&[((0.0, 10.0), (40.0, 50.0)), ((30.0, 35.0), (30.0, 35.0))]);
    let groups = group_connections(f.placed());
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
}

#[test]
fn disjoint_group_never_collides() {
    let f = Fixture::new(&[
        ((0.0, 10.0), (0.0, 10.0)),
        ((20.0, 30.0), (20.0, 30.0)),
        ((40.0, 50.0), (40.0, 50.0)),
    ]);
    let group = f.group();
    for order in all_orders(3) {
        assert_eq!(group.collisions(&order), 0, "order {order:?}");
    }
}

#[test]
fn crossing_pair_never_reaches_zero() {
    // Overlapping sources, targets in the opposite vertical order.
    let f = Fixture::new(&[((0.0, 10.0), (60.0, 70.0)), ((5.0, 15.0), (40.0, 50.0))]);
    let group = f.group();
    assert!(group.collisions(&[0, 1]) > 0);
    assert!(group.collisions(&[1, 0]) > 0);

    let arrangement = group.arrange(10.0, 8);
    assert!(arrangement.collisions > 0);
    assert_eq!(arrangement.status, SearchStatus::Exhausted);
}

#[test]
fn arrange_picks_crossing_free_order() {
    // The lower bundle goes further down, so its track belongs on the left.
    let f = Fixture::new(&[((0.0, 10.0), (100.0, 110.0)), ((20.0, 30.0), (200.0, 210.0))]);
    let groups = group_connections(f.placed());
    assert_eq!(groups.len(), 1);

    let group = &groups[0];
    assert_eq!(group.collisions(&[0, 1]), 2);
    assert_eq!(group.collisions(&[1, 0]), 0);

    let arrangement = group.arrange(10.0, 8);
    assert_eq!(arrangement.order, vec![1, 0]);
    assert_eq!(arrangement.collisions, 0);
    assert_eq!(arrangement.status, SearchStatus::GoodEnough);
    // 2 wires of width 2 with the minimum gap of 2, then the bundle margin.
    assert_eq!(arrangement.offsets, vec![0.0, 16.0]);
}

#[test]
fn group_width_sums_tracks_and_margins() {
    let f = Fixture::new(&[((0.0, 10.0), (0.0, 10.0)), ((5.0, 15.0), (5.0, 15.0))]);
    let group = f.group();
    assert_eq!(group.width(10.0), 6.0 + 6.0 + 10.0);
    assert_eq!(group.width(0.0), 12.0);
}

#[test]
fn oversized_group_falls_back_to_local_search() {
    let spans: Vec<_> = (0..10).map(|_| ((0.0, 10.0), (0.0, 10.0))).collect();
    let f = Fixture::new(&spans);
    let groups = group_connections(f.placed());
    assert_eq!(groups.len(), 1);

    let arrangement = groups[0].arrange(10.0, 8);
    assert_eq!(arrangement.status, SearchStatus::LocalSearch);
    let mut order = arrangement.order.clone();
    order.sort_unstable();
    assert_eq!(order, (0..10).collect::<Vec<_>>());
    assert_eq!(arrangement.offsets.len(), 10);
}
