use crate::layout::part::{Part, PartId};
use spindle::Range;
use wirebundle_core::geom::{Point, Vector, point};
use wirebundle_core::{Endpoint, Gauge, Wire, WireSet};

/// A wire set addressed by owning part and position in that part's wire-set list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WireSetRef {
    pub part: PartId,
    pub index: usize,
}

impl WireSetRef {
    pub fn new(part: PartId, index: usize) -> Self {
        Self { part, index }
    }
}

/// A resolved pairing of a main-part wire set with a socket wire set.
///
/// This is the unplaced form: it knows what is connected but has no coordinates. Geometry is
/// only available through [`BundledConnection::place`], which borrows the part arena.
#[derive(Debug, Clone, PartialEq)]
pub struct BundledConnection {
    tag: String,
    source: WireSetRef,
    target: WireSetRef,
    gauge: Gauge,
    wire_width: f64,
}

impl BundledConnection {
    /// `gauge` is the coalesced gauge of both ends and `wire_width` its rendered width.
    pub fn new(
        tag: impl Into<String>,
        source: WireSetRef,
        target: WireSetRef,
        gauge: Gauge,
        wire_width: f64,
    ) -> Self {
        Self {
            tag: tag.into(),
            source,
            target,
            gauge,
            wire_width,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn source(&self) -> WireSetRef {
        self.source
    }

    pub fn target(&self) -> WireSetRef {
        self.target
    }

    pub fn gauge(&self) -> Gauge {
        self.gauge
    }

    pub fn wire_width(&self) -> f64 {
        self.wire_width
    }

    /// Gap between neighbouring wires of the bundle.
    pub fn spacing(&self) -> f64 {
        (self.wire_width * 0.5).max(2.0)
    }

    /// Reads the current placement of both parts. Parts cannot move while the returned value
    /// is alive.
    ///
    /// # Panics
    ///
    /// Panics if either wire-set reference does not exist in `parts`. Connections built by
    /// [`Assembly`](super::Assembly) always index their own part arena.
    pub fn place<'a>(&'a self, parts: &'a [Part]) -> PlacedConnection<'a> {
        let source_part = &parts[self.source.part.index()];
        let target_part = &parts[self.target.part.index()];
        PlacedConnection {
            connection: self,
            source_part,
            target_part,
            source: &source_part.wire_sets()[self.source.index],
            target: &target_part.wire_sets()[self.target.index],
            source_offset: source_part.offset(),
            target_offset: target_part.offset(),
        }
    }
}

/// One wire's orthogonal route from the source endpoint to the target endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedWire<'a> {
    pub wire: &'a Wire,
    pub points: [Point; 4],
}

/// A [`BundledConnection`] together with the offsets of both parts at the time of placement.
#[derive(Debug, Clone, Copy)]
pub struct PlacedConnection<'a> {
    connection: &'a BundledConnection,
    source_part: &'a Part,
    target_part: &'a Part,
    source: &'a WireSet,
    target: &'a WireSet,
    source_offset: Vector,
    target_offset: Vector,
}

impl<'a> PlacedConnection<'a> {
    pub fn connection(&self) -> &'a BundledConnection {
        self.connection
    }

    pub fn tag(&self) -> &'a str {
        self.connection.tag()
    }

    pub fn source_part(&self) -> &'a Part {
        self.source_part
    }

    pub fn target_part(&self) -> &'a Part {
        self.target_part
    }

    pub fn source_offset(&self) -> Vector {
        self.source_offset
    }

    pub fn target_offset(&self) -> Vector {
        self.target_offset
    }

    pub fn wire_width(&self) -> f64 {
        self.connection.wire_width
    }

    pub fn wire_count(&self) -> usize {
        self.source.len()
    }

    /// Wires side by side plus the gaps between them.
    pub fn bundle_width(&self) -> f64 {
        let n = self.wire_count();
        if n == 0 {
            return 0.0;
        }
        n as f64 * self.wire_width() + (n - 1) as f64 * self.connection.spacing()
    }

    pub fn source_span(&self) -> Range {
        self.side_span(self.source, self.source_offset)
    }

    pub fn target_span(&self) -> Range {
        self.side_span(self.target, self.target_offset)
    }

    /// Everything between the top and bottom of both ends.
    pub fn span(&self) -> Range {
        self.source_span().expand_with(&self.target_span())
    }

    fn side_span(&self, set: &WireSet, offset: Vector) -> Range {
        match set.y_bounds() {
            Some((lo, hi)) => {
                Range::inclusive(lo + offset.y, hi + offset.y).expand(self.wire_width() / 2.0)
            }
            None => Range::exclusive(offset.y, offset.y),
        }
    }

    /// Source endpoints in track order: bottom-most first, reversed when the bundle heads
    /// upwards so that wires do not cross inside the track.
    pub fn wire_order(&self) -> Vec<&'a Endpoint> {
        let mut order: Vec<&Endpoint> = self.source.endpoints().iter().collect();
        order.sort_by(|a, b| b.position.y.total_cmp(&a.position.y));

        let source_mean = self.source.mean_y().map(|y| y + self.source_offset.y);
        let target_mean = self.target.mean_y().map(|y| y + self.target_offset.y);
        if let (Some(s), Some(t)) = (source_mean, target_mean) {
            if t < s {
                order.reverse();
            }
        }
        order
    }

    /// Routes every wire through the track whose left edge is at `track_x`.
    pub fn route(&self, track_x: f64) -> Vec<RoutedWire<'a>> {
        let w = self.wire_width();
        let step = w + self.connection.spacing();

        self.wire_order()
            .into_iter()
            .enumerate()
            .filter_map(|(k, source)| {
                let target = self.target.endpoint(&source.wire)?;
                let p0 = source.position + self.source_offset;
                let p1 = target.position + self.target_offset;
                let xm = track_x + k as f64 * step + w / 2.0;
                // Endpoints reach one unit into the parts so no seam shows at the joint.
                let nudge = if p0.x > p1.x { -1.0 } else { 1.0 };
                Some(RoutedWire {
                    wire: &source.wire,
                    points: [
                        point(p0.x - nudge, p0.y),
                        point(xm, p0.y),
                        point(xm, p1.y),
                        point(p1.x + nudge, p1.y),
                    ],
                })
            })
            .collect()
    }
}
