use crate::layout::bundle::PlacedConnection;
use spindle::{PermutationSearch, Range, RangeSet, SearchStatus};

/// Connections whose vertical spans overlap and therefore need separate tracks.
#[derive(Debug, Clone)]
pub struct DrawingGroup<'a> {
    members: Vec<PlacedConnection<'a>>,
    occupancy: RangeSet,
}

/// The chosen left-to-right track order of a group.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackArrangement {
    /// Member indices, left to right.
    pub order: Vec<usize>,
    /// Left edge of each track relative to the start of the routing region, parallel to `order`.
    pub offsets: Vec<f64>,
    pub collisions: usize,
    pub status: SearchStatus,
}

impl<'a> DrawingGroup<'a> {
    pub fn new(first: PlacedConnection<'a>) -> Self {
        let mut group = Self {
            members: Vec::new(),
            occupancy: RangeSet::new(),
        };
        group.push(first);
        group
    }

    /// Whether `connection` leaves its source inside the band this group already occupies.
    pub fn accepts(&self, connection: &PlacedConnection<'_>) -> bool {
        self.occupancy.overlaps(&connection.source_span())
    }

    pub fn push(&mut self, connection: PlacedConnection<'a>) {
        self.occupancy.insert(connection.span());
        self.members.push(connection);
    }

    pub fn members(&self) -> &[PlacedConnection<'a>] {
        &self.members
    }

    pub fn occupancy(&self) -> &RangeSet {
        &self.occupancy
    }

    pub fn bounds(&self) -> Option<Range> {
        self.occupancy.bounds()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Total width of all tracks including the margins between neighbours.
    pub fn width(&self, bundle_margin: f64) -> f64 {
        let bundles: f64 = self.members.iter().map(|c| c.bundle_width()).sum();
        let gaps = self.members.len().saturating_sub(1) as f64 * bundle_margin;
        bundles + gaps
    }

    /// Crossings caused by placing the members in `order` (indices into [`Self::members`]).
    ///
    /// A member's outgoing wires cross every track to its left whose span covers the source
    /// side, and its incoming wires cross every track to its right whose span covers the
    /// target side.
    pub fn collisions(&self, order: &[usize]) -> usize {
        let spans: Vec<Range> = order.iter().map(|&i| self.members[i].span()).collect();
        let mut count = 0;
        for (pos, &i) in order.iter().enumerate() {
            let member = &self.members[i];
            let source = member.source_span();
            let target = member.target_span();
            count += spans[..pos].iter().filter(|s| s.overlaps(&source)).count();
            count += spans[pos + 1..].iter().filter(|s| s.overlaps(&target)).count();
        }
        count
    }

    /// Searches for the track order with the fewest crossings, stopping at the first
    /// crossing-free one.
    pub fn arrange(&self, bundle_margin: f64, max_exhaustive: usize) -> TrackArrangement {
        let indices: Vec<usize> = (0..self.members.len()).collect();
        let outcome = PermutationSearch::new()
            .good_enough(0i64)
            .max_exhaustive(max_exhaustive)
            .run(&indices, |order| -(self.collisions(order) as i64));

        if outcome.status == SearchStatus::LocalSearch {
            tracing::warn!(
                bundles = self.members.len(),
                max_exhaustive,
                "drawing group too large for exhaustive track ordering; using local search"
            );
        }

        let mut offsets = Vec::with_capacity(outcome.order.len());
        let mut x = 0.0;
        for &i in &outcome.order {
            offsets.push(x);
            x += self.members[i].bundle_width() + bundle_margin;
        }

        let collisions = self.collisions(&outcome.order);
        tracing::debug!(
            order = ?outcome.order,
            collisions,
            evaluated = outcome.evaluated,
            "arranged drawing group"
        );

        TrackArrangement {
            order: outcome.order,
            offsets,
            collisions,
            status: outcome.status,
        }
    }
}

/// Sweeps the connections by the top of their source side, starting a new group whenever a
/// connection's source side is clear of everything the current group occupies.
///
/// A closed group is never revisited, even if a later, taller connection reaches back into it.
pub fn group_connections<'a>(
    mut connections: Vec<PlacedConnection<'a>>,
) -> Vec<DrawingGroup<'a>> {
    connections.sort_by(|a, b| a.source_span().min().total_cmp(&b.source_span().min()));

    let mut groups: Vec<DrawingGroup<'a>> = Vec::new();
    for connection in connections {
        match groups.last_mut() {
            Some(group) if group.accepts(&connection) => group.push(connection),
            _ => groups.push(DrawingGroup::new(connection)),
        }
    }
    tracing::debug!(groups = groups.len(), "grouped connections");
    groups
}
