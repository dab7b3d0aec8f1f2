use crate::error::{Error, Result};
use crate::layout::bundle::{BundledConnection, PlacedConnection, WireSetRef};
use crate::layout::group::group_connections;
use crate::layout::part::{Part, PartId};
use crate::model::{
    AssemblyLayout, LayoutGroup, LayoutPart, LayoutPoint, LayoutRegion, LayoutTrack, LayoutWire,
    PartRole,
};
use spindle::SearchStatus;
use std::path::Path;
use wirebundle_core::geom::point;
use wirebundle_core::{DescriptionLoader, GaugeTable, LayoutConfig};

const MAIN: PartId = PartId(0);

/// One main part, its sockets and the connections between them.
///
/// Parts live in an arena with the main part at index 0 followed by the sockets in
/// description order; connections refer to them by [`PartId`].
#[derive(Debug, Clone)]
pub struct Assembly {
    name: String,
    parts: Vec<Part>,
    connections: Vec<BundledConnection>,
}

impl Assembly {
    /// Pairs every wire set of `main` with the first socket offering the same connection type.
    ///
    /// When the main side names a gauge class, the socket drawing's matching class is forced
    /// to the resolved wire width.
    pub fn new(
        name: impl Into<String>,
        main: Part,
        sockets: Vec<Part>,
        gauge_widths: &GaugeTable,
    ) -> Result<Self> {
        let name = name.into();
        let mut parts = Vec::with_capacity(sockets.len() + 1);
        parts.push(main);
        parts.extend(sockets);

        let connections = resolve_connections(&mut parts, gauge_widths)?;
        tracing::debug!(
            assembly = %name,
            sockets = parts.len() - 1,
            connections = connections.len(),
            "resolved connections"
        );
        Ok(Self {
            name,
            parts,
            connections,
        })
    }

    /// Loads an assembly description and every part and drawing it references.
    pub fn load(
        loader: &DescriptionLoader,
        assembly: &str,
        config: &LayoutConfig,
    ) -> Result<Self> {
        let description = loader.load_assembly(assembly)?;
        let registry = &config.connection_types;
        let load_part = |id: &str| -> Result<Part> {
            let record = loader.load_part(id, registry)?;
            Part::from_record(record)
        };

        let main = load_part(&description.main)?;
        let sockets = description
            .sockets
            .iter()
            .map(|id| load_part(id.as_str()))
            .collect::<Result<Vec<_>>>()?;

        let name = Path::new(assembly)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| assembly.to_string());
        Self::new(name, main, sockets, &config.gauge_widths)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn main(&self) -> &Part {
        &self.parts[MAIN.index()]
    }

    pub fn sockets(&self) -> &[Part] {
        &self.parts[1..]
    }

    /// Main part first, then the sockets.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn part(&self, id: PartId) -> Option<&Part> {
        self.parts.get(id.index())
    }

    pub fn connections(&self) -> &[BundledConnection] {
        &self.connections
    }

    /// Connections with the geometry of the current placement.
    pub fn placed_connections(&self) -> Vec<PlacedConnection<'_>> {
        self.connections
            .iter()
            .map(|c| c.place(&self.parts))
            .collect()
    }

    /// Stacks the sockets and centres the main part against them.
    pub fn place_vertically(&mut self, config: &LayoutConfig) {
        let sockets = &self.parts[1..];
        let stacked: f64 = sockets.iter().map(Part::height).sum::<f64>()
            + config.inter_socket_margin * sockets.len().saturating_sub(1) as f64;
        let main_height = self.main().height();
        let overall = main_height.max(stacked);

        let main_y = (overall / 2.0 - main_height / 2.0).floor() + config.margin;
        self.parts[MAIN.index()].set_position(point(config.margin, main_y));

        let mut y = (overall / 2.0 - stacked / 2.0).floor();
        for socket in self.parts[1..].iter_mut() {
            let x = socket.position().x;
            socket.set_position(point(x, y + config.margin));
            y += socket.height() + config.inter_socket_margin;
        }
    }

    fn place_sockets(&mut self, x: f64) {
        for socket in self.parts[1..].iter_mut() {
            let y = socket.position().y;
            socket.set_position(point(x, y));
        }
    }

    /// Widest drawing group for the current placement.
    fn required_routing_width(&self, bundle_margin: f64) -> f64 {
        group_connections(self.placed_connections())
            .iter()
            .map(|g| g.width(bundle_margin))
            .fold(0.0, f64::max)
    }

    /// Places every part and routes every wire.
    ///
    /// Sockets are first put a provisional distance from the main part to measure how much
    /// room the bundles need, then moved to exactly that distance and routed again.
    pub fn layout(&mut self, config: &LayoutConfig) -> Result<AssemblyLayout> {
        self.place_vertically(config);

        let main_right = self.main().right();
        self.place_sockets(main_right + config.connection_margin);
        let required = self.required_routing_width(config.bundle_margin);

        let routing_x = main_right + config.margin;
        self.place_sockets(routing_x + required + config.margin);
        tracing::debug!(
            assembly = %self.name,
            routing_x,
            required,
            "placed sockets"
        );

        let mut groups = Vec::new();
        let mut wires = Vec::new();
        for group in group_connections(self.placed_connections()) {
            let arrangement = group.arrange(config.bundle_margin, config.max_exhaustive_bundles);
            let mut tracks = Vec::with_capacity(arrangement.order.len());
            for (&i, &offset) in arrangement.order.iter().zip(&arrangement.offsets) {
                let member = &group.members()[i];
                let track_x = routing_x + offset;
                tracks.push(LayoutTrack {
                    tag: member.tag().to_string(),
                    source_part: member.source_part().id().to_string(),
                    target_part: member.target_part().id().to_string(),
                    x: track_x,
                    width: member.bundle_width(),
                    wire_width: member.wire_width(),
                });
                for routed in member.route(track_x) {
                    wires.push(LayoutWire {
                        tag: member.tag().to_string(),
                        key: routed.wire.key().to_string(),
                        color: routed.wire.color_hex(),
                        stroke_width: member.wire_width(),
                        points: routed
                            .points
                            .iter()
                            .map(|p| LayoutPoint { x: p.x, y: p.y })
                            .collect(),
                    });
                }
            }

            let (min_y, max_y) = group
                .bounds()
                .map_or((0.0, 0.0), |r| (r.min(), r.max()));
            groups.push(LayoutGroup {
                min_y,
                max_y,
                width: group.width(config.bundle_margin),
                collisions: arrangement.collisions,
                approximate: arrangement.status == SearchStatus::LocalSearch,
                tracks,
            });
        }

        let parts: Vec<LayoutPart> = self
            .parts
            .iter()
            .enumerate()
            .map(|(i, part)| LayoutPart {
                id: part.id().to_string(),
                role: if i == MAIN.index() {
                    PartRole::Main
                } else {
                    PartRole::Socket
                },
                x: part.position().x,
                y: part.position().y,
                width: part.width(),
                height: part.height(),
            })
            .collect();

        let right = self.parts.iter().map(Part::right).fold(0.0, f64::max);
        let bottom = self.parts.iter().map(Part::bottom).fold(0.0, f64::max);

        Ok(AssemblyLayout {
            width: right + config.margin,
            height: bottom + config.margin,
            margin: config.margin,
            parts,
            routing_region: LayoutRegion {
                x: routing_x,
                width: required,
            },
            groups,
            wires,
        })
    }
}

fn resolve_connections(
    parts: &mut [Part],
    gauge_widths: &GaugeTable,
) -> Result<Vec<BundledConnection>> {
    let Some((main, sockets)) = parts.split_first_mut() else {
        return Ok(Vec::new());
    };

    let mut connections = Vec::with_capacity(main.wire_sets().len());
    for (index, source) in main.wire_sets().iter().enumerate() {
        let tag = source.tag();
        let Some((socket, target_index, target_gauge)) =
            sockets.iter().enumerate().find_map(|(s, part)| {
                part.wire_set(tag).map(|(t, ws)| (s, t, ws.gauge()))
            })
        else {
            return Err(Error::UnmatchedWireSet {
                tag: tag.to_string(),
                main_part: main.id().to_string(),
            });
        };

        if !source.gauge().compatible_with(target_gauge) {
            return Err(Error::GaugeConflict {
                tag: tag.to_string(),
                main_part: main.id().to_string(),
                socket_part: sockets[socket].id().to_string(),
                main_gauge: source.gauge(),
                socket_gauge: target_gauge,
            });
        }

        let gauge = source.gauge() | target_gauge;
        let wire_width = gauge_widths.width(gauge)?;
        if let Some(class) = source.gauge_class() {
            let value = gauge_widths.stroke_width_css(gauge)?;
            sockets[socket]
                .drawing_mut()
                .override_style(&format!(".{class}"), "stroke-width", value);
        }

        tracing::debug!(
            tag,
            socket = sockets[socket].id(),
            %gauge,
            wire_width,
            "matched wire set"
        );
        connections.push(BundledConnection::new(
            tag,
            WireSetRef::new(MAIN, index),
            WireSetRef::new(PartId(socket + 1), target_index),
            gauge,
            wire_width,
        ));
    }
    Ok(connections)
}
