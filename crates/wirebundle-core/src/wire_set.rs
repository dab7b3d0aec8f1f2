use crate::error::{Error, Result};
use crate::gauge::Gauge;
use crate::geom::Point;
use crate::wire::{Wire, WireRegistry};

#[derive(Debug, Clone)]
pub struct Endpoint {
    pub wire: Wire,
    /// Relative to the owning drawing's origin.
    pub position: Point,
}

/// The endpoints of one connection type on one part.
#[derive(Debug, Clone)]
pub struct WireSet {
    tag: String,
    gauge: Gauge,
    gauge_class: Option<String>,
    endpoints: Vec<Endpoint>,
}

impl WireSet {
    /// Builds a wire set whose endpoint keys must be exactly the wires registered for `tag`.
    /// `part` is only used for error context. Endpoints are stored in bundle order.
    pub fn new(
        registry: &WireRegistry,
        part: &str,
        tag: &str,
        gauge: Gauge,
        gauge_class: Option<String>,
        positions: impl IntoIterator<Item = (String, Point)>,
    ) -> Result<Self> {
        let wires = registry
            .wires(tag)
            .ok_or_else(|| Error::UnknownConnectionType {
                tag: tag.to_string(),
                part: part.to_string(),
            })?;

        let mut positions: Vec<(String, Point)> = positions.into_iter().collect();
        let mut endpoints = Vec::with_capacity(wires.len());
        let mut missing = Vec::new();
        for wire in wires {
            match positions.iter().position(|(key, _)| key == wire.key()) {
                Some(i) => {
                    let (_, position) = positions.swap_remove(i);
                    endpoints.push(Endpoint {
                        wire: wire.clone(),
                        position,
                    });
                }
                None => missing.push(wire.key().to_string()),
            }
        }

        if !missing.is_empty() || !positions.is_empty() {
            let mut unexpected: Vec<String> = positions.into_iter().map(|(k, _)| k).collect();
            unexpected.sort();
            return Err(Error::WireSetMismatch {
                tag: tag.to_string(),
                part: part.to_string(),
                missing,
                unexpected,
            });
        }

        Ok(Self {
            tag: tag.to_string(),
            gauge,
            gauge_class: gauge_class.filter(|c| !c.trim().is_empty()),
            endpoints,
        })
    }

    /// Connection-type tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn gauge(&self) -> Gauge {
        self.gauge
    }

    /// Class in the part drawing whose stroke width follows the resolved gauge.
    pub fn gauge_class(&self) -> Option<&str> {
        self.gauge_class.as_deref()
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn endpoint(&self, wire: &Wire) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| &e.wire == wire)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// `(min_y, max_y)` over all endpoints in local coordinates.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        let mut it = self.endpoints.iter().map(|e| e.position.y);
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }

    pub fn mean_y(&self) -> Option<f64> {
        if self.endpoints.is_empty() {
            return None;
        }
        let sum: f64 = self.endpoints.iter().map(|e| e.position.y).sum();
        Some(sum / self.endpoints.len() as f64)
    }
}
