//! Serialized part and assembly descriptions (json5).
//!
//! ```json5
//! // assemblies/controller.json5
//! { main: "controller.json5", sockets: ["battery.json5", "bus.json5"] }
//!
//! // part_descriptions/controller.json5
//! {
//!   file: "controller.svg",
//!   wire_connections: {
//!     power: { gauge: 12, wire_gauge_css_class: "cls-power", red: { x: 10, y: 20 }, black: { x: 10, y: 40 } },
//!   },
//! }
//! ```

use crate::error::{Error, Result};
use crate::gauge::Gauge;
use crate::geom::point;
use crate::wire::WireRegistry;
use crate::wire_set::WireSet;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyDescription {
    /// Part description file of the main part.
    pub main: String,
    /// Part description files of the sockets, top to bottom.
    #[serde(default)]
    pub sockets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartDescription {
    /// Drawing file, relative to the `parts/` directory.
    pub file: String,
    #[serde(default)]
    pub wire_connections: IndexMap<String, WireSetDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireSetDescription {
    #[serde(default)]
    pub gauge: Gauge,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wire_gauge_css_class: Option<String>,
    /// Wire key → endpoint position.
    #[serde(flatten)]
    pub endpoints: IndexMap<String, EndpointDescription>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EndpointDescription {
    pub x: f64,
    pub y: f64,
}

impl AssemblyDescription {
    pub fn from_json5(text: &str, path: &Path) -> Result<Self> {
        parse_json5(text, path)
    }
}

impl PartDescription {
    pub fn from_json5(text: &str, path: &Path) -> Result<Self> {
        parse_json5(text, path)
    }

    /// Validated wire sets in description order.
    pub fn wire_sets(&self, registry: &WireRegistry, part: &str) -> Result<Vec<WireSet>> {
        self.wire_connections
            .iter()
            .map(|(tag, desc)| desc.to_wire_set(registry, part, tag))
            .collect()
    }
}

impl WireSetDescription {
    pub fn to_wire_set(&self, registry: &WireRegistry, part: &str, tag: &str) -> Result<WireSet> {
        WireSet::new(
            registry,
            part,
            tag,
            self.gauge,
            self.wire_gauge_css_class.clone(),
            self.endpoints
                .iter()
                .map(|(key, p)| (key.clone(), point(p.x, p.y))),
        )
    }
}

pub(crate) fn parse_json5<T: DeserializeOwned>(text: &str, path: &Path) -> Result<T> {
    json5::from_str(text).map_err(|e| Error::Description {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
