use crate::description::parse_json5;
use crate::error::{Error, Result};
use crate::gauge::GaugeTable;
use crate::wire::WireRegistry;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Layout constants and lookup tables. Every field has a default, so a config file only needs
/// the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Outer canvas margin; also the x of the main part.
    pub margin: f64,
    /// Provisional gap between the main part and the sockets before bundle widths are known.
    pub connection_margin: f64,
    pub inter_socket_margin: f64,
    /// Gap between neighbouring tracks inside one drawing group.
    pub bundle_margin: f64,
    pub gauge_widths: GaugeTable,
    /// Groups larger than this are ordered by local search instead of enumeration.
    pub max_exhaustive_bundles: usize,
    pub connection_types: WireRegistry,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: 20.0,
            connection_margin: 100.0,
            inter_socket_margin: 60.0,
            bundle_margin: 10.0,
            gauge_widths: GaugeTable::default(),
            max_exhaustive_bundles: 8,
            connection_types: WireRegistry::standard(),
        }
    }
}

impl LayoutConfig {
    pub fn from_json5(text: &str, path: &Path) -> Result<Self> {
        parse_json5(text, path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json5(&text, path)?;
        tracing::debug!(path = %path.display(), "loaded layout config");
        Ok(config)
    }
}
