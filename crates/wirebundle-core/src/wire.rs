use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// One physical wire of a connection type.
///
/// Identity is `(connection_type, key)`; `color` and `index` only affect presentation.
#[derive(Debug, Clone, Serialize)]
pub struct Wire {
    connection_type: String,
    key: String,
    color: u32,
    index: usize,
}

impl Wire {
    pub fn new(
        connection_type: impl Into<String>,
        key: impl Into<String>,
        color: u32,
        index: usize,
    ) -> Self {
        Self {
            connection_type: connection_type.into(),
            key: key.into(),
            color,
            index,
        }
    }

    pub fn connection_type(&self) -> &str {
        &self.connection_type
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn color(&self) -> u32 {
        self.color
    }

    /// `#rrggbb`
    pub fn color_hex(&self) -> String {
        format!("#{:06x}", self.color & 0x00ff_ffff)
    }

    /// Position inside the physical bundle (0 = first).
    pub fn index(&self) -> usize {
        self.index
    }
}

impl PartialEq for Wire {
    fn eq(&self, other: &Self) -> bool {
        self.connection_type == other.connection_type && self.key == other.key
    }
}

impl Eq for Wire {}

impl Hash for Wire {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.connection_type.hash(state);
        self.key.hash(state);
    }
}

impl fmt::Display for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} wire ({})",
            self.key,
            self.connection_type,
            self.color_hex()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireSpec {
    pub key: String,
    /// `#rrggbb`
    pub color: String,
}

/// Connection-type tag → ordered wires of that connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "IndexMap<String, Vec<WireSpec>>",
    into = "IndexMap<String, Vec<WireSpec>>"
)]
pub struct WireRegistry {
    types: IndexMap<String, Vec<Wire>>,
}

impl Default for WireRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl WireRegistry {
    pub fn empty() -> Self {
        Self {
            types: IndexMap::new(),
        }
    }

    /// Two-wire power plus two CAN buses.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register("power", [("red", 0xe6282b), ("black", 0x231f20)]);
        registry.register("can_a", [("yellow", 0xd5dc28), ("green", 0x37b04a)]);
        registry.register("can_b", [("yellow", 0xd5dc28), ("green", 0x37b04a)]);
        registry
    }

    /// Registers (or replaces) a connection type; wire order defines bundle positions.
    pub fn register<K: Into<String>>(
        &mut self,
        tag: &str,
        wires: impl IntoIterator<Item = (K, u32)>,
    ) {
        let wires = wires
            .into_iter()
            .enumerate()
            .map(|(index, (key, color))| Wire::new(tag, key, color, index))
            .collect();
        self.types.insert(tag.to_string(), wires);
    }

    pub fn wires(&self, tag: &str) -> Option<&[Wire]> {
        self.types.get(tag).map(Vec::as_slice)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.types.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.types.keys().map(String::as_str)
    }
}

fn parse_color(raw: &str) -> Option<u32> {
    let hex = raw.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

impl TryFrom<IndexMap<String, Vec<WireSpec>>> for WireRegistry {
    type Error = String;

    fn try_from(raw: IndexMap<String, Vec<WireSpec>>) -> Result<Self, Self::Error> {
        let mut registry = Self::empty();
        for (tag, specs) in raw {
            let mut wires = Vec::with_capacity(specs.len());
            for spec in specs {
                let color = parse_color(&spec.color).ok_or_else(|| {
                    format!(
                        "invalid color `{}` for wire `{}` of `{tag}`",
                        spec.color, spec.key
                    )
                })?;
                wires.push((spec.key, color));
            }
            registry.register(&tag, wires);
        }
        Ok(registry)
    }
}

impl From<WireRegistry> for IndexMap<String, Vec<WireSpec>> {
    fn from(registry: WireRegistry) -> Self {
        registry
            .types
            .into_iter()
            .map(|(tag, wires)| {
                let specs = wires
                    .iter()
                    .map(|w| WireSpec {
                        key: w.key.clone(),
                        color: w.color_hex(),
                    })
                    .collect();
                (tag, specs)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_color_accepts_hash_prefixed_hex() {
        assert_eq!(parse_color("#e6282b"), Some(0xe6282b));
        assert_eq!(parse_color("231f20"), Some(0x231f20));
        assert_eq!(parse_color("#fff"), None);
    }
}
