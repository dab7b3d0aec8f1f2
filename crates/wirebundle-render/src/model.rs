use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartRole {
    Main,
    Socket,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutPart {
    /// Part description file the part was loaded from.
    pub id: String,
    pub role: PartRole,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// The horizontal band between the main part and the sockets that wires are routed through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutRegion {
    pub x: f64,
    pub width: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutTrack {
    pub tag: String,
    pub source_part: String,
    pub target_part: String,
    /// Left edge of the track.
    pub x: f64,
    pub width: f64,
    pub wire_width: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutGroup {
    pub min_y: f64,
    pub max_y: f64,
    pub width: f64,
    /// Crossing score of the chosen order; 0 means no crossings.
    pub collisions: usize,
    /// `true` when the order came from local search rather than enumeration.
    pub approximate: bool,
    /// Tracks left to right.
    pub tracks: Vec<LayoutTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutWire {
    pub tag: String,
    pub key: String,
    /// `#rrggbb`
    pub color: String,
    pub stroke_width: f64,
    pub points: Vec<LayoutPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyLayout {
    /// Canvas size, including `margin` on the right and bottom.
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    /// Main part first, then sockets top to bottom.
    pub parts: Vec<LayoutPart>,
    pub routing_region: LayoutRegion,
    pub groups: Vec<LayoutGroup>,
    pub wires: Vec<LayoutWire>,
}

impl AssemblyLayout {
    pub fn to_json(&self, pretty: bool) -> crate::Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}
