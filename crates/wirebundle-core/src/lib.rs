#![forbid(unsafe_code)]

//! Wire, gauge and part description model for wiring-harness diagrams (headless).
//!
//! This crate knows what a part offers (named wire sets with endpoint positions and gauges)
//! and how descriptions are stored on disk. Placement, routing and SVG output live in
//! `wirebundle-render`.

pub mod config;
pub mod description;
pub mod error;
pub mod gauge;
pub mod geom;
pub mod loader;
pub mod wire;
pub mod wire_set;

pub use config::LayoutConfig;
pub use description::{AssemblyDescription, PartDescription, WireSetDescription};
pub use error::{Error, Result};
pub use gauge::{Gauge, GaugeTable};
pub use loader::{DescriptionLoader, PartRecord};
pub use wire::{Wire, WireRegistry};
pub use wire_set::{Endpoint, WireSet};
