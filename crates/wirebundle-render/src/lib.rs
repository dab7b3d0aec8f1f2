#![forbid(unsafe_code)]

//! Layout and SVG composition for wiring-harness diagrams.
//!
//! [`Assembly`] pairs the wire sets of a main part with its sockets, places the parts, groups
//! the resulting bundles and orders their tracks; [`render_assembly_svg`] draws the result on
//! top of the part drawings.

pub mod canvas;
pub mod drawing;
pub mod error;
pub mod layout;
pub mod model;
pub mod svg;

pub use canvas::{Canvas, PathCommand, Rect, WirePath};
pub use drawing::Drawing;
pub use error::{Error, Result};
pub use layout::{
    Assembly, BundledConnection, DrawingGroup, Part, PartId, PlacedConnection, RoutedWire,
    TrackArrangement, WireSetRef, group_connections,
};
pub use model::AssemblyLayout;
pub use svg::{SvgRenderOptions, render_assembly_svg};

/// Loads, lays out and renders one assembly.
pub fn render_assembly(
    loader: &wirebundle_core::DescriptionLoader,
    assembly: &str,
    config: &wirebundle_core::LayoutConfig,
    options: &SvgRenderOptions,
) -> Result<String> {
    let mut assembly = Assembly::load(loader, assembly, config)?;
    let layout = assembly.layout(config)?;
    Ok(render_assembly_svg(&assembly, &layout, options))
}
