use crate::canvas::{Canvas, Rect, WirePath};
use crate::layout::Assembly;
use crate::model::{AssemblyLayout, PartRole};
use wirebundle_core::geom::point;

#[derive(Debug, Clone, Default)]
pub struct SvgRenderOptions {
    /// When true, shade the main part, routing and socket regions.
    pub include_debug_regions: bool,
}

/// Renders a laid-out assembly. `layout` must come from [`Assembly::layout`] on the same
/// assembly.
pub fn render_assembly_svg(
    assembly: &Assembly,
    layout: &AssemblyLayout,
    options: &SvgRenderOptions,
) -> String {
    let mut canvas = Canvas::new();

    if options.include_debug_regions {
        for rect in debug_regions(layout) {
            canvas.add_rect(rect);
        }
    }

    for wire in &layout.wires {
        let mut path = WirePath::new();
        path.set_style("stroke-width", format!("{}px", fmt(wire.stroke_width)))
            .set_style("stroke", wire.color.as_str())
            .set_style("fill", "none")
            .set_style("stroke-linejoin", "round");
        let mut points = wire.points.iter();
        if let Some(first) = points.next() {
            path.move_to(point(first.x, first.y));
        }
        // Routes alternate horizontal and vertical legs.
        for (i, p) in points.enumerate() {
            if i % 2 == 0 {
                path.horizontal_to(p.x);
            } else {
                path.vertical_to(p.y);
            }
        }
        canvas.add_path(path);
    }

    for (part, placed) in assembly.parts().iter().zip(&layout.parts) {
        canvas.add_drawing(part.drawing(), point(placed.x, placed.y));
    }

    canvas.to_svg(layout.margin)
}

fn debug_regions(layout: &AssemblyLayout) -> Vec<Rect> {
    const ALPHA: &str = "60";
    let top = layout.margin;
    let height = (layout.height - 2.0 * layout.margin).max(0.0);

    let mut out = Vec::new();
    let main = layout.parts.iter().find(|p| p.role == PartRole::Main);
    let sockets: Vec<_> = layout
        .parts
        .iter()
        .filter(|p| p.role == PartRole::Socket)
        .collect();

    if let Some(main) = main {
        out.push(
            Rect::new(main.x, top, main.width, height).with_fill(format!("#00aaff{ALPHA}")),
        );
        let routing_end = sockets
            .iter()
            .map(|s| s.x)
            .fold(f64::INFINITY, f64::min);
        let routing_end = if routing_end.is_finite() {
            routing_end
        } else {
            layout.routing_region.x + layout.routing_region.width
        };
        let start = main.x + main.width;
        out.push(
            Rect::new(start, top, (routing_end - start).max(0.0), height)
                .with_fill(format!("#00ff37{ALPHA}")),
        );
    }

    if let Some(first) = sockets.first() {
        let right = sockets.iter().map(|s| s.x + s.width).fold(0.0, f64::max);
        out.push(
            Rect::new(first.x, top, (right - first.x).max(0.0), height)
                .with_fill(format!("#ffaa00{ALPHA}")),
        );
    }
    out
}

pub(crate) fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
