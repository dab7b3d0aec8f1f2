//! Composition of placed drawings, wire paths and rectangles into one SVG document.

use crate::drawing::Drawing;
use crate::svg::{escape_xml, fmt};
use indexmap::IndexMap;
use std::fmt::Write as _;
use wirebundle_core::geom::{Point, point};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Absolute horizontal line to the given x.
    HorizontalTo(f64),
    /// Absolute vertical line to the given y.
    VerticalTo(f64),
}

/// An open polyline with inline style properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WirePath {
    style: IndexMap<String, String>,
    commands: Vec<PathCommand>,
}

impl WirePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_style(&mut self, property: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.style.insert(property.into(), value.into());
        self
    }

    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(p));
        self
    }

    pub fn line_to(&mut self, p: Point) -> &mut Self {
        self.commands.push(PathCommand::LineTo(p));
        self
    }

    pub fn horizontal_to(&mut self, x: f64) -> &mut Self {
        self.commands.push(PathCommand::HorizontalTo(x));
        self
    }

    pub fn vertical_to(&mut self, y: f64) -> &mut Self {
        self.commands.push(PathCommand::VerticalTo(y));
        self
    }

    pub fn style(&self) -> &IndexMap<String, String> {
        &self.style
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Absolute vertices, with `H`/`V` resolved against the previous point.
    pub fn points(&self) -> Vec<Point> {
        let mut out = Vec::with_capacity(self.commands.len());
        let mut current = point(0.0, 0.0);
        for cmd in &self.commands {
            current = match *cmd {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => p,
                PathCommand::HorizontalTo(x) => point(x, current.y),
                PathCommand::VerticalTo(y) => point(current.x, y),
            };
            out.push(current);
        }
        out
    }

    pub fn path_data(&self) -> String {
        let mut d = String::new();
        for cmd in &self.commands {
            if !d.is_empty() {
                d.push(' ');
            }
            let _ = match *cmd {
                PathCommand::MoveTo(p) => write!(&mut d, "M{},{}", fmt(p.x), fmt(p.y)),
                PathCommand::LineTo(p) => write!(&mut d, "L{},{}", fmt(p.x), fmt(p.y)),
                PathCommand::HorizontalTo(x) => write!(&mut d, "H{}", fmt(x)),
                PathCommand::VerticalTo(y) => write!(&mut d, "V{}", fmt(y)),
            };
        }
        d
    }

    fn style_attr(&self) -> String {
        let mut s = String::new();
        for (prop, value) in &self.style {
            let _ = write!(&mut s, "{prop}:{value};");
        }
        s
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill: "none".to_string(),
            stroke: "none".to_string(),
            stroke_width: 0.0,
        }
    }

    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = fill.into();
        self
    }

    pub fn with_stroke(mut self, stroke: impl Into<String>, width: f64) -> Self {
        self.stroke = stroke.into();
        self.stroke_width = width;
        self
    }
}

/// Drawings borrowed at fixed positions plus free-standing paths and rectangles.
///
/// Output order is rectangles, then paths, then drawings, so wires run underneath the parts
/// they attach to.
#[derive(Debug, Default)]
pub struct Canvas<'a> {
    drawings: Vec<(&'a Drawing, Point)>,
    paths: Vec<WirePath>,
    rects: Vec<Rect>,
}

impl<'a> Canvas<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_drawing(&mut self, drawing: &'a Drawing, position: Point) {
        self.drawings.push((drawing, position));
    }

    pub fn add_path(&mut self, path: WirePath) {
        self.paths.push(path);
    }

    pub fn add_rect(&mut self, rect: Rect) {
        self.rects.push(rect);
    }

    pub fn paths(&self) -> &[WirePath] {
        &self.paths
    }

    /// Right-most extent of drawings and rectangles.
    pub fn width(&self) -> f64 {
        let drawings = self.drawings.iter().map(|(d, p)| p.x + d.width());
        let rects = self.rects.iter().map(|r| r.x + r.width);
        drawings.chain(rects).fold(0.0, f64::max)
    }

    pub fn height(&self) -> f64 {
        let drawings = self.drawings.iter().map(|(d, p)| p.y + d.height());
        let rects = self.rects.iter().map(|r| r.y + r.height);
        drawings.chain(rects).fold(0.0, f64::max)
    }

    /// Serializes the composition; `margin` is added to the extent on the right and bottom.
    pub fn to_svg(&self, margin: f64) -> String {
        let mut out = String::new();
        let _ = write!(
            &mut out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{}" height="{}">"#,
            fmt(self.width() + margin),
            fmt(self.height() + margin)
        );
        out.push_str("<style>svg{overflow:visible;}</style>");

        for r in &self.rects {
            let _ = write!(
                &mut out,
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
                fmt(r.x),
                fmt(r.y),
                fmt(r.width),
                fmt(r.height),
                escape_xml(&r.fill),
                escape_xml(&r.stroke),
                fmt(r.stroke_width)
            );
        }

        for path in &self.paths {
            let _ = write!(
                &mut out,
                r#"<path style="{}" d="{}"/>"#,
                escape_xml(&path.style_attr()),
                path.path_data()
            );
        }

        for (drawing, p) in &self.drawings {
            let _ = write!(
                &mut out,
                r#"<g transform="translate({}, {})">"#,
                fmt(p.x),
                fmt(p.y)
            );
            drawing.write_svg(&mut out);
            out.push_str("</g>");
        }

        out.push_str("</svg>\n");
        out
    }
}
