use crate::drawing::Drawing;
use crate::error::Result;
use wirebundle_core::geom::{Point, Size, Vector, point};
use wirebundle_core::{PartRecord, WireSet};

/// Index of a part inside its [`Assembly`](crate::layout::Assembly).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(pub(crate) usize);

impl PartId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// A drawing, the wire sets it offers, and where it currently sits on the canvas.
#[derive(Debug, Clone)]
pub struct Part {
    id: String,
    drawing: Drawing,
    wire_sets: Vec<WireSet>,
    position: Point,
}

impl Part {
    pub fn new(id: impl Into<String>, drawing: Drawing, wire_sets: Vec<WireSet>) -> Self {
        Self {
            id: id.into(),
            drawing,
            wire_sets,
            position: point(0.0, 0.0),
        }
    }

    /// Loads the drawing a part description points at.
    pub fn from_record(record: PartRecord) -> Result<Self> {
        let drawing = Drawing::load(&record.drawing_path)?;
        Ok(Self::new(record.id, drawing, record.wire_sets))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    pub fn drawing_mut(&mut self) -> &mut Drawing {
        &mut self.drawing
    }

    pub fn wire_sets(&self) -> &[WireSet] {
        &self.wire_sets
    }

    pub fn wire_set(&self, tag: &str) -> Option<(usize, &WireSet)> {
        self.wire_sets.iter().enumerate().find(|(_, ws)| ws.tag() == tag)
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Offset that maps drawing-local endpoint coordinates to canvas coordinates.
    pub fn offset(&self) -> Vector {
        self.position.to_vector()
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn size(&self) -> Size {
        self.drawing.size()
    }

    pub fn width(&self) -> f64 {
        self.drawing.width()
    }

    pub fn height(&self) -> f64 {
        self.drawing.height()
    }

    pub fn right(&self) -> f64 {
        self.position.x + self.width()
    }

    pub fn bottom(&self) -> f64 {
        self.position.y + self.height()
    }
}
