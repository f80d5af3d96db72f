use egui::{Color32, Pos2, Rect, Shape as PaintShape, Vec2};
use serde::{Deserialize, Serialize};

use crate::serialize::{MapDataDeserializer, MapDataSerializer, SerializeError};

mod circle;
mod common;
mod freehand;
mod info;
mod rectangle;
mod straight_line;
mod text;

pub use circle::Circle;
pub use common::ShapeStyle;
pub use freehand::FreehandLine;
pub use info::Information;
pub use rectangle::Rectangle;
pub use straight_line::StraightLine;
pub use text::Text;

/// Common trait that all drawable map shapes implement
pub trait Shape {
    /// Get the unique identifier for this shape
    fn id(&self) -> usize;

    /// The shape's serialization type tag (also a human-readable kind name)
    fn tag(&self) -> &'static str;

    /// Color and stroke width
    fn style(&self) -> ShapeStyle;

    /// Get the bounding rectangle for this shape
    fn rect(&self) -> Rect;

    /// Incrementally define the shape: the first call sets an anchor,
    /// later calls extend or finalize geometry per variant
    fn add_point(&mut self, p: Pos2);

    /// Test if the shape contains the given world-space position
    fn contains(&self, p: Pos2) -> bool;

    /// Mark or split geometry intersecting the eraser circle
    fn erase(&mut self, center: Pos2, radius: f32);

    /// True when an erase pass left this shape needing a split
    fn needs_optimization(&self) -> bool;

    /// Return the disjoint replacement fragments for an erased shape and
    /// reset the erase state, restoring this shape's full geometry (so a
    /// command that deletes it can still bring it back on undo)
    fn remove_erased_points(&mut self) -> Vec<ShapeKind>;

    /// Degenerate shapes report false and are dropped by `optimize()`
    fn is_valid(&self) -> bool;

    /// Thick shapes act as a backdrop and draw below the grid lines
    fn should_draw_below_grid(&self) -> bool {
        self.style().stroke_width > 1.0
    }

    /// Apply a live, uncommitted translation preview
    fn set_draw_offset(&mut self, offset: Vec2);

    /// The pending preview translation, if any
    fn pending_offset(&self) -> Option<Vec2>;

    /// Build the translated copy for a committed drag and clear the
    /// offset; the original is left for the caller to delete via a command
    fn commit_draw_offset(&mut self) -> Option<ShapeKind>;

    /// Paint primitives for this shape, honoring erase gaps and any
    /// pending draw offset. Text variants expose their data instead and
    /// render no geometry here (glyph layout needs a font-owning caller).
    fn render(&self) -> Vec<PaintShape>;
}

/// Enumeration of all shape variants on a map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ShapeKind {
    Freehand(FreehandLine),
    StraightLine(StraightLine),
    Rectangle(Rectangle),
    Circle(Circle),
    Text(Text),
    Information(Information),
}

impl ShapeKind {
    /// Deep copy with a fresh id, for stamping a selection back into the
    /// collection
    pub fn duplicate(&self) -> ShapeKind {
        match self {
            ShapeKind::Freehand(s) => ShapeKind::Freehand(s.with_new_id()),
            ShapeKind::StraightLine(s) => ShapeKind::StraightLine(s.with_new_id()),
            ShapeKind::Rectangle(s) => ShapeKind::Rectangle(s.with_new_id()),
            ShapeKind::Circle(s) => ShapeKind::Circle(s.with_new_id()),
            ShapeKind::Text(s) => ShapeKind::Text(s.with_new_id()),
            ShapeKind::Information(s) => ShapeKind::Information(s.with_new_id()),
        }
    }

    /// Write this shape in the legacy token-stream format: type tag,
    /// style, then variant fields in frozen order.
    pub fn serialize<W: std::io::Write>(
        &self,
        s: &mut MapDataSerializer<W>,
    ) -> Result<(), SerializeError> {
        s.start_object()?;
        s.string(self.tag())?;
        let style = self.style();
        s.color(style.color)?;
        s.f32(style.stroke_width)?;
        match self {
            ShapeKind::Freehand(shape) => shape.serialize_fields(s)?,
            ShapeKind::StraightLine(shape) => shape.serialize_fields(s)?,
            ShapeKind::Rectangle(shape) => shape.serialize_fields(s)?,
            ShapeKind::Circle(shape) => shape.serialize_fields(s)?,
            ShapeKind::Text(shape) => shape.serialize_fields(s)?,
            ShapeKind::Information(shape) => shape.serialize_fields(s)?,
        }
        s.end_object()
    }

    /// Read one shape; an unrecognized type tag is a fatal load error.
    pub fn deserialize(d: &mut MapDataDeserializer) -> Result<ShapeKind, SerializeError> {
        d.expect_start_object()?;
        let tag = d.string()?;
        let style = ShapeStyle {
            color: d.color()?,
            stroke_width: d.f32()?,
        };
        let shape = match tag.as_str() {
            "fh" => ShapeKind::Freehand(FreehandLine::deserialize_fields(d, style)?),
            "sl" => ShapeKind::StraightLine(StraightLine::deserialize_fields(d, style)?),
            "rct" => ShapeKind::Rectangle(Rectangle::deserialize_fields(d, style)?),
            "cr" => ShapeKind::Circle(Circle::deserialize_fields(d, style)?),
            "txt" => ShapeKind::Text(Text::deserialize_fields(d, style)?),
            "inf" => ShapeKind::Information(Information::deserialize_fields(d, style)?),
            _ => return Err(SerializeError::UnknownShapeTag(tag)),
        };
        d.expect_end_object()?;
        Ok(shape)
    }
}

impl Shape for ShapeKind {
    fn id(&self) -> usize {
        match self {
            ShapeKind::Freehand(s) => s.id(),
            ShapeKind::StraightLine(s) => s.id(),
            ShapeKind::Rectangle(s) => s.id(),
            ShapeKind::Circle(s) => s.id(),
            ShapeKind::Text(s) => s.id(),
            ShapeKind::Information(s) => s.id(),
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            ShapeKind::Freehand(s) => s.tag(),
            ShapeKind::StraightLine(s) => s.tag(),
            ShapeKind::Rectangle(s) => s.tag(),
            ShapeKind::Circle(s) => s.tag(),
            ShapeKind::Text(s) => s.tag(),
            ShapeKind::Information(s) => s.tag(),
        }
    }

    fn style(&self) -> ShapeStyle {
        match self {
            ShapeKind::Freehand(s) => s.style(),
            ShapeKind::StraightLine(s) => s.style(),
            ShapeKind::Rectangle(s) => s.style(),
            ShapeKind::Circle(s) => s.style(),
            ShapeKind::Text(s) => s.style(),
            ShapeKind::Information(s) => s.style(),
        }
    }

    fn rect(&self) -> Rect {
        match self {
            ShapeKind::Freehand(s) => s.rect(),
            ShapeKind::StraightLine(s) => s.rect(),
            ShapeKind::Rectangle(s) => s.rect(),
            ShapeKind::Circle(s) => s.rect(),
            ShapeKind::Text(s) => s.rect(),
            ShapeKind::Information(s) => s.rect(),
        }
    }

    fn add_point(&mut self, p: Pos2) {
        match self {
            ShapeKind::Freehand(s) => s.add_point(p),
            ShapeKind::StraightLine(s) => s.add_point(p),
            ShapeKind::Rectangle(s) => s.add_point(p),
            ShapeKind::Circle(s) => s.add_point(p),
            ShapeKind::Text(s) => s.add_point(p),
            ShapeKind::Information(s) => s.add_point(p),
        }
    }

    fn contains(&self, p: Pos2) -> bool {
        match self {
            ShapeKind::Freehand(s) => s.contains(p),
            ShapeKind::StraightLine(s) => s.contains(p),
            ShapeKind::Rectangle(s) => s.contains(p),
            ShapeKind::Circle(s) => s.contains(p),
            ShapeKind::Text(s) => s.contains(p),
            ShapeKind::Information(s) => s.contains(p),
        }
    }

    fn erase(&mut self, center: Pos2, radius: f32) {
        match self {
            ShapeKind::Freehand(s) => s.erase(center, radius),
            ShapeKind::StraightLine(s) => s.erase(center, radius),
            ShapeKind::Rectangle(s) => s.erase(center, radius),
            ShapeKind::Circle(s) => s.erase(center, radius),
            ShapeKind::Text(s) => s.erase(center, radius),
            ShapeKind::Information(s) => s.erase(center, radius),
        }
    }

    fn needs_optimization(&self) -> bool {
        match self {
            ShapeKind::Freehand(s) => s.needs_optimization(),
            ShapeKind::StraightLine(s) => s.needs_optimization(),
            ShapeKind::Rectangle(s) => s.needs_optimization(),
            ShapeKind::Circle(s) => s.needs_optimization(),
            ShapeKind::Text(s) => s.needs_optimization(),
            ShapeKind::Information(s) => s.needs_optimization(),
        }
    }

    fn remove_erased_points(&mut self) -> Vec<ShapeKind> {
        match self {
            ShapeKind::Freehand(s) => s.remove_erased_points(),
            ShapeKind::StraightLine(s) => s.remove_erased_points(),
            ShapeKind::Rectangle(s) => s.remove_erased_points(),
            ShapeKind::Circle(s) => s.remove_erased_points(),
            ShapeKind::Text(s) => s.remove_erased_points(),
            ShapeKind::Information(s) => s.remove_erased_points(),
        }
    }

    fn is_valid(&self) -> bool {
        match self {
            ShapeKind::Freehand(s) => s.is_valid(),
            ShapeKind::StraightLine(s) => s.is_valid(),
            ShapeKind::Rectangle(s) => s.is_valid(),
            ShapeKind::Circle(s) => s.is_valid(),
            ShapeKind::Text(s) => s.is_valid(),
            ShapeKind::Information(s) => s.is_valid(),
        }
    }

    fn should_draw_below_grid(&self) -> bool {
        match self {
            ShapeKind::Freehand(s) => s.should_draw_below_grid(),
            ShapeKind::StraightLine(s) => s.should_draw_below_grid(),
            ShapeKind::Rectangle(s) => s.should_draw_below_grid(),
            ShapeKind::Circle(s) => s.should_draw_below_grid(),
            ShapeKind::Text(s) => s.should_draw_below_grid(),
            ShapeKind::Information(s) => s.should_draw_below_grid(),
        }
    }

    fn set_draw_offset(&mut self, offset: Vec2) {
        match self {
            ShapeKind::Freehand(s) => s.set_draw_offset(offset),
            ShapeKind::StraightLine(s) => s.set_draw_offset(offset),
            ShapeKind::Rectangle(s) => s.set_draw_offset(offset),
            ShapeKind::Circle(s) => s.set_draw_offset(offset),
            ShapeKind::Text(s) => s.set_draw_offset(offset),
            ShapeKind::Information(s) => s.set_draw_offset(offset),
        }
    }

    fn pending_offset(&self) -> Option<Vec2> {
        match self {
            ShapeKind::Freehand(s) => s.pending_offset(),
            ShapeKind::StraightLine(s) => s.pending_offset(),
            ShapeKind::Rectangle(s) => s.pending_offset(),
            ShapeKind::Circle(s) => s.pending_offset(),
            ShapeKind::Text(s) => s.pending_offset(),
            ShapeKind::Information(s) => s.pending_offset(),
        }
    }

    fn commit_draw_offset(&mut self) -> Option<ShapeKind> {
        match self {
            ShapeKind::Freehand(s) => s.commit_draw_offset(),
            ShapeKind::StraightLine(s) => s.commit_draw_offset(),
            ShapeKind::Rectangle(s) => s.commit_draw_offset(),
            ShapeKind::Circle(s) => s.commit_draw_offset(),
            ShapeKind::Text(s) => s.commit_draw_offset(),
            ShapeKind::Information(s) => s.commit_draw_offset(),
        }
    }

    fn render(&self) -> Vec<PaintShape> {
        match self {
            ShapeKind::Freehand(s) => s.render(),
            ShapeKind::StraightLine(s) => s.render(),
            ShapeKind::Rectangle(s) => s.render(),
            ShapeKind::Circle(s) => s.render(),
            ShapeKind::Text(s) => s.render(),
            ShapeKind::Information(s) => s.render(),
        }
    }
}

/// Factory functions for creating shapes
pub mod factory {
    use super::*;

    /// Create a new, empty freehand line
    pub fn create_freehand_line(style: ShapeStyle) -> ShapeKind {
        ShapeKind::Freehand(FreehandLine::new(style))
    }

    /// Create a new, empty straight line
    pub fn create_straight_line(style: ShapeStyle) -> ShapeKind {
        ShapeKind::StraightLine(StraightLine::new(style))
    }

    /// Create a new, empty rectangle
    pub fn create_rectangle(style: ShapeStyle) -> ShapeKind {
        ShapeKind::Rectangle(Rectangle::new(style))
    }

    /// Create a new, empty circle
    pub fn create_circle(style: ShapeStyle) -> ShapeKind {
        ShapeKind::Circle(Circle::new(style))
    }

    /// Create a text label at a location
    pub fn create_text(location: Pos2, text: String, text_size: f32, color: Color32) -> ShapeKind {
        ShapeKind::Text(Text::new(location, text, text_size, color))
    }

    /// Create an information marker at a location
    pub fn create_info(location: Pos2, text: String, icon: Option<String>) -> ShapeKind {
        ShapeKind::Information(Information::new(location, text, icon))
    }
}
