use egui::{Pos2, Rect, Shape as PaintShape, Stroke as PaintStroke, Vec2};
use serde::{Deserialize, Serialize};

use super::common::{self, ShapeStyle};
use super::freehand::FreehandLine;
use super::{Shape, ShapeKind};
use crate::geometry;
use crate::id_generator::generate_shape_id;
use crate::serialize::{MapDataDeserializer, MapDataSerializer, SerializeError};

/// Axis-aligned rectangle defined by two dragged corners.
///
/// Rectangle erasure does not compose the way segment erasure does, so on
/// first contact with the eraser the outline lazily converts to a
/// subdivided freehand polyline and delegates to its flag-based erasing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rectangle {
    #[serde(skip_serializing, default = "generate_shape_id")]
    id: usize,
    style: ShapeStyle,
    corner_a: Option<Pos2>,
    corner_b: Option<Pos2>,
    outline: Option<FreehandLine>,
    offset: Option<Vec2>,
}

impl Rectangle {
    pub(crate) fn new(style: ShapeStyle) -> Self {
        Self {
            id: generate_shape_id(),
            style,
            corner_a: None,
            corner_b: None,
            outline: None,
            offset: None,
        }
    }

    pub(crate) fn from_corners(style: ShapeStyle, a: Pos2, b: Pos2) -> Self {
        let mut rect = Self::new(style);
        rect.add_point(a);
        rect.add_point(b);
        rect
    }

    pub(crate) fn with_new_id(&self) -> Self {
        let mut copy = self.clone();
        copy.id = generate_shape_id();
        copy
    }

    fn shape_rect(&self) -> Rect {
        match (self.corner_a, self.corner_b) {
            (Some(a), Some(b)) => Rect::from_two_pos(a, b),
            (Some(a), None) => Rect::from_min_max(a, a),
            _ => Rect::NOTHING,
        }
    }

    pub(crate) fn serialize_fields<W: std::io::Write>(
        &self,
        s: &mut MapDataSerializer<W>,
    ) -> Result<(), SerializeError> {
        common::serialize_pos(s, self.corner_a.unwrap_or(Pos2::ZERO))?;
        common::serialize_pos(s, self.corner_b.unwrap_or(Pos2::ZERO))
    }

    pub(crate) fn deserialize_fields(
        d: &mut MapDataDeserializer,
        style: ShapeStyle,
    ) -> Result<Self, SerializeError> {
        let a = common::deserialize_pos(d)?;
        let b = common::deserialize_pos(d)?;
        Ok(Self::from_corners(style, a, b))
    }
}

impl Shape for Rectangle {
    fn id(&self) -> usize {
        self.id
    }

    fn tag(&self) -> &'static str {
        "rct"
    }

    fn style(&self) -> ShapeStyle {
        self.style
    }

    fn rect(&self) -> Rect {
        self.shape_rect()
    }

    fn add_point(&mut self, p: Pos2) {
        if self.corner_a.is_none() {
            self.corner_a = Some(p);
        } else {
            self.corner_b = Some(p);
        }
    }

    fn contains(&self, p: Pos2) -> bool {
        self.shape_rect().contains(p)
    }

    fn erase(&mut self, center: Pos2, radius: f32) {
        let rect = self.shape_rect();
        if !geometry::circle_intersects_rect(center, radius, rect) {
            return;
        }
        if self.corner_a.is_none() || self.corner_b.is_none() {
            return;
        }
        let mut outline = self
            .outline
            .take()
            .unwrap_or_else(|| FreehandLine::from_points(self.style, common::rect_outline(rect)));
        outline.erase(center, radius);
        if outline.needs_optimization() {
            self.outline = Some(outline);
        }
    }

    fn needs_optimization(&self) -> bool {
        self.outline.is_some()
    }

    fn remove_erased_points(&mut self) -> Vec<ShapeKind> {
        match self.outline.take() {
            Some(mut outline) => outline.remove_erased_points(),
            None => Vec::new(),
        }
    }

    fn is_valid(&self) -> bool {
        let rect = self.shape_rect();
        self.corner_a.is_some() && self.corner_b.is_some() && rect.width() > 0.0 && rect.height() > 0.0
    }

    fn set_draw_offset(&mut self, offset: Vec2) {
        self.offset = Some(offset);
    }

    fn pending_offset(&self) -> Option<Vec2> {
        self.offset
    }

    fn commit_draw_offset(&mut self) -> Option<ShapeKind> {
        let offset = self.offset.take()?;
        let mut moved = self.with_new_id();
        moved.offset = None;
        moved.corner_a = moved.corner_a.map(|p| p + offset);
        moved.corner_b = moved.corner_b.map(|p| p + offset);
        Some(ShapeKind::Rectangle(moved))
    }

    fn render(&self) -> Vec<PaintShape> {
        if let Some(outline) = &self.outline {
            return outline.render();
        }
        if self.corner_a.is_none() || self.corner_b.is_none() {
            return Vec::new();
        }
        let offset = self.offset.unwrap_or(Vec2::ZERO);
        let stroke = PaintStroke::new(self.style.stroke_width, self.style.color);
        vec![PaintShape::rect_stroke(
            self.shape_rect().translate(offset),
            0.0,
            stroke,
        )]
    }
}
