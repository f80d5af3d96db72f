use egui::{Pos2, Rect, Shape as PaintShape, Stroke as PaintStroke, Vec2};
use serde::{Deserialize, Serialize};

use super::common::{self, ShapeStyle};
use super::freehand::FreehandLine;
use super::{Shape, ShapeKind};
use crate::geometry;
use crate::id_generator::generate_shape_id;
use crate::serialize::{MapDataDeserializer, MapDataSerializer, SerializeError};

/// Circle dragged out by its diameter: the first point anchors one end,
/// the latest point is the other, and center/radius follow from the two.
///
/// Like [`Rectangle`](super::Rectangle), it converts to a freehand
/// polyline on first eraser contact and delegates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circle {
    #[serde(skip_serializing, default = "generate_shape_id")]
    id: usize,
    style: ShapeStyle,
    anchor: Option<Pos2>,
    center: Option<Pos2>,
    radius: f32,
    outline: Option<FreehandLine>,
    offset: Option<Vec2>,
}

impl Circle {
    pub(crate) fn new(style: ShapeStyle) -> Self {
        Self {
            id: generate_shape_id(),
            style,
            anchor: None,
            center: None,
            radius: 0.0,
            outline: None,
            offset: None,
        }
    }

    pub(crate) fn from_center(style: ShapeStyle, center: Pos2, radius: f32) -> Self {
        Self {
            center: Some(center),
            radius,
            ..Self::new(style)
        }
    }

    pub(crate) fn with_new_id(&self) -> Self {
        let mut copy = self.clone();
        copy.id = generate_shape_id();
        copy
    }

    pub fn center(&self) -> Option<Pos2> {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub(crate) fn serialize_fields<W: std::io::Write>(
        &self,
        s: &mut MapDataSerializer<W>,
    ) -> Result<(), SerializeError> {
        common::serialize_pos(s, self.center.unwrap_or(Pos2::ZERO))?;
        s.f32(self.radius)
    }

    pub(crate) fn deserialize_fields(
        d: &mut MapDataDeserializer,
        style: ShapeStyle,
    ) -> Result<Self, SerializeError> {
        let center = common::deserialize_pos(d)?;
        let radius = d.f32()?;
        Ok(Self::from_center(style, center, radius))
    }
}

impl Shape for Circle {
    fn id(&self) -> usize {
        self.id
    }

    fn tag(&self) -> &'static str {
        "cr"
    }

    fn style(&self) -> ShapeStyle {
        self.style
    }

    fn rect(&self) -> Rect {
        match self.center {
            Some(c) => Rect::from_center_size(c, Vec2::splat(self.radius * 2.0)),
            None => Rect::NOTHING,
        }
    }

    fn add_point(&mut self, p: Pos2) {
        match self.anchor {
            None => self.anchor = Some(p),
            Some(anchor) => {
                // The drag defines a diameter.
                self.center = Some(anchor + (p - anchor) / 2.0);
                self.radius = (p - anchor).length() / 2.0;
            }
        }
    }

    fn contains(&self, p: Pos2) -> bool {
        match self.center {
            Some(c) => (p - c).length() <= self.radius,
            None => false,
        }
    }

    fn erase(&mut self, center: Pos2, radius: f32) {
        let Some(own_center) = self.center else {
            return;
        };
        if !geometry::circle_intersects_rect(center, radius, self.rect()) {
            return;
        }
        let mut outline = self.outline.take().unwrap_or_else(|| {
            FreehandLine::from_points(self.style, common::circle_outline(own_center, self.radius))
        });
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
        self.center.is_some() && self.radius > 0.0
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
        moved.anchor = moved.anchor.map(|p| p + offset);
        moved.center = moved.center.map(|p| p + offset);
        Some(ShapeKind::Circle(moved))
    }

    fn render(&self) -> Vec<PaintShape> {
        if let Some(outline) = &self.outline {
            return outline.render();
        }
        let Some(center) = self.center else {
            return Vec::new();
        };
        let offset = self.offset.unwrap_or(Vec2::ZERO);
        let stroke = PaintStroke::new(self.style.stroke_width, self.style.color);
        vec![PaintShape::circle_stroke(center + offset, self.radius, stroke)]
    }
}
