use egui::{Color32, Pos2, Rect, Shape as PaintShape, Vec2};
use serde::{Deserialize, Serialize};

use super::common::{self, ShapeStyle};
use super::{Shape, ShapeKind};
use crate::geometry;
use crate::id_generator::generate_shape_id;
use crate::serialize::{MapDataDeserializer, MapDataSerializer, SerializeError};

// Glyph layout belongs to a font-owning front end; the core sizes text
// bounds with a fixed average advance per character.
const APPROX_GLYPH_ADVANCE: f32 = 0.6;

/// Text label anchored at a world-space location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text {
    #[serde(skip_serializing, default = "generate_shape_id")]
    id: usize,
    style: ShapeStyle,
    location: Option<Pos2>,
    text: String,
    text_size: f32,
    erased: bool,
    offset: Option<Vec2>,
}

impl Text {
    pub(crate) fn new(location: Pos2, text: String, text_size: f32, color: Color32) -> Self {
        Self {
            id: generate_shape_id(),
            style: ShapeStyle::new(color, 1.0),
            location: Some(location),
            text,
            text_size,
            erased: false,
            offset: None,
        }
    }

    pub(crate) fn with_new_id(&self) -> Self {
        let mut copy = self.clone();
        copy.id = generate_shape_id();
        copy
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: String) {
        self.text = text;
    }

    pub fn text_size(&self) -> f32 {
        self.text_size
    }

    pub fn location(&self) -> Option<Pos2> {
        self.location
    }

    pub(crate) fn serialize_fields<W: std::io::Write>(
        &self,
        s: &mut MapDataSerializer<W>,
    ) -> Result<(), SerializeError> {
        common::serialize_pos(s, self.location.unwrap_or(Pos2::ZERO))?;
        s.f32(self.text_size)?;
        s.string(&self.text)
    }

    pub(crate) fn deserialize_fields(
        d: &mut MapDataDeserializer,
        style: ShapeStyle,
    ) -> Result<Self, SerializeError> {
        let location = common::deserialize_pos(d)?;
        let text_size = d.f32()?;
        let text = d.string()?;
        let mut label = Self::new(location, text, text_size, style.color);
        label.style = style;
        Ok(label)
    }
}

impl Shape for Text {
    fn id(&self) -> usize {
        self.id
    }

    fn tag(&self) -> &'static str {
        "txt"
    }

    fn style(&self) -> ShapeStyle {
        self.style
    }

    fn rect(&self) -> Rect {
        match self.location {
            Some(loc) => Rect::from_min_size(
                loc,
                Vec2::new(
                    self.text_size * APPROX_GLYPH_ADVANCE * self.text.chars().count() as f32,
                    self.text_size,
                ),
            ),
            None => Rect::NOTHING,
        }
    }

    fn add_point(&mut self, p: Pos2) {
        self.location = Some(p);
    }

    fn contains(&self, p: Pos2) -> bool {
        self.rect().contains(p)
    }

    fn erase(&mut self, center: Pos2, radius: f32) {
        // Text has no partial erasure; touching it at all deletes it.
        if geometry::circle_intersects_rect(center, radius, self.rect()) {
            self.erased = true;
        }
    }

    fn needs_optimization(&self) -> bool {
        self.erased
    }

    fn remove_erased_points(&mut self) -> Vec<ShapeKind> {
        self.erased = false;
        Vec::new()
    }

    fn is_valid(&self) -> bool {
        self.location.is_some() && !self.text.is_empty()
    }

    fn should_draw_below_grid(&self) -> bool {
        // Text always reads on top of the grid.
        false
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
        moved.location = moved.location.map(|p| p + offset);
        Some(ShapeKind::Text(moved))
    }

    fn render(&self) -> Vec<PaintShape> {
        Vec::new()
    }
}
