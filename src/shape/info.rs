use egui::{Color32, Pos2, Rect, Shape as PaintShape, Stroke as PaintStroke, Vec2};
use serde::{Deserialize, Serialize};

use super::common::{self, ShapeStyle};
use super::{Shape, ShapeKind};
use crate::geometry;
use crate::id_generator::generate_shape_id;
use crate::serialize::{MapDataDeserializer, MapDataSerializer, SerializeError};

/// World-space footprint of the marker square.
const MARKER_SIZE: f32 = 1.0;

/// Information marker: a fixed-size map pin carrying GM notes and,
/// optionally, the name of the icon a front end should draw for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Information {
    #[serde(skip_serializing, default = "generate_shape_id")]
    id: usize,
    style: ShapeStyle,
    location: Option<Pos2>,
    text: String,
    icon: Option<String>,
    erased: bool,
    offset: Option<Vec2>,
}

impl Information {
    pub(crate) fn new(location: Pos2, text: String, icon: Option<String>) -> Self {
        Self {
            id: generate_shape_id(),
            style: ShapeStyle::new(Color32::BLACK, 1.0),
            location: Some(location),
            text,
            icon,
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

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn set_icon(&mut self, icon: Option<String>) {
        self.icon = icon;
    }

    pub fn location(&self) -> Option<Pos2> {
        self.location
    }

    pub(crate) fn serialize_fields<W: std::io::Write>(
        &self,
        s: &mut MapDataSerializer<W>,
    ) -> Result<(), SerializeError> {
        common::serialize_pos(s, self.location.unwrap_or(Pos2::ZERO))?;
        s.string(&self.text)?;
        s.bool(self.icon.is_some())?;
        if let Some(icon) = &self.icon {
            s.string(icon)?;
        }
        Ok(())
    }

    pub(crate) fn deserialize_fields(
        d: &mut MapDataDeserializer,
        style: ShapeStyle,
    ) -> Result<Self, SerializeError> {
        let location = common::deserialize_pos(d)?;
        let text = d.string()?;
        let icon = if d.bool()? { Some(d.string()?) } else { None };
        let mut marker = Self::new(location, text, icon);
        marker.style = style;
        Ok(marker)
    }
}

impl Shape for Information {
    fn id(&self) -> usize {
        self.id
    }

    fn tag(&self) -> &'static str {
        "inf"
    }

    fn style(&self) -> ShapeStyle {
        self.style
    }

    fn rect(&self) -> Rect {
        match self.location {
            Some(loc) => Rect::from_center_size(loc, Vec2::splat(MARKER_SIZE)),
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
        self.location.is_some()
    }

    fn should_draw_below_grid(&self) -> bool {
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
        Some(ShapeKind::Information(moved))
    }

    fn render(&self) -> Vec<PaintShape> {
        if self.location.is_none() {
            return Vec::new();
        }
        let offset = self.offset.unwrap_or(Vec2::ZERO);
        // A placeholder outline; the front end substitutes the named icon.
        vec![PaintShape::rect_stroke(
            self.rect().translate(offset),
            0.0,
            PaintStroke::new(self.style.stroke_width, self.style.color),
        )]
    }
}
