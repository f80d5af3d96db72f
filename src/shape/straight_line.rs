use egui::{Pos2, Rect, Shape as PaintShape, Stroke as PaintStroke, Vec2};
use serde::{Deserialize, Serialize};

use super::common::{self, ShapeStyle, MIN_FRAGMENT_SPAN};
use super::{Shape, ShapeKind};
use crate::geometry;
use crate::id_generator::generate_shape_id;
use crate::serialize::{MapDataDeserializer, MapDataSerializer, SerializeError};

/// Straight line between two endpoints, with erased spans tracked as a
/// merged interval list over the segment parameter `t ∈ [0, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StraightLine {
    #[serde(skip_serializing, default = "generate_shape_id")]
    id: usize,
    style: ShapeStyle,
    start: Option<Pos2>,
    end: Option<Pos2>,
    erased: Vec<(f32, f32)>,
    offset: Option<Vec2>,
    bounds: Rect,
}

impl StraightLine {
    pub(crate) fn new(style: ShapeStyle) -> Self {
        Self {
            id: generate_shape_id(),
            style,
            start: None,
            end: None,
            erased: Vec::new(),
            offset: None,
            bounds: Rect::NOTHING,
        }
    }

    pub(crate) fn from_endpoints(style: ShapeStyle, start: Pos2, end: Pos2) -> Self {
        let mut line = Self::new(style);
        line.add_point(start);
        line.add_point(end);
        line
    }

    pub(crate) fn with_new_id(&self) -> Self {
        let mut copy = self.clone();
        copy.id = generate_shape_id();
        copy
    }

    pub fn endpoints(&self) -> Option<(Pos2, Pos2)> {
        Some((self.start?, self.end?))
    }

    fn recompute_bounds(&mut self) {
        let points: Vec<Pos2> = self.start.iter().chain(self.end.iter()).copied().collect();
        self.bounds = geometry::calculate_bounds(&points, self.style.stroke_width / 2.0);
    }

    fn lerp(&self, t: f32) -> Option<Pos2> {
        let (a, b) = (self.start?, self.end?);
        Some(a + (b - a) * t)
    }

    pub(crate) fn serialize_fields<W: std::io::Write>(
        &self,
        s: &mut MapDataSerializer<W>,
    ) -> Result<(), SerializeError> {
        common::serialize_pos(s, self.start.unwrap_or(Pos2::ZERO))?;
        common::serialize_pos(s, self.end.unwrap_or(Pos2::ZERO))
    }

    pub(crate) fn deserialize_fields(
        d: &mut MapDataDeserializer,
        style: ShapeStyle,
    ) -> Result<Self, SerializeError> {
        let start = common::deserialize_pos(d)?;
        let end = common::deserialize_pos(d)?;
        Ok(Self::from_endpoints(style, start, end))
    }
}

impl Shape for StraightLine {
    fn id(&self) -> usize {
        self.id
    }

    fn tag(&self) -> &'static str {
        "sl"
    }

    fn style(&self) -> ShapeStyle {
        self.style
    }

    fn rect(&self) -> Rect {
        self.bounds
    }

    fn add_point(&mut self, p: Pos2) {
        if self.start.is_none() {
            self.start = Some(p);
        } else {
            // Later calls keep moving the free endpoint (drag-to-draw).
            self.end = Some(p);
        }
        self.recompute_bounds();
    }

    fn contains(&self, p: Pos2) -> bool {
        if !self.bounds.contains(p) {
            return false;
        }
        let Some((a, b)) = self.endpoints() else {
            return false;
        };
        geometry::distance_to_line_segment(p, a, b) <= (self.style.stroke_width / 2.0).max(1.0)
    }

    fn erase(&mut self, center: Pos2, radius: f32) {
        if !geometry::circle_intersects_rect(center, radius, self.bounds) {
            return;
        }
        let Some((a, b)) = self.endpoints() else {
            return;
        };
        if let Some((t_enter, t_exit)) = geometry::circle_segment_params(a, b, center, radius) {
            let lo = t_enter.max(0.0);
            let hi = t_exit.min(1.0);
            if hi > lo {
                common::merge_erased_span(&mut self.erased, (lo, hi));
            }
        }
    }

    fn needs_optimization(&self) -> bool {
        !self.erased.is_empty()
    }

    fn remove_erased_points(&mut self) -> Vec<ShapeKind> {
        if self.erased.is_empty() {
            return Vec::new();
        }
        let kept = common::kept_spans(&self.erased);
        self.erased.clear();
        let Some((a, b)) = self.endpoints() else {
            return Vec::new();
        };
        let length = (b - a).length();
        kept.into_iter()
            .filter(|(lo, hi)| (hi - lo) * length > MIN_FRAGMENT_SPAN)
            .filter_map(|(lo, hi)| {
                let from = self.lerp(lo)?;
                let to = self.lerp(hi)?;
                Some(ShapeKind::StraightLine(StraightLine::from_endpoints(
                    self.style, from, to,
                )))
            })
            .collect()
    }

    fn is_valid(&self) -> bool {
        match self.endpoints() {
            Some((a, b)) => a != b,
            None => false,
        }
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
        moved.start = moved.start.map(|p| p + offset);
        moved.end = moved.end.map(|p| p + offset);
        moved.recompute_bounds();
        Some(ShapeKind::StraightLine(moved))
    }

    fn render(&self) -> Vec<PaintShape> {
        let Some((a, b)) = self.endpoints() else {
            return Vec::new();
        };
        let offset = self.offset.unwrap_or(Vec2::ZERO);
        let stroke = PaintStroke::new(self.style.stroke_width, self.style.color);
        common::kept_spans(&self.erased)
            .into_iter()
            .map(|(lo, hi)| {
                let from = a + (b - a) * lo + offset;
                let to = a + (b - a) * hi + offset;
                PaintShape::line_segment([from, to], stroke)
            })
            .collect()
    }
}
