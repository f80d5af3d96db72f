use egui::{Pos2, Rect, Shape as PaintShape, Stroke as PaintStroke, Vec2};
use serde::{Deserialize, Serialize};

use super::common::{self, ShapeStyle};
use super::{Shape, ShapeKind};
use crate::geometry;
use crate::id_generator::generate_shape_id;
use crate::serialize::{MapDataDeserializer, MapDataSerializer, SerializeError};

/// Freehand line: an unbounded point list with per-point draw flags.
///
/// Erasing never removes points; it clears draw flags. A segment renders
/// only while both its endpoints are still drawn, and `optimize()` later
/// replaces the line with its surviving runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreehandLine {
    #[serde(skip_serializing, default = "generate_shape_id")]
    id: usize,
    style: ShapeStyle,
    points: Vec<Pos2>,
    draw: Vec<bool>,
    offset: Option<Vec2>,
    bounds: Rect,
}

impl FreehandLine {
    pub(crate) fn new(style: ShapeStyle) -> Self {
        Self {
            id: generate_shape_id(),
            style,
            points: Vec::new(),
            draw: Vec::new(),
            bounds: Rect::NOTHING,
            offset: None,
        }
    }

    pub(crate) fn from_points(style: ShapeStyle, points: Vec<Pos2>) -> Self {
        let mut line = Self::new(style);
        for p in points {
            line.add_point(p);
        }
        line
    }

    pub(crate) fn with_new_id(&self) -> Self {
        let mut copy = self.clone();
        copy.id = generate_shape_id();
        copy
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    fn recompute_bounds(&mut self) {
        self.bounds = geometry::calculate_bounds(&self.points, self.style.stroke_width / 2.0);
    }

    /// The still-drawn runs of consecutive points.
    fn drawn_runs(&self) -> Vec<Vec<Pos2>> {
        let mut runs = Vec::new();
        let mut run: Vec<Pos2> = Vec::new();
        for (i, p) in self.points.iter().enumerate() {
            if self.draw[i] {
                run.push(*p);
            } else if !run.is_empty() {
                runs.push(std::mem::take(&mut run));
            }
        }
        if !run.is_empty() {
            runs.push(run);
        }
        runs
    }

    pub(crate) fn serialize_fields<W: std::io::Write>(
        &self,
        s: &mut MapDataSerializer<W>,
    ) -> Result<(), SerializeError> {
        s.u32(self.points.len() as u32)?;
        for p in &self.points {
            common::serialize_pos(s, *p)?;
        }
        Ok(())
    }

    pub(crate) fn deserialize_fields(
        d: &mut MapDataDeserializer,
        style: ShapeStyle,
    ) -> Result<Self, SerializeError> {
        let count = d.u32()?;
        let mut line = Self::new(style);
        for _ in 0..count {
            line.add_point(common::deserialize_pos(d)?);
        }
        Ok(line)
    }
}

impl Shape for FreehandLine {
    fn id(&self) -> usize {
        self.id
    }

    fn tag(&self) -> &'static str {
        "fh"
    }

    fn style(&self) -> ShapeStyle {
        self.style
    }

    fn rect(&self) -> Rect {
        self.bounds
    }

    fn add_point(&mut self, p: Pos2) {
        self.points.push(p);
        self.draw.push(true);
        self.recompute_bounds();
    }

    fn contains(&self, p: Pos2) -> bool {
        if !self.bounds.contains(p) {
            return false;
        }
        geometry::point_in_polygon(p, &self.points)
    }

    fn erase(&mut self, center: Pos2, radius: f32) {
        if !geometry::circle_intersects_rect(center, radius, self.bounds) {
            return;
        }
        if self.points.len() == 1 && (self.points[0] - center).length() <= radius {
            self.draw[0] = false;
            return;
        }
        for i in 0..self.points.len().saturating_sub(1) {
            if geometry::segment_intersects_circle(self.points[i], self.points[i + 1], center, radius)
            {
                self.draw[i] = false;
                self.draw[i + 1] = false;
            }
        }
    }

    fn needs_optimization(&self) -> bool {
        self.draw.iter().any(|&d| !d)
    }

    fn remove_erased_points(&mut self) -> Vec<ShapeKind> {
        if !self.needs_optimization() {
            return Vec::new();
        }
        let fragments = self
            .drawn_runs()
            .into_iter()
            .filter(|run| run.len() >= 2)
            .map(|run| ShapeKind::Freehand(FreehandLine::from_points(self.style, run)))
            .collect();
        // Reset so the full original geometry survives for undo.
        self.draw = vec![true; self.points.len()];
        fragments
    }

    fn is_valid(&self) -> bool {
        self.points.len() >= 2
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
        for p in &mut moved.points {
            *p += offset;
        }
        moved.recompute_bounds();
        Some(ShapeKind::Freehand(moved))
    }

    fn render(&self) -> Vec<PaintShape> {
        let offset = self.offset.unwrap_or(Vec2::ZERO);
        let stroke = PaintStroke::new(self.style.stroke_width, self.style.color);
        self.drawn_runs()
            .into_iter()
            .filter(|run| run.len() >= 2)
            .map(|run| PaintShape::line(run.into_iter().map(|p| p + offset).collect(), stroke))
            .collect()
    }
}
