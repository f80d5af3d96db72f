use egui::{Color32, Pos2, Rect};
use serde::{Deserialize, Serialize};

use crate::serialize::{MapDataDeserializer, MapDataSerializer, SerializeError};

/// Segment count used when a circle lazily converts itself to a polyline
/// for erasing.
pub(crate) const CIRCLE_OUTLINE_POINTS: usize = 64;

/// Points per edge when a rectangle converts its outline to a polyline.
pub(crate) const RECT_EDGE_POINTS: usize = 16;

/// Erased spans narrower than this (in segment parameter space) collapse
/// to degenerate singleton fragments and are discarded.
pub(crate) const MIN_FRAGMENT_SPAN: f32 = 1e-4;

/// Color and stroke width shared by every shape variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub color: Color32,
    pub stroke_width: f32,
}

impl ShapeStyle {
    pub fn new(color: Color32, stroke_width: f32) -> Self {
        Self {
            color,
            stroke_width,
        }
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            color: Color32::BLACK,
            stroke_width: 1.0,
        }
    }
}

/// Insert an erased span into a sorted interval list, merging overlaps.
pub(crate) fn merge_erased_span(spans: &mut Vec<(f32, f32)>, new: (f32, f32)) {
    let (mut lo, mut hi) = new;
    spans.retain(|&(a, b)| {
        if b < lo || a > hi {
            true
        } else {
            lo = lo.min(a);
            hi = hi.max(b);
            false
        }
    });
    let at = spans.partition_point(|&(a, _)| a < lo);
    spans.insert(at, (lo, hi));
}

/// The still-drawn complement of a sorted erased-interval list over [0, 1].
pub(crate) fn kept_spans(erased: &[(f32, f32)]) -> Vec<(f32, f32)> {
    let mut kept = Vec::new();
    let mut cursor = 0.0_f32;
    for &(a, b) in erased {
        if a - cursor > MIN_FRAGMENT_SPAN {
            kept.push((cursor, a));
        }
        cursor = cursor.max(b);
    }
    if 1.0 - cursor > MIN_FRAGMENT_SPAN {
        kept.push((cursor, 1.0));
    }
    kept
}

/// Closed polyline approximating a circle's outline.
pub(crate) fn circle_outline(center: Pos2, radius: f32) -> Vec<Pos2> {
    let mut points = Vec::with_capacity(CIRCLE_OUTLINE_POINTS + 1);
    for i in 0..CIRCLE_OUTLINE_POINTS {
        let theta = (i as f32 / CIRCLE_OUTLINE_POINTS as f32) * std::f32::consts::TAU;
        points.push(Pos2::new(
            center.x + radius * theta.cos(),
            center.y + radius * theta.sin(),
        ));
    }
    points.push(points[0]);
    points
}

/// Closed polyline walking a rectangle's perimeter, with each edge
/// subdivided so mid-edge erasing carves a proportionate gap.
pub(crate) fn rect_outline(rect: Rect) -> Vec<Pos2> {
    let corners = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
    ];
    let mut points = Vec::with_capacity(4 * RECT_EDGE_POINTS + 1);
    for i in 0..4 {
        let from = corners[i];
        let to = corners[(i + 1) % 4];
        for step in 0..RECT_EDGE_POINTS {
            let t = step as f32 / RECT_EDGE_POINTS as f32;
            points.push(from + (to - from) * t);
        }
    }
    points.push(corners[0]);
    points
}

pub(crate) fn serialize_pos<W: std::io::Write>(
    s: &mut MapDataSerializer<W>,
    p: Pos2,
) -> Result<(), SerializeError> {
    s.f32(p.x)?;
    s.f32(p.y)
}

pub(crate) fn deserialize_pos(d: &mut MapDataDeserializer) -> Result<Pos2, SerializeError> {
    let x = d.f32()?;
    let y = d.f32()?;
    Ok(Pos2::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merging_overlapping_spans_coalesces() {
        let mut spans = Vec::new();
        merge_erased_span(&mut spans, (0.4, 0.6));
        merge_erased_span(&mut spans, (0.1, 0.2));
        merge_erased_span(&mut spans, (0.55, 0.7));
        assert_eq!(spans, vec![(0.1, 0.2), (0.4, 0.7)]);
    }

    #[test]
    fn kept_spans_complement_the_erased() {
        let erased = vec![(0.0, 0.25), (0.5, 0.75)];
        assert_eq!(kept_spans(&erased), vec![(0.25, 0.5), (0.75, 1.0)]);
    }

    #[test]
    fn fully_erased_line_keeps_nothing() {
        assert!(kept_spans(&[(0.0, 1.0)]).is_empty());
    }
}
