mod intersect;
mod transform;

pub use intersect::{circle_segment_params, distance_to_line_segment, point_in_polygon};
pub(crate) use intersect::segment_intersects_circle;
pub use transform::CoordinateTransformer;

use egui::{Pos2, Rect};

/// Calculate the bounding box for a set of points
pub(crate) fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        Pos2::new(min_x - padding, min_y - padding),
        Pos2::new(max_x + padding, max_y + padding),
    )
}

/// True if the eraser circle overlaps the rectangle at all. Conservative
/// pretest used by every shape before doing exact segment math.
pub(crate) fn circle_intersects_rect(center: Pos2, radius: f32, rect: Rect) -> bool {
    if rect == Rect::NOTHING {
        return false;
    }
    let clamped = Pos2::new(
        center.x.clamp(rect.min.x, rect.max.x),
        center.y.clamp(rect.min.y, rect.max.y),
    );
    (clamped - center).length() <= radius
}
