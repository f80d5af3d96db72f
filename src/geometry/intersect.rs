use egui::Pos2;

/// Parameters at which the segment `p1 + t * (p2 - p1)` crosses the circle
/// `(center, radius)`, from the discriminant of the substituted quadratic.
///
/// Returns `(t_enter, t_exit)` with `t_enter <= t_exit`, in the
/// parameterization of the *infinite* line; callers clamp to `[0, 1]` for
/// segment semantics. `None` when the line misses the circle entirely or
/// the segment is degenerate.
pub fn circle_segment_params(p1: Pos2, p2: Pos2, center: Pos2, radius: f32) -> Option<(f32, f32)> {
    let d = p2 - p1;
    let f = p1 - center;

    let a = d.dot(d);
    if a == 0.0 {
        return None;
    }
    let b = 2.0 * f.dot(d);
    let c = f.dot(f) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant <= 0.0 {
        // Misses, or grazes at a single point (which erases nothing).
        return None;
    }

    let root = discriminant.sqrt();
    let t_enter = (-b - root) / (2.0 * a);
    let t_exit = (-b + root) / (2.0 * a);
    Some((t_enter, t_exit))
}

/// True if the segment between `p1` and `p2` passes through the circle.
pub(crate) fn segment_intersects_circle(p1: Pos2, p2: Pos2, center: Pos2, radius: f32) -> bool {
    match circle_segment_params(p1, p2, center, radius) {
        Some((t_enter, t_exit)) => t_exit > 0.0 && t_enter < 1.0,
        None => false,
    }
}

/// Calculate distance from a point to a line segment (useful for stroke hit testing)
pub fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let line_len = line_vec.length();
    if line_len == 0.0 {
        return point_vec.length();
    }

    let t = ((point_vec.x * line_vec.x + point_vec.y * line_vec.y) / line_len).clamp(0.0, line_len);
    let projection = line_start + (line_vec * t / line_len);
    (point - projection).length()
}

/// Ray-casting point-in-polygon test over a closed point loop.
#[allow(clippy::needless_range_loop)]
pub fn point_in_polygon(point: Pos2, polygon: &[Pos2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let pi = polygon[i];
        let pj = polygon[j];
        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = pi.x + (point.y - pi.y) / (pj.y - pi.y) * (pj.x - pi.x);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
