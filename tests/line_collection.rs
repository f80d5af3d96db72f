use egui::{Color32, Pos2, Rect, Vec2};
use mapsketch::{LineCollection, Shape, ShapeStyle};

fn style(width: f32) -> ShapeStyle {
    ShapeStyle::new(Color32::BLACK, width)
}

fn draw_line(collection: &mut LineCollection, width: f32, y: f32) -> usize {
    let id = collection.create_straight_line(style(width));
    let line = collection.shape_mut(id).unwrap();
    line.add_point(Pos2::new(0.0, y));
    line.add_point(Pos2::new(10.0, y));
    id
}

fn widths(collection: &LineCollection) -> Vec<f32> {
    collection
        .shapes()
        .iter()
        .map(|s| s.style().stroke_width)
        .collect()
}

fn is_sorted_descending(widths: &[f32]) -> bool {
    widths.windows(2).all(|w| w[0] >= w[1])
}

#[test]
fn shapes_stay_sorted_by_descending_stroke_width() {
    let mut lines = LineCollection::new();
    let mid = draw_line(&mut lines, 3.0, 0.0);
    draw_line(&mut lines, 1.0, 1.0);
    draw_line(&mut lines, 8.0, 2.0);
    draw_line(&mut lines, 2.0, 3.0);
    assert!(is_sorted_descending(&widths(&lines)), "{:?}", widths(&lines));

    lines.delete_shape(mid);
    assert!(is_sorted_descending(&widths(&lines)));

    draw_line(&mut lines, 5.0, 4.0);
    assert!(is_sorted_descending(&widths(&lines)));

    // Undo back through the whole history; ordering holds at each step.
    while lines.can_undo() {
        lines.undo();
        assert!(is_sorted_descending(&widths(&lines)));
    }
}

#[test]
fn thick_shapes_draw_below_the_grid_and_text_above() {
    let mut lines = LineCollection::new();
    let backdrop = draw_line(&mut lines, 4.0, 0.0);
    let detail = draw_line(&mut lines, 1.0, 1.0);
    let label = lines.create_text(Pos2::new(0.0, 2.0), "well".to_owned(), 2.0, Color32::WHITE);

    let below: Vec<usize> = lines.shapes_below_grid().map(|s| s.id()).collect();
    let above: Vec<usize> = lines.shapes_above_grid().map(|s| s.id()).collect();
    assert_eq!(below, vec![backdrop]);
    // Equal widths: the newer label was inserted ahead of the older line.
    assert_eq!(above, vec![label, detail]);
}

#[test]
fn deleting_a_missing_shape_is_a_noop() {
    let mut lines = LineCollection::new();
    draw_line(&mut lines, 1.0, 0.0);
    lines.delete_shape(987_654);
    assert_eq!(lines.len(), 1);
    // No empty command was pushed either.
    lines.undo();
    assert!(lines.is_empty());
}

#[test]
fn optimize_with_nothing_pending_pushes_no_command() {
    let mut lines = LineCollection::new();
    draw_line(&mut lines, 1.0, 0.0);
    lines.undo();
    assert!(lines.can_redo());

    // A noop optimize must not clobber the redo stack.
    lines.optimize();
    assert!(lines.can_redo());
}

#[test]
fn selection_captures_shapes_intersecting_the_rectangle() {
    let mut lines = LineCollection::new();
    let near = draw_line(&mut lines, 1.0, 1.0);
    draw_line(&mut lines, 1.0, 50.0);

    lines.set_selection_rect(Rect::from_min_max(
        Pos2::new(-1.0, -1.0),
        Pos2::new(11.0, 2.0),
    ));
    lines.finalize_selection();
    assert_eq!(lines.selection().ids(), &[near]);
}

#[test]
fn stamping_a_selection_duplicates_the_selected_shapes() {
    let mut lines = LineCollection::new();
    draw_line(&mut lines, 1.0, 0.0);

    lines.set_selection_rect(Rect::from_min_max(
        Pos2::new(-1.0, -1.0),
        Pos2::new(11.0, 1.0),
    ));
    lines.finalize_selection();
    lines.stamp_selection();
    assert_eq!(lines.len(), 2);

    // The stamp is one undoable batch.
    lines.undo();
    assert_eq!(lines.len(), 1);
}

#[test]
fn selection_follows_a_committed_move() {
    let mut lines = LineCollection::new();
    let id = draw_line(&mut lines, 1.0, 0.0);

    lines.set_selection_rect(Rect::from_min_max(
        Pos2::new(-1.0, -1.0),
        Pos2::new(11.0, 1.0),
    ));
    lines.finalize_selection();
    assert!(lines.selection().contains(id));

    // Live-drag preview, then commit: the collection now holds a moved
    // copy under a new id, and the selection swapped over to it.
    lines.set_selection_offset(Vec2::new(0.0, 5.0));
    lines.optimize();
    assert_eq!(lines.len(), 1);

    let moved = lines.shapes()[0].id();
    assert_ne!(moved, id);
    assert!(lines.selection().contains(moved));
    assert!(!lines.selection().contains(id));
    assert!(lines.shapes()[0].contains(Pos2::new(5.0, 5.0)));

    // Undo swaps the selection back with the original shape.
    lines.undo();
    assert!(lines.selection().contains(id));
}

#[test]
fn pure_deletes_leave_the_selection_ids_untouched() {
    let mut lines = LineCollection::new();
    let a = draw_line(&mut lines, 1.0, 0.0);
    let b = draw_line(&mut lines, 1.0, 1.0);

    lines.set_selection_rect(Rect::from_min_max(
        Pos2::new(-1.0, -1.0),
        Pos2::new(11.0, 2.0),
    ));
    lines.finalize_selection();
    assert_eq!(lines.selection().ids().len(), 2);

    lines.delete_shape(a);
    // The stale id stays listed but no longer resolves to a shape.
    assert!(lines.selection().contains(a));
    assert!(lines.shape(a).is_none());
    assert!(lines.shape(b).is_some());
}
