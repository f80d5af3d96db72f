use egui::{Color32, Pos2};
use mapsketch::{LineCollection, Shape, ShapeKind, ShapeStyle};

fn pen() -> ShapeStyle {
    ShapeStyle::new(Color32::BLACK, 1.0)
}

fn straight_lines(collection: &LineCollection) -> Vec<(Pos2, Pos2)> {
    collection
        .shapes()
        .iter()
        .filter_map(|s| match s {
            ShapeKind::StraightLine(line) => line.endpoints(),
            _ => None,
        })
        .collect()
}

#[test]
fn erasing_the_middle_of_a_straight_line_splits_it_in_two() {
    let mut lines = LineCollection::new();
    let id = lines.create_straight_line(pen());
    {
        let line = lines.shape_mut(id).unwrap();
        line.add_point(Pos2::new(0.0, 0.0));
        line.add_point(Pos2::new(10.0, 0.0));
    }

    lines.erase(Pos2::new(5.0, 0.0), 1.0);
    lines.optimize();

    let segments = straight_lines(&lines);
    assert_eq!(segments.len(), 2);

    // The eraser circle spans x in [4, 6]; one fragment ends near 4 and
    // the other starts near 6.
    let (left, right) = if segments[0].0.x < segments[1].0.x {
        (segments[0], segments[1])
    } else {
        (segments[1], segments[0])
    };
    assert_eq!(left.0, Pos2::new(0.0, 0.0));
    assert!((left.1.x - 4.0).abs() < 1e-3, "left fragment ends at {}", left.1.x);
    assert!((right.0.x - 6.0).abs() < 1e-3, "right fragment starts at {}", right.0.x);
    assert_eq!(right.1, Pos2::new(10.0, 0.0));
}

#[test]
fn erase_then_optimize_is_one_undo_step() {
    let mut lines = LineCollection::new();
    let id = lines.create_straight_line(pen());
    {
        let line = lines.shape_mut(id).unwrap();
        line.add_point(Pos2::new(0.0, 0.0));
        line.add_point(Pos2::new(10.0, 0.0));
    }

    lines.erase(Pos2::new(3.0, 0.0), 1.0);
    lines.erase(Pos2::new(7.0, 0.0), 1.0);
    lines.optimize();
    assert_eq!(lines.len(), 3);

    // One undo restores the whole uncut line.
    lines.undo();
    assert_eq!(lines.len(), 1);
    let restored = lines.shape(id).expect("original line restored by undo");
    assert!(!restored.needs_optimization());
}

#[test]
fn erasing_the_middle_of_a_freehand_line_yields_two_fragments() {
    let mut lines = LineCollection::new();
    let id = lines.create_freehand_line(pen());
    {
        let line = lines.shape_mut(id).unwrap();
        for x in 0..=10 {
            line.add_point(Pos2::new(x as f32, 0.0));
        }
    }

    lines.erase(Pos2::new(5.0, 0.0), 0.6);
    lines.optimize();

    let fragments: Vec<&ShapeKind> = lines.shapes().iter().collect();
    assert_eq!(fragments.len(), 2);
    for fragment in fragments {
        let ShapeKind::Freehand(line) = fragment else {
            panic!("freehand fragments expected");
        };
        assert!(line.points().len() >= 2);
    }
}

#[test]
fn fragments_reduced_to_a_single_point_are_discarded() {
    let mut lines = LineCollection::new();
    let id = lines.create_freehand_line(pen());
    {
        let line = lines.shape_mut(id).unwrap();
        for x in 0..=3 {
            line.add_point(Pos2::new(x as f32, 0.0));
        }
    }

    // Erase everything right of x = 1.2: only the first point survives,
    // and a one-point fragment is not a line.
    lines.erase(Pos2::new(2.0, 0.0), 0.8);
    lines.erase(Pos2::new(3.0, 0.0), 0.8);
    lines.optimize();
    assert!(lines.is_empty());
}

#[test]
fn erasing_a_circle_replaces_it_with_freehand_arcs() {
    let mut lines = LineCollection::new();
    let id = lines.create_circle(pen());
    {
        let circle = lines.shape_mut(id).unwrap();
        circle.add_point(Pos2::new(-5.0, 0.0));
        circle.add_point(Pos2::new(5.0, 0.0)); // diameter drag
    }

    lines.erase(Pos2::new(5.0, 0.0), 1.0);
    lines.optimize();

    assert!(!lines.is_empty());
    for shape in lines.shapes() {
        assert!(matches!(shape, ShapeKind::Freehand(_)));
        // No surviving geometry inside the erased area.
        assert!(!shape.contains(Pos2::new(5.0, 0.0)));
    }

    // Undoing the optimize restores the original circle.
    lines.undo();
    assert_eq!(lines.len(), 1);
    assert!(matches!(lines.shapes()[0], ShapeKind::Circle(_)));
}

#[test]
fn erasing_a_rectangle_outline_carves_a_gap() {
    let mut lines = LineCollection::new();
    let id = lines.create_rectangle(pen());
    {
        let rect = lines.shape_mut(id).unwrap();
        rect.add_point(Pos2::new(0.0, 0.0));
        rect.add_point(Pos2::new(8.0, 4.0));
    }

    // Bite a chunk out of the top edge.
    lines.erase(Pos2::new(4.0, 0.0), 1.0);
    lines.optimize();

    assert!(lines.len() >= 1);
    assert!(lines
        .shapes()
        .iter()
        .all(|s| matches!(s, ShapeKind::Freehand(_))));
}

#[test]
fn text_is_erased_whole() {
    let mut lines = LineCollection::new();
    lines.create_text(
        Pos2::new(0.0, 0.0),
        "dragon lair".to_owned(),
        2.0,
        Color32::RED,
    );

    lines.erase(Pos2::new(1.0, 1.0), 1.0);
    lines.optimize();
    assert!(lines.is_empty());

    lines.undo();
    assert_eq!(lines.len(), 1);
}

#[test]
fn degenerate_shapes_are_dropped_by_optimize() {
    let mut lines = LineCollection::new();
    // A circle that never got its diameter drag has no center.
    lines.create_circle(pen());
    let valid = lines.create_straight_line(pen());
    {
        let line = lines.shape_mut(valid).unwrap();
        line.add_point(Pos2::new(0.0, 0.0));
        line.add_point(Pos2::new(1.0, 0.0));
    }

    lines.optimize();
    assert_eq!(lines.len(), 1);
    assert!(lines.shape(valid).is_some());
}
