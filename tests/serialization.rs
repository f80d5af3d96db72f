use egui::{Color32, Pos2, Vec2};
use mapsketch::{
    CoordinateTransformer, Grid, LineCollection, MapDataDeserializer, MapDataSerializer,
    MapDocument, MapSnapshot, SerializeError, Shape, ShapeKind, ShapeStyle, Token,
};

fn style(width: f32) -> ShapeStyle {
    ShapeStyle::new(Color32::from_rgb(20, 40, 60), width)
}

fn round_trip(lines: &LineCollection) -> LineCollection {
    let mut buf = Vec::new();
    let mut s = MapDataSerializer::new(&mut buf);
    lines.serialize(&mut s).unwrap();
    let mut d = MapDataDeserializer::new(&buf[..]).unwrap();
    LineCollection::deserialize(&mut d).unwrap()
}

#[test]
fn straight_line_round_trips_through_the_token_stream() {
    let mut lines = LineCollection::new();
    let id = lines.create_straight_line(style(2.5));
    {
        let line = lines.shape_mut(id).unwrap();
        line.add_point(Pos2::new(1.0, 2.0));
        line.add_point(Pos2::new(3.0, -4.5));
    }

    let loaded = round_trip(&lines);
    assert_eq!(loaded.len(), 1);
    let ShapeKind::StraightLine(line) = &loaded.shapes()[0] else {
        panic!("straight line expected");
    };
    assert_eq!(
        line.endpoints(),
        Some((Pos2::new(1.0, 2.0), Pos2::new(3.0, -4.5)))
    );
    assert_eq!(line.style(), style(2.5));
}

#[test]
fn mixed_collection_round_trips_in_z_order() {
    let mut lines = LineCollection::new();
    let fh = lines.create_freehand_line(style(4.0));
    {
        let line = lines.shape_mut(fh).unwrap();
        line.add_point(Pos2::new(0.0, 0.0));
        line.add_point(Pos2::new(1.0, 1.0));
        line.add_point(Pos2::new(2.0, 0.0));
    }
    let cr = lines.create_circle(style(1.0));
    {
        let circle = lines.shape_mut(cr).unwrap();
        circle.add_point(Pos2::new(0.0, 0.0));
        circle.add_point(Pos2::new(6.0, 0.0));
    }
    lines.create_text(Pos2::new(5.0, 5.0), "trap!".to_owned(), 1.5, Color32::RED);
    lines.create_info(
        Pos2::new(8.0, 8.0),
        "secret door, DC 20".to_owned(),
        Some("door".to_owned()),
    );

    let loaded = round_trip(&lines);
    assert_eq!(loaded.len(), 4);
    let tags: Vec<&str> = loaded.shapes().iter().map(|s| s.tag()).collect();
    let original: Vec<&str> = lines.shapes().iter().map(|s| s.tag()).collect();
    assert_eq!(tags, original);

    let ShapeKind::Circle(circle) = loaded
        .shapes()
        .iter()
        .find(|s| s.tag() == "cr")
        .unwrap()
    else {
        panic!();
    };
    assert_eq!(circle.center(), Some(Pos2::new(3.0, 0.0)));
    assert_eq!(circle.radius(), 3.0);

    let ShapeKind::Text(label) = loaded.shapes().iter().find(|s| s.tag() == "txt").unwrap()
    else {
        panic!();
    };
    assert_eq!(label.text(), "trap!");

    let ShapeKind::Information(marker) =
        loaded.shapes().iter().find(|s| s.tag() == "inf").unwrap()
    else {
        panic!();
    };
    assert_eq!(marker.text(), "secret door, DC 20");
    assert_eq!(marker.icon(), Some("door"));
}

#[test]
fn invalid_shapes_are_not_written() {
    let mut lines = LineCollection::new();
    lines.create_circle(style(1.0)); // never dragged out; degenerate

    let loaded = round_trip(&lines);
    assert!(loaded.is_empty());
}

#[test]
fn unknown_shape_tag_is_a_fatal_load_error() {
    let mut buf = Vec::new();
    let mut s = MapDataSerializer::new(&mut buf);
    s.start_object().unwrap();
    s.string("hex").unwrap(); // no such shape
    s.color(Color32::BLACK).unwrap();
    s.f32(1.0).unwrap();
    s.end_object().unwrap();

    let mut d = MapDataDeserializer::new(&buf[..]).unwrap();
    match ShapeKind::deserialize(&mut d) {
        Err(SerializeError::UnknownShapeTag(tag)) => assert_eq!(tag, "hex"),
        other => panic!("expected UnknownShapeTag, got {other:?}"),
    }
}

#[test]
fn transformer_and_grid_round_trip() {
    let transform = CoordinateTransformer::new(Vec2::new(12.0, -7.0), 2.5);
    let grid = Grid::new(transform, "dungeon".to_owned());

    let mut buf = Vec::new();
    let mut s = MapDataSerializer::new(&mut buf);
    grid.serialize(&mut s).unwrap();

    let mut d = MapDataDeserializer::new(&buf[..]).unwrap();
    let loaded = Grid::deserialize(&mut d).unwrap();
    assert_eq!(loaded.theme(), "dungeon");
    assert_eq!(loaded.transform(), grid.transform());
    assert_eq!(loaded.cell_size_world(), 2.5);
}

#[test]
fn whole_documents_round_trip() {
    let mut doc = MapDocument::new();
    let id = doc.background_lines_mut().create_straight_line(style(3.0));
    {
        let line = doc.background_lines_mut().shape_mut(id).unwrap();
        line.add_point(Pos2::new(0.0, 0.0));
        line.add_point(Pos2::new(10.0, 10.0));
    }
    let fog = doc.fog_of_war_mut().create_rectangle(style(2.0));
    {
        let shape = doc.fog_of_war_mut().shape_mut(fog).unwrap();
        shape.add_point(Pos2::new(0.0, 0.0));
        shape.add_point(Pos2::new(5.0, 5.0));
    }
    let mut orc = Token::new(Pos2::new(2.5, 2.5), 1.0, Color32::RED);
    orc.set_bloodied(true);
    doc.tokens_mut().add_token(orc);

    let mut buf = Vec::new();
    doc.save(&mut buf).unwrap();
    let loaded = MapDocument::load(&buf[..]).unwrap();

    assert_eq!(loaded.background_lines().len(), 1);
    assert_eq!(loaded.annotation_lines().len(), 0);
    assert_eq!(loaded.fog_of_war().len(), 1);
    assert_eq!(loaded.tokens().len(), 1);
    assert!(loaded.tokens().tokens()[0].is_bloodied());

    // Loaded maps start with clean histories.
    assert!(!loaded.background_lines().can_undo());
}

#[test]
fn future_format_versions_are_refused() {
    let mut buf = Vec::new();
    let mut s = MapDataSerializer::new(&mut buf);
    s.start_object().unwrap();
    s.u32(99).unwrap();
    s.end_object().unwrap();

    match MapDocument::load(&buf[..]) {
        Err(SerializeError::UnsupportedVersion(99)) => {}
        other => panic!("expected UnsupportedVersion, got {other:?}"),
    }
}

#[test]
fn json_snapshots_round_trip_the_document() {
    let mut doc = MapDocument::new();
    let id = doc.annotation_lines_mut().create_freehand_line(style(1.0));
    {
        let line = doc.annotation_lines_mut().shape_mut(id).unwrap();
        line.add_point(Pos2::new(0.0, 0.0));
        line.add_point(Pos2::new(4.0, 4.0));
    }
    doc.tokens_mut()
        .add_token(Token::new(Pos2::new(1.5, 1.5), 2.0, Color32::BLUE));

    let snapshot = MapSnapshot::new(&doc);
    let json = snapshot.to_json().unwrap();
    let restored = MapSnapshot::from_json(&json).unwrap();

    assert_eq!(restored.document.annotation_lines().len(), 1);
    assert_eq!(restored.document.tokens().len(), 1);
    assert_eq!(restored.document.tokens().tokens()[0].size(), 2.0);
    assert_eq!(restored.version, snapshot.version);
}
