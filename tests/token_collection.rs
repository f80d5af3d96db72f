use egui::{Color32, Pos2};
use mapsketch::{Grid, Token, TokenCollection};

fn goblin(x: f32, y: f32) -> Token {
    Token::new(Pos2::new(x, y), 1.0, Color32::DARK_GREEN)
}

#[test]
fn add_and_remove_are_undoable() {
    let mut tokens = TokenCollection::new();
    let goblin = goblin(0.5, 0.5);
    let id = goblin.id();

    tokens.add_token(goblin);
    assert_eq!(tokens.len(), 1);

    tokens.undo();
    assert!(tokens.is_empty());
    tokens.redo();
    assert!(tokens.token(id).is_some());

    tokens.remove_token(id);
    assert!(tokens.is_empty());
    tokens.undo();
    assert!(tokens.token(id).is_some());
}

#[test]
fn remove_all_is_one_undo_step() {
    let mut tokens = TokenCollection::new();
    tokens.add_token(goblin(0.5, 0.5));
    tokens.add_token(goblin(1.5, 0.5));
    tokens.add_token(goblin(2.5, 0.5));

    tokens.remove_all();
    assert!(tokens.is_empty());

    tokens.undo();
    assert_eq!(tokens.len(), 3);
}

#[test]
fn checkpointed_attribute_batch_reverts_in_one_step() {
    let mut tokens = TokenCollection::new();
    let a = goblin(0.5, 0.5);
    let b = goblin(1.5, 0.5);
    let (id_a, id_b) = (a.id(), b.id());
    tokens.add_token(a);
    tokens.add_token(b);

    // Two-phase protocol: checkpoint, mutate live, commit the batch.
    tokens.checkpoint_tokens(&[id_a, id_b]);
    tokens.token_mut(id_a).unwrap().set_bloodied(true);
    tokens.token_mut(id_b).unwrap().set_bloodied(true);
    tokens.create_command_history();

    assert!(tokens.token(id_a).unwrap().is_bloodied());
    assert!(tokens.token(id_b).unwrap().is_bloodied());

    tokens.undo();
    assert!(!tokens.token(id_a).unwrap().is_bloodied());
    assert!(!tokens.token(id_b).unwrap().is_bloodied());

    tokens.redo();
    assert!(tokens.token(id_a).unwrap().is_bloodied());
    assert!(tokens.token(id_b).unwrap().is_bloodied());
}

#[test]
fn commit_without_checkpoint_is_a_noop() {
    let mut tokens = TokenCollection::new();
    let t = goblin(0.5, 0.5);
    let id = t.id();
    tokens.add_token(t);

    tokens.token_mut(id).unwrap().set_bloodied(true);
    tokens.create_command_history();

    // Only the add is on the stack; the stray edit was never captured.
    tokens.undo();
    assert!(tokens.is_empty());
}

#[test]
fn unchanged_checkpoints_push_nothing() {
    let mut tokens = TokenCollection::new();
    let t = goblin(0.5, 0.5);
    let id = t.id();
    tokens.add_token(t);

    tokens.checkpoint_tokens(&[id]);
    tokens.create_command_history();

    tokens.undo();
    assert!(tokens.is_empty(), "the only command should be the add");
}

#[test]
fn placement_on_a_free_cell_snaps_and_stays_put() {
    let tokens = TokenCollection::new();
    let grid = Grid::default();
    let wanderer = goblin(0.0, 0.0);

    let spot = tokens.place_token_nearby(&wanderer, Pos2::new(0.3, 0.4), &grid, false);
    assert_eq!(spot, Pos2::new(0.5, 0.5));

    let crossing = tokens.place_token_nearby(&wanderer, Pos2::new(0.3, 0.4), &grid, true);
    assert_eq!(crossing, Pos2::new(0.0, 0.0));
}

#[test]
fn placement_spirals_to_the_nearest_free_cell() {
    let mut tokens = TokenCollection::new();
    let grid = Grid::default();
    let occupant = goblin(0.5, 0.5);
    tokens.add_token(occupant.clone());

    let newcomer = goblin(0.0, 0.0);
    let spot = tokens.place_token_nearby(&newcomer, Pos2::new(0.5, 0.5), &grid, false);

    // Deterministic spiral: first ring, scanned row-major from the
    // top-left neighbor cell.
    assert_eq!(spot, Pos2::new(-0.5, -0.5));

    // Strictly clear of every existing footprint.
    let radius = newcomer.radius_world(&grid);
    for t in tokens.tokens() {
        let dist = (t.location() - spot).length();
        assert!(dist >= t.radius_world(&grid) + radius);
    }
}

#[test]
fn placement_walks_outward_until_a_cell_is_free() {
    let mut tokens = TokenCollection::new();
    let grid = Grid::default();
    // Occupy the requested cell and its whole first ring.
    for dx in -1..=1 {
        for dy in -1..=1 {
            tokens.add_token(goblin(0.5 + dx as f32, 0.5 + dy as f32));
        }
    }

    let newcomer = goblin(0.0, 0.0);
    let spot = tokens.place_token_nearby(&newcomer, Pos2::new(0.5, 0.5), &grid, false);
    assert_eq!(spot, Pos2::new(-1.5, -1.5));
}

#[test]
fn same_custom_border_reports_uniform_borders() {
    let mut tokens = TokenCollection::new();
    let mut a = goblin(0.5, 0.5);
    let mut b = goblin(1.5, 0.5);
    a.set_custom_border_color(Some(Color32::RED));
    b.set_custom_border_color(Some(Color32::RED));
    let (id_a, id_b) = (a.id(), b.id());
    tokens.add_token(a);
    tokens.add_token(b);

    // Same border color across the set: true.
    assert!(tokens.same_custom_border(&[id_a, id_b]));

    tokens.token_mut(id_b).unwrap().set_custom_border_color(None);
    assert!(!tokens.same_custom_border(&[id_a, id_b]));

    tokens.token_mut(id_a).unwrap().set_custom_border_color(None);
    assert!(tokens.same_custom_border(&[id_a, id_b]));
}
