use egui::Pos2;
use log::debug;
use serde::{Deserialize, Serialize};

use super::{Token, TokenId};
use crate::command::{CommandHistory, TokenCommand};
use crate::grid::Grid;
use crate::serialize::{MapDataDeserializer, MapDataSerializer, SerializeError};

/// The token list a [`TokenCommand`] runs against
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenStore {
    tokens: Vec<Token>,
}

impl TokenStore {
    pub(crate) fn get(&self, id: TokenId) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: TokenId) -> Option<&mut Token> {
        self.tokens.iter_mut().find(|t| t.id() == id)
    }

    pub(crate) fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub(crate) fn remove(&mut self, id: TokenId) -> Option<Token> {
        let at = self.tokens.iter().position(|t| t.id() == id)?;
        Some(self.tokens.remove(at))
    }

    /// Overwrite the token with the same id, keeping list order
    pub(crate) fn replace(&mut self, token: Token) {
        if let Some(existing) = self.get_mut(token.id()) {
            *existing = token;
        }
    }
}

/// Placed tokens with undo support.
///
/// Membership changes are ordinary undoable commands. Attribute edits use
/// the two-phase checkpoint protocol instead: callers checkpoint the
/// "before" state, mutate the live tokens directly (dialog sliders,
/// bloodied toggles), then commit the whole batch as one undo step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenCollection {
    store: TokenStore,
    #[serde(skip)]
    history: CommandHistory<TokenCommand>,
    #[serde(skip)]
    checkpoint: Option<Vec<Token>>,
}

impl TokenCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.store.tokens
    }

    pub fn len(&self) -> usize {
        self.store.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.tokens.is_empty()
    }

    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.store.get(id)
    }

    /// Direct mutable access, for edits covered by an open checkpoint
    pub fn token_mut(&mut self, id: TokenId) -> Option<&mut Token> {
        self.store.get_mut(id)
    }

    pub fn add_token(&mut self, token: Token) {
        self.history.execute(
            TokenCommand::Edit {
                added: vec![token],
                removed: Vec::new(),
            },
            &mut self.store,
        );
    }

    pub fn remove_token(&mut self, id: TokenId) {
        let Some(token) = self.store.get(id) else {
            return;
        };
        self.history.execute(
            TokenCommand::Edit {
                added: Vec::new(),
                removed: vec![token.clone()],
            },
            &mut self.store,
        );
    }

    /// Remove every token as one undoable step
    pub fn remove_all(&mut self) {
        self.history.execute(
            TokenCommand::Edit {
                added: Vec::new(),
                removed: self.store.tokens.clone(),
            },
            &mut self.store,
        );
    }

    /// Phase one of a batch attribute edit: deep-copy the "before" state
    /// of the listed tokens. A later checkpoint replaces an unconsumed
    /// one.
    pub fn checkpoint_tokens(&mut self, ids: &[TokenId]) {
        let before: Vec<Token> = ids
            .iter()
            .filter_map(|id| self.store.get(*id))
            .cloned()
            .collect();
        debug!("checkpointing {} tokens", before.len());
        self.checkpoint = Some(before);
    }

    /// Phase two: capture the "after" state and push one undoable command
    /// covering every token that actually changed. Without a prior
    /// checkpoint this is a no-op.
    pub fn create_command_history(&mut self) {
        let Some(checkpoint) = self.checkpoint.take() else {
            return;
        };
        let mut before = Vec::new();
        let mut after = Vec::new();
        for old in checkpoint {
            if let Some(current) = self.store.get(old.id()) {
                if *current != old {
                    before.push(old);
                    after.push(current.clone());
                }
            }
        }
        // Already applied to the live tokens; record, don't re-run.
        self.history.record(TokenCommand::Modify { before, after });
    }

    pub fn undo(&mut self) {
        self.history.undo(&mut self.store);
    }

    pub fn redo(&mut self) {
        self.history.redo(&mut self.store);
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn clear(&mut self) {
        self.store = TokenStore::default();
        self.history.clear();
        self.checkpoint = None;
    }

    /// Find an unoccupied, grid-snapped location for `token` near the
    /// requested point: a deterministic outward spiral over lattice
    /// candidates (cell centers, or intersections when
    /// `snap_to_intersections`), taking the first point whose footprint
    /// circle clears every existing token. O(tokens × candidates), which
    /// is fine at tabletop token counts.
    pub fn place_token_nearby(
        &self,
        token: &Token,
        requested: Pos2,
        grid: &Grid,
        snap_to_intersections: bool,
    ) -> Pos2 {
        let snap = |world: Pos2| {
            if snap_to_intersections {
                grid.snap_to_intersection(world)
            } else {
                grid.nearest_cell_center(world)
            }
        };
        let radius = token.radius_world(grid);
        let occupied = |candidate: Pos2| {
            self.store
                .tokens
                .iter()
                .any(|t| (t.location() - candidate).length() < t.radius_world(grid) + radius)
        };

        let start_world = snap(requested);
        if !occupied(start_world) {
            return start_world;
        }
        let start_grid = grid.world_to_grid(start_world);
        let mut ring = 1i32;
        loop {
            // Chebyshev ring `ring` around the start cell, scanned in a
            // fixed row-major order so placement is reproducible.
            for dy in -ring..=ring {
                for dx in -ring..=ring {
                    if dx.abs().max(dy.abs()) != ring {
                        continue;
                    }
                    let candidate = grid.grid_to_world(Pos2::new(
                        start_grid.x + dx as f32,
                        start_grid.y + dy as f32,
                    ));
                    if !occupied(candidate) {
                        return candidate;
                    }
                }
            }
            // Termination: token count is finite, so some ring has room.
            ring += 1;
        }
    }

    /// True when every listed token carries the same custom border color
    /// (including "none of them has one")
    pub fn same_custom_border(&self, ids: &[TokenId]) -> bool {
        let mut borders = ids.iter().filter_map(|id| self.store.get(*id)).map(Token::custom_border_color);
        let Some(first) = borders.next() else {
            return true;
        };
        borders.all(|b| b == first)
    }

    pub fn serialize<W: std::io::Write>(
        &self,
        s: &mut MapDataSerializer<W>,
    ) -> Result<(), SerializeError> {
        s.start_object()?;
        s.u32(self.store.tokens.len() as u32)?;
        for token in &self.store.tokens {
            token.serialize(s)?;
        }
        s.end_object()
    }

    pub fn deserialize(d: &mut MapDataDeserializer) -> Result<Self, SerializeError> {
        d.expect_start_object()?;
        let count = d.u32()?;
        let mut store = TokenStore::default();
        for _ in 0..count {
            store.push(Token::deserialize(d)?);
        }
        d.expect_end_object()?;
        Ok(Self {
            store,
            history: CommandHistory::new(),
            checkpoint: None,
        })
    }
}
