use crate::line_collection::ShapeStore;
use crate::shape::{Shape, ShapeKind};
use crate::token::{Token, TokenStore};

/// A reversible batch operation against some collection state
pub trait Command {
    /// The collection state the command runs against
    type Target;

    /// Apply the command (also used for redo)
    fn apply(&self, target: &mut Self::Target);

    /// Reverse the command exactly
    fn revert(&self, target: &mut Self::Target);

    /// Noop commands are rejected by the history
    fn is_noop(&self) -> bool;

    /// Short name for debug logging
    fn label(&self) -> &'static str;
}

/// Shape create/delete batch. A command whose created and deleted sets
/// have equal size is an in-place edit (move commit, erase split down to
/// one fragment): the active selection follows the replacement shapes
/// pairwise. Pure adds and pure deletes leave the selection alone —
/// deleted ids simply stop resolving.
#[derive(Debug, Clone)]
pub struct ShapeCommand {
    created: Vec<ShapeKind>,
    deleted: Vec<ShapeKind>,
}

impl ShapeCommand {
    pub fn new(created: Vec<ShapeKind>, deleted: Vec<ShapeKind>) -> Self {
        Self { created, deleted }
    }

    /// Command adding a single shape
    pub fn create(shape: ShapeKind) -> Self {
        Self::new(vec![shape], Vec::new())
    }

    /// Command removing a single shape
    pub fn delete(shape: ShapeKind) -> Self {
        Self::new(Vec::new(), vec![shape])
    }

    fn is_replacement(&self) -> bool {
        !self.created.is_empty() && self.created.len() == self.deleted.len()
    }

    fn ids(shapes: &[ShapeKind]) -> Vec<usize> {
        shapes.iter().map(Shape::id).collect()
    }
}

impl Command for ShapeCommand {
    type Target = ShapeStore;

    fn apply(&self, store: &mut ShapeStore) {
        for shape in &self.deleted {
            store.remove(shape.id());
        }
        for shape in &self.created {
            store.insert_sorted(shape.clone());
        }
        if self.is_replacement() {
            store
                .selection_mut()
                .swap_ids(&Self::ids(&self.deleted), &Self::ids(&self.created));
        }
        store.rebuild_partitions();
    }

    fn revert(&self, store: &mut ShapeStore) {
        for shape in &self.created {
            store.remove(shape.id());
        }
        for shape in &self.deleted {
            store.insert_sorted(shape.clone());
        }
        if self.is_replacement() {
            store
                .selection_mut()
                .swap_ids(&Self::ids(&self.created), &Self::ids(&self.deleted));
        }
        store.rebuild_partitions();
    }

    fn is_noop(&self) -> bool {
        self.created.is_empty() && self.deleted.is_empty()
    }

    fn label(&self) -> &'static str {
        "shape command"
    }
}

/// Token add/remove batch, or a checkpointed attribute edit
#[derive(Debug, Clone)]
pub enum TokenCommand {
    /// Membership change: tokens added to and removed from the map
    Edit {
        added: Vec<Token>,
        removed: Vec<Token>,
    },
    /// Attribute batch captured by the checkpoint protocol: full before
    /// and after copies of every token that actually changed
    Modify {
        before: Vec<Token>,
        after: Vec<Token>,
    },
}

impl Command for TokenCommand {
    type Target = TokenStore;

    fn apply(&self, store: &mut TokenStore) {
        match self {
            TokenCommand::Edit { added, removed } => {
                for token in removed {
                    store.remove(token.id());
                }
                for token in added {
                    store.push(token.clone());
                }
            }
            TokenCommand::Modify { after, .. } => {
                for token in after {
                    store.replace(token.clone());
                }
            }
        }
    }

    fn revert(&self, store: &mut TokenStore) {
        match self {
            TokenCommand::Edit { added, removed } => {
                for token in added {
                    store.remove(token.id());
                }
                for token in removed {
                    store.push(token.clone());
                }
            }
            TokenCommand::Modify { before, .. } => {
                for token in before {
                    store.replace(token.clone());
                }
            }
        }
    }

    fn is_noop(&self) -> bool {
        match self {
            TokenCommand::Edit { added, removed } => added.is_empty() && removed.is_empty(),
            TokenCommand::Modify { before, .. } => before.is_empty(),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            TokenCommand::Edit { .. } => "token edit",
            TokenCommand::Modify { .. } => "token modify",
        }
    }
}
