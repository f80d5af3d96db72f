use log::debug;

use super::Command;

/// Manages the history of executed commands for undo/redo functionality
#[derive(Debug, Clone)]
pub struct CommandHistory<C> {
    /// Stack of commands that can be undone
    undo_stack: Vec<C>,
    /// Stack of commands that can be redone
    redo_stack: Vec<C>,
}

impl<C> Default for CommandHistory<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> CommandHistory<C> {
    /// Creates a new empty command history
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Returns true if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clear the command history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl<C: Command> CommandHistory<C> {
    /// Apply a command to the target and add it to the history. Noop
    /// commands (nothing created, nothing deleted) are rejected outright.
    /// Executing anything new invalidates the redo stack.
    pub fn execute(&mut self, command: C, target: &mut C::Target) {
        if command.is_noop() {
            return;
        }
        debug!("executing {}", command.label());
        command.apply(target);
        self.undo_stack.push(command);
        self.redo_stack.clear();
    }

    /// Add an already-applied command to the history without re-running
    /// it, for edits performed directly on live objects (the token
    /// checkpoint protocol).
    pub fn record(&mut self, command: C) {
        if command.is_noop() {
            return;
        }
        debug!("recording {}", command.label());
        self.undo_stack.push(command);
        self.redo_stack.clear();
    }

    /// Undo the last executed command. Silently does nothing when the
    /// undo stack is empty; callers gate UI state on [`Self::can_undo`].
    pub fn undo(&mut self, target: &mut C::Target) {
        if let Some(command) = self.undo_stack.pop() {
            debug!("undoing {}", command.label());
            command.revert(target);
            self.redo_stack.push(command);
        }
    }

    /// Redo the last undone command; silently does nothing when the redo
    /// stack is empty.
    pub fn redo(&mut self, target: &mut C::Target) {
        if let Some(command) = self.redo_stack.pop() {
            debug!("redoing {}", command.label());
            command.apply(target);
            self.undo_stack.push(command);
        }
    }
}
