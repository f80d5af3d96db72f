use egui::Rect;
use serde::{Deserialize, Serialize};

use crate::shape::{Shape, ShapeKind};

/// Rectangle multi-select over a shape collection.
///
/// Holds a world-space rectangle and, once finalized, the ids of every
/// shape whose bounding rectangle intersects it (approximate containment,
/// not exact geometry). Ids of shapes later deleted simply stop
/// resolving; in-place replacements swap their ids in via the command
/// machinery.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Selection {
    rect: Option<Rect>,
    selected: Vec<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or replace the selection rectangle (dragging the marquee)
    pub fn set_rectangle(&mut self, rect: Rect) {
        self.rect = Some(rect);
    }

    pub fn rectangle(&self) -> Option<Rect> {
        self.rect
    }

    /// Snapshot the shapes intersecting the rectangle
    pub(crate) fn finalize(&mut self, shapes: &[ShapeKind]) {
        let Some(rect) = self.rect else {
            self.selected.clear();
            return;
        };
        self.selected = shapes
            .iter()
            .filter(|s| s.rect().intersects(rect))
            .map(Shape::id)
            .collect();
    }

    pub fn clear(&mut self) {
        self.rect = None;
        self.selected.clear();
    }

    /// Ids of the selected shapes, in collection z-order at finalize time
    pub fn ids(&self) -> &[usize] {
        &self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, id: usize) -> bool {
        self.selected.contains(&id)
    }

    /// Follow an in-place replacement: every selected id appearing in
    /// `old` becomes the id at the same position in `new`.
    pub(crate) fn swap_ids(&mut self, old: &[usize], new: &[usize]) {
        for id in &mut self.selected {
            if let Some(at) = old.iter().position(|o| *o == *id) {
                *id = new[at];
            }
        }
    }
}
