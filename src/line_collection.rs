use egui::{Color32, Pos2, Rect, Vec2};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::command::{CommandHistory, ShapeCommand};
use crate::selection::Selection;
use crate::serialize::{MapDataDeserializer, MapDataSerializer, SerializeError};
use crate::shape::{factory, Shape, ShapeKind, ShapeStyle};

/// The shape state a [`ShapeCommand`] runs against: the z-ordered shape
/// list, the above/below-grid partitions derived from it, and the active
/// selection (commands swap selection ids on in-place replacements).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShapeStore {
    shapes: Vec<ShapeKind>,
    // Runtime shape ids are not persisted, so everything keyed by id is
    // rebuilt after a load instead of round-tripping.
    #[serde(skip)]
    below_grid: Vec<usize>,
    #[serde(skip)]
    above_grid: Vec<usize>,
    #[serde(skip)]
    selection: Selection,
}

impl ShapeStore {
    /// Insert preserving descending stroke width: thick backdrop shapes
    /// stay under thin detail lines. A new shape lands before the first
    /// existing entry of equal-or-lesser width.
    pub(crate) fn insert_sorted(&mut self, shape: ShapeKind) {
        let width = shape.style().stroke_width;
        let at = self
            .shapes
            .iter()
            .position(|s| s.style().stroke_width <= width)
            .unwrap_or(self.shapes.len());
        self.shapes.insert(at, shape);
    }

    pub(crate) fn remove(&mut self, id: usize) -> Option<ShapeKind> {
        let at = self.shapes.iter().position(|s| s.id() == id)?;
        Some(self.shapes.remove(at))
    }

    pub(crate) fn get(&self, id: usize) -> Option<&ShapeKind> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: usize) -> Option<&mut ShapeKind> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    pub(crate) fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Recompute the above/below-grid id partitions; called on every
    /// membership change.
    pub(crate) fn rebuild_partitions(&mut self) {
        self.below_grid.clear();
        self.above_grid.clear();
        for shape in &self.shapes {
            if shape.should_draw_below_grid() {
                self.below_grid.push(shape.id());
            } else {
                self.above_grid.push(shape.id());
            }
        }
    }
}

/// Ordered, undo-tracked collection of the shapes on one map layer.
///
/// Every structural change (create, delete, the batched `optimize` pass)
/// goes through the owned [`CommandHistory`]; erasing mutates shapes
/// directly and is committed as one undo step by [`Self::optimize`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineCollection {
    store: ShapeStore,
    #[serde(skip)]
    history: CommandHistory<ShapeCommand>,
}

impl LineCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shapes(&self) -> &[ShapeKind] {
        &self.store.shapes
    }

    pub fn len(&self) -> usize {
        self.store.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.shapes.is_empty()
    }

    pub fn shape(&self, id: usize) -> Option<&ShapeKind> {
        self.store.get(id)
    }

    /// Mutable access for in-gesture edits (feeding drag points into a
    /// freshly created shape)
    pub fn shape_mut(&mut self, id: usize) -> Option<&mut ShapeKind> {
        self.store.get_mut(id)
    }

    /// Shapes rendered under the grid lines, in z-order
    pub fn shapes_below_grid(&self) -> impl Iterator<Item = &ShapeKind> {
        self.store
            .below_grid
            .iter()
            .filter_map(|id| self.store.get(*id))
    }

    /// Shapes rendered over the grid lines, in z-order
    pub fn shapes_above_grid(&self) -> impl Iterator<Item = &ShapeKind> {
        self.store
            .above_grid
            .iter()
            .filter_map(|id| self.store.get(*id))
    }

    fn create(&mut self, shape: ShapeKind) -> usize {
        let id = shape.id();
        self.history
            .execute(ShapeCommand::create(shape), &mut self.store);
        id
    }

    /// Start a freehand line; returns its id for the gesture to feed
    /// points into. Creation itself is already one undoable step.
    pub fn create_freehand_line(&mut self, style: ShapeStyle) -> usize {
        self.create(factory::create_freehand_line(style))
    }

    pub fn create_straight_line(&mut self, style: ShapeStyle) -> usize {
        self.create(factory::create_straight_line(style))
    }

    pub fn create_rectangle(&mut self, style: ShapeStyle) -> usize {
        self.create(factory::create_rectangle(style))
    }

    pub fn create_circle(&mut self, style: ShapeStyle) -> usize {
        self.create(factory::create_circle(style))
    }

    pub fn create_text(
        &mut self,
        location: Pos2,
        text: String,
        text_size: f32,
        color: Color32,
    ) -> usize {
        self.create(factory::create_text(location, text, text_size, color))
    }

    pub fn create_info(&mut self, location: Pos2, text: String, icon: Option<String>) -> usize {
        self.create(factory::create_info(location, text, icon))
    }

    /// Undoable removal; silently does nothing when the shape is absent
    pub fn delete_shape(&mut self, id: usize) {
        let Some(shape) = self.store.get(id) else {
            return;
        };
        let command = ShapeCommand::delete(shape.clone());
        self.history.execute(command, &mut self.store);
    }

    /// Run the eraser circle over every shape. Deliberately not tracked
    /// at this granularity; the whole gesture is committed as one undo
    /// step by [`Self::optimize`].
    pub fn erase(&mut self, center: Pos2, radius: f32) {
        for shape in self.store.shapes.iter_mut() {
            shape.erase(center, radius);
        }
    }

    /// Commit everything outstanding as a single undoable command:
    /// drops invalid shapes, replaces erased shapes with their surviving
    /// fragments, and commits pending draw offsets.
    pub fn optimize(&mut self) {
        let mut created = Vec::new();
        let mut deleted = Vec::new();
        for shape in self.store.shapes.iter_mut() {
            if !shape.is_valid() {
                deleted.push(shape.clone());
            } else if shape.needs_optimization() {
                let fragments = shape.remove_erased_points();
                deleted.push(shape.clone());
                created.extend(fragments);
            } else if let Some(moved) = shape.commit_draw_offset() {
                deleted.push(shape.clone());
                created.push(moved);
            }
        }
        debug!(
            "optimize: {} deleted, {} created",
            deleted.len(),
            created.len()
        );
        self.history
            .execute(ShapeCommand::new(created, deleted), &mut self.store);
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

    /// Drop all shapes and the whole history (loading a new map)
    pub fn clear(&mut self) {
        self.store = ShapeStore::default();
        self.history.clear();
    }

    /// Recompute the derived partitions, after a deserialization path
    /// that bypassed the command machinery
    pub(crate) fn rebuild_partitions(&mut self) {
        self.store.rebuild_partitions();
    }

    // --- selection ---

    pub fn selection(&self) -> &Selection {
        &self.store.selection
    }

    pub fn set_selection_rect(&mut self, rect: Rect) {
        self.store.selection.set_rectangle(rect);
    }

    /// Capture the shapes whose bounds intersect the selection rectangle
    pub fn finalize_selection(&mut self) {
        let ShapeStore {
            shapes, selection, ..
        } = &mut self.store;
        selection.finalize(shapes);
    }

    pub fn clear_selection(&mut self) {
        self.store.selection.clear();
    }

    /// Duplicate every selected shape back into the collection as one
    /// undoable batch
    pub fn stamp_selection(&mut self) {
        let clones: Vec<ShapeKind> = self
            .store
            .selection
            .ids()
            .iter()
            .filter_map(|id| self.store.get(*id))
            .map(ShapeKind::duplicate)
            .collect();
        self.history
            .execute(ShapeCommand::new(clones, Vec::new()), &mut self.store);
    }

    /// Live-drag preview: translate every selected shape without
    /// committing. [`Self::optimize`] turns the offsets into one undo
    /// step.
    pub fn set_selection_offset(&mut self, offset: Vec2) {
        let ids: Vec<usize> = self.store.selection.ids().to_vec();
        for id in ids {
            if let Some(shape) = self.store.get_mut(id) {
                shape.set_draw_offset(offset);
            }
        }
    }

    // --- persistence ---

    /// Write shapes in z-order in the legacy token-stream format.
    /// Degenerate (invalid) shapes are skipped, matching what `optimize`
    /// would drop anyway.
    pub fn serialize<W: std::io::Write>(
        &self,
        s: &mut MapDataSerializer<W>,
    ) -> Result<(), SerializeError> {
        let valid: Vec<&ShapeKind> = self.store.shapes.iter().filter(|s| s.is_valid()).collect();
        s.start_object()?;
        s.u32(valid.len() as u32)?;
        for shape in valid {
            shape.serialize(s)?;
        }
        s.end_object()
    }

    /// Read a collection; shapes load directly (loading is not an
    /// undoable action) and get fresh runtime ids.
    pub fn deserialize(d: &mut MapDataDeserializer) -> Result<Self, SerializeError> {
        d.expect_start_object()?;
        let count = d.u32()?;
        let mut store = ShapeStore::default();
        for _ in 0..count {
            store.insert_sorted(ShapeKind::deserialize(d)?);
        }
        d.expect_end_object()?;
        store.rebuild_partitions();
        Ok(Self {
            store,
            history: CommandHistory::new(),
        })
    }
}
