use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use crate::serialize::{MapDataDeserializer, MapDataSerializer, SerializeError};

/// Mapping between two coordinate spaces: a translation origin plus a
/// uniform zoom scale. The map uses one instance for world → screen; the
/// grid owns another for grid → world, and the two compose into a
/// grid → screen chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateTransformer {
    origin: Vec2,
    zoom: f32,
}

impl Default for CoordinateTransformer {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl CoordinateTransformer {
    pub fn new(origin: Vec2, zoom: f32) -> Self {
        Self { origin, zoom }
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Map a point from the local space into the parent space.
    pub fn apply(&self, p: Pos2) -> Pos2 {
        Pos2::new(p.x * self.zoom, p.y * self.zoom) + self.origin
    }

    /// Inverse of [`Self::apply`].
    pub fn invert(&self, p: Pos2) -> Pos2 {
        let q = p - self.origin;
        Pos2::new(q.x / self.zoom, q.y / self.zoom)
    }

    /// Map a length (radius, stroke width) into the parent space.
    pub fn apply_length(&self, len: f32) -> f32 {
        len * self.zoom
    }

    pub fn world_to_screen(&self, p: Pos2) -> Pos2 {
        self.apply(p)
    }

    pub fn screen_to_world(&self, p: Pos2) -> Pos2 {
        self.invert(p)
    }

    /// Chain this transformer with an outer one: the result maps
    /// `self`'s local space directly into `outer`'s parent space.
    pub fn compose(&self, outer: &CoordinateTransformer) -> CoordinateTransformer {
        CoordinateTransformer {
            origin: self.origin * outer.zoom + outer.origin,
            zoom: self.zoom * outer.zoom,
        }
    }

    /// The transformer mapping the parent space back into the local space.
    pub fn inverse(&self) -> CoordinateTransformer {
        CoordinateTransformer {
            origin: -self.origin / self.zoom,
            zoom: 1.0 / self.zoom,
        }
    }

    /// Translate the view by a parent-space delta.
    pub fn pan(&mut self, delta: Vec2) {
        self.origin += delta;
    }

    /// Scale the view by `factor`, keeping the parent-space point
    /// `anchor` fixed on screen.
    pub fn zoom_about(&mut self, anchor: Pos2, factor: f32) {
        self.origin = (self.origin - anchor.to_vec2()) * factor + anchor.to_vec2();
        self.zoom *= factor;
    }

    pub fn serialize<W: std::io::Write>(
        &self,
        s: &mut MapDataSerializer<W>,
    ) -> Result<(), SerializeError> {
        s.start_object()?;
        s.f32(self.origin.x)?;
        s.f32(self.origin.y)?;
        s.f32(self.zoom)?;
        s.end_object()
    }

    pub fn deserialize(d: &mut MapDataDeserializer) -> Result<Self, SerializeError> {
        d.expect_start_object()?;
        let x = d.f32()?;
        let y = d.f32()?;
        let zoom = d.f32()?;
        d.expect_end_object()?;
        Ok(Self {
            origin: Vec2::new(x, y),
            zoom,
        })
    }
}
