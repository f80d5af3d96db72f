use std::fmt;

use egui::{Color32, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::grid::Grid;
use crate::serialize::{MapDataDeserializer, MapDataSerializer, SerializeError};

mod collection;

pub use collection::{TokenCollection, TokenStore};

/// Unique identifier for a placed token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenId(Uuid);

impl TokenId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TokenId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A creature or object placed on the map.
///
/// Tokens are plain values; the checkpoint protocol on
/// [`TokenCollection`] relies on cheap deep copies of before/after
/// states, matched back up by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    id: TokenId,
    location: Pos2,
    /// Diameter in grid squares (1.0 = a medium creature filling a cell)
    size: f32,
    color: Color32,
    custom_border_color: Option<Color32>,
    bloodied: bool,
}

impl Token {
    pub fn new(location: Pos2, size: f32, color: Color32) -> Self {
        Self {
            id: TokenId::new(),
            location,
            size,
            color,
            custom_border_color: None,
            bloodied: false,
        }
    }

    pub fn id(&self) -> TokenId {
        self.id
    }

    pub fn location(&self) -> Pos2 {
        self.location
    }

    pub fn set_location(&mut self, location: Pos2) {
        self.location = location;
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn set_size(&mut self, size: f32) {
        self.size = size;
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn set_color(&mut self, color: Color32) {
        self.color = color;
    }

    pub fn custom_border_color(&self) -> Option<Color32> {
        self.custom_border_color
    }

    pub fn set_custom_border_color(&mut self, color: Option<Color32>) {
        self.custom_border_color = color;
    }

    pub fn is_bloodied(&self) -> bool {
        self.bloodied
    }

    pub fn set_bloodied(&mut self, bloodied: bool) {
        self.bloodied = bloodied;
    }

    /// World-space radius of the token's footprint circle on this grid
    pub fn radius_world(&self, grid: &Grid) -> f32 {
        self.size * grid.cell_size_world() / 2.0
    }

    /// World-space bounding rect (for selection-style hit tests)
    pub fn rect(&self, grid: &Grid) -> Rect {
        Rect::from_center_size(self.location, Vec2::splat(self.radius_world(grid) * 2.0))
    }

    pub fn serialize<W: std::io::Write>(
        &self,
        s: &mut MapDataSerializer<W>,
    ) -> Result<(), SerializeError> {
        s.start_object()?;
        s.string(&self.id.0.to_string())?;
        s.f32(self.location.x)?;
        s.f32(self.location.y)?;
        s.f32(self.size)?;
        s.color(self.color)?;
        s.bool(self.custom_border_color.is_some())?;
        if let Some(border) = self.custom_border_color {
            s.color(border)?;
        }
        s.bool(self.bloodied)?;
        s.end_object()
    }

    pub fn deserialize(d: &mut MapDataDeserializer) -> Result<Self, SerializeError> {
        d.expect_start_object()?;
        let raw_id = d.string()?;
        // A fresh id is fine if the stored one is from an older tool.
        let id = Uuid::parse_str(&raw_id).map(TokenId).unwrap_or_default();
        let x = d.f32()?;
        let y = d.f32()?;
        let size = d.f32()?;
        let color = d.color()?;
        let custom_border_color = if d.bool()? { Some(d.color()?) } else { None };
        let bloodied = d.bool()?;
        d.expect_end_object()?;
        Ok(Self {
            id,
            location: Pos2::new(x, y),
            size,
            color,
            custom_border_color,
            bloodied,
        })
    }
}
