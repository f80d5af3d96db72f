use egui::Pos2;
use serde::{Deserialize, Serialize};

use crate::geometry::CoordinateTransformer;
use crate::serialize::{MapDataDeserializer, MapDataSerializer, SerializeError};

/// Square battle grid.
///
/// Grid space is a unit lattice (intersections at integer coordinates,
/// cell centers at half-integers); the owned transformer maps grid space
/// into world space and carries the cell size as its zoom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    transform: CoordinateTransformer,
    /// Color theme name, resolved by the front end
    theme: String,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            transform: CoordinateTransformer::default(),
            theme: "graphpaper".to_owned(),
        }
    }
}

impl Grid {
    pub fn new(transform: CoordinateTransformer, theme: String) -> Self {
        Self { transform, theme }
    }

    pub fn transform(&self) -> &CoordinateTransformer {
        &self.transform
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: String) {
        self.theme = theme;
    }

    /// Side length of one grid cell in world units
    pub fn cell_size_world(&self) -> f32 {
        self.transform.zoom()
    }

    pub fn world_to_grid(&self, p: Pos2) -> Pos2 {
        self.transform.invert(p)
    }

    pub fn grid_to_world(&self, p: Pos2) -> Pos2 {
        self.transform.apply(p)
    }

    /// Nearest grid-line intersection, in world space
    pub fn snap_to_intersection(&self, world: Pos2) -> Pos2 {
        let g = self.world_to_grid(world);
        self.grid_to_world(Pos2::new(g.x.round(), g.y.round()))
    }

    /// Center of the nearest cell, in world space
    pub fn nearest_cell_center(&self, world: Pos2) -> Pos2 {
        let g = self.world_to_grid(world);
        self.grid_to_world(Pos2::new(
            (g.x - 0.5).round() + 0.5,
            (g.y - 0.5).round() + 0.5,
        ))
    }

    pub fn serialize<W: std::io::Write>(
        &self,
        s: &mut MapDataSerializer<W>,
    ) -> Result<(), SerializeError> {
        s.start_object()?;
        s.string(&self.theme)?;
        self.transform.serialize(s)?;
        s.end_object()
    }

    pub fn deserialize(d: &mut MapDataDeserializer) -> Result<Self, SerializeError> {
        d.expect_start_object()?;
        let theme = d.string()?;
        let transform = CoordinateTransformer::deserialize(d)?;
        d.expect_end_object()?;
        Ok(Self {
            transform,
            theme,
        })
    }
}
