use std::io::{Read, Write};

use log::info;
use serde::{Deserialize, Serialize};

use crate::geometry::CoordinateTransformer;
use crate::grid::Grid;
use crate::line_collection::LineCollection;
use crate::serialize::{MapDataDeserializer, MapDataSerializer, SerializeError};
use crate::token::TokenCollection;

/// Bump when the token-stream layout changes; older files keep loading,
/// newer ones are refused.
pub const MAP_FORMAT_VERSION: u32 = 1;

/// One battle map: three shape layers (a painted background, GM
/// annotations, and the fog-of-war mask regions), the placed tokens, the
/// grid, and the world → screen view transform.
///
/// Each layer owns its own history, so undo applies to whichever layer
/// the active tool edits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapDocument {
    background_lines: LineCollection,
    annotation_lines: LineCollection,
    fog_of_war: LineCollection,
    tokens: TokenCollection,
    grid: Grid,
    transformer: CoordinateTransformer,
}

impl MapDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background_lines(&self) -> &LineCollection {
        &self.background_lines
    }

    pub fn background_lines_mut(&mut self) -> &mut LineCollection {
        &mut self.background_lines
    }

    pub fn annotation_lines(&self) -> &LineCollection {
        &self.annotation_lines
    }

    pub fn annotation_lines_mut(&mut self) -> &mut LineCollection {
        &mut self.annotation_lines
    }

    pub fn fog_of_war(&self) -> &LineCollection {
        &self.fog_of_war
    }

    pub fn fog_of_war_mut(&mut self) -> &mut LineCollection {
        &mut self.fog_of_war
    }

    pub fn tokens(&self) -> &TokenCollection {
        &self.tokens
    }

    pub fn tokens_mut(&mut self) -> &mut TokenCollection {
        &mut self.tokens
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn set_grid(&mut self, grid: Grid) {
        self.grid = grid;
    }

    pub fn transformer(&self) -> &CoordinateTransformer {
        &self.transformer
    }

    pub fn transformer_mut(&mut self) -> &mut CoordinateTransformer {
        &mut self.transformer
    }

    /// Write the whole map in the legacy token-stream format
    pub fn save<W: Write>(&self, out: W) -> Result<(), SerializeError> {
        let mut s = MapDataSerializer::new(out);
        s.start_object()?;
        s.u32(MAP_FORMAT_VERSION)?;
        self.background_lines.serialize(&mut s)?;
        self.annotation_lines.serialize(&mut s)?;
        self.fog_of_war.serialize(&mut s)?;
        self.tokens.serialize(&mut s)?;
        self.grid.serialize(&mut s)?;
        self.transformer.serialize(&mut s)?;
        s.end_object()
    }

    /// Load a map written by [`Self::save`]
    pub fn load<R: Read>(input: R) -> Result<Self, SerializeError> {
        let mut d = MapDataDeserializer::new(input)?;
        d.expect_start_object()?;
        let version = d.u32()?;
        if version > MAP_FORMAT_VERSION {
            return Err(SerializeError::UnsupportedVersion(version));
        }
        let background_lines = LineCollection::deserialize(&mut d)?;
        let annotation_lines = LineCollection::deserialize(&mut d)?;
        let fog_of_war = LineCollection::deserialize(&mut d)?;
        let tokens = TokenCollection::deserialize(&mut d)?;
        let grid = Grid::deserialize(&mut d)?;
        let transformer = CoordinateTransformer::deserialize(&mut d)?;
        d.expect_end_object()?;
        info!(
            "loaded map: {} background, {} annotation, {} fog shapes, {} tokens",
            background_lines.len(),
            annotation_lines.len(),
            fog_of_war.len(),
            tokens.len()
        );
        Ok(Self {
            background_lines,
            annotation_lines,
            fog_of_war,
            tokens,
            grid,
            transformer,
        })
    }
}
