#![warn(clippy::all, rust_2018_idioms)]

pub mod command;
pub mod document;
pub mod geometry;
pub mod grid;
pub mod id_generator;
pub mod line_collection;
pub mod selection;
pub mod serialize;
pub mod shape;
pub mod snapshot;
pub mod token;
mod util;

pub use command::{Command, CommandHistory, ShapeCommand, TokenCommand};
pub use document::{MapDocument, MAP_FORMAT_VERSION};
pub use geometry::CoordinateTransformer;
pub use grid::Grid;
pub use line_collection::LineCollection;
pub use selection::Selection;
pub use serialize::{MapDataDeserializer, MapDataSerializer, SerializeError};
pub use shape::{Shape, ShapeKind, ShapeStyle};
pub use snapshot::MapSnapshot;
pub use token::{Token, TokenCollection, TokenId};
