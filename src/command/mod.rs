mod commands;
mod history;

pub use commands::{Command, ShapeCommand, TokenCommand};
pub use history::CommandHistory;
