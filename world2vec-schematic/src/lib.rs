//! Schematic output for extracted builds.

use std::path::PathBuf;

use thiserror::Error;

pub mod sponge;

pub use sponge::SpongeSchematic;

/// Sink for extracted blocks. Positions are build-local `(x, y, z)`.
pub trait SchematicWriter {
    fn set_block(&mut self, pos: (i32, i32, i32), block: &str);
}

#[derive(Debug, Error)]
pub enum SchematicError {
    #[error("failed to write schematic {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("schematic dimension {axis} of {size} blocks exceeds the format limit")]
    TooLarge { axis: &'static str, size: i64 },

    #[error("NBT error: {0}")]
    Nbt(#[from] fastnbt::error::Error),
}

pub type Result<T> = std::result::Result<T, SchematicError>;
