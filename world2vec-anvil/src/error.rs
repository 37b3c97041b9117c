use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnvilError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("region file is truncated ({len} bytes, header needs {needed})")]
    TruncatedHeader { len: usize, needed: usize },

    #[error("chunk ({x}, {z}) is corrupt: {reason}")]
    CorruptChunk { x: i32, z: i32, reason: String },

    #[error("unsupported chunk compression type {0}")]
    UnsupportedCompression(u8),

    #[error("NBT error: {0}")]
    Nbt(#[from] fastnbt::error::Error),
}

impl AnvilError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnvilError>;
