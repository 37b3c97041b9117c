//! Region file assembly for synthetic worlds.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::{Header, Location, SECTOR_SIZE, local_to_index};
use crate::compression::{CompressionType, compress_and_wrap_chunk};
use crate::error::{AnvilError, Result};
use crate::nbt::ChunkNbt;

/// Collects chunks and lays them out sector-aligned after the header.
pub struct RegionWriter {
    compression: CompressionType,
    // Wrapped payloads keyed by linear index.
    chunks: BTreeMap<usize, Vec<u8>>,
}

impl Default for RegionWriter {
    fn default() -> Self {
        Self {
            compression: CompressionType::Zlib,
            chunks: BTreeMap::new(),
        }
    }
}

impl RegionWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compression(mut self, compression: CompressionType) -> Self {
        self.compression = compression;
        self
    }

    /// Serialize and store `chunk` at local coordinates (0..32).
    pub fn insert(&mut self, local_x: i32, local_z: i32, chunk: &ChunkNbt) -> Result<()> {
        let nbt = fastnbt::to_bytes(chunk)?;
        let payload = compress_and_wrap_chunk(&nbt, self.compression).map_err(|e| AnvilError::CorruptChunk {
            x: local_x,
            z: local_z,
            reason: e.to_string(),
        })?;
        self.chunks.insert(local_to_index(local_x, local_z), payload);
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut header = Header::default();
        let mut body = Vec::new();
        let mut sector = 2u32;

        for (&index, payload) in &self.chunks {
            let count = payload.len().div_ceil(SECTOR_SIZE);
            let Ok(count) = u8::try_from(count) else {
                let (x, z) = super::index_to_local(index);
                return Err(AnvilError::CorruptChunk {
                    x,
                    z,
                    reason: format!("{} bytes exceeds 255 sectors", payload.len()),
                });
            };
            header.set(index, Location { sector, count }, 0);
            body.extend_from_slice(payload);
            body.resize(body.len().next_multiple_of(SECTOR_SIZE), 0);
            sector += count as u32;
        }

        let mut bytes = header.to_bytes();
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_bytes()?).map_err(|e| AnvilError::io(path, e))
    }
}
