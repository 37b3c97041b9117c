//! Minecraft Anvil region file format (.mca).
//!
//! Region files contain 32x32 chunks in a specific binary format:
//! - Bytes 0-4095: Location table (1024 entries × 4 bytes)
//! - Bytes 4096-8191: Timestamp table (1024 entries × 4 bytes)
//! - Bytes 8192+: Chunk data (variable size sectors)

mod header;
mod writer;

pub use header::{Header, Location};
pub use writer::RegionWriter;

use crate::compression::CompressionType;
use crate::error::{AnvilError, Result};

/// Size of one sector in bytes (4 KB).
pub const SECTOR_SIZE: usize = 4096;

/// Total header size (location table + timestamp table).
pub const HEADER_SIZE: usize = SECTOR_SIZE * 2; // 8192 bytes

/// Number of chunks per region dimension.
pub const REGION_SIZE: i32 = 32;

/// Chunks per region file.
pub const CHUNKS_PER_REGION: usize = (REGION_SIZE * REGION_SIZE) as usize;

/// Compression byte flag for chunks stored in an external .mcc file.
const EXTERNAL_FLAG: u8 = 0x80;

/// Calculate linear index for a chunk within a region (0-1023).
#[inline]
pub fn local_to_index(local_x: i32, local_z: i32) -> usize {
    (local_z * REGION_SIZE + local_x) as usize
}

/// Calculate local coordinates from linear index.
#[inline]
pub fn index_to_local(index: usize) -> (i32, i32) {
    let local_x = (index % REGION_SIZE as usize) as i32;
    let local_z = (index / REGION_SIZE as usize) as i32;
    (local_x, local_z)
}

/// Region file coordinates (parsed from filename like "r.0.-1.mca").
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct RegionPos {
    pub x: i32,
    pub z: i32,
}

impl RegionPos {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Parse region position from filename (e.g., "r.0.-1.mca").
    pub fn from_filename(name: &str) -> Option<Self> {
        let parts: Vec<&str> = name.split('.').collect();
        if parts.len() == 4 && parts[0] == "r" && parts[3] == "mca" {
            let x = parts[1].parse().ok()?;
            let z = parts[2].parse().ok()?;
            Some(Self { x, z })
        } else {
            None
        }
    }

    pub fn filename(&self) -> String {
        format!("r.{}.{}.mca", self.x, self.z)
    }

    /// Convert local chunk coordinates to world chunk coordinates.
    pub fn local_to_world(&self, local_x: i32, local_z: i32) -> (i32, i32) {
        (self.x * REGION_SIZE + local_x, self.z * REGION_SIZE + local_z)
    }
}

/// Compressed payload of one stored chunk.
#[derive(Debug, Clone, Copy)]
pub struct RawChunk<'a> {
    pub local_x: i32,
    pub local_z: i32,
    pub location: Location,
    pub compression: CompressionType,
    pub data: &'a [u8],
}

impl<'a> RawChunk<'a> {
    /// Parse the `[length][compression][data]` record at the start of
    /// `bytes`, which were read from `location`. `world` is the chunk's
    /// world position, used in errors.
    pub fn parse(
        (local_x, local_z): (i32, i32),
        location: Location,
        world: (i32, i32),
        bytes: &'a [u8],
    ) -> Result<Self> {
        let (x, z) = world;
        let corrupt = |reason: String| AnvilError::CorruptChunk { x, z, reason };

        let Some(prefix) = bytes.get(..5) else {
            return Err(corrupt("chunk record is past end of file".to_string()));
        };
        let length = u32::from_be_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
        if length <= 1 {
            return Err(corrupt(format!("declared length {length}")));
        }
        let kind = prefix[4];
        if kind & EXTERNAL_FLAG != 0 {
            return Err(corrupt("stored in external .mcc file".to_string()));
        }
        let compression = CompressionType::from_byte(kind).ok_or(AnvilError::UnsupportedCompression(kind))?;
        let Some(data) = bytes.get(5..4 + length) else {
            return Err(corrupt(format!("payload of {length} bytes runs past end of file")));
        };
        Ok(Self {
            local_x,
            local_z,
            location,
            compression,
            data,
        })
    }
}

/// A region file held in memory.
pub struct RegionFile<'a> {
    pos: RegionPos,
    header: Header,
    data: &'a [u8],
}

impl<'a> RegionFile<'a> {
    pub fn parse(pos: RegionPos, data: &'a [u8]) -> Result<Self> {
        let header = Header::parse(data)?;
        Ok(Self { pos, header, data })
    }

    pub fn pos(&self) -> RegionPos {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.header.chunk_count() == 0
    }

    /// Location table entry of a stored chunk.
    pub fn location(&self, local_x: i32, local_z: i32) -> Option<Location> {
        self.header.location(local_to_index(local_x, local_z))
    }

    /// Payload of the chunk at local coordinates, `None` if not stored.
    pub fn chunk(&self, local_x: i32, local_z: i32) -> Option<Result<RawChunk<'a>>> {
        let location = self.location(local_x, local_z)?;
        let world = self.pos.local_to_world(local_x, local_z);
        let bytes = self.data.get(location.byte_offset()..).unwrap_or(&[]);
        Some(RawChunk::parse((local_x, local_z), location, world, bytes))
    }

    /// Stored chunks, local x outer and local z inner.
    pub fn chunks(&self) -> impl Iterator<Item = Result<RawChunk<'a>>> + '_ {
        (0..REGION_SIZE)
            .flat_map(|x| (0..REGION_SIZE).map(move |z| (x, z)))
            .filter_map(|(x, z)| self.chunk(x, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        assert_eq!(local_to_index(0, 0), 0);
        assert_eq!(local_to_index(31, 0), 31);
        assert_eq!(local_to_index(0, 1), 32);
        assert_eq!(index_to_local(1023), (31, 31));
        assert_eq!(index_to_local(33), (1, 1));
    }

    #[test]
    fn test_region_pos_from_filename() {
        assert_eq!(RegionPos::from_filename("r.0.-1.mca"), Some(RegionPos::new(0, -1)));
        assert_eq!(RegionPos::from_filename("r.-3.12.mca"), Some(RegionPos::new(-3, 12)));
        assert_eq!(RegionPos::from_filename("r.0.0.mcr"), None);
        assert_eq!(RegionPos::from_filename("level.dat"), None);
        assert_eq!(RegionPos::new(-1, 2).filename(), "r.-1.2.mca");
    }

    #[test]
    fn test_local_to_world() {
        assert_eq!(RegionPos::new(-1, 0).local_to_world(31, 5), (-1, 5));
        assert_eq!(RegionPos::new(2, -2).local_to_world(0, 31), (64, -33));
    }

    #[test]
    fn test_empty_region_has_no_chunks() {
        let data = vec![0u8; HEADER_SIZE];
        let region = RegionFile::parse(RegionPos::new(0, 0), &data).unwrap();
        assert!(region.is_empty());
        assert_eq!(region.chunks().count(), 0);
    }

    #[test]
    fn test_chunk_past_end_is_corrupt() {
        let mut data = vec![0u8; HEADER_SIZE];
        // Chunk (1, 0) claims sector 9, which does not exist.
        data[4..8].copy_from_slice(&[0, 0, 9, 1]);
        let region = RegionFile::parse(RegionPos::new(0, 0), &data).unwrap();
        let result = region.chunk(1, 0).unwrap();
        assert!(matches!(result, Err(AnvilError::CorruptChunk { x: 1, z: 0, .. })));
    }

    #[test]
    fn test_external_chunk_is_rejected() {
        let mut data = vec![0u8; HEADER_SIZE + SECTOR_SIZE];
        data[0..4].copy_from_slice(&[0, 0, 2, 1]);
        data[HEADER_SIZE..HEADER_SIZE + 5].copy_from_slice(&[0, 0, 0, 5, 0x82]);
        let region = RegionFile::parse(RegionPos::new(0, 0), &data).unwrap();
        assert!(matches!(region.chunk(0, 0), Some(Err(AnvilError::CorruptChunk { .. }))));
    }
}
