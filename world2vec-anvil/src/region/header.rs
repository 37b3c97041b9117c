//! Region file header.
//!
//! The header consists of two tables:
//! - Location table: where each chunk is stored
//! - Timestamp table: when each chunk was last saved

use super::{CHUNKS_PER_REGION, HEADER_SIZE, SECTOR_SIZE};
use crate::error::{AnvilError, Result};

/// Location table entry: 3 bytes sector offset + 1 byte sector count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub sector: u32,
    pub count: u8,
}

impl Location {
    /// An offset below 2 would point into the header itself.
    #[inline]
    pub fn is_present(&self) -> bool {
        self.sector >= 2 && self.count > 0
    }

    #[inline]
    pub fn byte_offset(&self) -> usize {
        self.sector as usize * SECTOR_SIZE
    }
}

/// Parsed (or to-be-written) 8KB region header.
#[derive(Debug, Clone)]
pub struct Header {
    locations: Vec<Location>,
    timestamps: Vec<u32>,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            locations: vec![Location::default(); CHUNKS_PER_REGION],
            timestamps: vec![0; CHUNKS_PER_REGION],
        }
    }
}

impl Header {
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(AnvilError::TruncatedHeader {
                len: data.len(),
                needed: HEADER_SIZE,
            });
        }

        let mut header = Self::default();
        for i in 0..CHUNKS_PER_REGION {
            let entry = &data[i * 4..i * 4 + 4];
            header.locations[i] = Location {
                sector: u32::from_be_bytes([0, entry[0], entry[1], entry[2]]),
                count: entry[3],
            };
            let stamp = &data[SECTOR_SIZE + i * 4..SECTOR_SIZE + i * 4 + 4];
            header.timestamps[i] = u32::from_be_bytes([stamp[0], stamp[1], stamp[2], stamp[3]]);
        }
        Ok(header)
    }

    /// Location of chunk `index`, if it is stored.
    pub fn location(&self, index: usize) -> Option<Location> {
        self.locations.get(index).copied().filter(Location::is_present)
    }

    pub fn timestamp(&self, index: usize) -> u32 {
        self.timestamps.get(index).copied().unwrap_or(0)
    }

    pub fn set(&mut self, index: usize, location: Location, timestamp: u32) {
        self.locations[index] = location;
        self.timestamps[index] = timestamp;
    }

    pub fn chunk_count(&self) -> usize {
        self.locations.iter().filter(|l| l.is_present()).count()
    }

    /// Serialize to the 8192-byte on-disk form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut header = vec![0u8; HEADER_SIZE];

        for (i, location) in self.locations.iter().enumerate() {
            let entry_offset = i * 4;
            header[entry_offset] = ((location.sector >> 16) & 0xFF) as u8;
            header[entry_offset + 1] = ((location.sector >> 8) & 0xFF) as u8;
            header[entry_offset + 2] = (location.sector & 0xFF) as u8;
            header[entry_offset + 3] = location.count;
        }
        for (i, stamp) in self.timestamps.iter().enumerate() {
            let entry_offset = SECTOR_SIZE + i * 4;
            header[entry_offset..entry_offset + 4].copy_from_slice(&stamp.to_be_bytes());
        }

        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_size() {
        assert_eq!(Header::default().to_bytes().len(), 8192);
    }

    #[test]
    fn test_truncated_header() {
        let err = Header::parse(&[0u8; 100]).unwrap_err();
        assert!(matches!(err, AnvilError::TruncatedHeader { len: 100, needed: 8192 }));
    }

    #[test]
    fn test_location_encoding() {
        let mut header = Header::default();
        header.set(0, Location { sector: 2, count: 1 }, 7);
        header.set(33, Location { sector: 0x01_02_03, count: 4 }, 0);
        let bytes = header.to_bytes();

        // First chunk (index 0) at sector 2
        assert_eq!(&bytes[0..4], &[0, 0, 2, 1]);
        assert_eq!(&bytes[33 * 4..33 * 4 + 4], &[1, 2, 3, 4]);
        assert_eq!(&bytes[4096..4100], &[0, 0, 0, 7]);

        let parsed = Header::parse(&bytes).unwrap();
        assert_eq!(parsed.location(33), Some(Location { sector: 0x01_02_03, count: 4 }));
        assert_eq!(parsed.timestamp(0), 7);
        assert_eq!(parsed.location(1), None);
        assert_eq!(parsed.chunk_count(), 2);
    }

    #[test]
    fn test_offset_inside_header_is_absent() {
        let mut bytes = vec![0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&[0, 0, 1, 1]);
        assert_eq!(Header::parse(&bytes).unwrap().location(0), None);
    }
}
