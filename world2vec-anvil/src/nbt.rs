//! NBT (Named Binary Tag) structures for Minecraft chunk data.
//!
//! One root type covers the three on-disk layouts the reader accepts:
//! - 1.18+: top-level `sections` with `block_states { palette, data }`
//! - 1.13 to 1.17: `Level.Sections` with `Palette` and a `BlockStates` long array
//! - pre-1.13: `Level.Sections` with numeric `Blocks`/`Data`/`Add` arrays
//!
//! Fields the reader does not need (lighting, heightmaps, entities) are
//! skipped during deserialization.

use std::collections::BTreeMap;

use fastnbt::{ByteArray, LongArray};
use serde::{Deserialize, Serialize};

/// Data version written by default: Java Edition 1.20.1.
pub const DEFAULT_DATA_VERSION: i32 = 3465;

/// Root compound of a stored chunk.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ChunkNbt {
    #[serde(rename = "DataVersion", default, skip_serializing_if = "Option::is_none")]
    pub data_version: Option<i32>,

    #[serde(rename = "xPos", default, skip_serializing_if = "Option::is_none")]
    pub x_pos: Option<i32>,
    #[serde(rename = "zPos", default, skip_serializing_if = "Option::is_none")]
    pub z_pos: Option<i32>,
    #[serde(rename = "yPos", default, skip_serializing_if = "Option::is_none")]
    pub y_pos: Option<i32>,

    #[serde(rename = "Status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<SectionNbt>,

    /// Pre-1.18 wrapper around the chunk contents.
    #[serde(rename = "Level", default, skip_serializing_if = "Option::is_none")]
    pub level: Option<LevelNbt>,
}

impl ChunkNbt {
    /// Chunk coordinates as stored, wherever the layout keeps them.
    pub fn stored_pos(&self) -> Option<(i32, i32)> {
        match (self.x_pos, self.z_pos) {
            (Some(x), Some(z)) => Some((x, z)),
            _ => self.level.as_ref().and_then(|l| l.x_pos.zip(l.z_pos)),
        }
    }

    pub fn sections(&self) -> &[SectionNbt] {
        if self.sections.is_empty() {
            if let Some(level) = &self.level {
                return &level.sections;
            }
        }
        &self.sections
    }
}

/// Identity fields of a stored chunk; every other tag is skipped unread.
#[derive(Debug, Default, Deserialize)]
pub struct ChunkHeaderNbt {
    #[serde(rename = "DataVersion", default)]
    pub data_version: Option<i32>,
    #[serde(rename = "xPos", default)]
    pub x_pos: Option<i32>,
    #[serde(rename = "zPos", default)]
    pub z_pos: Option<i32>,
    #[serde(rename = "Level", default)]
    pub level: Option<LevelHeaderNbt>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LevelHeaderNbt {
    #[serde(rename = "xPos", default)]
    pub x_pos: Option<i32>,
    #[serde(rename = "zPos", default)]
    pub z_pos: Option<i32>,
}

impl ChunkHeaderNbt {
    pub fn stored_pos(&self) -> Option<(i32, i32)> {
        self.x_pos
            .zip(self.z_pos)
            .or_else(|| self.level.as_ref().and_then(|l| l.x_pos.zip(l.z_pos)))
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LevelNbt {
    #[serde(rename = "xPos", default, skip_serializing_if = "Option::is_none")]
    pub x_pos: Option<i32>,
    #[serde(rename = "zPos", default, skip_serializing_if = "Option::is_none")]
    pub z_pos: Option<i32>,

    #[serde(rename = "Sections", default)]
    pub sections: Vec<SectionNbt>,
}

// --- Section (16x16x16 Cube) ---
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SectionNbt {
    #[serde(rename = "Y")]
    pub y: i8,

    // 1.18+
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_states: Option<BlockStatesNbt>,

    // 1.13 to 1.17
    #[serde(rename = "Palette", default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<Vec<BlockStateNbt>>,
    #[serde(rename = "BlockStates", default, skip_serializing_if = "Option::is_none")]
    pub packed_states: Option<LongArray>,

    // pre-1.13
    #[serde(rename = "Blocks", default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<ByteArray>,
    #[serde(rename = "Data", default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ByteArray>,
    #[serde(rename = "Add", default, skip_serializing_if = "Option::is_none")]
    pub add: Option<ByteArray>,
}

// --- Block Palette ---
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BlockStatesNbt {
    pub palette: Vec<BlockStateNbt>,
    // Indices into the palette. Omitted when the palette has one entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<LongArray>,
}

// --- Single Block ---
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockStateNbt {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Properties", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}
