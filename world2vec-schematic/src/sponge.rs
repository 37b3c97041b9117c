//! Sponge schematic (version 2) writer.
//!
//! The file is a gzip-compressed NBT compound named `Schematic`. Blocks
//! are palette ids encoded as varints in `x + z * Width + y * Width * Length`
//! order, with `minecraft:air` fixed at id 0.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use fastnbt::{ByteArray, IntArray, SerOpts, Value};
use flate2::Compression;
use flate2::write::GzEncoder;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{Result, SchematicError, SchematicWriter};

/// Java Edition 1.20.1.
pub const DEFAULT_DATA_VERSION: i32 = 3465;

const SPONGE_VERSION: i32 = 2;
const AIR: &str = "minecraft:air";

/// On-disk layout of the `Schematic` compound.
#[derive(Debug, Serialize, Deserialize)]
pub struct SchematicNbt {
    #[serde(rename = "Version")]
    pub version: i32,
    #[serde(rename = "DataVersion")]
    pub data_version: i32,
    #[serde(rename = "Width")]
    pub width: i16,
    #[serde(rename = "Height")]
    pub height: i16,
    #[serde(rename = "Length")]
    pub length: i16,
    #[serde(rename = "Offset")]
    pub offset: IntArray,
    #[serde(rename = "PaletteMax")]
    pub palette_max: i32,
    #[serde(rename = "Palette")]
    pub palette: BTreeMap<String, i32>,
    #[serde(rename = "BlockData")]
    pub block_data: ByteArray,
    #[serde(rename = "BlockEntities", default)]
    pub block_entities: Vec<Value>,
}

/// Sparse block collection written out as a Sponge schematic.
#[derive(Debug)]
pub struct SpongeSchematic {
    data_version: i32,
    blocks: HashMap<(i32, i32, i32), String>,
}

impl Default for SpongeSchematic {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_VERSION)
    }
}

impl SchematicWriter for SpongeSchematic {
    fn set_block(&mut self, pos: (i32, i32, i32), block: &str) {
        self.blocks.insert(pos, block.to_string());
    }
}

fn push_varint(out: &mut Vec<i8>, mut value: u32) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte as i8);
            return;
        }
        out.push((byte | 0x80) as i8);
    }
}

fn dimension(axis: &'static str, low: i32, high: i32) -> Result<i16> {
    let size = high as i64 - low as i64 + 1;
    u16::try_from(size)
        .map(|s| s as i16)
        .map_err(|_| SchematicError::TooLarge { axis, size })
}

impl SpongeSchematic {
    pub fn new(data_version: i32) -> Self {
        Self {
            data_version,
            blocks: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Minimum and maximum corners of the stored blocks.
    fn bounds(&self) -> Option<((i32, i32, i32), (i32, i32, i32))> {
        let mut iter = self.blocks.keys();
        let &first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), &(x, y, z)| {
            (
                (lo.0.min(x), lo.1.min(y), lo.2.min(z)),
                (hi.0.max(x), hi.1.max(y), hi.2.max(z)),
            )
        }))
    }

    pub fn to_nbt(&self) -> Result<SchematicNbt> {
        let mut palette = BTreeMap::from([(AIR.to_string(), 0)]);
        let Some((lo, hi)) = self.bounds() else {
            return Ok(SchematicNbt {
                version: SPONGE_VERSION,
                data_version: self.data_version,
                width: 0,
                height: 0,
                length: 0,
                offset: IntArray::new(vec![0, 0, 0]),
                palette_max: 1,
                palette,
                block_data: ByteArray::new(Vec::new()),
                block_entities: Vec::new(),
            });
        };

        let width = dimension("Width", lo.0, hi.0)?;
        let height = dimension("Height", lo.1, hi.1)?;
        let length = dimension("Length", lo.2, hi.2)?;

        let mut block_data = Vec::new();
        for y in lo.1..=hi.1 {
            for z in lo.2..=hi.2 {
                for x in lo.0..=hi.0 {
                    let name = self.blocks.get(&(x, y, z)).map(String::as_str).unwrap_or(AIR);
                    let next = palette.len() as i32;
                    let id = *palette.entry(name.to_string()).or_insert(next);
                    push_varint(&mut block_data, id as u32);
                }
            }
        }

        Ok(SchematicNbt {
            version: SPONGE_VERSION,
            data_version: self.data_version,
            width,
            height,
            length,
            offset: IntArray::new(vec![lo.0, lo.1, lo.2]),
            palette_max: palette.len() as i32,
            palette,
            block_data: ByteArray::new(block_data),
            block_entities: Vec::new(),
        })
    }

    /// Write `<dir>/<name>.schem`, creating `dir` if needed.
    pub fn save(&self, dir: impl AsRef<Path>, name: &str) -> Result<PathBuf> {
        let dir = dir.as_ref();
        let path = dir.join(format!("{name}.schem"));
        let io_err = |source| SchematicError::Io {
            path: path.clone(),
            source,
        };

        let nbt = self.to_nbt()?;
        debug!(
            "Schematic {}x{}x{} with {} palette entries",
            nbt.width, nbt.height, nbt.length, nbt.palette_max
        );
        let bytes = fastnbt::to_bytes_with_opts(&nbt, SerOpts::new().root_name("Schematic"))?;

        fs::create_dir_all(dir).map_err(io_err)?;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&bytes).map_err(io_err)?;
        let compressed = encoder.finish().map_err(io_err)?;
        fs::write(&path, compressed).map_err(io_err)?;

        info!("Wrote {} blocks to {}", self.blocks.len(), path.display());
        Ok(path)
    }
}
