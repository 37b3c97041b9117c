//! Synthetic chunk construction.
//!
//! Produces 1.18+ layout chunk NBT from sparse block placements, for
//! fixture worlds written through [`crate::region::RegionWriter`].

use std::collections::HashMap;

use world2vec_core::Block;
use world2vec_core::block::AIR;
use world2vec_core::world::SECTION_SIZE;

use crate::nbt::{BlockStateNbt, BlockStatesNbt, ChunkNbt, DEFAULT_DATA_VERSION, SectionNbt};
use crate::palette::pack_indices;

/// Lowest and highest section of a 1.18+ overworld (y -64..320).
const MIN_SECTION: i8 = -4;
const MAX_SECTION: i8 = 19;

pub struct ChunkBuilder {
    data_version: i32,
    // Sparse placements: (x, y, z) in chunk-local x/z and global y.
    custom_blocks: HashMap<(u8, i32, u8), Block>,
    full_layers: HashMap<i32, Block>,
}

impl Default for ChunkBuilder {
    fn default() -> Self {
        Self {
            data_version: DEFAULT_DATA_VERSION,
            custom_blocks: HashMap::new(),
            full_layers: HashMap::new(),
        }
    }
}

impl ChunkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_version(mut self, data_version: i32) -> Self {
        self.data_version = data_version;
        self
    }

    /// Set a single block at chunk-local coordinates (x: 0..15, z: 0..15).
    pub fn set_block(&mut self, x: u8, y: i32, z: u8, block: Block) {
        if (x as usize) < SECTION_SIZE && (z as usize) < SECTION_SIZE {
            self.custom_blocks.insert((x, y, z), block);
        }
    }

    /// Fill an entire y layer with one block.
    pub fn fill_layer(&mut self, y: i32, name: &str) {
        self.full_layers.insert(y, Block::new(name));
        self.custom_blocks.retain(|(_, by, _), _| *by != y);
    }

    pub fn build(&self, chunk_x: i32, chunk_z: i32) -> ChunkNbt {
        ChunkNbt {
            data_version: Some(self.data_version),
            x_pos: Some(chunk_x),
            z_pos: Some(chunk_z),
            y_pos: Some(MIN_SECTION as i32),
            status: Some("minecraft:full".to_string()),
            sections: (MIN_SECTION..=MAX_SECTION).map(|y| self.build_section(y)).collect(),
            level: None,
        }
    }

    fn block_at(&self, x: u8, y: i32, z: u8) -> Option<&Block> {
        self.custom_blocks.get(&(x, y, z)).or_else(|| self.full_layers.get(&y))
    }

    fn build_section(&self, sec_y: i8) -> SectionNbt {
        let start_y = sec_y as i32 * SECTION_SIZE as i32;
        let air = Block::new(AIR);

        let mut palette: Vec<Block> = Vec::new();
        let mut index_of: HashMap<Block, u16> = HashMap::new();
        let mut indices = Vec::with_capacity(SECTION_SIZE.pow(3));

        // YZX order
        for y in start_y..start_y + SECTION_SIZE as i32 {
            for z in 0..SECTION_SIZE as u8 {
                for x in 0..SECTION_SIZE as u8 {
                    let block = self.block_at(x, y, z).unwrap_or(&air);
                    let index = match index_of.get(block) {
                        Some(&i) => i,
                        None => {
                            let i = palette.len() as u16;
                            palette.push(block.clone());
                            index_of.insert(block.clone(), i);
                            i
                        }
                    };
                    indices.push(index);
                }
            }
        }

        let data = pack_indices(&indices, palette.len());
        SectionNbt {
            y: sec_y,
            block_states: Some(BlockStatesNbt {
                palette: palette
                    .into_iter()
                    .map(|b| BlockStateNbt {
                        name: b.name,
                        properties: b.properties,
                    })
                    .collect(),
                data: (!data.is_empty()).then(|| fastnbt::LongArray::new(data)),
            }),
            ..Default::default()
        }
    }
}
