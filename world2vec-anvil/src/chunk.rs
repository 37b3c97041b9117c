//! Decoding stored chunk NBT into world-store sections.

use std::collections::HashMap;

use log::debug;
use world2vec_core::world::SECTION_VOLUME;
use world2vec_core::{Block, Chunk, Section};

use crate::legacy::legacy_block;
use crate::nbt::{BlockStateNbt, ChunkNbt, SectionNbt};
use crate::palette::{NON_SPANNING_DATA_VERSION, unpack_indices};

/// A chunk together with every section that carries block data.
#[derive(Debug)]
pub struct DecodedChunk {
    pub chunk: Chunk,
    pub sections: Vec<Section>,
}

/// Decode `nbt`. `fallback_pos` is used when the compound carries no coordinates.
pub fn decode_chunk(nbt: &ChunkNbt, fallback_pos: (i32, i32)) -> DecodedChunk {
    let (x, z) = nbt.stored_pos().unwrap_or(fallback_pos);
    let chunk = Chunk::new(x, z, nbt.data_version);
    let spanning = nbt.data_version.is_none_or(|v| v < NON_SPANNING_DATA_VERSION);

    let sections: Vec<Section> = nbt
        .sections()
        .iter()
        .filter_map(|section| decode_section(section, spanning))
        .collect();
    debug!("Decoded chunk ({}, {}) with {} sections", x, z, sections.len());

    DecodedChunk { chunk, sections }
}

fn to_block(state: &BlockStateNbt) -> Block {
    Block {
        name: state.name.clone(),
        properties: state.properties.clone(),
    }
}

fn decode_section(nbt: &SectionNbt, spanning: bool) -> Option<Section> {
    let index = nbt.y as i32;

    if let Some(states) = &nbt.block_states {
        let palette: Vec<_> = states.palette.iter().map(|s| Some(to_block(s))).collect();
        let indices = match &states.data {
            Some(data) => unpack_indices(data, palette.len(), false),
            None => vec![0; SECTION_VOLUME],
        };
        return Some(Section::new(index, palette, indices));
    }

    if let Some(palette) = &nbt.palette {
        let palette: Vec<_> = palette.iter().map(|s| Some(to_block(s))).collect();
        let indices = match &nbt.packed_states {
            Some(data) => unpack_indices(data, palette.len(), spanning),
            None => vec![0; SECTION_VOLUME],
        };
        return Some(Section::new(index, palette, indices));
    }

    nbt.blocks.as_ref().map(|blocks| {
        decode_legacy(
            index,
            blocks,
            nbt.data.as_deref().unwrap_or(&[]),
            nbt.add.as_deref().unwrap_or(&[]),
        )
    })
}

fn nibble(array: &[i8], i: usize) -> u8 {
    let byte = array.get(i / 2).copied().unwrap_or(0) as u8;
    if i % 2 == 0 { byte & 0x0F } else { byte >> 4 }
}

fn decode_legacy(index: i32, blocks: &[i8], data: &[i8], add: &[i8]) -> Section {
    let mut palette = Vec::new();
    let mut seen: HashMap<(u16, u8), u16> = HashMap::new();
    let mut states = Vec::with_capacity(SECTION_VOLUME);

    for i in 0..SECTION_VOLUME {
        let low = blocks.get(i).copied().unwrap_or(0) as u8 as u16;
        let id = low | (nibble(add, i) as u16) << 8;
        let key = (id, nibble(data, i));
        let state = *seen.entry(key).or_insert_with(|| {
            palette.push(legacy_block(key.0, key.1));
            (palette.len() - 1) as u16
        });
        states.push(state);
    }

    Section::new(index, palette, states)
}
