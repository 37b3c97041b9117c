//! In-memory world used by the unit tests.

use std::cell::Cell;
use std::collections::HashMap;

use crate::block::{AIR_BLOCK, Block};
use crate::world::{Chunk, SECTION_SIZE, Section, WorldStore};

#[derive(Default)]
pub(crate) struct MemoryWorld {
    chunks: Vec<Chunk>,
    sections: HashMap<((i32, i32), i32), Section>,
    // Highest global y passed to `block`, to observe how far a pass reads.
    highest_read: Cell<Option<i32>>,
}

impl MemoryWorld {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_chunk(&mut self, x: i32, z: i32, version: Option<i32>) -> Chunk {
        let chunk = Chunk::new(x, z, version);
        self.chunks.push(chunk);
        chunk
    }

    fn section_mut(&mut self, chunk: &Chunk, index: i32) -> &mut Section {
        self.sections
            .entry((chunk.pos(), index))
            .or_insert_with(|| Section::uniform(index, AIR_BLOCK.clone()))
    }

    pub(crate) fn set_block(&mut self, chunk: &Chunk, x: usize, y: i32, z: usize, block: Block) {
        let index = y.div_euclid(SECTION_SIZE as i32);
        let local_y = y.rem_euclid(SECTION_SIZE as i32) as usize;
        self.section_mut(chunk, index).set_block(x, local_y, z, block);
    }

    pub(crate) fn fill_layer(&mut self, chunk: &Chunk, y: i32, name: &str) {
        for x in 0..SECTION_SIZE {
            for z in 0..SECTION_SIZE {
                self.set_block(chunk, x, y, z, Block::new(name));
            }
        }
    }

    /// Solid `name` from `bottom` up to and including `top`.
    pub(crate) fn fill_layers(&mut self, chunk: &Chunk, bottom: i32, top: i32, name: &str) {
        for y in bottom..=top {
            self.fill_layer(chunk, y, name);
        }
    }

    pub(crate) fn put_section(&mut self, chunk: &Chunk, section: Section) {
        self.sections.insert((chunk.pos(), section.index()), section);
    }

    pub(crate) fn highest_read(&self) -> Option<i32> {
        self.highest_read.get()
    }
}

impl WorldStore for MemoryWorld {
    fn list_chunks(&self) -> Vec<Chunk> {
        self.chunks.clone()
    }

    fn section(&self, chunk: &Chunk, index: i32) -> Option<&Section> {
        self.sections.get(&(chunk.pos(), index))
    }

    fn block(&self, chunk: &Chunk, x: usize, y: i32, z: usize) -> Option<&Block> {
        let highest = self.highest_read.get().map_or(y, |h| h.max(y));
        self.highest_read.set(Some(highest));

        let index = y.div_euclid(SECTION_SIZE as i32);
        let local_y = y.rem_euclid(SECTION_SIZE as i32) as usize;
        match self.section(chunk, index) {
            Some(section) => section.block(x, local_y, z),
            None => Some(&*AIR_BLOCK),
        }
    }
}
