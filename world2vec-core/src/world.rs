//! World access seam.
//!
//! Discovery and extraction only ever talk to a [`WorldStore`]; the
//! save-format parser lives elsewhere and hands out plain [`Chunk`] and
//! [`Section`] values.

use crate::block::{AIR_BLOCK, Block};

/// Blocks per section edge.
pub const SECTION_SIZE: usize = 16;

/// Blocks per section (16x16x16).
pub const SECTION_VOLUME: usize = SECTION_SIZE * SECTION_SIZE * SECTION_SIZE;

/// Last data version of the pre-flattening format (17w47a).
/// Chunks tagged with a newer version start their terrain at section -4.
pub const FLATTENING_DATA_VERSION: i32 = 1451;

/// A chunk column in the world-wide chunk grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chunk {
    pub x: i32,
    pub z: i32,
    /// `DataVersion` tag, absent in very old saves.
    pub version: Option<i32>,
}

impl Chunk {
    pub fn new(x: i32, z: i32, version: Option<i32>) -> Self {
        Self { x, z, version }
    }

    #[inline]
    pub fn pos(&self) -> (i32, i32) {
        (self.x, self.z)
    }

    /// True for saves newer than the flattening cut-off.
    #[inline]
    pub fn is_modern(&self) -> bool {
        self.version.is_some_and(|v| v > FLATTENING_DATA_VERSION)
    }

    /// Section nearest the recorded surface baseline: 0, or -4 for modern saves.
    #[inline]
    pub fn base_section(&self) -> i32 {
        if self.is_modern() { -4 } else { 0 }
    }
}

/// One 16x16x16 slab of a chunk.
///
/// Blocks are stored paletted. A palette entry of `None` marks a stored
/// value that could not be converted into a modern block; lookups of such
/// voxels yield `None` and every pass ignores them.
#[derive(Debug, Clone)]
pub struct Section {
    index: i32,
    palette: Vec<Option<Block>>,
    // YZX order: (y * 16 + z) * 16 + x
    states: Vec<u16>,
}

impl Section {
    pub fn new(index: i32, palette: Vec<Option<Block>>, mut states: Vec<u16>) -> Self {
        states.resize(SECTION_VOLUME, 0);
        Self { index, palette, states }
    }

    /// Section made of a single block.
    pub fn uniform(index: i32, block: Block) -> Self {
        Self::new(index, vec![Some(block)], vec![0; SECTION_VOLUME])
    }

    #[inline]
    pub fn index(&self) -> i32 {
        self.index
    }

    /// Lowest global y covered by this section.
    #[inline]
    pub fn base_y(&self) -> i32 {
        self.index * SECTION_SIZE as i32
    }

    #[inline]
    pub fn offset(x: usize, y: usize, z: usize) -> usize {
        (y * SECTION_SIZE + z) * SECTION_SIZE + x
    }

    /// Block at section-relative coordinates (each 0..16).
    pub fn block(&self, x: usize, y: usize, z: usize) -> Option<&Block> {
        let state = *self.states.get(Self::offset(x, y, z))?;
        self.palette.get(state as usize)?.as_ref()
    }

    /// Replace the block at section-relative coordinates.
    pub fn set_block(&mut self, x: usize, y: usize, z: usize, block: Block) {
        let state = match self.palette.iter().position(|b| b.as_ref() == Some(&block)) {
            Some(i) => i,
            None => {
                self.palette.push(Some(block));
                self.palette.len() - 1
            }
        };
        self.states[Self::offset(x, y, z)] = state as u16;
    }

    /// All 4096 blocks in storage order.
    pub fn blocks(&self) -> impl Iterator<Item = Option<&Block>> + '_ {
        self.states
            .iter()
            .map(|&state| self.palette.get(state as usize).and_then(Option::as_ref))
    }
}

/// Boxed stream of a section's blocks.
pub type BlockStream<'a> = Box<dyn Iterator<Item = Option<&'a Block>> + 'a>;

/// Read-only access to a world save.
///
/// Implementors supply chunk listing and section lookup; block streaming
/// and global-y block lookup are derived from those. A section that is not
/// stored reads as solid air.
pub trait WorldStore {
    /// Every stored chunk, in storage order.
    fn list_chunks(&self) -> Vec<Chunk>;

    /// Section `index` of `chunk`, if stored.
    fn section(&self, chunk: &Chunk, index: i32) -> Option<&Section>;

    /// The 4096 blocks of section `index`.
    fn stream_blocks<'a>(&'a self, chunk: &Chunk, index: i32) -> BlockStream<'a> {
        match self.section(chunk, index) {
            Some(section) => Box::new(section.blocks()),
            None => Box::new(std::iter::repeat_n(Some(&*AIR_BLOCK), SECTION_VOLUME)),
        }
    }

    /// Block at in-chunk `x`/`z` (0..16) and global `y`.
    fn block(&self, chunk: &Chunk, x: usize, y: i32, z: usize) -> Option<&Block> {
        let index = y.div_euclid(SECTION_SIZE as i32);
        let local_y = y.rem_euclid(SECTION_SIZE as i32) as usize;
        match self.section(chunk, index) {
            Some(section) => section.block(x, local_y, z),
            None => Some(&*AIR_BLOCK),
        }
    }
}
