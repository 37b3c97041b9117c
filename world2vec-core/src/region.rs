//! The set of chunks that make up a build.

use std::collections::HashSet;

use crate::world::Chunk;

/// Inclusive chunk-coordinate rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkBounds {
    pub low_x: i32,
    pub high_x: i32,
    pub low_z: i32,
    pub high_z: i32,
}

impl ChunkBounds {
    /// Bounds collapsed onto a single chunk.
    pub fn at(x: i32, z: i32) -> Self {
        Self {
            low_x: x,
            high_x: x,
            low_z: z,
            high_z: z,
        }
    }

    pub fn include(&mut self, x: i32, z: i32) {
        self.low_x = self.low_x.min(x);
        self.high_x = self.high_x.max(x);
        self.low_z = self.low_z.min(z);
        self.high_z = self.high_z.max(z);
    }

    #[inline]
    pub fn contains(&self, x: i32, z: i32) -> bool {
        (self.low_x..=self.high_x).contains(&x) && (self.low_z..=self.high_z).contains(&z)
    }

    /// Number of chunk positions covered.
    pub fn area(&self) -> usize {
        let width = (self.high_x - self.low_x + 1) as usize;
        let depth = (self.high_z - self.low_z + 1) as usize;
        width * depth
    }
}

/// Result of discovery: flagged chunks, their footprint and the world kind.
///
/// A region always holds at least one chunk. The first chunk is the
/// first anchor found and serves as the build-local origin.
#[derive(Debug, Clone)]
pub struct BuildRegion {
    chunks: Vec<Chunk>,
    members: HashSet<(i32, i32)>,
    bounds: ChunkBounds,
    superflat: bool,
}

impl BuildRegion {
    pub fn new(anchor: Chunk, superflat: bool) -> Self {
        Self {
            chunks: vec![anchor],
            members: HashSet::from([anchor.pos()]),
            bounds: ChunkBounds::at(anchor.x, anchor.z),
            superflat,
        }
    }

    /// Add an anchor chunk and grow the bounds around it.
    pub fn add_anchor(&mut self, chunk: Chunk) -> bool {
        self.bounds.include(chunk.x, chunk.z);
        self.insert(chunk)
    }

    /// Add a chunk without touching the bounds. Returns false if a chunk at
    /// the same coordinates is already present.
    pub fn insert(&mut self, chunk: Chunk) -> bool {
        if !self.members.insert(chunk.pos()) {
            return false;
        }
        self.chunks.push(chunk);
        true
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn origin(&self) -> &Chunk {
        &self.chunks[0]
    }

    pub fn contains(&self, x: i32, z: i32) -> bool {
        self.members.contains(&(x, z))
    }

    pub fn bounds(&self) -> ChunkBounds {
        self.bounds
    }

    pub fn superflat(&self) -> bool {
        self.superflat
    }

    /// Never zero: construction requires an anchor.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }
}
