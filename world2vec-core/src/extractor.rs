//! Layer-by-layer voxel extraction into build-local coordinates.

use log::debug;
use world2vec_metrics::RunMetrics;

use crate::world::{Chunk, SECTION_SIZE, WorldStore};

/// Build-local position. `y` is relative to the surface baseline and
/// never negative; `x`/`z` are relative to the origin chunk's corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl LocalPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl From<LocalPos> for (i32, i32, i32) {
    fn from(pos: LocalPos) -> Self {
        (pos.x, pos.y, pos.z)
    }
}

/// One extracted block, named with its sorted property list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voxel {
    pub pos: LocalPos,
    pub block: String,
}

/// Emit every non-air block from `lowest_surface_y` upward until a layer
/// comes up empty across all chunks. The empty layer is not emitted.
pub fn extract<W: WorldStore + ?Sized>(
    world: &W,
    chunks: &[Chunk],
    lowest_surface_y: i32,
    origin: &Chunk,
    metrics: Option<&RunMetrics>,
) -> Vec<Voxel> {
    let mut voxels = Vec::new();
    let mut current_y = lowest_surface_y;

    loop {
        let layer_start = voxels.len();
        for chunk in chunks {
            let base_x = (chunk.x - origin.x) * SECTION_SIZE as i32;
            let base_z = (chunk.z - origin.z) * SECTION_SIZE as i32;
            for x in 0..SECTION_SIZE {
                for z in 0..SECTION_SIZE {
                    let Some(block) = world.block(chunk, x, current_y, z) else {
                        continue;
                    };
                    if block.is_air() {
                        continue;
                    }
                    voxels.push(Voxel {
                        pos: LocalPos::new(base_x + x as i32, current_y - lowest_surface_y, base_z + z as i32),
                        block: block.state_string(),
                    });
                }
            }
        }

        let emitted = voxels.len() - layer_start;
        if emitted == 0 {
            debug!("Layer y={} is empty, extraction finished", current_y);
            break;
        }
        if let Some(m) = metrics {
            m.record_layer(emitted);
        }
        match current_y.checked_add(1) {
            Some(next) => current_y = next,
            None => break,
        }
    }

    voxels
}
