//! Build discovery and extraction over a voxel world save.
//!
//! The pipeline runs in four stages, each of which can abort the run:
//! 1. [`scanner::scan`] flags chunks holding non-natural blocks
//! 2. [`filler::fill`] adds every chunk inside the flagged footprint
//! 3. [`surface::detect_baseline`] finds the lowest surface y
//! 4. [`extractor::extract`] emits blocks layer by layer in build-local space

use std::time::Instant;

use log::info;
use world2vec_metrics::RunMetrics;

pub mod block;
pub mod config;
pub mod error;
pub mod extractor;
pub mod filler;
pub mod region;
pub mod registry;
pub mod scanner;
pub mod surface;
pub mod world;

#[cfg(test)]
mod testing;

pub use block::Block;
pub use config::ScanConfig;
pub use error::{ExtractError, Result};
pub use extractor::{LocalPos, Voxel};
pub use region::{BuildRegion, ChunkBounds};
pub use registry::NaturalBlockRegistry;
pub use world::{Chunk, Section, WorldStore};

/// Locate the build: scan pass followed by the bounding-box fill pass.
pub fn discover<W: WorldStore + ?Sized>(
    world: &W,
    registry: &NaturalBlockRegistry,
    config: &ScanConfig,
    metrics: Option<&RunMetrics>,
) -> Result<BuildRegion> {
    let chunks = world.list_chunks();
    info!("Searching {} chunks for a build...", chunks.len());
    if let Some(m) = metrics {
        m.record_listed(chunks.len());
    }

    let start = Instant::now();
    let region = scanner::scan(world, &chunks, registry, config, metrics)?;
    if let Some(m) = metrics {
        m.record_scan(start.elapsed());
    }

    let start = Instant::now();
    let region = filler::fill(&chunks, region, metrics);
    if let Some(m) = metrics {
        m.record_fill(start.elapsed());
    }

    let bounds = region.bounds();
    info!(
        "Build chunks found: {} chunks in x {}..={}, z {}..={}",
        region.len(),
        bounds.low_x,
        bounds.high_x,
        bounds.low_z,
        bounds.high_z
    );
    Ok(region)
}

/// Voxels of one build in build-local coordinates.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Global y mapped to local y = 0.
    pub baseline: i32,
    /// Chunk whose corner is local x = 0, z = 0.
    pub origin: Chunk,
    pub voxels: Vec<Voxel>,
}

/// Detect the surface baseline of `region` and extract its blocks.
pub fn extract_build<W: WorldStore + ?Sized>(
    world: &W,
    region: &BuildRegion,
    config: &ScanConfig,
    metrics: Option<&RunMetrics>,
) -> Result<Extraction> {
    let baseline = surface::detect_baseline(world, region.chunks(), region.superflat(), config, metrics)?;
    info!("Surface baseline at y={}", baseline);

    let origin = *region.origin();
    let start = Instant::now();
    let voxels = extractor::extract(world, region.chunks(), baseline, &origin, metrics);
    if let Some(m) = metrics {
        m.record_extract(start.elapsed());
    }
    info!("Extracted {} blocks", voxels.len());

    Ok(Extraction { baseline, origin, voxels })
}
