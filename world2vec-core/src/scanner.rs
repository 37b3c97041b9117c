//! First discovery pass: find the chunks holding built blocks.
//!
//! Chunks are visited in storage order. Once a build chunk ("anchor") is
//! known, chunks far from it are rejected without reading their blocks.
//! The rejection radius grows every time the build turns out to reach
//! further than expected.

use std::ops::RangeInclusive;

use log::{debug, info};
use world2vec_metrics::RunMetrics;

use crate::block::GRASS_BLOCK;
use crate::config::ScanConfig;
use crate::error::{ExtractError, Result};
use crate::region::BuildRegion;
use crate::registry::NaturalBlockRegistry;
use crate::world::{Chunk, WorldStore};

/// Look for grass in the probe chunk's base section.
///
/// Best effort: decided once from the first listed chunk.
pub fn detect_superflat<W: WorldStore + ?Sized>(world: &W, probe: Option<&Chunk>) -> bool {
    let Some(chunk) = probe else {
        return false;
    };
    world
        .stream_blocks(chunk, chunk.base_section())
        .flatten()
        .any(|block| block.name == GRASS_BLOCK)
}

/// Sections that may hold the bottom of a build.
pub fn search_sections(chunk: &Chunk, superflat: bool) -> RangeInclusive<i32> {
    match (superflat, chunk.is_modern()) {
        (false, _) => 3..=9,
        (true, true) => -4..=3,
        (true, false) => 0..=7,
    }
}

/// Skip-rule accumulator threaded through the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanState {
    pub last_anchor: Option<(i32, i32)>,
    pub x_radius: i32,
    pub z_radius: i32,
}

impl ScanState {
    pub fn new(initial_radius: i32) -> Self {
        Self {
            last_anchor: None,
            x_radius: initial_radius,
            z_radius: initial_radius,
        }
    }

    /// A chunk is only rejected when it is far away on both axes.
    pub fn should_skip(&self, chunk: &Chunk) -> bool {
        match self.last_anchor {
            Some((x, z)) => (chunk.x - x).abs() >= self.x_radius && (chunk.z - z).abs() >= self.z_radius,
            None => false,
        }
    }

    /// State after `chunk` became an anchor. Radii only ever grow.
    pub fn with_anchor(self, chunk: &Chunk) -> Self {
        let (x_radius, z_radius) = match self.last_anchor {
            Some((x, z)) => (
                self.x_radius + (chunk.x - x).abs(),
                self.z_radius + (chunk.z - z).abs(),
            ),
            None => (self.x_radius, self.z_radius),
        };
        Self {
            last_anchor: Some(chunk.pos()),
            x_radius,
            z_radius,
        }
    }
}

/// True as soon as any non-natural block turns up in the search sections.
fn holds_built_block<W: WorldStore + ?Sized>(
    world: &W,
    chunk: &Chunk,
    sections: RangeInclusive<i32>,
    registry: &NaturalBlockRegistry,
) -> bool {
    sections.into_iter().any(|index| {
        world
            .stream_blocks(chunk, index)
            .flatten()
            .any(|block| !registry.contains(&block.name))
    })
}

pub fn scan<W: WorldStore + ?Sized>(
    world: &W,
    chunks: &[Chunk],
    registry: &NaturalBlockRegistry,
    config: &ScanConfig,
    metrics: Option<&RunMetrics>,
) -> Result<BuildRegion> {
    let superflat = detect_superflat(world, chunks.first());
    if superflat {
        info!("Superflat world detected");
    }

    let mut state = ScanState::new(config.initial_radius);
    let mut region: Option<BuildRegion> = None;

    for chunk in chunks {
        if state.should_skip(chunk) {
            if let Some(m) = metrics {
                m.record_skipped();
            }
            continue;
        }
        if let Some(m) = metrics {
            m.record_inspected();
        }

        if !holds_built_block(world, chunk, search_sections(chunk, superflat), registry) {
            continue;
        }

        state = state.with_anchor(chunk);
        match region.as_mut() {
            Some(region) => {
                region.add_anchor(*chunk);
            }
            None => region = Some(BuildRegion::new(*chunk, superflat)),
        }
        if let Some(m) = metrics {
            m.record_anchor();
        }
        debug!(
            "Anchor chunk ({}, {}), radius now ({}, {})",
            chunk.x, chunk.z, state.x_radius, state.z_radius
        );
    }

    region.ok_or(ExtractError::BuildNotFound)
}
