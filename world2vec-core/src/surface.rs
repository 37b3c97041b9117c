//! Surface baseline detection.
//!
//! Each chunk's surface section is the first section, searching upward,
//! holding at least `air_threshold` air blocks. Inside it, any block with
//! air directly above is a surface candidate. The lowest candidate over
//! all chunks becomes build-local y = 0.

use log::{debug, warn};
use world2vec_metrics::RunMetrics;

use crate::block::{AIR_BLOCK, Block};
use crate::config::ScanConfig;
use crate::error::{ExtractError, Result};
use crate::world::{Chunk, SECTION_SIZE, WorldStore};

/// Index of the chunk's surface section, if any section qualifies.
///
/// Superflat worlds start at the chunk's lowest terrain section: -4 for
/// modern saves, 0 for pre-flattening saves, which never store anything
/// below section 0.
pub fn surface_section<W: WorldStore + ?Sized>(
    world: &W,
    chunk: &Chunk,
    superflat: bool,
    config: &ScanConfig,
) -> Option<i32> {
    let start = if superflat { chunk.base_section() } else { 0 };
    let threshold = config.air_threshold;
    (start..=config.top_surface_section).find(|&index| {
        world
            .stream_blocks(chunk, index)
            .flatten()
            .filter(|block| block.is_air())
            .take(threshold)
            .count()
            == threshold
    })
}

/// Lowest global y in section `index` whose block has air above it.
pub fn lowest_surface_block<W: WorldStore + ?Sized>(world: &W, chunk: &Chunk, index: i32) -> Option<i32> {
    let section = world.section(chunk, index);
    let base_y = index * SECTION_SIZE as i32;
    for y in 0..SECTION_SIZE {
        let true_y = base_y + y as i32;
        for x in 0..SECTION_SIZE {
            for z in 0..SECTION_SIZE {
                let block = match section {
                    Some(section) => section.block(x, y, z),
                    None => Some(&*AIR_BLOCK),
                };
                if block.is_none() {
                    continue;
                }
                if world.block(chunk, x, true_y + 1, z).is_some_and(Block::is_air) {
                    return Some(true_y);
                }
            }
        }
    }
    None
}

pub fn detect_baseline<W: WorldStore + ?Sized>(
    world: &W,
    chunks: &[Chunk],
    superflat: bool,
    config: &ScanConfig,
    metrics: Option<&RunMetrics>,
) -> Result<i32> {
    let start = std::time::Instant::now();
    let mut any_section = false;
    let mut lowest: Option<i32> = None;

    for chunk in chunks {
        let Some(index) = surface_section(world, chunk, superflat, config) else {
            if config.strict_surface {
                return Err(ExtractError::NoSurfaceSection { chunk: Some(chunk.pos()) });
            }
            warn!("No surface section found in chunk ({}, {}), skipping it", chunk.x, chunk.z);
            continue;
        };
        any_section = true;

        if let Some(y) = lowest_surface_block(world, chunk, index) {
            debug!("Chunk ({}, {}) surface section {} lowest surface y {}", chunk.x, chunk.z, index, y);
            lowest = Some(lowest.map_or(y, |current| current.min(y)));
        }
    }

    if let Some(m) = metrics {
        m.record_surface(start.elapsed());
    }
    if !any_section {
        return Err(ExtractError::NoSurfaceSection { chunk: None });
    }
    lowest.ok_or(ExtractError::NoSurfaceBlock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryWorld;
    use crate::world::{SECTION_VOLUME, Section};

    const MODERN: Option<i32> = Some(3465);

    fn hills(world: &mut MemoryWorld, x: i32, z: i32, top: i32) -> Chunk {
        let chunk = world.add_chunk(x, z, MODERN);
        for index in 0..(top.div_euclid(16)) {
            world.put_section(&chunk, Section::uniform(index, Block::new("minecraft:stone")));
        }
        world.fill_layers(&chunk, top.div_euclid(16) * 16, top, "minecraft:stone");
        chunk
    }

    #[test]
    fn test_baseline_is_top_of_column() {
        let mut world = MemoryWorld::new();
        let chunk = hills(&mut world, 0, 0, 70);

        let config = ScanConfig::default();
        assert_eq!(surface_section(&world, &chunk, false, &config), Some(4));
        let baseline = detect_baseline(&world, &world.list_chunks(), false, &config, None).unwrap();
        assert_eq!(baseline, 70);
    }

    #[test]
    fn test_baseline_is_minimum_over_chunks() {
        let mut world = MemoryWorld::new();
        hills(&mut world, 0, 0, 75);
        hills(&mut world, 1, 0, 66);
        hills(&mut world, 2, 0, 72);

        let baseline = detect_baseline(&world, &world.list_chunks(), false, &ScanConfig::default(), None).unwrap();
        assert_eq!(baseline, 66);
    }

    #[test]
    fn test_zero_is_a_valid_baseline() {
        let mut world = MemoryWorld::new();
        let chunk = world.add_chunk(0, 0, MODERN);
        world.fill_layers(&chunk, -64, 0, "minecraft:stone");

        let baseline = detect_baseline(&world, &world.list_chunks(), true, &ScanConfig::default(), None).unwrap();
        assert_eq!(baseline, 0);
    }

    #[test]
    fn test_superflat_searches_from_section_minus_four() {
        let mut world = MemoryWorld::new();
        let chunk = world.add_chunk(0, 0, MODERN);
        world.fill_layer(&chunk, -64, "minecraft:bedrock");
        world.fill_layers(&chunk, -63, -62, "minecraft:dirt");
        world.fill_layer(&chunk, -61, "minecraft:grass_block");

        let config = ScanConfig::default();
        assert_eq!(surface_section(&world, &chunk, true, &config), Some(-4));
        assert_eq!(detect_baseline(&world, &[chunk], true, &config, None).unwrap(), -61);
    }

    #[test]
    fn test_legacy_superflat_skips_unstored_low_sections() {
        let mut world = MemoryWorld::new();
        let chunk = world.add_chunk(0, 0, None);
        world.fill_layer(&chunk, 0, "minecraft:bedrock");
        world.fill_layers(&chunk, 1, 2, "minecraft:dirt");
        world.fill_layer(&chunk, 3, "minecraft:grass_block");

        let config = ScanConfig::default();
        assert_eq!(surface_section(&world, &chunk, true, &config), Some(0));
        assert_eq!(detect_baseline(&world, &[chunk], true, &config, None).unwrap(), 3);
    }

    #[test]
    fn test_no_surface_section() {
        let mut world = MemoryWorld::new();
        let chunk = world.add_chunk(0, 0, MODERN);
        for index in 0..=9 {
            world.put_section(&chunk, Section::uniform(index, Block::new("minecraft:stone")));
        }

        let err = detect_baseline(&world, &[chunk], false, &ScanConfig::default(), None).unwrap_err();
        assert!(matches!(err, ExtractError::NoSurfaceSection { chunk: None }));
    }

    #[test]
    fn test_strict_surface_names_the_chunk() {
        let mut world = MemoryWorld::new();
        hills(&mut world, 0, 0, 70);
        let solid = world.add_chunk(1, 0, MODERN);
        for index in 0..=9 {
            world.put_section(&solid, Section::uniform(index, Block::new("minecraft:stone")));
        }
        let chunks = world.list_chunks();

        let lenient = detect_baseline(&world, &chunks, false, &ScanConfig::default(), None);
        assert_eq!(lenient.unwrap(), 70);

        let strict = ScanConfig { strict_surface: true, ..ScanConfig::default() };
        let err = detect_baseline(&world, &chunks, false, &strict, None).unwrap_err();
        assert!(matches!(err, ExtractError::NoSurfaceSection { chunk: Some((1, 0)) }));
        assert_eq!(err.to_string(), "no surface section found in chunk 1 0");
    }

    #[test]
    fn test_no_surface_block() {
        // Air-heavy section whose every block is unconvertible or capped by
        // an unconvertible block above.
        let mut world = MemoryWorld::new();
        let chunk = world.add_chunk(0, 0, MODERN);
        let mut states = vec![0u16; SECTION_VOLUME];
        for y in (1..16).step_by(2) {
            for x in 0..16 {
                for z in 0..16 {
                    states[Section::offset(x, y, z)] = 1;
                }
            }
        }
        let section = Section::new(0, vec![None, Some(AIR_BLOCK.clone())], states);
        world.put_section(&chunk, section);
        world.put_section(&chunk, Section::new(1, vec![None], vec![0; SECTION_VOLUME]));

        let config = ScanConfig::default();
        assert_eq!(surface_section(&world, &chunk, false, &config), Some(0));
        let err = detect_baseline(&world, &[chunk], false, &config, None).unwrap_err();
        assert!(matches!(err, ExtractError::NoSurfaceBlock));
    }
}
