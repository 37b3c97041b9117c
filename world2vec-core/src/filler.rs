//! Second discovery pass: fill the anchor footprint.
//!
//! Anchors are flagged on the first built block seen, so chunks inside
//! the build that look natural (a dirt floor, a courtyard) are missed by
//! the scan. Everything inside the bounding box is taken regardless of
//! content.

use log::debug;
use world2vec_metrics::RunMetrics;

use crate::region::BuildRegion;
use crate::world::Chunk;

pub fn fill(chunks: &[Chunk], mut region: BuildRegion, metrics: Option<&RunMetrics>) -> BuildRegion {
    let bounds = region.bounds();
    for chunk in chunks {
        if !bounds.contains(chunk.x, chunk.z) || !region.insert(*chunk) {
            continue;
        }
        debug!("Filled chunk ({}, {})", chunk.x, chunk.z);
        if let Some(m) = metrics {
            m.record_filled();
        }
    }
    region
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use crate::config::ScanConfig;
    use crate::registry::NaturalBlockRegistry;
    use crate::scanner::scan;
    use crate::testing::MemoryWorld;
    use crate::world::WorldStore;

    #[test]
    fn test_fill_adds_natural_interior() {
        let mut world = MemoryWorld::new();
        for x in -1..=3 {
            for z in -1..=3 {
                let chunk = world.add_chunk(x, z, Some(3465));
                world.fill_layers(&chunk, 48, 63, "minecraft:stone");
                let on_ring = (0..=2).contains(&x) && (0..=2).contains(&z) && (x, z) != (1, 1);
                if on_ring {
                    world.set_block(&chunk, 8, 64, 8, Block::new("minecraft:stone_bricks"));
                }
            }
        }
        let registry = NaturalBlockRegistry::from_names(["minecraft:air", "minecraft:stone"]);
        let chunks = world.list_chunks();

        let region = scan(&world, &chunks, &registry, &ScanConfig::default(), None).unwrap();
        assert_eq!(region.len(), 8);
        assert!(!region.contains(1, 1));

        let metrics = RunMetrics::new(String::new());
        let region = fill(&chunks, region, Some(&metrics));
        assert_eq!(region.len(), 9);
        assert_eq!(region.len(), region.bounds().area());
        assert!(region.contains(1, 1));
        assert!(!region.contains(-1, 0));
        assert!(!region.contains(3, 3));
        assert_eq!(metrics.total_filled_chunks.load(std::sync::atomic::Ordering::Relaxed), 1);
    }

    #[test]
    fn test_fill_keeps_anchor_order_and_origin() {
        let anchor = Chunk::new(4, 4, Some(3465));
        let mut region = BuildRegion::new(anchor, false);
        region.add_anchor(Chunk::new(5, 5, Some(3465)));

        let chunks: Vec<_> = [(4, 4), (4, 5), (5, 4), (5, 5), (6, 6)]
            .into_iter()
            .map(|(x, z)| Chunk::new(x, z, Some(3465)))
            .collect();
        let region = fill(&chunks, region, None);

        let order: Vec<_> = region.chunks().iter().map(Chunk::pos).collect();
        assert_eq!(order, vec![(4, 4), (5, 5), (4, 5), (5, 4)]);
        assert_eq!(region.origin().pos(), (4, 4));
    }
}
