//! Read-only world store over a directory of region files.
//!
//! Opening the world reads each region file once to index its chunks:
//! position, data version and sector location. Block data is decoded
//! only when a chunk's sections are first requested, by re-reading that
//! chunk's sectors from its region file. Chunks the passes never touch
//! are never decoded.

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::{debug, info, warn};
use world2vec_core::{Chunk, Section, WorldStore};

use crate::chunk::decode_chunk;
use crate::compression::decompress;
use crate::error::{AnvilError, Result};
use crate::nbt::{ChunkHeaderNbt, ChunkNbt};
use crate::region::{HEADER_SIZE, Location, RawChunk, RegionFile, RegionPos, SECTOR_SIZE};

/// Where a chunk lives on disk, plus its sections once decoded.
#[derive(Debug)]
struct ChunkSlot {
    file: usize,
    region: RegionPos,
    local: (i32, i32),
    location: Location,
    sections: OnceLock<BTreeMap<i32, Section>>,
}

/// Chunk index of a world save with lazily decoded block data.
#[derive(Debug, Default)]
pub struct AnvilWorld {
    files: Vec<PathBuf>,
    order: Vec<Chunk>,
    slots: HashMap<(i32, i32), ChunkSlot>,
}

impl AnvilWorld {
    /// Index all `r.<x>.<z>.mca` files in `dir`, in file-name order.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut files: Vec<(String, RegionPos, PathBuf)> = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| AnvilError::io(dir, e))? {
            let entry = entry.map_err(|e| AnvilError::io(dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            match RegionPos::from_filename(&name) {
                Some(pos) => files.push((name, pos, entry.path())),
                None => debug!("Ignoring non-region file {}", name),
            }
        }
        files.sort_by(|a, b| a.0.cmp(&b.0));

        let mut world = Self::default();
        for (name, pos, path) in files {
            let data = fs::read(&path).map_err(|e| AnvilError::io(&path, e))?;
            if data.len() < HEADER_SIZE {
                warn!("Skipping {}: {} bytes is shorter than the region header", name, data.len());
                continue;
            }
            let region = RegionFile::parse(pos, &data)?;
            if region.is_empty() {
                debug!("Skipping empty region {}", name);
                continue;
            }
            world.files.push(path);
            let before = world.order.len();
            world.index_region(&region);
            debug!("Indexed {} chunks from {}", world.order.len() - before, name);
        }

        info!("Opened world {} with {} chunks", dir.display(), world.order.len());
        Ok(world)
    }

    fn index_region(&mut self, region: &RegionFile<'_>) {
        for raw in region.chunks() {
            if let Err(e) = raw.and_then(|raw| self.index_chunk(region.pos(), raw)) {
                warn!("Skipping chunk in {}: {}", region.pos().filename(), e);
            }
        }
    }

    fn index_chunk(&mut self, region: RegionPos, raw: RawChunk<'_>) -> Result<()> {
        let world_pos = region.local_to_world(raw.local_x, raw.local_z);
        let bytes = decompress_chunk(world_pos, raw)?;
        let header: ChunkHeaderNbt = fastnbt::from_bytes(&bytes)?;
        let (x, z) = header.stored_pos().unwrap_or(world_pos);

        if self.slots.contains_key(&(x, z)) {
            warn!("Chunk ({}, {}) stored twice, keeping the first copy", x, z);
            return Ok(());
        }
        self.slots.insert(
            (x, z),
            ChunkSlot {
                file: self.files.len() - 1,
                region,
                local: (raw.local_x, raw.local_z),
                location: raw.location,
                sections: OnceLock::new(),
            },
        );
        self.order.push(Chunk::new(x, z, header.data_version));
        Ok(())
    }

    /// Re-read one chunk's sectors and decode its sections.
    fn load_sections(&self, slot: &ChunkSlot) -> Result<BTreeMap<i32, Section>> {
        let path = &self.files[slot.file];
        let mut file = File::open(path).map_err(|e| AnvilError::io(path, e))?;
        file.seek(SeekFrom::Start(slot.location.byte_offset() as u64))
            .map_err(|e| AnvilError::io(path, e))?;
        let mut bytes = Vec::with_capacity(slot.location.count as usize * SECTOR_SIZE);
        file.take((slot.location.count as usize * SECTOR_SIZE) as u64)
            .read_to_end(&mut bytes)
            .map_err(|e| AnvilError::io(path, e))?;

        let (local_x, local_z) = slot.local;
        let world_pos = slot.region.local_to_world(local_x, local_z);
        let raw = RawChunk::parse(slot.local, slot.location, world_pos, &bytes)?;
        let nbt: ChunkNbt = fastnbt::from_bytes(&decompress_chunk(world_pos, raw)?)?;
        let decoded = decode_chunk(&nbt, world_pos);
        Ok(decoded.sections.into_iter().map(|s| (s.index(), s)).collect())
    }

    fn sections<'a>(&self, slot: &'a ChunkSlot) -> &'a BTreeMap<i32, Section> {
        slot.sections.get_or_init(|| {
            self.load_sections(slot).unwrap_or_else(|e| {
                warn!("Chunk data unreadable, treating it as air: {}", e);
                BTreeMap::new()
            })
        })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Chunks whose block data has been decoded so far.
    pub fn decoded_chunks(&self) -> usize {
        self.slots.values().filter(|slot| slot.sections.get().is_some()).count()
    }
}

fn decompress_chunk((x, z): (i32, i32), raw: RawChunk<'_>) -> Result<Vec<u8>> {
    decompress(raw.data, raw.compression).map_err(|e| AnvilError::CorruptChunk {
        x,
        z,
        reason: e.to_string(),
    })
}

impl WorldStore for AnvilWorld {
    fn list_chunks(&self) -> Vec<Chunk> {
        self.order.clone()
    }

    fn section(&self, chunk: &Chunk, index: i32) -> Option<&Section> {
        let slot = self.slots.get(&chunk.pos())?;
        self.sections(slot).get(&index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ChunkBuilder;
    use crate::compression::CompressionType;
    use crate::region::RegionWriter;
    use world2vec_core::{Block, NaturalBlockRegistry, ScanConfig, discover, extract_build};

    fn write_region(dir: &Path, pos: RegionPos, writer: RegionWriter) {
        writer.write(dir.join(pos.filename())).unwrap();
    }

    #[test]
    fn test_open_reads_chunks_in_file_order() {
        let dir = tempfile::tempdir().unwrap();

        let mut west = RegionWriter::new();
        let mut builder = ChunkBuilder::new();
        builder.fill_layer(-64, "minecraft:bedrock");
        west.insert(31, 0, &builder.build(-1, 0)).unwrap();
        write_region(dir.path(), RegionPos::new(-1, 0), west);

        let mut east = RegionWriter::new().with_compression(CompressionType::Lz4);
        for (lx, lz) in [(0, 1), (1, 0), (0, 0)] {
            let mut builder = ChunkBuilder::new();
            builder.set_block(lx as u8, 70, lz as u8, Block::new("minecraft:glass"));
            east.insert(lx, lz, &builder.build(lx, lz)).unwrap();
        }
        write_region(dir.path(), RegionPos::new(0, 0), east);

        fs::write(dir.path().join("r.5.5.mca"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"hello").unwrap();

        let world = AnvilWorld::open(dir.path()).unwrap();
        let order: Vec<_> = world.list_chunks().iter().map(Chunk::pos).collect();
        // "r.-1.0.mca" sorts before "r.0.0.mca"; local x outer, z inner.
        assert_eq!(order, vec![(-1, 0), (0, 0), (0, 1), (1, 0)]);

        let chunk = Chunk::new(1, 0, Some(3465));
        assert_eq!(world.block(&chunk, 1, 70, 0).unwrap().name, "minecraft:glass");
        let bedrock = Chunk::new(-1, 0, Some(3465));
        assert_eq!(world.block(&bedrock, 9, -64, 9).unwrap().name, "minecraft:bedrock");
        assert!(world.block(&bedrock, 9, 100, 9).unwrap().is_air());
    }

    #[test]
    fn test_block_data_is_decoded_on_demand() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RegionWriter::new();
        for lx in 0..3 {
            let mut builder = ChunkBuilder::new();
            builder.fill_layer(10, "minecraft:sandstone");
            writer.insert(lx, 0, &builder.build(lx, 0)).unwrap();
        }
        write_region(dir.path(), RegionPos::new(0, 0), writer);

        let world = AnvilWorld::open(dir.path()).unwrap();
        assert_eq!(world.len(), 3);
        assert_eq!(world.decoded_chunks(), 0);

        let middle = Chunk::new(1, 0, Some(3465));
        assert_eq!(world.block(&middle, 5, 10, 5).unwrap().name, "minecraft:sandstone");
        assert!(world.block(&middle, 5, 11, 5).unwrap().is_air());
        assert_eq!(world.decoded_chunks(), 1);
    }

    #[test]
    fn test_corrupt_chunk_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RegionWriter::new();
        writer.insert(0, 0, &ChunkBuilder::new().build(0, 0)).unwrap();
        writer.insert(0, 1, &ChunkBuilder::new().build(0, 1)).unwrap();
        let mut bytes = writer.to_bytes().unwrap();
        // Garble the zlib header of the first chunk (sector 2).
        for b in &mut bytes[HEADER_SIZE + 5..HEADER_SIZE + 8] {
            *b = 0xAA;
        }
        fs::write(dir.path().join("r.0.0.mca"), bytes).unwrap();

        let world = AnvilWorld::open(dir.path()).unwrap();
        let order: Vec<_> = world.list_chunks().iter().map(Chunk::pos).collect();
        assert_eq!(order, vec![(0, 1)]);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AnvilWorld::open(dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, AnvilError::Io { .. }));
    }

    #[test]
    fn test_pipeline_over_region_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RegionWriter::new();
        for x in 0..4 {
            for z in 0..4 {
                let mut builder = ChunkBuilder::new();
                for y in -64..=65 {
                    builder.fill_layer(y, "minecraft:stone");
                }
                builder.fill_layer(66, "minecraft:grass_block");
                if (x, z) == (2, 1) {
                    for y in 67..=68 {
                        builder.set_block(4, y, 4, Block::new("minecraft:cobblestone_wall"));
                    }
                    builder.set_block(
                        4,
                        69,
                        4,
                        Block::new("minecraft:lantern").with_property("hanging", "false"),
                    );
                }
                writer.insert(x, z, &builder.build(x, z)).unwrap();
            }
        }
        write_region(dir.path(), RegionPos::new(0, 0), writer);

        let world = AnvilWorld::open(dir.path()).unwrap();
        let registry =
            NaturalBlockRegistry::from_names(["minecraft:air", "minecraft:stone", "minecraft:grass_block"]);
        let config = ScanConfig::default();

        let region = discover(&world, &registry, &config, None).unwrap();
        assert_eq!(region.chunks().iter().map(Chunk::pos).collect::<Vec<_>>(), vec![(2, 1)]);
        assert!(!region.superflat());

        let extraction = extract_build(&world, &region, &config, None).unwrap();
        assert_eq!(extraction.baseline, 66);
        let column: Vec<_> = extraction
            .voxels
            .iter()
            .filter(|v| (v.pos.x, v.pos.z) == (4, 4))
            .map(|v| (v.pos.y, v.block.as_str()))
            .collect();
        assert_eq!(
            column,
            vec![
                (0, "minecraft:grass_block"),
                (1, "minecraft:cobblestone_wall"),
                (2, "minecraft:cobblestone_wall"),
                (3, "minecraft:lantern[hanging=false]"),
            ]
        );
    }
}
