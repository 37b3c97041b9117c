//! Anvil save-format support.
//!
//! Reads a directory of `.mca` region files into an [`AnvilWorld`] that
//! implements [`world2vec_core::WorldStore`], and writes synthetic region
//! files through [`ChunkBuilder`] and [`region::RegionWriter`].

pub mod builder;
pub mod chunk;
pub mod compression;
pub mod error;
pub mod legacy;
pub mod nbt;
pub mod palette;
pub mod region;
pub mod world;

pub use builder::ChunkBuilder;
pub use compression::CompressionType;
pub use error::{AnvilError, Result};
pub use world::AnvilWorld;
