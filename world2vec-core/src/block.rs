//! Block values as seen by the discovery and extraction passes.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Canonical name of the air block.
pub const AIR: &str = "minecraft:air";

/// Probe block used to recognise superflat worlds.
pub const GRASS_BLOCK: &str = "minecraft:grass_block";

/// Shared air value handed out for sections missing from storage.
pub static AIR_BLOCK: LazyLock<Block> = LazyLock::new(|| Block::new(AIR));

/// A single voxel: canonical name plus block-state properties.
///
/// Properties are kept in a `BTreeMap` so iteration is always in
/// lexicographic key order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Block {
    pub name: String,
    pub properties: BTreeMap<String, String>,
}

impl Block {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    #[inline]
    pub fn is_air(&self) -> bool {
        self.name == AIR
    }

    /// Name with the property list appended, e.g.
    /// `minecraft:oak_stairs[facing=east,half=bottom]`.
    /// Blocks without properties produce the bare name.
    pub fn state_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.properties.is_empty() {
            return Ok(());
        }
        f.write_str("[")?;
        for (i, (key, value)) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key}={value}")?;
        }
        f.write_str("]")
    }
}
