//! Allow-list of naturally generated block names.

use std::collections::HashSet;
use std::path::Path;

use log::{debug, warn};

use crate::error::{ExtractError, Result};

/// Block names considered part of unmodified terrain.
#[derive(Debug, Clone, Default)]
pub struct NaturalBlockRegistry {
    names: HashSet<String>,
}

impl NaturalBlockRegistry {
    /// Load a newline-delimited list of block names.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ExtractError::RegistryLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::parse(&text);
        if registry.is_empty() {
            warn!("Natural block list {} is empty; every block will count as built", path.display());
        }
        debug!("Loaded {} natural block names from {}", registry.len(), path.display());
        Ok(registry)
    }

    /// One name per line; blank lines are ignored.
    pub fn parse(text: &str) -> Self {
        Self::from_names(text.lines().map(str::trim).filter(|line| !line.is_empty()))
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_trims_and_skips_blank_lines() {
        let registry = NaturalBlockRegistry::parse("minecraft:stone\r\n\n  minecraft:dirt  \nminecraft:air\n");
        assert_eq!(registry.len(), 3);
        assert!(registry.contains("minecraft:stone"));
        assert!(registry.contains("minecraft:dirt"));
        assert!(!registry.contains("minecraft:oak_planks"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "minecraft:grass_block").unwrap();
        writeln!(file, "minecraft:water").unwrap();

        let registry = NaturalBlockRegistry::load(file.path()).unwrap();
        assert!(registry.contains("minecraft:water"));
        assert!(!registry.contains("minecraft:glass"));
    }

    #[test]
    fn test_missing_file_is_registry_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = NaturalBlockRegistry::load(dir.path().join("natural_blocks.txt")).unwrap_err();
        assert!(matches!(err, ExtractError::RegistryLoad { .. }));
        assert!(err.to_string().contains("natural_blocks.txt"));
    }
}
