use std::path::PathBuf;

use thiserror::Error;

/// Failures of the discovery and extraction pipeline.
///
/// Every variant is fatal to the current run; nothing is retried and no
/// partial output is produced.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("could not load natural block list from {}: {source}", .path.display())]
    RegistryLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("build could not be found in region files")]
    BuildNotFound,

    #[error("{}", no_surface_section_message(.chunk))]
    NoSurfaceSection { chunk: Option<(i32, i32)> },

    #[error("no surface block found in chunks")]
    NoSurfaceBlock,
}

fn no_surface_section_message(chunk: &Option<(i32, i32)>) -> String {
    match *chunk {
        Some((x, z)) => format!("no surface section found in chunk {x} {z}"),
        None => "no surface section found in any chunk".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
