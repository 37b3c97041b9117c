//! Tunables of the discovery heuristics.

/// Knobs for the scanner and surface detector.
///
/// The defaults are the values the heuristics were calibrated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Starting skip radius, in chunks, on both axes.
    pub initial_radius: i32,
    /// Air blocks a section must contain to count as the surface section.
    pub air_threshold: usize,
    /// Highest section index searched for the surface.
    pub top_surface_section: i32,
    /// Abort on the first chunk without a surface section instead of
    /// skipping it.
    pub strict_surface: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            initial_radius: 3,
            air_threshold: 1024,
            top_surface_section: 9,
            strict_surface: false,
        }
    }
}
