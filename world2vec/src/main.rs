use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};

use world2vec_anvil::AnvilWorld;
use world2vec_core::{NaturalBlockRegistry, ScanConfig, discover, extract_build};
use world2vec_metrics::RunMetrics;
use world2vec_schematic::sponge::DEFAULT_DATA_VERSION;
use world2vec_schematic::{SchematicWriter, SpongeSchematic};

#[derive(Parser, Debug)]
#[command(name = "world2vec", about = "Find the player build in a Minecraft world and export it as a schematic")]
pub struct Args {
    /// Directory holding the world's r.<x>.<z>.mca region files
    #[arg(short, long, env = "WORLD2VEC_WORLD")]
    pub world: PathBuf,

    /// Newline-delimited list of naturally generated block names
    #[arg(short, long, env = "WORLD2VEC_NATURAL_BLOCKS", default_value = "natural_blocks.txt")]
    pub natural_blocks: PathBuf,

    /// Build number used to name the output file
    #[arg(short, long, env = "WORLD2VEC_BUILD_NO", default_value_t = 0)]
    pub build_no: u32,

    #[arg(short, long, env = "WORLD2VEC_OUTPUT_DIR", default_value = "testbuilds")]
    pub output_dir: PathBuf,

    /// Starting skip radius in chunks
    #[arg(long, env = "WORLD2VEC_INITIAL_RADIUS", default_value_t = 3)]
    pub initial_radius: i32,

    /// Air blocks a section needs to count as the surface section
    #[arg(long, env = "WORLD2VEC_AIR_THRESHOLD", default_value_t = 1024)]
    pub air_threshold: usize,

    /// Fail on the first build chunk without a surface section
    #[arg(long, env = "WORLD2VEC_STRICT_SURFACE")]
    pub strict_surface: bool,

    /// Data version tagged on the schematic
    #[arg(long, env = "WORLD2VEC_DATA_VERSION", default_value_t = DEFAULT_DATA_VERSION)]
    pub data_version: i32,

    /// Print a run report after the schematic is written
    #[arg(long, env = "WORLD2VEC_REPORT")]
    pub report: bool,
}

impl Args {
    fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            initial_radius: self.initial_radius,
            air_threshold: self.air_threshold,
            strict_surface: self.strict_surface,
            ..ScanConfig::default()
        }
    }
}

fn run(args: &Args, metrics: &RunMetrics) -> Result<PathBuf> {
    let config = args.scan_config();

    let registry = NaturalBlockRegistry::load(&args.natural_blocks).context("Failed to load natural block list")?;
    info!("Loaded {} natural blocks", registry.len());

    let world = AnvilWorld::open(&args.world)
        .with_context(|| format!("Failed to open world at {}", args.world.display()))?;

    let region = discover(&world, &registry, &config, Some(metrics))?;
    let extraction = extract_build(&world, &region, &config, Some(metrics))?;
    if extraction.voxels.is_empty() {
        warn!("Build {} has no blocks above the surface baseline", args.build_no);
    }

    let start = Instant::now();
    let mut schematic = SpongeSchematic::new(args.data_version);
    for voxel in &extraction.voxels {
        schematic.set_block(voxel.pos.into(), &voxel.block);
    }
    let name = format!("my_schematic_{}", args.build_no);
    let path = schematic
        .save(&args.output_dir, &name)
        .with_context(|| format!("Failed to write schematic {name}"))?;
    metrics.record_write(start.elapsed());

    Ok(path)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let metrics = RunMetrics::new(format!(
        "world={} radius={} air_threshold={} strict={}",
        args.world.display(),
        args.initial_radius,
        args.air_threshold,
        args.strict_surface
    ));

    match run(&args, &metrics) {
        Ok(path) => {
            println!("{}", path.display());
            if args.report {
                println!("{}", metrics.generate_report());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
