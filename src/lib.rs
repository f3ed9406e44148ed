//! Random dungeon map generator with raster output.
//!
//! A run validates a [`MapConfig`], grows a connected room-and-corridor layout
//! on a [`Grid`] and paints it to an image file through [`Renderer`].

pub mod config;
pub mod constants;
pub mod dungeon_gen;
pub mod error;
pub mod grid;
pub mod palette;
pub mod renderer;
pub mod tile;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

pub use config::{MapConfig, SettingsError};
pub use dungeon_gen::{DungeonGenerator, DungeonResult, Rect};
pub use error::MapError;
pub use grid::Grid;
pub use palette::Palette;
pub use renderer::{image_size, ImageSink, Renderer};
pub use tile::TileType;

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Seed the layout was grown from; reuse it to reproduce the map
    pub seed: u64,
    pub image_width: u32,
    pub image_height: u32,
    pub dungeon: DungeonResult,
}

/// Generate a dungeon from a fixed seed.
pub fn generate_with_seed(config: &MapConfig, seed: u64) -> Result<DungeonResult, MapError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    DungeonGenerator::generate(config, &mut rng)
}

/// Generate a dungeon, render it and write it to `config.output_path`.
pub fn run(config: &MapConfig) -> Result<RunSummary, MapError> {
    config.interior()?;

    let seed = config.seed.unwrap_or_else(rand::random);
    info!(seed, width = config.width, height = config.height, "generating dungeon");

    let dungeon = generate_with_seed(config, seed)?;
    let renderer = Renderer::new(config.palette, config.cell_size);
    let (image_width, image_height) = renderer.image_dimensions(&dungeon.grid)?;
    renderer.render_to_file(&dungeon.grid, &config.output_path)?;

    Ok(RunSummary {
        seed,
        image_width,
        image_height,
        dungeon,
    })
}
