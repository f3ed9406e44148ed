use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dungeon_mapper::{MapConfig, SettingsError};

/// Generate a random dungeon map and save it as an image
#[derive(Parser, Debug)]
#[command(name = "dungeon-mapper")]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON settings file (GRID_WIDTH, TOP_EDGE, OUTPUT_FILENAME, ...)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<usize>,

    /// Cells left empty along the top edge
    #[arg(long)]
    top: Option<usize>,

    /// Cells left empty along the bottom edge
    #[arg(long)]
    bottom: Option<usize>,

    /// Cells left empty along the left edge
    #[arg(long)]
    left: Option<usize>,

    /// Cells left empty along the right edge
    #[arg(long)]
    right: Option<usize>,

    /// Output image path; the extension picks the format (PNG if unknown)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Random seed for a reproducible map
    #[arg(short, long)]
    seed: Option<u64>,

    /// Pixel size of one cell
    #[arg(long)]
    cell_size: Option<u32>,

    /// Also print the map as text
    #[arg(long)]
    ascii: bool,
}

impl Args {
    /// Settings file (or defaults) with command-line overrides applied.
    fn into_config(self) -> Result<(MapConfig, bool), SettingsError> {
        let mut config = match &self.config {
            Some(path) => MapConfig::from_json_file(path)?,
            None => MapConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(top) = self.top {
            config.top_margin = top;
        }
        if let Some(bottom) = self.bottom {
            config.bottom_margin = bottom;
        }
        if let Some(left) = self.left {
            config.left_margin = left;
        }
        if let Some(right) = self.right {
            config.right_margin = right;
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(cell_size) = self.cell_size {
            config.cell_size = cell_size;
        }

        Ok((config, self.ascii))
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let (config, ascii) = match Args::parse().into_config() {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match dungeon_mapper::run(&config) {
        Ok(summary) => {
            if ascii {
                println!("{}", summary.dungeon.grid);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
