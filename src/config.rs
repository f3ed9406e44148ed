//! Settings record consumed by a run.
//!
//! Field names on disk match the mapper's settings vocabulary (`GRID_WIDTH`,
//! `TOP_EDGE`, `OUTPUT_FILENAME`, ...). Missing keys fall back to defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::constants::*;
use crate::dungeon_gen::Rect;
use crate::error::MapError;
use crate::palette::Palette;
use crate::renderer::image_size;

/// Errors reading a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    #[serde(rename = "GRID_WIDTH")]
    pub width: usize,
    #[serde(rename = "GRID_HEIGHT")]
    pub height: usize,
    #[serde(rename = "TOP_EDGE")]
    pub top_margin: usize,
    #[serde(rename = "BOTTOM_EDGE")]
    pub bottom_margin: usize,
    #[serde(rename = "LEFT_EDGE")]
    pub left_margin: usize,
    #[serde(rename = "RIGHT_EDGE")]
    pub right_margin: usize,
    #[serde(rename = "OUTPUT_FILENAME")]
    pub output_path: PathBuf,
    /// Fixed seed for reproducible maps; `None` draws a fresh one per run
    #[serde(rename = "SEED")]
    pub seed: Option<u64>,
    /// Pixel edge length of one cell
    #[serde(rename = "CELL_SIZE")]
    pub cell_size: u32,
    #[serde(rename = "PALETTE")]
    pub palette: Palette,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
            top_margin: DEFAULT_EDGE_MARGIN,
            bottom_margin: DEFAULT_EDGE_MARGIN,
            left_margin: DEFAULT_EDGE_MARGIN,
            right_margin: DEFAULT_EDGE_MARGIN,
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILENAME),
            seed: None,
            cell_size: DEFAULT_CELL_SIZE,
            palette: Palette::default(),
        }
    }
}

impl MapConfig {
    /// Grid of `width` x `height` with the same margin on every side.
    pub fn with_uniform_margin(width: usize, height: usize, margin: usize) -> Self {
        Self {
            width,
            height,
            top_margin: margin,
            bottom_margin: margin,
            left_margin: margin,
            right_margin: margin,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Validate the settings and return the placement interior (grid minus margins).
    pub fn interior(&self) -> Result<Rect, MapError> {
        if self.width == 0 || self.height == 0 {
            return Err(MapError::invalid(format!(
                "grid must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > MAX_GRID_SIDE || self.height > MAX_GRID_SIDE {
            return Err(MapError::invalid(format!(
                "grid {}x{} exceeds the {MAX_GRID_SIDE} cell limit",
                self.width, self.height
            )));
        }

        let horizontal = self.left_margin.saturating_add(self.right_margin);
        if horizontal >= self.width {
            return Err(MapError::invalid(format!(
                "left + right margins ({horizontal}) must be less than width ({})",
                self.width
            )));
        }
        let vertical = self.top_margin.saturating_add(self.bottom_margin);
        if vertical >= self.height {
            return Err(MapError::invalid(format!(
                "top + bottom margins ({vertical}) must be less than height ({})",
                self.height
            )));
        }

        // Both bounded by MAX_GRID_SIDE above
        let interior = Rect::new(
            self.left_margin as i32,
            self.top_margin as i32,
            (self.width - horizontal) as i32,
            (self.height - vertical) as i32,
        );
        if interior.width < MIN_INTERIOR_SIZE || interior.height < MIN_INTERIOR_SIZE {
            return Err(MapError::invalid(format!(
                "interior {}x{} is smaller than the {MIN_INTERIOR_SIZE}x{MIN_INTERIOR_SIZE} minimum",
                interior.width, interior.height
            )));
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(MapError::invalid("output path is empty"));
        }
        image_size(self.width, self.height, self.cell_size)?;

        Ok(interior)
    }
}
