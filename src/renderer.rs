//! Raster output: one solid pixel block per grid cell.
//!
//! The whole image is painted and encoded in memory before the output file is
//! touched, and the finished bytes replace any previous file in one rename.

use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use image::{ImageError, ImageFormat, Rgb, RgbImage};
use tracing::{debug_span, info};

use crate::constants::MAX_IMAGE_PIXELS;
use crate::error::MapError;
use crate::grid::Grid;
use crate::palette::Palette;

/// Destination for fill commands that can persist itself as an image file.
pub trait ImageSink {
    /// Fill the `width` x `height` pixel block whose top-left corner is `(x, y)`.
    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Rgb<u8>);

    /// Write the finished image to `path`, replacing any existing file.
    fn persist(&self, path: &Path) -> Result<(), MapError>;
}

impl ImageSink for RgbImage {
    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Rgb<u8>) {
        let x_end = x.saturating_add(width).min(self.width());
        let y_end = y.saturating_add(height).min(self.height());
        for py in y..y_end {
            for px in x..x_end {
                self.put_pixel(px, py, color);
            }
        }
    }

    fn persist(&self, path: &Path) -> Result<(), MapError> {
        let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);
        let mut encoded = Vec::new();
        self.write_to(&mut Cursor::new(&mut encoded), format)
            .map_err(|source| render_io(path, source))?;
        write_replacing(path, &encoded).map_err(|err| render_io(path, ImageError::IoError(err)))
    }
}

fn render_io(path: &Path, source: ImageError) -> MapError {
    MapError::RenderIo {
        path: path.to_path_buf(),
        source,
    }
}

/// Sibling file the encoded bytes are staged in before the rename.
fn staging_path(path: &Path) -> PathBuf {
    let mut staging = path.as_os_str().to_owned();
    staging.push(".partial");
    PathBuf::from(staging)
}

/// Replace `path` with `bytes`. On failure the previous file is left as it was.
fn write_replacing(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let staging = staging_path(path);
    let result = fs::write(&staging, bytes).and_then(|()| fs::rename(&staging, path));
    if result.is_err() {
        let _ = fs::remove_file(&staging);
    }
    result
}

/// Pixel dimensions of a `width` x `height` cell grid drawn at `cell_size`.
///
/// Rejects a zero cell size, sides that overflow `u32` and images larger than
/// [`MAX_IMAGE_PIXELS`].
pub fn image_size(width: usize, height: usize, cell_size: u32) -> Result<(u32, u32), MapError> {
    if cell_size == 0 {
        return Err(MapError::invalid("cell size must be positive"));
    }
    let side = |cells: usize| {
        u32::try_from(cells)
            .ok()
            .and_then(|cells| cells.checked_mul(cell_size))
    };
    let (Some(image_width), Some(image_height)) = (side(width), side(height)) else {
        return Err(MapError::invalid(format!(
            "{width}x{height} cells at cell size {cell_size} overflow the image dimensions"
        )));
    };
    let pixels = u64::from(image_width) * u64::from(image_height);
    if pixels > MAX_IMAGE_PIXELS {
        return Err(MapError::invalid(format!(
            "{image_width}x{image_height} image has {pixels} pixels, limit is {MAX_IMAGE_PIXELS}"
        )));
    }
    Ok((image_width, image_height))
}

pub struct Renderer {
    palette: Palette,
    cell_size: u32,
}

impl Renderer {
    pub fn new(palette: Palette, cell_size: u32) -> Self {
        Self { palette, cell_size }
    }

    /// Pixel dimensions of the image for `grid`.
    pub fn image_dimensions(&self, grid: &Grid) -> Result<(u32, u32), MapError> {
        image_size(grid.width, grid.height, self.cell_size)
    }

    /// Issue one fill per cell in row-major order.
    pub fn paint<S: ImageSink>(&self, grid: &Grid, sink: &mut S) -> Result<(), MapError> {
        // Every cell offset is below the checked image size
        self.image_dimensions(grid)?;
        let size = self.cell_size;
        for (x, y, tile) in grid.cells() {
            sink.fill_rect(
                x as u32 * size,
                y as u32 * size,
                size,
                size,
                self.palette.color(tile),
            );
        }
        Ok(())
    }

    pub fn render(&self, grid: &Grid) -> Result<RgbImage, MapError> {
        let _span = debug_span!("render", cell_size = self.cell_size).entered();
        let (width, height) = self.image_dimensions(grid)?;
        let mut image = RgbImage::new(width, height);
        self.paint(grid, &mut image)?;
        Ok(image)
    }

    /// Render `grid` and write it to `path`.
    pub fn render_to_file(&self, grid: &Grid, path: &Path) -> Result<(), MapError> {
        let image = self.render(grid)?;
        image.persist(path)?;
        info!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "map written"
        );
        Ok(())
    }
}
