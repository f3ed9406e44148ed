//! Raster output constants.

/// Default cell edge length in pixels
pub const DEFAULT_CELL_SIZE: u32 = 10;
/// Void / background color
pub const BACKGROUND_COLOR: [u8; 3] = [0x18, 0x18, 0x20];
/// Floor color (parchment)
pub const FLOOR_COLOR: [u8; 3] = [0xE8, 0xDC, 0xC4];
/// Wall color
pub const WALL_COLOR: [u8; 3] = [0x60, 0x48, 0x38];
/// Largest accepted image area, in pixels (48 MiB of RGB)
pub const MAX_IMAGE_PIXELS: u64 = 4096 * 4096;
