//! Map configuration defaults.

/// Default grid width in cells
pub const DEFAULT_GRID_WIDTH: usize = 60;
/// Default grid height in cells
pub const DEFAULT_GRID_HEIGHT: usize = 40;
/// Default border margin on every side
pub const DEFAULT_EDGE_MARGIN: usize = 1;
/// Default output file
pub const DEFAULT_OUTPUT_FILENAME: &str = "dungeon.png";
