//! Dungeon generation constants.

/// Smallest usable interior side, in cells (a 1x1 room plus its wall ring)
pub const MIN_INTERIOR_SIZE: i32 = 3;
/// Largest accepted grid side, in cells
pub const MAX_GRID_SIDE: usize = 4096;
/// Minimum room side (floor cells, excluding walls)
pub const ROOM_MIN_SIZE: i32 = 3;
/// Maximum room side (floor cells, excluding walls)
pub const ROOM_MAX_SIZE: i32 = 8;
/// Minimum corridor length
pub const CORRIDOR_MIN_LENGTH: i32 = 2;
/// Maximum corridor length
pub const CORRIDOR_MAX_LENGTH: i32 = 8;
/// Chance that an attachment proposal is a room rather than a corridor
pub const ROOM_CHANCE: f64 = 0.55;
/// Chance that a corridor is two cells wide instead of one
pub const WIDE_CORRIDOR_CHANCE: f64 = 0.2;
/// Fresh proposals tried on one anchor before moving on
pub const PLACEMENT_RETRIES: u32 = 8;
/// Attachment attempts per average room area of grid
pub const ATTEMPTS_PER_ROOM_AREA: usize = 4;
/// Average room floor area used to scale the attempt count (about 5.5 x 5.5)
pub const AVERAGE_ROOM_AREA: usize = 30;
