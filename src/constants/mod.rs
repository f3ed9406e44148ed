//! Mapper constants organized by domain.
//!
//! Centralizing magic numbers makes tuning easier and documents intent.

mod dungeon;
mod map;
mod render;

pub use dungeon::*;
pub use map::*;
pub use render::*;
