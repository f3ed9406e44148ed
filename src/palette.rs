use image::Rgb;
use serde::Deserialize;

use crate::constants::*;
use crate::tile::TileType;

/// Fill color for each cell state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Palette {
    pub background: [u8; 3],
    pub floor: [u8; 3],
    pub wall: [u8; 3],
}

impl Palette {
    pub fn color(&self, tile_type: TileType) -> Rgb<u8> {
        match tile_type {
            TileType::Void => Rgb(self.background),
            TileType::Floor => Rgb(self.floor),
            TileType::Wall => Rgb(self.wall),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: BACKGROUND_COLOR,
            floor: FLOOR_COLOR,
            wall: WALL_COLOR,
        }
    }
}
