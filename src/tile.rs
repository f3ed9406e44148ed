/// Logical state of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileType {
    /// Untouched space outside every room and corridor
    #[default]
    Void,
    Floor,
    Wall,
}

impl TileType {
    /// Character used by the ASCII preview
    pub const fn to_char(self) -> char {
        match self {
            TileType::Void => ' ',
            TileType::Floor => '.',
            TileType::Wall => '#',
        }
    }

    pub fn is_walkable(&self) -> bool {
        matches!(self, TileType::Floor)
    }
}
