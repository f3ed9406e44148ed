use std::collections::VecDeque;
use std::fmt;

use crate::tile::TileType;

/// Row-major logical map: one `TileType` per cell, `width` cells per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<TileType>,
}

impl Grid {
    /// Create a grid with every cell set to Void.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![TileType::Void; width * height],
        }
    }

    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<TileType> {
        self.index(x, y).map(|idx| self.tiles[idx])
    }

    /// Set a cell. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: i32, y: i32, tile_type: TileType) {
        if let Some(idx) = self.index(x, y) {
            self.tiles[idx] = tile_type;
        }
    }

    pub fn count(&self, tile_type: TileType) -> usize {
        self.tiles.iter().filter(|&&t| t == tile_type).count()
    }

    /// Iterate `(x, y, tile)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, TileType)> + '_ {
        self.tiles.iter().enumerate().map(move |(idx, &tile)| {
            ((idx % self.width) as i32, (idx / self.width) as i32, tile)
        })
    }

    /// Number of cells reachable from `(x, y)` through orthogonally adjacent Floor.
    pub fn flood_fill_floor(&self, x: i32, y: i32) -> usize {
        let Some(start) = self.index(x, y) else {
            return 0;
        };
        if !self.tiles[start].is_walkable() {
            return 0;
        }

        let mut seen = vec![false; self.tiles.len()];
        let mut queue = VecDeque::new();
        seen[start] = true;
        queue.push_back((x, y));
        let mut reached = 0;

        while let Some((cx, cy)) = queue.pop_front() {
            reached += 1;
            for (dx, dy) in [(0, -1), (1, 0), (0, 1), (-1, 0)] {
                let (nx, ny) = (cx + dx, cy + dy);
                if let Some(idx) = self.index(nx, ny) {
                    if !seen[idx] && self.tiles[idx].is_walkable() {
                        seen[idx] = true;
                        queue.push_back((nx, ny));
                    }
                }
            }
        }

        reached
    }

    /// True when there is at least one Floor cell and every Floor cell is
    /// reachable from every other.
    pub fn is_connected(&self) -> bool {
        let Some((x, y, _)) = self.cells().find(|(_, _, t)| t.is_walkable()) else {
            return false;
        };
        self.flood_fill_floor(x, y) == self.count(TileType::Floor)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(self.width + 2);
        writeln!(f, "{rule}")?;
        for row in self.tiles.chunks(self.width.max(1)) {
            write!(f, "|")?;
            for tile in row {
                write!(f, "{}", tile.to_char())?;
            }
            writeln!(f, "|")?;
        }
        write!(f, "{rule}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_grid(width: usize, height: usize, floors: &[(i32, i32)]) -> Grid {
        let mut grid = Grid::new(width, height);
        for &(x, y) in floors {
            grid.set(x, y, TileType::Floor);
        }
        grid
    }

    #[test]
    fn test_new_grid_is_void() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.tiles.len(), 12);
        assert_eq!(grid.count(TileType::Void), 12);
    }

    #[test]
    fn test_out_of_bounds_get_is_none() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.get(-1, 0), None);
        assert_eq!(grid.get(4, 0), None);
        assert_eq!(grid.get(0, 3), None);
        assert_eq!(grid.get(3, 2), Some(TileType::Void));
    }

    #[test]
    fn test_set_is_row_major() {
        let mut grid = Grid::new(4, 3);
        grid.set(1, 2, TileType::Wall);
        assert_eq!(grid.tiles[2 * 4 + 1], TileType::Wall);
        // Ignored
        grid.set(9, 9, TileType::Wall);
        assert_eq!(grid.count(TileType::Wall), 1);
    }

    #[test]
    fn test_cells_yield_coordinates() {
        let grid = make_grid(3, 2, &[(2, 1)]);
        let floor: Vec<_> = grid.cells().filter(|(_, _, t)| t.is_walkable()).collect();
        assert_eq!(floor, vec![(2, 1, TileType::Floor)]);
    }

    #[test]
    fn test_connected_line() {
        let grid = make_grid(5, 5, &[(1, 1), (2, 1), (3, 1), (3, 2)]);
        assert!(grid.is_connected());
        assert_eq!(grid.flood_fill_floor(1, 1), 4);
    }

    #[test]
    fn test_diagonal_is_not_connected() {
        let grid = make_grid(5, 5, &[(1, 1), (2, 2)]);
        assert!(!grid.is_connected());
    }

    #[test]
    fn test_empty_grid_is_not_connected() {
        assert!(!Grid::new(5, 5).is_connected());
    }

    #[test]
    fn test_flood_fill_from_wall_is_zero() {
        let mut grid = make_grid(3, 3, &[(1, 1)]);
        grid.set(0, 0, TileType::Wall);
        assert_eq!(grid.flood_fill_floor(0, 0), 0);
        assert_eq!(grid.flood_fill_floor(7, 7), 0);
    }

    #[test]
    fn test_display_frames_rows() {
        let mut grid = make_grid(3, 2, &[(1, 0)]);
        grid.set(2, 1, TileType::Wall);
        assert_eq!(grid.to_string(), "-----\n| . |\n|  #|\n-----");
    }
}
