use rand::Rng;
use tracing::{debug, debug_span, info};

use crate::config::MapConfig;
use crate::constants::*;
use crate::error::MapError;
use crate::grid::Grid;
use crate::tile::TileType;

/// A rectangle representing a room, corridor or region
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// One past the last column
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// One past the last row
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Check if a point is inside this rectangle
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Grow by `by` cells on every side.
    pub fn expand(&self, by: i32) -> Rect {
        Rect::new(self.x - by, self.y - by, self.width + by * 2, self.height + by * 2)
    }

    pub fn area(&self) -> i32 {
        self.width * self.height
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let Rect { x, y, width, height } = *self;
        (y..y + height).flat_map(move |cy| (x..x + width).map(move |cx| (cx, cy)))
    }
}

/// Direction a new piece grows in, away from the floor behind its anchor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }
}

/// A wall cell that a new room or corridor can grow out of.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Anchor {
    pub x: i32,
    pub y: i32,
    pub direction: Direction,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PieceKind {
    Room,
    Corridor,
}

/// An accepted proposal, ready to be carved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Carve {
    pub kind: PieceKind,
    /// Floor cells of the new piece, excluding its wall ring
    pub floor: Rect,
    /// Anchor wall that becomes the doorway
    pub door: (i32, i32),
}

/// Why a proposal was turned down
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// The piece or its walls would reach into the margin
    OutOfBounds,
    /// The piece would cover a cell that is already carved
    Overlap,
}

/// Result of dungeon generation
#[derive(Debug, Clone)]
pub struct DungeonResult {
    pub grid: Grid,
    /// Placement region: the grid minus its margins
    pub interior: Rect,
    pub rooms: Vec<Rect>,
    pub corridors: Vec<Rect>,
    pub door_positions: Vec<(i32, i32)>,
}

/// Number of attachment attempts for a grid, proportional to its area.
pub fn attempt_budget(width: usize, height: usize) -> usize {
    (ATTEMPTS_PER_ROOM_AREA * width * height / AVERAGE_ROOM_AREA).max(1)
}

/// Return the anchor at `(x, y)` if that cell is a wall with exactly one
/// orthogonal floor neighbour and open interior space on the opposite side.
pub fn anchor_at(grid: &Grid, interior: Rect, x: i32, y: i32) -> Option<Anchor> {
    if grid.get(x, y) != Some(TileType::Wall) {
        return None;
    }

    let mut found = None;
    for direction in Direction::ALL {
        let (dx, dy) = direction.delta();
        if grid.get(x - dx, y - dy) == Some(TileType::Floor) {
            if found.is_some() {
                return None;
            }
            found = Some(direction);
        }
    }

    let direction = found?;
    let (dx, dy) = direction.delta();
    let (ox, oy) = (x + dx, y + dy);
    let outward_open = interior.contains(ox, oy) && grid.get(ox, oy) == Some(TileType::Void);
    outward_open.then_some(Anchor { x, y, direction })
}

/// Floor rectangle of a piece `depth` cells long and `span` cells wide that
/// starts just beyond the anchor. `offset` shifts it sideways and must be in
/// `0..span` so the anchor's row or column stays inside the piece.
fn place_piece(anchor: Anchor, depth: i32, span: i32, offset: i32) -> Rect {
    match anchor.direction {
        Direction::East => Rect::new(anchor.x + 1, anchor.y - offset, depth, span),
        Direction::West => Rect::new(anchor.x - depth, anchor.y - offset, depth, span),
        Direction::South => Rect::new(anchor.x - offset, anchor.y + 1, span, depth),
        Direction::North => Rect::new(anchor.x - offset, anchor.y - depth, span, depth),
    }
}

/// Propose a room or corridor growing out of `anchor` and test it against the
/// current grid. Does not modify the grid.
pub fn propose(
    grid: &Grid,
    interior: Rect,
    anchor: Anchor,
    rng: &mut impl Rng,
) -> Result<Carve, Rejection> {
    let (kind, depth, span) = if rng.gen_bool(ROOM_CHANCE) {
        (
            PieceKind::Room,
            rng.gen_range(ROOM_MIN_SIZE..=ROOM_MAX_SIZE),
            rng.gen_range(ROOM_MIN_SIZE..=ROOM_MAX_SIZE),
        )
    } else {
        let width = if rng.gen_bool(WIDE_CORRIDOR_CHANCE) { 2 } else { 1 };
        (
            PieceKind::Corridor,
            rng.gen_range(CORRIDOR_MIN_LENGTH..=CORRIDOR_MAX_LENGTH),
            width,
        )
    };
    let offset = rng.gen_range(0..span);
    let floor = place_piece(anchor, depth, span, offset);

    // Walls must fit too, so margins never get touched
    if !interior.contains_rect(&floor.expand(1)) {
        return Err(Rejection::OutOfBounds);
    }
    if floor
        .cells()
        .any(|(x, y)| grid.get(x, y) != Some(TileType::Void))
    {
        return Err(Rejection::Overlap);
    }

    Ok(Carve {
        kind,
        floor,
        door: (anchor.x, anchor.y),
    })
}

/// Carve a floor rectangle and surround it with walls. Walls only replace Void.
fn carve_room(grid: &mut Grid, floor: Rect) {
    for (x, y) in floor.cells() {
        grid.set(x, y, TileType::Floor);
    }
    for (x, y) in floor.expand(1).cells() {
        if !floor.contains(x, y) && grid.get(x, y) == Some(TileType::Void) {
            grid.set(x, y, TileType::Wall);
        }
    }
}

/// Apply an accepted carve: the walled piece plus its doorway.
pub fn apply_carve(grid: &mut Grid, carve: &Carve) {
    carve_room(grid, carve.floor);
    grid.set(carve.door.0, carve.door.1, TileType::Floor);
}

pub struct DungeonGenerator {
    interior: Rect,
    grid: Grid,
    rooms: Vec<Rect>,
    corridors: Vec<Rect>,
    door_positions: Vec<(i32, i32)>,
    /// Walls that may still be anchors; stale entries are dropped when drawn
    candidates: Vec<(i32, i32)>,
    /// Cells currently present in `candidates`
    listed: Vec<bool>,
}

impl DungeonGenerator {
    fn new(width: usize, height: usize, interior: Rect) -> Self {
        Self {
            interior,
            grid: Grid::new(width, height),
            rooms: Vec::new(),
            corridors: Vec::new(),
            door_positions: Vec::new(),
            candidates: Vec::new(),
            listed: vec![false; width * height],
        }
    }

    /// Generate a dungeon for `config`, drawing every random choice from `rng`.
    pub fn generate(config: &MapConfig, rng: &mut impl Rng) -> Result<DungeonResult, MapError> {
        let interior = config.interior()?;
        let _span = debug_span!("generate", width = config.width, height = config.height).entered();

        let mut gen = Self::new(config.width, config.height, interior);
        gen.seed_room(rng);

        let attempts = attempt_budget(config.width, config.height);
        let mut out_of_bounds = 0usize;
        let mut overlaps = 0usize;
        let mut abandoned = 0usize;

        for _ in 0..attempts {
            let Some(anchor) = gen.draw_anchor(rng) else {
                debug!("no anchors left");
                break;
            };

            let mut placed = false;
            for _ in 0..PLACEMENT_RETRIES {
                match propose(&gen.grid, gen.interior, anchor, rng) {
                    Ok(carve) => {
                        gen.accept(&carve);
                        placed = true;
                        break;
                    }
                    Err(Rejection::OutOfBounds) => out_of_bounds += 1,
                    Err(Rejection::Overlap) => overlaps += 1,
                }
            }
            if !placed {
                abandoned += 1;
            }
        }

        let floor = gen.grid.count(TileType::Floor);
        info!(
            rooms = gen.rooms.len(),
            corridors = gen.corridors.len(),
            floor_cells = floor,
            coverage = floor as f64 / interior.area() as f64,
            "dungeon generated"
        );
        debug!(attempts, out_of_bounds, overlaps, abandoned, "placement stats");

        Ok(DungeonResult {
            grid: gen.grid,
            interior,
            rooms: gen.rooms,
            corridors: gen.corridors,
            door_positions: gen.door_positions,
        })
    }

    /// Carve the first room at a random spot inside the interior.
    fn seed_room(&mut self, rng: &mut impl Rng) {
        // Interior is at least MIN_INTERIOR_SIZE, so one floor cell always fits
        let max_width = (self.interior.width - 2).min(ROOM_MAX_SIZE);
        let max_height = (self.interior.height - 2).min(ROOM_MAX_SIZE);
        let width = rng.gen_range(ROOM_MIN_SIZE.min(max_width)..=max_width);
        let height = rng.gen_range(ROOM_MIN_SIZE.min(max_height)..=max_height);

        let x = self.interior.x + 1 + rng.gen_range(0..=self.interior.width - 2 - width);
        let y = self.interior.y + 1 + rng.gen_range(0..=self.interior.height - 2 - height);
        let room = Rect::new(x, y, width, height);

        carve_room(&mut self.grid, room);
        self.rooms.push(room);
        self.list_walls(room.expand(1));
    }

    /// Pick a random valid anchor, discarding stale candidates along the way.
    fn draw_anchor(&mut self, rng: &mut impl Rng) -> Option<Anchor> {
        while !self.candidates.is_empty() {
            let idx = rng.gen_range(0..self.candidates.len());
            let (x, y) = self.candidates[idx];
            if let Some(anchor) = anchor_at(&self.grid, self.interior, x, y) {
                return Some(anchor);
            }
            self.candidates.swap_remove(idx);
            if let Some(cell) = self.grid.index(x, y) {
                self.listed[cell] = false;
            }
        }
        None
    }

    fn accept(&mut self, carve: &Carve) {
        apply_carve(&mut self.grid, carve);
        match carve.kind {
            PieceKind::Room => self.rooms.push(carve.floor),
            PieceKind::Corridor => self.corridors.push(carve.floor),
        }
        self.door_positions.push(carve.door);
        // Every cell whose anchor status can change lies on the new ring
        self.list_walls(carve.floor.expand(1));
    }

    fn list_walls(&mut self, area: Rect) {
        for (x, y) in area.cells() {
            let Some(cell) = self.grid.index(x, y) else {
                continue;
            };
            if self.grid.tiles[cell] == TileType::Wall && !self.listed[cell] {
                self.listed[cell] = true;
                self.candidates.push((x, y));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    fn generate(width: usize, height: usize, margin: usize, seed: u64) -> DungeonResult {
        let config = MapConfig::with_uniform_margin(width, height, margin);
        DungeonGenerator::generate(&config, &mut rng(seed)).unwrap()
    }

    /// Grid with a single 3x3 room whose floor spans (x..x+3, y..y+3).
    fn grid_with_room(width: usize, height: usize, x: i32, y: i32) -> Grid {
        let mut grid = Grid::new(width, height);
        carve_room(&mut grid, Rect::new(x, y, 3, 3));
        grid
    }

    #[test]
    fn test_rect_expand_and_contains_rect() {
        let rect = Rect::new(2, 3, 4, 5);
        let ring = rect.expand(1);
        assert_eq!(ring, Rect::new(1, 2, 6, 7));
        assert!(ring.contains_rect(&rect));
        assert!(!rect.contains_rect(&ring));
        assert!(rect.contains_rect(&rect));
    }

    #[test]
    fn test_rect_cells_row_major() {
        let cells: Vec<_> = Rect::new(1, 1, 2, 2).cells().collect();
        assert_eq!(cells, vec![(1, 1), (2, 1), (1, 2), (2, 2)]);
    }

    #[test]
    fn test_attempt_budget_scales_with_area() {
        assert_eq!(attempt_budget(1, 1), 1);
        assert_eq!(attempt_budget(30, 10), 40);
        assert!(attempt_budget(100, 100) > attempt_budget(50, 50));
    }

    #[test]
    fn test_carve_room_surrounds_floor_with_walls() {
        let grid = grid_with_room(7, 7, 2, 2);
        assert_eq!(grid.count(TileType::Floor), 9);
        assert_eq!(grid.count(TileType::Wall), 16);
        assert_eq!(grid.get(0, 0), Some(TileType::Void));
        assert_eq!(grid.get(1, 1), Some(TileType::Wall));
    }

    #[test]
    fn test_anchor_on_room_side() {
        let grid = grid_with_room(12, 12, 4, 4);
        let interior = Rect::new(0, 0, 12, 12);
        assert_eq!(
            anchor_at(&grid, interior, 7, 5),
            Some(Anchor { x: 7, y: 5, direction: Direction::East })
        );
        assert_eq!(
            anchor_at(&grid, interior, 5, 3),
            Some(Anchor { x: 5, y: 3, direction: Direction::North })
        );
    }

    #[test]
    fn test_corner_and_floor_are_not_anchors() {
        let grid = grid_with_room(12, 12, 4, 4);
        let interior = Rect::new(0, 0, 12, 12);
        assert_eq!(anchor_at(&grid, interior, 3, 3), None);
        assert_eq!(anchor_at(&grid, interior, 5, 5), None);
    }

    #[test]
    fn test_anchor_facing_margin_is_rejected() {
        let grid = grid_with_room(7, 7, 2, 2);
        // Outward cell (0, 3) lies in the margin
        assert_eq!(anchor_at(&grid, Rect::new(1, 1, 5, 5), 1, 3), None);
        assert!(anchor_at(&grid, Rect::new(0, 0, 7, 7), 1, 3).is_some());
    }

    #[test]
    fn test_place_piece_starts_beyond_anchor() {
        for direction in Direction::ALL {
            let anchor = Anchor { x: 10, y: 10, direction };
            let (dx, dy) = direction.delta();
            for offset in 0..3 {
                let piece = place_piece(anchor, 4, 3, offset);
                assert!(piece.contains(10 + dx, 10 + dy), "{direction:?} offset {offset}");
                assert!(!piece.contains(10, 10));
                assert_eq!(piece.area(), 12);
            }
        }
    }

    #[test]
    fn test_propose_rejects_pieces_reaching_margin() {
        let grid = Grid::new(12, 12);
        let interior = Rect::new(1, 1, 10, 10);
        // Anything grown east of x = 10 starts inside the margin
        let anchor = Anchor { x: 10, y: 5, direction: Direction::East };
        let mut rng = rng(7);
        for _ in 0..50 {
            assert_eq!(
                propose(&grid, interior, anchor, &mut rng),
                Err(Rejection::OutOfBounds)
            );
        }
    }

    #[test]
    fn test_propose_rejects_overlap() {
        let mut grid = grid_with_room(30, 30, 7, 14);
        grid.set(11, 15, TileType::Wall);
        let anchor = Anchor { x: 10, y: 15, direction: Direction::East };
        let mut rng = rng(11);
        for _ in 0..50 {
            assert_eq!(
                propose(&grid, Rect::new(0, 0, 30, 30), anchor, &mut rng),
                Err(Rejection::Overlap)
            );
        }
    }

    #[test]
    fn test_propose_accepts_in_open_space() {
        let grid = grid_with_room(40, 40, 18, 18);
        let anchor = anchor_at(&grid, Rect::new(0, 0, 40, 40), 21, 19).unwrap();
        let carve = propose(&grid, Rect::new(0, 0, 40, 40), anchor, &mut rng(3)).unwrap();
        assert_eq!(carve.door, (21, 19));
        assert!(carve.floor.contains(22, 19));
    }

    #[test]
    fn test_apply_carve_opens_doorway_and_keeps_floor() {
        let mut grid = grid_with_room(20, 20, 4, 4);
        let carve = Carve {
            kind: PieceKind::Corridor,
            floor: Rect::new(8, 5, 4, 1),
            door: (7, 5),
        };
        apply_carve(&mut grid, &carve);
        assert_eq!(grid.get(7, 5), Some(TileType::Floor));
        assert_eq!(grid.get(7, 4), Some(TileType::Wall));
        assert_eq!(grid.get(12, 5), Some(TileType::Wall));
        assert_eq!(grid.get(9, 4), Some(TileType::Wall));
        assert!(grid.is_connected());
    }

    #[test]
    fn test_dungeon_generates_tiles() {
        let result = generate(50, 50, 1, 1);
        assert_eq!(result.grid.tiles.len(), 50 * 50);
        assert_eq!(result.grid.width, 50);
        assert_eq!(result.grid.height, 50);
    }

    #[test]
    fn test_dungeon_has_floor_and_walls() {
        let result = generate(50, 50, 1, 2);
        assert!(result.grid.count(TileType::Floor) > 0);
        assert!(result.grid.count(TileType::Wall) > 0);
        assert!(!result.rooms.is_empty());
    }

    #[test]
    fn test_dungeon_is_connected() {
        for seed in 0..20 {
            let result = generate(60, 40, 2, seed);
            assert!(result.grid.is_connected(), "seed {seed}");
        }
    }

    #[test]
    fn test_margins_stay_void() {
        let config = MapConfig {
            top_margin: 1,
            bottom_margin: 4,
            left_margin: 3,
            right_margin: 2,
            ..MapConfig::with_uniform_margin(40, 30, 0)
        };
        let result = DungeonGenerator::generate(&config, &mut rng(5)).unwrap();
        for (x, y, tile) in result.grid.cells() {
            if !result.interior.contains(x, y) {
                assert_eq!(tile, TileType::Void, "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_floor_is_enclosed_by_walls() {
        let result = generate(50, 35, 1, 9);
        let grid = &result.grid;
        for (x, y, tile) in grid.cells() {
            if tile != TileType::Floor {
                continue;
            }
            for dy in -1..=1 {
                for dx in -1..=1 {
                    assert_ne!(grid.get(x + dx, y + dy), Some(TileType::Void));
                }
            }
        }
    }

    #[test]
    fn test_door_positions_are_on_floor() {
        let result = generate(50, 50, 1, 4);
        assert_eq!(
            result.door_positions.len(),
            result.rooms.len() + result.corridors.len() - 1
        );
        for (x, y) in result.door_positions {
            assert_eq!(result.grid.get(x, y), Some(TileType::Floor));
        }
    }

    #[test]
    fn test_same_seed_same_dungeon() {
        let a = generate(45, 30, 1, 1234);
        let b = generate(45, 30, 1, 1234);
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.rooms, b.rooms);
    }

    #[test]
    fn test_smallest_interior_holds_one_cell_room() {
        let result = generate(5, 5, 1, 0);
        assert_eq!(result.grid.count(TileType::Floor), 1);
        assert_eq!(result.grid.get(2, 2), Some(TileType::Floor));
        assert_eq!(result.grid.count(TileType::Wall), 8);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let config = MapConfig::with_uniform_margin(0, 10, 0);
        assert!(matches!(
            DungeonGenerator::generate(&config, &mut rng(0)),
            Err(MapError::InvalidConfiguration(_))
        ));
    }
}
