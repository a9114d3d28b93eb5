//! Playfield geometry: cells, directions, the wrap rule and the occupancy bitset.

use Direction::*;

/// Playfield width in cells.
pub const GRID_W: u8 = 40;
/// Playfield height in cells.
pub const GRID_H: u8 = 25;
/// Total number of cells on the playfield.
pub const GRID_CELLS: usize = GRID_W as usize * GRID_H as usize;

const WORDS: usize = (GRID_CELLS + 63) / 64;

/// A single playfield position, `x < GRID_W`, `y < GRID_H`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub x: u8,
    pub y: u8,
}

impl Cell {
    pub const fn new(x: u8, y: u8) -> Self {
        Cell { x, y }
    }

    /// The neighbouring cell in `direction`, re-entering at the opposite edge
    /// when it would leave the playfield.
    pub fn wrapped_step(self, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        Cell {
            x: wrap_add(self.x, dx, GRID_W),
            y: wrap_add(self.y, dy, GRID_H),
        }
    }

    fn bit(self) -> usize {
        debug_assert!(self.x < GRID_W && self.y < GRID_H, "cell {:?} off the grid", self);
        self.y as usize * GRID_W as usize + self.x as usize
    }
}

fn wrap_add(v: u8, d: i8, limit: u8) -> u8 {
    match d {
        1 if v + 1 >= limit => 0,
        1 => v + 1,
        -1 if v == 0 => limit - 1,
        -1 => v - 1,
        _ => v,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i8, i8) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Up, Down) | (Down, Up) | (Left, Right) | (Right, Left)
        )
    }
}

/// Axis-aligned rectangle of cells, used for the HUD reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u8,
    pub y: u8,
    pub width: u8,
    pub height: u8,
}

impl Region {
    pub const fn new(x: u8, y: u8, width: u8, height: u8) -> Self {
        Region { x, y, width, height }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= self.x
            && cell.y >= self.y
            && (cell.x as u16) < self.x as u16 + self.width as u16
            && (cell.y as u16) < self.y as u16 + self.height as u16
    }
}

/// Dense one-bit-per-cell set over the whole playfield.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyIndex {
    words: [u64; WORDS],
}

impl OccupancyIndex {
    pub fn new() -> Self {
        OccupancyIndex { words: [0; WORDS] }
    }

    pub fn clear_all(&mut self) {
        self.words = [0; WORDS];
    }

    pub fn contains(&self, cell: Cell) -> bool {
        let i = cell.bit();
        self.words[i / 64] & (1 << (i % 64)) != 0
    }

    pub fn insert(&mut self, cell: Cell) {
        let i = cell.bit();
        self.words[i / 64] |= 1 << (i % 64);
    }

    pub fn remove(&mut self, cell: Cell) {
        let i = cell.bit();
        self.words[i / 64] &= !(1 << (i % 64));
    }

    /// Every set cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..GRID_CELLS)
            .filter(move |i| self.words[i / 64] & (1 << (i % 64)) != 0)
            .map(|i| Cell::new((i % GRID_W as usize) as u8, (i / GRID_W as usize) as u8))
    }
}

impl Default for OccupancyIndex {
    fn default() -> Self {
        Self::new()
    }
}
