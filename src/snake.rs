use crate::grid::{Cell, Direction, OccupancyIndex, GRID_H, GRID_W};

/// Maximum number of body segments. Smaller than the free playfield area, so
/// food placement always has somewhere to go.
pub const CAPACITY: usize = 255;

/// Fixed-capacity snake body stored as a ring: `head` is the slot of the
/// newest segment, and the `len` slots ending at `head` (walking backwards,
/// modulo `CAPACITY`) are in use. The occupancy bitset mirrors those slots.
#[derive(Debug, Clone)]
pub struct SnakeBody {
    cells: [Cell; CAPACITY],
    head: usize,
    len: usize,
    occupancy: OccupancyIndex,
}

// A body always has at least one segment.
#[allow(clippy::len_without_is_empty)]
impl SnakeBody {
    /// A horizontal body of `len` segments centered on the grid, head on the right.
    pub fn new(len: usize) -> Self {
        let mut body = SnakeBody {
            cells: [Cell::default(); CAPACITY],
            head: 0,
            len: 1,
            occupancy: OccupancyIndex::new(),
        };
        body.init(len);
        body
    }

    pub fn init(&mut self, len: usize) {
        debug_assert!(len >= 1 && len <= CAPACITY.min(GRID_W as usize));

        let y = GRID_H / 2;
        let start_x = GRID_W / 2 - (len / 2) as u8;

        for (i, slot) in self.cells.iter_mut().take(len).enumerate() {
            *slot = Cell::new(start_x + i as u8, y);
        }

        self.len = len;
        self.head = len - 1;
        self.rebuild_occupancy();
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_full(&self) -> bool {
        self.len == CAPACITY
    }

    pub fn head(&self) -> Cell {
        self.cells[self.head]
    }

    pub fn tail(&self) -> Cell {
        self.cells[self.tail_index()]
    }

    pub fn occupancy(&self) -> &OccupancyIndex {
        &self.occupancy
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.occupancy.contains(cell)
    }

    /// Segments from tail to head.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        let tail = self.tail_index();
        (0..self.len).map(move |i| self.cells[(tail + i) % CAPACITY])
    }

    pub fn peek_next(&self, direction: Direction) -> Cell {
        self.head().wrapped_step(direction)
    }

    /// Moves one cell without growing; returns the cell the tail left.
    pub fn step(&mut self, direction: Direction) -> Cell {
        let next = self.peek_next(direction);
        let vacated = self.tail();
        debug_assert!(!self.will_collide(next), "step into own body at {:?}", next);

        // Clear before set: the new head may land on the old tail cell.
        self.occupancy.remove(vacated);
        self.head = (self.head + 1) % CAPACITY;
        self.cells[self.head] = next;
        self.occupancy.insert(next);

        vacated
    }

    /// Moves one cell and grows by one segment. At capacity the growth is
    /// dropped and this is an ordinary `step`, whose vacated cell is returned.
    pub fn step_grow(&mut self, direction: Direction) -> Option<Cell> {
        if self.is_full() {
            return Some(self.step(direction));
        }

        let next = self.peek_next(direction);
        debug_assert!(!self.occupancy.contains(next), "grow into own body at {:?}", next);
        self.head = (self.head + 1) % CAPACITY;
        self.cells[self.head] = next;
        self.len += 1;
        self.occupancy.insert(next);

        None
    }

    /// True if moving the head onto `next` hits the body. The current tail is
    /// exempt since a plain step vacates it.
    pub fn will_collide(&self, next: Cell) -> bool {
        self.occupancy.contains(next) && next != self.tail()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn tail_index(&self) -> usize {
        (self.head + CAPACITY - (self.len - 1)) % CAPACITY
    }

    fn rebuild_occupancy(&mut self) {
        self.occupancy.clear_all();
        let tail = self.tail_index();
        for i in 0..self.len {
            self.occupancy.insert(self.cells[(tail + i) % CAPACITY]);
        }
    }
}
