use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::grid::{Cell, Region, GRID_H, GRID_W};
use crate::snake::SnakeBody;

/// Source of uniformly distributed bytes.
pub trait RandomSource {
    fn next_byte(&mut self) -> u8;
}

impl RandomSource for StdRng {
    fn next_byte(&mut self) -> u8 {
        (self.next_u32() & 0xFF) as u8
    }
}

/// Entropy-seeded generator that is only created on the first draw.
#[derive(Debug, Default)]
pub struct LazyRng {
    rng: Option<StdRng>,
}

impl LazyRng {
    pub fn new() -> Self {
        LazyRng { rng: None }
    }
}

impl RandomSource for LazyRng {
    fn next_byte(&mut self) -> u8 {
        self.rng.get_or_insert_with(StdRng::from_entropy).next_byte()
    }
}

/// Holds the current food cell and the random source used to place it.
pub struct Food<R> {
    cell: Cell,
    rng: R,
}

impl<R: RandomSource> Food<R> {
    /// Stirs the generator with `stir` throwaway draws, then places the first
    /// food item.
    pub fn new(mut rng: R, stir: usize, body: &SnakeBody, reserved: &Region) -> Self {
        for _ in 0..stir {
            rng.next_byte();
        }

        let mut food = Food { cell: Cell::default(), rng };
        food.spawn(body, reserved);
        food
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }

    /// Rejection-samples cells until one is outside both the body and
    /// `reserved`. Does not terminate if no such cell exists, which the body
    /// capacity rules out.
    pub fn spawn(&mut self, body: &SnakeBody, reserved: &Region) -> Cell {
        self.cell = loop {
            let candidate = Cell::new(
                sample_below(&mut self.rng, GRID_W),
                sample_below(&mut self.rng, GRID_H),
            );
            if !body.is_occupied(candidate) && !reserved.contains(candidate) {
                break candidate;
            }
        };
        self.cell
    }

    pub fn into_rng(self) -> R {
        self.rng
    }
}

// Bytes above the largest multiple of `limit` are redrawn to keep the
// result uniform.
fn sample_below<R: RandomSource>(rng: &mut R, limit: u8) -> u8 {
    let zone = 256 - 256 % limit as u16;
    loop {
        let v = rng.next_byte() as u16;
        if v < zone {
            return (v % limit as u16) as u8;
        }
    }
}
