//! Snake on a fixed 40x25 wrap-around text grid.
//!
//! The core (body ring buffer, occupancy bitset, food placement, hunger,
//! pause accounting and the per-frame [`session::Session`]) never touches the
//! terminal directly; it talks to the [`clock::Clock`], [`input::Input`] and
//! [`display::Display`] traits. [`term`] and [`input::KeyboardInput`] are the
//! crossterm implementations used by the binary.

pub mod clock;
pub mod config;
pub mod display;
pub mod food;
pub mod grid;
pub mod hunger;
pub mod input;
pub mod pause;
pub mod session;
pub mod snake;
pub mod term;

pub use config::GameConfig;
pub use grid::{Cell, Direction, GRID_H, GRID_W};
pub use session::{GameOverReason, Session, SessionState};
pub use snake::{SnakeBody, CAPACITY};
