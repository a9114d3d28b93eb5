//! One game of snake, from the first frame to game over.
//!
//! [`Session::tick`] runs once per frame and owns every piece of game state;
//! the clock, input and display are borrowed for the duration of the call.
//! [`Session::run`] is the frame loop around it, including the short hold
//! before the game-over screen.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::GameConfig;
use crate::display::Display;
use crate::food::{Food, RandomSource};
use crate::grid::{Cell, Direction, Region};
use crate::hunger::{Hunger, SpeedRamp};
use crate::input::Input;
use crate::pause::PauseClock;
use crate::snake::SnakeBody;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    SelfCollision,
    Starved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Paused,
    GameOver { seconds: u32, reason: GameOverReason },
}

pub struct Session<R> {
    body: SnakeBody,
    food: Food<R>,
    hunger: Hunger,
    speed: SpeedRamp,
    pause: PauseClock,
    state: SessionState,
    direction: Direction,
    frames_since_move: u32,
    reserved: Region,
    game_over_delay: u32,
}

impl<R: RandomSource> Session<R> {
    /// Lays out the starting body and places the first food item outside
    /// `reserved`.
    pub fn new(config: &GameConfig, rng: R, reserved: Region) -> Self {
        let body = SnakeBody::new(config.initial_length);
        let food = Food::new(rng, config.rng_stir_draws, &body, &reserved);

        Session {
            body,
            food,
            hunger: Hunger::new(config.hunger_limit_secs, config.hunger_warn_secs),
            speed: SpeedRamp::new(
                config.move_interval,
                config.min_move_interval,
                config.speedup_period_secs,
            ),
            pause: PauseClock::new(),
            state: SessionState::Running,
            direction: Direction::Right,
            frames_since_move: 0,
            reserved,
            game_over_delay: config.game_over_delay_frames,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn body(&self) -> &SnakeBody {
        &self.body
    }

    pub fn food(&self) -> Cell {
        self.food.cell()
    }

    pub fn hunger(&self) -> &Hunger {
        &self.hunger
    }

    pub fn pause(&self) -> &PauseClock {
        &self.pause
    }

    pub fn move_interval(&self) -> u32 {
        self.speed.interval()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Gives back the random source so the next game continues its sequence
    /// instead of replaying it.
    pub fn into_rng(self) -> R {
        self.food.into_rng()
    }

    /// Seconds of play so far, paused time excluded.
    pub fn display_seconds<C: Clock>(&self, clock: &C) -> u32 {
        self.pause.display_seconds(clock.seconds_elapsed())
    }

    /// Zeroes the clock and paints the starting board.
    pub fn start<C: Clock, D: Display>(&mut self, clock: &mut C, display: &mut D) -> Result<()> {
        clock.reset();
        display.clear()?;
        self.redraw(0, display)?;
        display.flush()?;

        info!(
            length = self.body.len(),
            interval = self.speed.interval(),
            food_x = self.food.cell().x,
            food_y = self.food.cell().y,
            "session started"
        );
        Ok(())
    }

    /// Plays frames until the game ends or the player quits. Returns the
    /// final seconds, or `None` on quit.
    pub fn run<C, I, D>(&mut self, clock: &mut C, input: &mut I, display: &mut D) -> Result<Option<u32>>
    where
        C: Clock,
        I: Input,
        D: Display,
    {
        self.start(clock, display)?;

        loop {
            clock.wait_for_next_frame();
            input.update()?;
            if input.quit_requested() {
                info!("quit requested mid-session");
                return Ok(None);
            }

            let state = self.tick(clock, input, display)?;
            display.flush()?;

            if let SessionState::GameOver { seconds, .. } = state {
                for _ in 0..self.game_over_delay {
                    clock.wait_for_next_frame();
                }
                display
                    .draw_game_over(seconds)
                    .context("Failed to draw game over screen")?;
                display.flush()?;
                return Ok(Some(seconds));
            }
        }
    }

    /// Processes one frame: pause transitions, then movement, then the
    /// once-per-second work. The first game-over trigger ends the frame.
    pub fn tick<C, I, D>(&mut self, clock: &mut C, input: &mut I, display: &mut D) -> Result<SessionState>
    where
        C: Clock,
        I: Input,
        D: Display,
    {
        match self.state {
            SessionState::GameOver { .. } => return Ok(self.state),
            SessionState::Paused => {
                self.pause.drain_pending_second_edge(clock);
                if input.poll_unpause_press_edge() {
                    self.resume(clock, display)?;
                }
                return Ok(self.state);
            }
            SessionState::Running => {}
        }

        if input.poll_pause_press_edge() {
            self.pause.begin(clock.seconds_elapsed());
            self.pause.drain_pending_second_edge(clock);
            self.state = SessionState::Paused;
            display.draw_pause_overlay()?;
            debug!(at = self.display_seconds(clock), "paused");
            return Ok(self.state);
        }

        self.direction = input.poll_direction();

        self.frames_since_move += 1;
        if self.frames_since_move >= self.speed.interval() {
            self.frames_since_move = 0;
            self.advance(clock, display)?;
            if self.is_over() {
                return Ok(self.state);
            }
        }

        if clock.consume_second_edge() {
            self.on_second(clock, display)?;
        }

        Ok(self.state)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn is_over(&self) -> bool {
        matches!(self.state, SessionState::GameOver { .. })
    }

    fn advance<C: Clock, D: Display>(&mut self, clock: &C, display: &mut D) -> Result<()> {
        let next = self.body.peek_next(self.direction);

        if self.body.will_collide(next) {
            self.finish(GameOverReason::SelfCollision, clock);
            return Ok(());
        }

        if next != self.food.cell() {
            let vacated = self.body.step(self.direction);
            return display.draw_step(vacated, next);
        }

        match self.body.step_grow(self.direction) {
            // Capped growth still drops the tail.
            Some(vacated) => display.draw_step(vacated, next)?,
            None => display.draw_grow(next)?,
        }

        self.hunger.on_feed();
        display.draw_border(self.hunger.tone())?;

        let food = self.food.spawn(&self.body, &self.reserved);
        display.draw_food(food)?;

        debug!(length = self.body.len(), food_x = food.x, food_y = food.y, "ate");
        Ok(())
    }

    fn on_second<C: Clock, D: Display>(&mut self, clock: &C, display: &mut D) -> Result<()> {
        display.draw_elapsed_time(self.display_seconds(clock))?;

        if self.speed.on_second_tick() {
            debug!(interval = self.speed.interval(), "speed up");
        }

        let starved = self.hunger.on_second_tick();
        display.draw_border(self.hunger.tone())?;
        if starved {
            self.finish(GameOverReason::Starved, clock);
        }
        Ok(())
    }

    fn resume<C: Clock, D: Display>(&mut self, clock: &mut C, display: &mut D) -> Result<()> {
        self.pause.end(clock.seconds_elapsed());
        self.state = SessionState::Running;

        display.hide_pause_overlay()?;
        self.redraw(self.display_seconds(clock), display)?;

        debug!(bias = self.pause.bias(), "resumed");
        Ok(())
    }

    fn redraw<D: Display>(&self, seconds: u32, display: &mut D) -> Result<()> {
        display.draw_border(self.hunger.tone())?;
        display.draw_body_full(&self.body)?;
        display.draw_food(self.food.cell())?;
        display.draw_elapsed_time(seconds)
    }

    fn finish<C: Clock>(&mut self, reason: GameOverReason, clock: &C) {
        let seconds = self.display_seconds(clock);
        self.state = SessionState::GameOver { seconds, reason };
        info!(?reason, seconds, length = self.body.len(), "game over");
    }
}
