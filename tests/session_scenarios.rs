use std::collections::{HashMap, HashSet};

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use wrap_snake::clock::{Clock, FrameTimer};
use wrap_snake::display::{Display, HUD_TIME_REGION};
use wrap_snake::food::RandomSource;
use wrap_snake::grid::{Cell, Direction, Region};
use wrap_snake::hunger::BorderTone;
use wrap_snake::input::{DirectionLatch, Input};
use wrap_snake::{GameConfig, GameOverReason, Session, SessionState, SnakeBody, GRID_W};

/// Input driven by a per-frame script. Frame numbers start at 1.
struct ScriptedInput {
    frame: u32,
    turns: HashMap<u32, Direction>,
    toggles: HashSet<u32>,
    latch: DirectionLatch,
    toggle: bool,
}

impl ScriptedInput {
    fn new() -> Self {
        ScriptedInput {
            frame: 0,
            turns: HashMap::new(),
            toggles: HashSet::new(),
            latch: DirectionLatch::new(Direction::Right),
            toggle: false,
        }
    }

    fn turn_at(mut self, frame: u32, direction: Direction) -> Self {
        self.turns.insert(frame, direction);
        self
    }

    fn toggle_at(mut self, frame: u32) -> Self {
        self.toggles.insert(frame);
        self
    }
}

impl Input for ScriptedInput {
    fn update(&mut self) -> Result<()> {
        self.frame += 1;
        self.toggle = self.toggles.contains(&self.frame);
        Ok(())
    }

    fn poll_direction(&mut self) -> Direction {
        match self.turns.get(&self.frame) {
            Some(dir) => self.latch.offer(*dir),
            None => self.latch.current(),
        }
    }

    fn poll_pause_press_edge(&mut self) -> bool {
        std::mem::take(&mut self.toggle)
    }

    fn poll_unpause_press_edge(&mut self) -> bool {
        std::mem::take(&mut self.toggle)
    }
}

/// Mirrors what would be on screen.
#[derive(Default)]
struct Recorder {
    snake: HashSet<Cell>,
    food: Option<Cell>,
    time: Option<u32>,
    tones: Vec<BorderTone>,
    game_over: Option<u32>,
    overlay: bool,
    full_redraws: usize,
}

impl Display for Recorder {
    fn clear(&mut self) -> Result<()> {
        self.snake.clear();
        self.food = None;
        Ok(())
    }

    fn draw_body_full(&mut self, body: &SnakeBody) -> Result<()> {
        self.full_redraws += 1;
        self.snake.extend(body.iter());
        Ok(())
    }

    fn draw_step(&mut self, vacated: Cell, new_head: Cell) -> Result<()> {
        self.snake.remove(&vacated);
        self.snake.insert(new_head);
        Ok(())
    }

    fn draw_grow(&mut self, new_head: Cell) -> Result<()> {
        self.snake.insert(new_head);
        Ok(())
    }

    fn draw_food(&mut self, cell: Cell) -> Result<()> {
        self.food = Some(cell);
        Ok(())
    }

    fn erase_cell(&mut self, cell: Cell) -> Result<()> {
        self.snake.remove(&cell);
        Ok(())
    }

    fn draw_elapsed_time(&mut self, seconds: u32) -> Result<()> {
        self.time = Some(seconds);
        Ok(())
    }

    fn draw_border(&mut self, tone: BorderTone) -> Result<()> {
        self.tones.push(tone);
        Ok(())
    }

    fn draw_game_over(&mut self, seconds: u32) -> Result<()> {
        self.game_over = Some(seconds);
        Ok(())
    }

    fn draw_pause_overlay(&mut self) -> Result<()> {
        self.overlay = true;
        Ok(())
    }

    fn hide_pause_overlay(&mut self) -> Result<()> {
        self.overlay = false;
        Ok(())
    }
}

struct Rig {
    session: Session<StdRng>,
    clock: FrameTimer,
    input: ScriptedInput,
    display: Recorder,
}

impl Rig {
    fn new(config: GameConfig, input: ScriptedInput) -> Self {
        let mut rig = Rig {
            session: Session::new(&config, StdRng::seed_from_u64(11), HUD_TIME_REGION),
            clock: FrameTimer::new(config.frames_per_second),
            input,
            display: Recorder::default(),
        };
        rig.session.start(&mut rig.clock, &mut rig.display).unwrap();
        rig
    }

    fn frame(&mut self) -> SessionState {
        self.clock.wait_for_next_frame();
        self.input.update().unwrap();
        self.session
            .tick(&mut self.clock, &mut self.input, &mut self.display)
            .unwrap()
    }
}

fn body_cells(body: &SnakeBody) -> HashSet<Cell> {
    body.iter().collect()
}

fn fast(config: GameConfig) -> GameConfig {
    GameConfig { move_interval: 1, min_move_interval: 1, ..config }
}

#[test]
fn straight_run_wraps_once_without_collision() {
    let mut rig = Rig::new(GameConfig::default(), ScriptedInput::new());
    assert_eq!(rig.session.body().len(), 16);
    assert_eq!(rig.session.body().head(), Cell::new(27, 12));

    let mut wraps = 0;
    let mut head = rig.session.body().head();
    for _ in 0..8 * 16 {
        assert_eq!(rig.frame(), SessionState::Running);
        let next = rig.session.body().head();
        if head.x == GRID_W - 1 && next.x == 0 {
            wraps += 1;
        }
        head = next;
    }

    assert_eq!(wraps, 1);
    assert_eq!(head.y, 12);
    assert_eq!(head.x, (27 + 16) % GRID_W);
}

#[test]
fn occupancy_and_screen_track_the_body() {
    let mut steer = StdRng::seed_from_u64(99);
    let mut input = ScriptedInput::new().toggle_at(300).toggle_at(420);
    let directions = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];
    for frame in (4..3000).step_by(8) {
        input = input.turn_at(frame, directions[steer.gen_range(0..4)]);
    }

    let config = GameConfig { hunger_limit_secs: 1000, ..GameConfig::default() };
    let mut rig = Rig::new(config, input);

    for _ in 0..3000 {
        let state = rig.frame();
        let body = rig.session.body();
        let cells = body_cells(body);

        assert_eq!(cells.len(), body.len());
        assert_eq!(body.occupancy().iter().collect::<HashSet<_>>(), cells);
        assert_eq!(rig.display.snake, cells);

        let food = rig.session.food();
        assert!(!body.is_occupied(food));
        assert!(!HUD_TIME_REGION.contains(food));
        assert_eq!(rig.display.food, Some(food));

        if matches!(state, SessionState::GameOver { .. }) {
            break;
        }
    }
}

#[test]
fn pause_excludes_paused_time() {
    let config = GameConfig { hunger_limit_secs: 100, ..GameConfig::default() };
    let input = ScriptedInput::new().toggle_at(501).toggle_at(2001);
    let mut rig = Rig::new(config, input);

    for _ in 0..500 {
        rig.frame();
    }
    assert_eq!(rig.clock.seconds_elapsed(), 10);
    assert_eq!(rig.session.display_seconds(&rig.clock), 10);
    assert_eq!(rig.display.time, Some(10));
    let hunger_before = rig.session.hunger().remaining();
    let head_before = rig.session.body().head();

    assert_eq!(rig.frame(), SessionState::Paused);
    assert!(rig.display.overlay);
    for _ in 0..1499 {
        assert_eq!(rig.frame(), SessionState::Paused);
    }
    assert_eq!(rig.clock.seconds_elapsed(), 40);
    assert_eq!(rig.session.body().head(), head_before);

    let redraws = rig.display.full_redraws;
    assert_eq!(rig.frame(), SessionState::Running);
    assert!(!rig.display.overlay);
    assert_eq!(rig.display.full_redraws, redraws + 1);
    assert_eq!(rig.session.pause().bias(), 30);
    assert_eq!(rig.session.display_seconds(&rig.clock), 10);
    assert_eq!(rig.display.time, Some(10));
    assert_eq!(rig.session.hunger().remaining(), hunger_before);

    for _ in 0..49 {
        rig.frame();
    }
    assert_eq!(rig.display.time, Some(11));
}

#[test]
fn starves_when_never_fed() {
    let config = GameConfig {
        move_interval: 10_000,
        min_move_interval: 10_000,
        ..GameConfig::default()
    };
    let mut rig = Rig::new(config, ScriptedInput::new());

    for _ in 0..599 {
        assert_eq!(rig.frame(), SessionState::Running);
    }
    assert_eq!(
        rig.frame(),
        SessionState::GameOver { seconds: 12, reason: GameOverReason::Starved }
    );
    assert_eq!(rig.session.hunger().remaining(), 0);
    assert_eq!(rig.display.tones.last(), Some(&BorderTone::Starved));
    assert!(rig
        .display
        .tones
        .contains(&BorderTone::Warning { flash: true }));
}

#[test]
fn self_collision_ends_the_run() {
    let config = fast(GameConfig { initial_length: 5, ..GameConfig::default() });
    let input = ScriptedInput::new()
        .turn_at(1, Direction::Down)
        .turn_at(2, Direction::Left)
        .turn_at(3, Direction::Up);

    let mut session = Session::new(&config, StdRng::seed_from_u64(5), HUD_TIME_REGION);
    let mut clock = FrameTimer::new(config.frames_per_second);
    let mut input = input;
    let mut display = Recorder::default();

    let seconds = session.run(&mut clock, &mut input, &mut display).unwrap();
    assert_eq!(seconds, Some(0));
    assert_eq!(
        session.state(),
        SessionState::GameOver { seconds: 0, reason: GameOverReason::SelfCollision }
    );
    assert_eq!(display.game_over, Some(0));
    assert_eq!(clock.frames_elapsed(), 3 + config.game_over_delay_frames);
}

#[test]
fn collision_wins_over_starvation_on_the_same_frame() {
    let config = fast(GameConfig {
        initial_length: 5,
        hunger_limit_secs: 1,
        hunger_warn_secs: 0,
        ..GameConfig::default()
    });
    let input = ScriptedInput::new()
        .turn_at(48, Direction::Down)
        .turn_at(49, Direction::Left)
        .turn_at(50, Direction::Up);
    let mut rig = Rig::new(config, input);

    for _ in 0..49 {
        assert_eq!(rig.frame(), SessionState::Running);
    }
    assert_eq!(
        rig.frame(),
        SessionState::GameOver { seconds: 1, reason: GameOverReason::SelfCollision }
    );
    // The hunger tick never ran.
    assert_eq!(rig.session.hunger().remaining(), 1);
}

#[test]
fn food_is_placed_outside_reserved_region() {
    let config = GameConfig::default();
    let reserved = Region::new(0, 0, 40, 12);
    for seed in 0..20 {
        let session = Session::new(&config, StdRng::seed_from_u64(seed), reserved);
        let food = session.food();
        assert!(!reserved.contains(food));
        assert!(!session.body().is_occupied(food));
    }
}

#[test]
fn seeded_sessions_place_food_alike() {
    fn first_food<R: RandomSource>(rng: R) -> Cell {
        Session::new(&GameConfig::default(), rng, HUD_TIME_REGION).food()
    }
    assert_eq!(
        first_food(StdRng::seed_from_u64(42)),
        first_food(StdRng::seed_from_u64(42))
    );
}

#[test]
fn restarted_sessions_continue_the_random_sequence() {
    let config = GameConfig::default();
    let mut differing = 0;

    for seed in 0..10 {
        let first = Session::new(&config, StdRng::seed_from_u64(seed), HUD_TIME_REGION);
        let first_food = first.food();
        let second = Session::new(&config, first.into_rng(), HUD_TIME_REGION);

        // A fresh generator with the same seed replays the first game exactly.
        let replay = Session::new(&config, StdRng::seed_from_u64(seed), HUD_TIME_REGION);
        assert_eq!(replay.food(), first_food);

        if second.food() != first_food {
            differing += 1;
        }
    }
    assert!(differing > 0, "carried generator replayed the first game's food");
}
