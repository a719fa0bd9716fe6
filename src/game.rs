//! Game state: board, current and next piece, gravity, scoring, combo, phases.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;
use tracing::{debug, info};

use crate::GameConfig;
use crate::audio::Sound;
use crate::board::{Board, Row};
use crate::piece::Piece;
use crate::scoreboard::{DEFAULT_NAME, MAX_NAME_LEN, ScoreEntry, Scoreboard};

/// Gravity interval at level 1.
pub const BASE_GRAVITY_MS: u64 = 500;
/// Gravity never gets faster than this.
pub const MIN_GRAVITY_MS: u64 = 50;
/// Gravity speed-up per level.
const GRAVITY_STEP_MS: u64 = 30;
/// Clears closer together than this extend the combo.
pub const COMBO_WINDOW_MS: u64 = 3000;
pub const LINES_PER_LEVEL: u32 = 10;
/// Clears of at least this many rows shake the screen.
const SHAKE_ROWS: usize = 3;

/// Millisecond time source. The game never reads the wall clock itself.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Milliseconds since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Title menu.
    NotStarted,
    /// High-score list, reachable from the menu only.
    HighScores,
    Playing,
    Paused,
    /// The finished game qualified for the scoreboard; collecting a name.
    NameEntry,
    GameOver,
}

/// Discrete player input. Commands that do not apply to the current phase
/// are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    RotateClockwise,
    Pause,
    Start,
    ToggleHighScores,
    Restart,
    ToMenu,
    TextChar(char),
    Backspace,
    Confirm,
}

/// Notifications for the render, effect and audio adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    /// Rows as indexed before the collapse, with their cell colours.
    LinesCleared { rows: Vec<usize>, colors: Vec<Row> },
    ScreenShake,
    LevelUp(u32),
    Sound(Sound),
    GameOver { score: u32, qualified: bool },
    ScoreSubmitted(ScoreEntry),
}

/// Gravity interval for `level`.
pub fn gravity_interval_ms(level: u32) -> u64 {
    BASE_GRAVITY_MS
        .saturating_sub(u64::from(level) * GRAVITY_STEP_MS)
        .max(MIN_GRAVITY_MS)
}

#[derive(Debug)]
pub struct Game {
    board: Board,
    current: Piece,
    next: Piece,
    rng: StdRng,
    phase: Phase,
    score: u32,
    level: u32,
    lines_cleared: u32,
    gravity_interval_ms: u64,
    combo: u32,
    last_clear_ms: Option<u64>,
    last_fall_ms: u64,
    started_ms: u64,
    /// When the game stopped running (game over), for the time display.
    ended_ms: Option<u64>,
    paused_at_ms: Option<u64>,
    paused_total_ms: u64,
    /// Whether the last finished game made the scoreboard.
    qualified: bool,
    name: String,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(config: &GameConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::rng().random()),
        };
        let current = Piece::random(&mut rng);
        let next = Piece::random(&mut rng);
        Self {
            board: Board::new(),
            current,
            next,
            rng,
            phase: Phase::NotStarted,
            score: 0,
            level: 1,
            lines_cleared: 0,
            gravity_interval_ms: BASE_GRAVITY_MS,
            combo: 0,
            last_clear_ms: None,
            last_fall_ms: 0,
            started_ms: 0,
            ended_ms: None,
            paused_at_ms: None,
            paused_total_ms: 0,
            qualified: false,
            name: String::new(),
            events: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> &Piece {
        &self.current
    }

    pub fn next(&self) -> &Piece {
        &self.next
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn gravity_interval_ms(&self) -> u64 {
        self.gravity_interval_ms
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn made_scoreboard(&self) -> bool {
        self.qualified
    }

    /// Name typed so far during [`Phase::NameEntry`].
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Remaining fraction (1.0 -> 0.0) of the combo window at `now`.
    pub fn combo_window_ratio(&self, now: u64) -> f64 {
        match self.last_clear_ms {
            Some(t) if self.combo > 0 => {
                let left = COMBO_WINDOW_MS.saturating_sub(self.clock_ms(now).saturating_sub(t));
                left as f64 / COMBO_WINDOW_MS as f64
            }
            _ => 0.0,
        }
    }

    /// Seconds of play, excluding pauses; frozen once the game ends.
    pub fn elapsed_secs(&self, now: u64) -> u64 {
        self.clock_ms(now)
            .saturating_sub(self.started_ms)
            .saturating_sub(self.paused_total_ms)
            / 1000
    }

    /// `now`, held at the pause or end instant while the game is not running.
    fn clock_ms(&self, now: u64) -> u64 {
        self.ended_ms.or(self.paused_at_ms).unwrap_or(now)
    }

    /// Take the events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn handle(&mut self, command: Command, now: u64, scores: &mut Scoreboard) {
        match (self.phase, command) {
            (Phase::NotStarted | Phase::HighScores, Command::Start) => self.start(now),
            (Phase::NotStarted, Command::ToggleHighScores) => self.phase = Phase::HighScores,
            (Phase::HighScores, Command::ToggleHighScores) => self.phase = Phase::NotStarted,
            (Phase::Playing, Command::MoveLeft) => {
                self.try_move(-1, 0);
            }
            (Phase::Playing, Command::MoveRight) => {
                self.try_move(1, 0);
            }
            (Phase::Playing, Command::SoftDrop) => {
                self.try_move(0, 1);
            }
            (Phase::Playing, Command::RotateClockwise) => {
                self.try_rotate();
            }
            (Phase::Playing, Command::Pause) => {
                self.paused_at_ms = Some(now);
                self.phase = Phase::Paused;
            }
            (Phase::Paused, Command::Pause) => self.resume(now),
            (Phase::NameEntry, Command::TextChar(c)) => {
                if !c.is_control() && self.name.chars().count() < MAX_NAME_LEN {
                    self.name.push(c);
                }
            }
            (Phase::NameEntry, Command::Backspace) => {
                self.name.pop();
            }
            (Phase::NameEntry, Command::Confirm) => self.submit(scores),
            (Phase::GameOver, Command::Restart) => self.start(now),
            (Phase::GameOver, Command::ToMenu) => self.phase = Phase::NotStarted,
            _ => {}
        }
    }

    /// Advance gravity if the interval has elapsed since the last fall.
    pub fn tick(&mut self, now: u64, scores: &Scoreboard) {
        if self.phase != Phase::Playing {
            return;
        }
        if now.saturating_sub(self.last_fall_ms) > self.gravity_interval_ms {
            self.last_fall_ms = now;
            self.fall(now, scores);
        }
    }

    fn start(&mut self, now: u64) {
        self.board = Board::new();
        self.score = 0;
        self.level = 1;
        self.lines_cleared = 0;
        self.gravity_interval_ms = BASE_GRAVITY_MS;
        self.combo = 0;
        self.last_clear_ms = None;
        self.last_fall_ms = now;
        self.started_ms = now;
        self.ended_ms = None;
        self.paused_at_ms = None;
        self.paused_total_ms = 0;
        self.qualified = false;
        self.name.clear();
        self.current = Piece::random(&mut self.rng);
        self.next = Piece::random(&mut self.rng);
        self.phase = Phase::Playing;
        self.events.push(GameEvent::Started);
        info!("game started");
    }

    fn resume(&mut self, now: u64) {
        if let Some(at) = self.paused_at_ms.take() {
            let paused = now.saturating_sub(at);
            self.paused_total_ms += paused;
            self.last_fall_ms = self.last_fall_ms.saturating_add(paused);
            self.last_clear_ms = self.last_clear_ms.map(|t| t.saturating_add(paused));
        }
        self.phase = Phase::Playing;
    }

    fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        let moved = self.current.shifted(dx, dy);
        if self.board.collides(&moved) {
            return false;
        }
        self.current = moved;
        true
    }

    /// Rotation either fits in place or is rejected; there are no wall kicks.
    fn try_rotate(&mut self) -> bool {
        let rotated = self.current.rotated();
        if self.board.collides(&rotated) {
            return false;
        }
        self.current = rotated;
        true
    }

    fn fall(&mut self, now: u64, scores: &Scoreboard) {
        if self.try_move(0, 1) {
            return;
        }
        self.board.lock(&self.current);
        self.events.push(GameEvent::Sound(Sound::BlockDrop));
        self.resolve_clears(now);
        self.spawn(now, scores);
    }

    fn resolve_clears(&mut self, now: u64) {
        let rows = self.board.full_rows();
        if rows.is_empty() {
            return;
        }
        let n = rows.len() as u32;

        self.combo = match self.last_clear_ms {
            Some(t) if now.saturating_sub(t) < COMBO_WINDOW_MS => self.combo + 1,
            _ => 1,
        };
        self.last_clear_ms = Some(now);

        let gained = n * 100 * self.level + self.combo * 50;
        self.score += gained;

        self.lines_cleared += n;
        let level = self.lines_cleared / LINES_PER_LEVEL + 1;
        if level > self.level {
            self.level = level;
            self.gravity_interval_ms = gravity_interval_ms(level);
            self.events.push(GameEvent::LevelUp(level));
            self.events.push(GameEvent::Sound(Sound::LevelUp));
            info!(level, gravity_ms = self.gravity_interval_ms, "level up");
        }

        if rows.len() >= SHAKE_ROWS {
            self.events.push(GameEvent::ScreenShake);
        }

        let colors = self.board.row_snapshot(&rows);
        self.board.collapse_rows(&rows);
        debug!(rows = ?rows, combo = self.combo, gained, "lines cleared");
        self.events.push(GameEvent::Sound(Sound::LineClear));
        self.events.push(GameEvent::LinesCleared { rows, colors });
    }

    /// Promote the next piece. A spawn that collides ends the game.
    fn spawn(&mut self, now: u64, scores: &Scoreboard) {
        let next = Piece::random(&mut self.rng);
        self.current = std::mem::replace(&mut self.next, next);
        if self.board.collides(&self.current) {
            self.end(now, scores);
        }
    }

    fn end(&mut self, now: u64, scores: &Scoreboard) {
        let qualified = scores.is_high_score(self.score);
        self.qualified = qualified;
        self.ended_ms = Some(now);
        self.phase = if qualified {
            Phase::NameEntry
        } else {
            Phase::GameOver
        };
        self.events.push(GameEvent::Sound(Sound::GameOver));
        self.events.push(GameEvent::GameOver {
            score: self.score,
            qualified,
        });
        info!(score = self.score, qualified, "game over");
    }

    fn submit(&mut self, scores: &mut Scoreboard) {
        let trimmed = self.name.trim();
        let name = if trimmed.is_empty() {
            DEFAULT_NAME
        } else {
            trimmed
        };
        let entry = ScoreEntry::new(name, self.score);
        scores.add(entry.clone());
        self.events.push(GameEvent::ScoreSubmitted(entry));
        self.phase = Phase::GameOver;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{HEIGHT, WIDTH};
    use crate::piece::{BlockColor, ShapeKind};
    use std::cell::Cell;

    /// Clock the test moves by hand.
    struct ManualClock {
        now: Cell<u64>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self { now: Cell::new(0) }
        }

        fn advance(&self, ms: u64) -> u64 {
            self.now.set(self.now.get() + ms);
            self.now.get()
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> u64 {
            self.now.get()
        }
    }

    fn config() -> GameConfig {
        GameConfig { seed: Some(42) }
    }

    fn started() -> (Game, Scoreboard) {
        let mut game = Game::new(&config());
        let mut scores = Scoreboard::new();
        game.handle(Command::Start, 0, &mut scores);
        game.drain_events();
        (game, scores)
    }

    /// Fill row `y` except for column `gap`.
    fn fill_row_except(game: &mut Game, y: usize, gap: usize) {
        for x in (0..WIDTH).filter(|&x| x != gap) {
            game.board.set(x, y, Some(BlockColor::Red));
        }
    }

    /// A vertical I piece in column `x`, resting with its bottom on `bottom`.
    fn vertical_i(x: usize, bottom: usize) -> Piece {
        // Rotation 1 fills matrix column 2, rows 0..4.
        Piece {
            kind: ShapeKind::I,
            rotation: 1,
            x: x as i32 - 2,
            y: bottom as i32 - 3,
            color: BlockColor::Cyan,
        }
    }

    /// Run gravity until the current piece locks.
    fn drop_until_lock(game: &mut Game, scores: &Scoreboard, clock: &ManualClock) {
        let before = game.board.clone();
        for _ in 0..(HEIGHT * 2) {
            let now = clock.advance(game.gravity_interval_ms() + 1);
            game.tick(now, scores);
            if game.board != before || game.phase() != Phase::Playing {
                return;
            }
        }
        panic!("piece never locked");
    }

    #[test]
    fn test_start_resets_state() {
        let (game, _) = started();
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.score(), 0);
        assert_eq!(game.level(), 1);
        assert_eq!(game.gravity_interval_ms(), BASE_GRAVITY_MS);
        assert!(game.board().is_empty());
        assert_eq!((game.current().x, game.current().y), (Piece::SPAWN_X, 0));
    }

    #[test]
    fn test_menu_toggles_high_scores() {
        let mut game = Game::new(&config());
        let mut scores = Scoreboard::new();
        game.handle(Command::ToggleHighScores, 0, &mut scores);
        assert_eq!(game.phase(), Phase::HighScores);
        game.handle(Command::MoveLeft, 0, &mut scores);
        assert_eq!(game.phase(), Phase::HighScores);
        game.handle(Command::ToggleHighScores, 0, &mut scores);
        assert_eq!(game.phase(), Phase::NotStarted);
    }

    #[test]
    fn test_gravity_waits_for_interval() {
        let (mut game, scores) = started();
        let y = game.current().y;
        game.tick(BASE_GRAVITY_MS, &scores);
        assert_eq!(game.current().y, y);
        game.tick(BASE_GRAVITY_MS + 1, &scores);
        assert_eq!(game.current().y, y + 1);
        // The timer restarts from the fall.
        game.tick(BASE_GRAVITY_MS + 2, &scores);
        assert_eq!(game.current().y, y + 1);
    }

    #[test]
    fn test_move_rejected_at_wall() {
        let (mut game, mut scores) = started();
        game.current = Piece::new(ShapeKind::O, BlockColor::Yellow);
        for _ in 0..WIDTH {
            game.handle(Command::MoveLeft, 0, &mut scores);
        }
        assert_eq!(game.current().x, 0);
        game.handle(Command::MoveLeft, 0, &mut scores);
        assert_eq!(game.current().x, 0);
    }

    #[test]
    fn test_soft_drop_stops_on_floor_without_locking() {
        let (mut game, mut scores) = started();
        game.current = Piece::new(ShapeKind::O, BlockColor::Yellow);
        for _ in 0..HEIGHT * 2 {
            game.handle(Command::SoftDrop, 0, &mut scores);
        }
        assert_eq!(game.current().y, HEIGHT as i32 - 2);
        assert!(game.board().is_empty());
    }

    #[test]
    fn test_rotation_rejected_without_kick() {
        let (mut game, mut scores) = started();
        // Horizontal I hugging the floor cannot turn vertical.
        game.current = Piece {
            y: HEIGHT as i32 - 2,
            ..Piece::new(ShapeKind::I, BlockColor::Cyan)
        };
        let before = game.current;
        game.handle(Command::RotateClockwise, 0, &mut scores);
        assert_eq!(game.current, before);

        game.current = Piece::new(ShapeKind::T, BlockColor::Purple).shifted(0, 5);
        game.handle(Command::RotateClockwise, 0, &mut scores);
        assert_eq!(game.current.rotation, 1);
        assert_eq!((game.current.x, game.current.y), (Piece::SPAWN_X, 5));
    }

    #[test]
    fn test_lock_spawns_next_piece() {
        let (mut game, scores) = started();
        let clock = ManualClock::new();
        let next = *game.next();
        drop_until_lock(&mut game, &scores, &clock);
        assert_eq!(game.board().rows().iter().flatten().flatten().count(), 4);
        assert_eq!(game.current().kind, next.kind);
        assert_eq!(game.current().color, next.color);
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::Sound(Sound::BlockDrop)));
    }

    #[test]
    fn test_two_line_clear_scores_250() {
        let (mut game, scores) = started();
        let clock = ManualClock::new();
        fill_row_except(&mut game, HEIGHT - 1, 0);
        fill_row_except(&mut game, HEIGHT - 2, 0);
        game.current = vertical_i(0, HEIGHT - 3);
        drop_until_lock(&mut game, &scores, &clock);

        assert_eq!(game.score(), 2 * 100 + 50);
        assert_eq!(game.combo(), 1);
        assert_eq!(game.lines_cleared(), 2);
        // The two leftover I cells dropped to the floor.
        assert_eq!(game.board().get(0, HEIGHT - 1), Some(BlockColor::Cyan));
        assert_eq!(game.board().get(0, HEIGHT - 2), Some(BlockColor::Cyan));
        assert_eq!(game.board().rows().iter().flatten().flatten().count(), 2);

        let events = game.drain_events();
        let cleared = events.iter().find_map(|e| match e {
            GameEvent::LinesCleared { rows, colors } => Some((rows.clone(), colors.clone())),
            _ => None,
        });
        let (rows, colors) = cleared.unwrap();
        assert_eq!(rows, vec![HEIGHT - 2, HEIGHT - 1]);
        assert_eq!(colors[0][0], Some(BlockColor::Cyan));
        assert_eq!(colors[0][1], Some(BlockColor::Red));
        assert!(!events.contains(&GameEvent::ScreenShake));
    }

    #[test]
    fn test_combo_window() {
        let (mut game, _) = started();
        game.resolve_clears(0);
        assert_eq!(game.combo(), 0);

        fill_row_except(&mut game, HEIGHT - 1, WIDTH);
        game.resolve_clears(1_000);
        assert_eq!(game.combo(), 1);

        fill_row_except(&mut game, HEIGHT - 1, WIDTH);
        game.resolve_clears(3_999);
        assert_eq!(game.combo(), 2);
        assert_eq!(game.score(), (100 + 50) + (100 + 100));

        // A clear with nothing to clear leaves the combo alone.
        game.resolve_clears(4_000);
        assert_eq!(game.combo(), 2);

        fill_row_except(&mut game, HEIGHT - 1, WIDTH);
        game.resolve_clears(3_999 + COMBO_WINDOW_MS);
        assert_eq!(game.combo(), 1);
    }

    #[test]
    fn test_level_up_speeds_gravity() {
        let (mut game, _) = started();
        game.lines_cleared = 8;
        fill_row_except(&mut game, HEIGHT - 1, WIDTH);
        fill_row_except(&mut game, HEIGHT - 2, WIDTH);
        fill_row_except(&mut game, HEIGHT - 3, WIDTH);
        game.resolve_clears(0);

        assert_eq!(game.lines_cleared(), 11);
        assert_eq!(game.level(), 2);
        assert_eq!(game.gravity_interval_ms(), 500 - 2 * 30);
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::LevelUp(2)));
        assert!(events.contains(&GameEvent::ScreenShake));
        assert!(events.contains(&GameEvent::Sound(Sound::LevelUp)));
    }

    #[test]
    fn test_gravity_floor() {
        assert_eq!(gravity_interval_ms(1), 470);
        assert_eq!(gravity_interval_ms(15), 50);
        assert_eq!(gravity_interval_ms(16), 50);
        assert_eq!(gravity_interval_ms(100), 50);
    }

    #[test]
    fn test_blocked_spawn_goes_to_name_entry() {
        let (mut game, scores) = started();
        let clock = ManualClock::new();
        // Tower under the spawn area; leave a gap per row so nothing clears.
        for y in 2..HEIGHT {
            fill_row_except(&mut game, y, 0);
        }
        game.current = Piece::new(ShapeKind::O, BlockColor::Yellow);
        drop_until_lock(&mut game, &scores, &clock);

        assert_eq!(game.phase(), Phase::NameEntry);
        assert!(game.made_scoreboard());
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::GameOver {
            score: 0,
            qualified: true
        }));
        // Gravity no longer runs.
        let board = game.board().clone();
        game.tick(clock.advance(10_000), &scores);
        assert_eq!(game.board(), &board);
    }

    #[test]
    fn test_blocked_spawn_without_high_score_is_game_over() {
        let (mut game, _) = started();
        let mut scores = Scoreboard::new();
        for s in [10, 20, 30, 40, 50] {
            scores.add(ScoreEntry::new("x", s));
        }
        for y in 2..HEIGHT {
            fill_row_except(&mut game, y, 0);
        }
        game.current = Piece::new(ShapeKind::O, BlockColor::Yellow);
        drop_until_lock(&mut game, &scores, &ManualClock::new());
        assert_eq!(game.phase(), Phase::GameOver);
        assert!(!game.made_scoreboard());
    }

    #[test]
    fn test_name_entry_and_submit() {
        let (mut game, mut scores) = started();
        game.score = 1234;
        game.phase = Phase::NameEntry;
        for c in "  Ada Lovelace the first  ".chars() {
            game.handle(Command::TextChar(c), 0, &mut scores);
        }
        game.handle(Command::TextChar('\n'), 0, &mut scores);
        assert_eq!(game.name().chars().count(), MAX_NAME_LEN);
        game.handle(Command::Backspace, 0, &mut scores);
        game.handle(Command::Confirm, 0, &mut scores);

        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(scores.entries(), &[ScoreEntry::new("Ada Lovelace", 1234)]);
    }

    #[test]
    fn test_blank_name_is_anonymous() {
        let (mut game, mut scores) = started();
        game.score = 10;
        game.phase = Phase::NameEntry;
        game.handle(Command::TextChar(' '), 0, &mut scores);
        game.handle(Command::Confirm, 0, &mut scores);
        assert_eq!(scores.entries(), &[ScoreEntry::new(DEFAULT_NAME, 10)]);
        assert!(
            game.drain_events()
                .contains(&GameEvent::ScoreSubmitted(ScoreEntry::new(DEFAULT_NAME, 10)))
        );
    }

    #[test]
    fn test_restart_and_menu_from_game_over() {
        let (mut game, mut scores) = started();
        game.score = 99;
        game.phase = Phase::GameOver;
        game.handle(Command::Restart, 5_000, &mut scores);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.score(), 0);

        game.phase = Phase::GameOver;
        game.handle(Command::ToMenu, 0, &mut scores);
        assert_eq!(game.phase(), Phase::NotStarted);
    }

    #[test]
    fn test_pause_freezes_gravity_and_clock() {
        let (mut game, mut scores) = started();
        let y = game.current().y;
        game.handle(Command::Pause, 400, &mut scores);
        game.tick(5_000, &scores);
        assert_eq!(game.current().y, y);
        assert_eq!(game.elapsed_secs(5_000), 0);

        game.handle(Command::Pause, 5_000, &mut scores);
        assert_eq!(game.phase(), Phase::Playing);
        // 400 ms of the interval had passed before the pause.
        game.tick(5_100, &scores);
        assert_eq!(game.current().y, y);
        game.tick(5_101, &scores);
        assert_eq!(game.current().y, y + 1);
        assert_eq!(game.elapsed_secs(7_000), 2);
    }

    #[test]
    fn test_pause_keeps_combo_window() {
        let (mut game, mut scores) = started();
        fill_row_except(&mut game, HEIGHT - 1, WIDTH);
        game.resolve_clears(1_000);
        assert_eq!(game.combo(), 1);

        game.handle(Command::Pause, 1_500, &mut scores);
        let ratio = game.combo_window_ratio(1_500);
        assert_eq!(game.combo_window_ratio(10_000), ratio);
        game.handle(Command::Pause, 10_000, &mut scores);
        assert_eq!(game.combo_window_ratio(10_000), ratio);

        fill_row_except(&mut game, HEIGHT - 1, WIDTH);
        game.resolve_clears(10_500);
        assert_eq!(game.combo(), 2);
    }

    #[test]
    fn test_seeded_games_match() {
        let a = Game::new(&config());
        let b = Game::new(&config());
        assert_eq!(a.current(), b.current());
        assert_eq!(a.next(), b.next());
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
