//! App: terminal init, main loop, event dispatch to effects, audio and storage.

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::audio::AudioSink;
use crate::effects::Effects;
use crate::game::{Clock, Command, Game, GameEvent, SystemClock};
use crate::highscores::{self, JsonFileStore};
use crate::input::{Action, key_to_action};
use crate::scoreboard::Scoreboard;
use crate::theme::Theme;
use crate::ui::{self, LineFlash, View};
use crate::{Args, GameConfig};

pub struct App {
    theme: Theme,
    game: Game,
    scoreboard: Scoreboard,
    store: JsonFileStore,
    effects: Effects,
    audio: Box<dyn AudioSink>,
    clock: SystemClock,
    frame_duration: Duration,
    flash: LineFlash,
    no_menu: bool,
}

impl App {
    pub fn new(
        args: &Args,
        config: GameConfig,
        theme: Theme,
        store: JsonFileStore,
        audio: Box<dyn AudioSink>,
    ) -> Self {
        let scoreboard = Scoreboard::load(&store);
        info!(
            path = %store.path().display(),
            entries = scoreboard.entries().len(),
            "loaded high scores"
        );
        let frame_rate = args.frame_rate.max(1);
        Self {
            theme,
            game: Game::new(&config),
            scoreboard,
            store,
            effects: Effects::new(config.seed.unwrap_or_else(rand::random)),
            audio,
            clock: SystemClock::new(),
            frame_duration: Duration::from_secs(1) / frame_rate,
            flash: LineFlash::default(),
            no_menu: args.no_menu,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        // Restore
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        if self.no_menu {
            self.apply(Command::Start);
        }
        loop {
            let frame_start = Instant::now();

            let timeout = self.frame_duration.saturating_sub(frame_start.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    let Event::Key(key) = event::read()? else {
                        continue;
                    };
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match key_to_action(key, self.game.phase()) {
                        Action::Quit => return Ok(()),
                        Action::Game(command) => self.apply(command),
                        Action::None => {}
                    }
                }
            }

            self.game.tick(self.clock.now_ms(), &self.scoreboard);
            self.dispatch_events();
            self.effects.step();

            let now = Instant::now();
            let view = View {
                game: &self.game,
                scoreboard: &self.scoreboard,
                effects: &self.effects,
                theme: &self.theme,
                now_ms: self.clock.now_ms(),
            };
            let flash = &mut self.flash;
            terminal.draw(|f| ui::draw(f, &view, flash, now))?;

            // Keep the frame rate steady when input arrived early.
            let spent = frame_start.elapsed();
            if spent < self.frame_duration {
                std::thread::sleep(self.frame_duration - spent);
            }
        }
    }

    fn apply(&mut self, command: Command) {
        self.game
            .handle(command, self.clock.now_ms(), &mut self.scoreboard);
        self.dispatch_events();
    }

    fn dispatch_events(&mut self) {
        for event in self.game.drain_events() {
            match &event {
                GameEvent::Sound(sound) => self.audio.play(*sound),
                GameEvent::LinesCleared { rows, .. } => self.flash.trigger(rows.clone()),
                GameEvent::Started => self.flash.reset(),
                GameEvent::ScoreSubmitted(entry) => {
                    info!(name = %entry.name, score = entry.score, "score submitted");
                    debug!(path = %self.store.path().display(), "saving high scores");
                    highscores::save_in_background(self.store.clone(), self.scoreboard.clone());
                }
                GameEvent::LevelUp(_) | GameEvent::GameOver { .. } | GameEvent::ScreenShake => {}
            }
            self.effects.on_event(&event);
        }
    }
}
