//! App: terminal init, frame loop and key dispatch.

use crate::config::GameConfig;
use crate::game::{Engine, GameState};
use crate::input::{key_to_action, Action};
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use log::{debug, info};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};

pub struct App {
    engine: Engine,
    frame_interval: Duration,
}

impl App {
    pub fn new(config: GameConfig, frame_rate: f64, no_menu: bool) -> Self {
        let mut engine = Engine::new(config);
        if no_menu {
            engine.start(Instant::now());
        }
        Self {
            engine,
            frame_interval: Duration::from_secs_f64(1.0 / frame_rate),
        }
    }

    /// Dispatches one action against the current screen. Returns false when the app should exit.
    fn apply_action(&mut self, action: Action, now: Instant) -> bool {
        match (self.engine.state(), action) {
            (_, Action::Quit) | (GameState::GameOver, Action::Decline) => return false,
            (GameState::Menu, Action::Start) => self.engine.start(now),
            (GameState::Playing, Action::Game(command)) => {
                self.engine.handle(command, now);
            }
            (GameState::GameOver, Action::Restart) => self.engine.restart(now),
            _ => {}
        }
        true
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
            execute,
            terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        };

        enable_raw_mode().context("enabling raw mode")?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        // Repeat events for held keys when the terminal supports it.
        let _ = execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        );

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        let _ = execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
        // Run both restore steps even if the first fails; report the first error.
        let left =
            execute!(std::io::stdout(), LeaveAlternateScreen).context("leaving alternate screen");
        let raw = disable_raw_mode().context("disabling raw mode");

        info!("exiting with score {}", self.engine.score());
        result.and(left).and(raw)
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            terminal.draw(|f| crate::ui::draw(f, &self.engine))?;

            // Every Press/Repeat in this frame counts as the key being held; the engine's
            // cooldowns decide which of them actually apply.
            let frame_start = Instant::now();
            loop {
                let timeout = self.frame_interval.saturating_sub(frame_start.elapsed());
                if !event::poll(timeout)? {
                    break;
                }
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Release {
                        continue;
                    }
                    let action = key_to_action(key);
                    debug!("key {:?} -> {action:?}", key.code);
                    if !self.apply_action(action, Instant::now()) {
                        return Ok(());
                    }
                }
            }

            self.engine.tick(Instant::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Command;

    #[test]
    fn test_menu_to_playing_on_start() {
        let mut app = App::new(GameConfig::default(), 60.0, false);
        let now = Instant::now();
        assert!(app.apply_action(Action::Game(Command::HardDrop), now));
        assert_eq!(app.engine.state(), GameState::Menu);
        assert!(app.apply_action(Action::Start, now));
        assert_eq!(app.engine.state(), GameState::Playing);
    }

    #[test]
    fn test_no_menu_starts_playing() {
        let app = App::new(GameConfig::default(), 60.0, true);
        assert_eq!(app.engine.state(), GameState::Playing);
        assert!(app.engine.active().is_some());
    }

    #[test]
    fn test_quit_from_any_screen() {
        let mut app = App::new(GameConfig::default(), 60.0, false);
        assert!(!app.apply_action(Action::Quit, Instant::now()));
        app.engine.start(Instant::now());
        assert!(!app.apply_action(Action::Quit, Instant::now()));
    }

    #[test]
    fn test_decline_only_quits_after_game_over() {
        use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

        let n = key_to_action(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE));
        let mut app = App::new(GameConfig::default(), 60.0, false);
        let now = Instant::now();
        assert!(app.apply_action(n, now));
        assert_eq!(app.engine.state(), GameState::Menu);

        app.engine.start(now);
        assert!(app.apply_action(n, now));
        assert_eq!(app.engine.state(), GameState::Playing);

        // Stack pieces at the spawn column until one cannot enter.
        let mut t = now;
        while app.engine.state() == GameState::Playing {
            t += Duration::from_secs(1);
            app.apply_action(Action::Game(Command::HardDrop), t);
        }
        assert!(!app.apply_action(n, t));
    }

    #[test]
    fn test_restart_ignored_while_playing() {
        let mut app = App::new(GameConfig::default(), 60.0, true);
        let now = Instant::now();
        app.apply_action(Action::Game(Command::HardDrop), now);
        let score = app.engine.score();
        assert!(app.apply_action(Action::Restart, now));
        assert_eq!(app.engine.state(), GameState::Playing);
        assert_eq!(app.engine.score(), score);
    }

    #[test]
    fn test_frame_interval_from_rate() {
        let app = App::new(GameConfig::default(), 50.0, false);
        assert_eq!(app.frame_interval, Duration::from_millis(20));
    }
}
