//! Interactive play in the terminal.
//!
//! Three sources feed one `select!` loop: keyboard events, the simulation
//! tick deadline and the render cadence. The tick deadline only exists while
//! the session is playing, so pausing or ending a run stops the ticks at once.
//! Rendering never stops; particles keep fading on every screen.

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior, interval, sleep_until};
use tracing::{info, warn};

use crate::game::{Command, GamePhase, GameSession};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;
use crate::storage::HighScoreStore;

pub struct HumanMode {
    session: GameSession,
    metrics: GameMetrics,
    store: Box<dyn HighScoreStore>,
    renderer: Renderer,
    input_handler: InputHandler,
    frame_interval: Duration,
    animation_start: Instant,
    next_tick: Option<Instant>,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(session: GameSession, store: Box<dyn HighScoreStore>, frame_interval: Duration) -> Self {
        let high_score = store.load().unwrap_or_else(|err| {
            warn!(error = %err, "could not read high score, starting from 0");
            0
        });

        Self {
            session,
            metrics: GameMetrics::with_high_score(high_score),
            store,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            frame_interval,
            animation_start: Instant::now(),
            next_tick: None,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut render_timer = interval(self.frame_interval);
        render_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let tick_deadline = self.next_tick;

            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick, armed only while playing
                _ = wait_for_tick(tick_deadline) => {
                    self.on_tick();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.session.advance_frame();
                    self.metrics.update();
                    let elapsed = self.animation_start.elapsed().as_secs_f32();
                    let snapshot = self.session.snapshot();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.metrics, elapsed);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key, self.session.phase()) {
                KeyAction::Game(command) => self.apply(command),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    /// Forward a command to the session and keep the clock, the high score
    /// and the tick driver in step with the resulting phase
    fn apply(&mut self, command: Command) {
        let before = self.session.phase();
        if !self.session.handle(command) {
            return;
        }

        match (before, self.session.phase()) {
            (GamePhase::Menu | GamePhase::GameOver, GamePhase::Playing) => {
                self.refresh_high_score();
                self.metrics.on_game_start();
            }
            (GamePhase::Playing, GamePhase::Paused) => self.metrics.on_pause(),
            (GamePhase::Paused, GamePhase::Playing) => self.metrics.on_resume(),
            (_, GamePhase::Menu) => self.metrics.on_pause(),
            _ => {}
        }

        self.sync_tick_driver();
    }

    fn on_tick(&mut self) {
        self.next_tick = None;

        if let Some(outcome) = self.session.tick() {
            let score = self.session.score();
            if let Err(err) = self.metrics.observe_score(score, self.store.as_mut()) {
                warn!(error = %err, score, "failed to persist high score");
            }

            if outcome.is_terminal() {
                self.metrics.on_game_over(score);
                info!(
                    score,
                    high_score = self.metrics.high_score,
                    games_played = self.metrics.games_played,
                    "game over"
                );
            }
        }

        self.sync_tick_driver();
    }

    /// Arm the tick deadline while playing and disarm it otherwise.
    ///
    /// A new deadline always uses the current tick interval, so a speed-up
    /// applies from the next tick on.
    fn sync_tick_driver(&mut self) {
        if self.session.phase() != GamePhase::Playing {
            self.next_tick = None;
        } else if self.next_tick.is_none() {
            self.next_tick = Some(Instant::now() + self.session.tick_interval());
        }
    }

    fn refresh_high_score(&mut self) {
        match self.store.load() {
            Ok(stored) => self.metrics.high_score = self.metrics.high_score.max(stored),
            Err(err) => warn!(error = %err, "could not read high score"),
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

async fn wait_for_tick(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => futures::future::pending().await,
    }
}
