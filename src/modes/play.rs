use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stderr, Stderr};
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, error, info};

use crate::game::{Action, Arena, Direction, FinalScores, GameConfig, SnakeId};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionMetrics;
use crate::render::Renderer;

/// Interactive session: rounds of play in the terminal until the players quit
pub struct PlayMode {
    config: GameConfig,
    arena: Arena,
    metrics: SessionMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    /// Latest accepted direction per player since the last tick
    pending_directions: Vec<Option<Direction>>,
}

impl PlayMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let arena = Arena::new(&config, &[]).context("Failed to set up the arena")?;
        let players = arena.snakes().len();

        Ok(Self {
            metrics: SessionMetrics::new(players),
            renderer: Renderer::new(&config),
            input_handler: InputHandler::new(),
            should_quit: false,
            pending_directions: vec![None; players],
            config,
            arena,
        })
    }

    /// Play until quit, returning the scores of the last round
    pub async fn run(&mut self) -> Result<FinalScores> {
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
        let cleanup = self.cleanup_terminal(&mut terminal);

        finish_session(result, cleanup)?;
        let scores = self.arena.final_scores();
        info!(
            rounds = self.metrics.rounds_played,
            scores = ?scores.points(),
            "session ended"
        );
        Ok(scores)
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let tick_interval = Duration::from_secs_f64(1.0 / f64::from(self.config.tick_rate_hz));
        let mut tick_timer = interval(tick_interval);

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    if self.arena.is_running() {
                        self.update_game()?;
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    if self.arena.is_running() {
                        self.metrics.update();
                    }
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.arena, &self.metrics);
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

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Steer { player, direction } => {
                    self.queue_direction(player, direction);
                }
                KeyAction::NextRound => {
                    if !self.arena.is_running() {
                        self.next_round()?;
                    }
                }
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }

        Ok(())
    }

    /// Buffer a turn for the next tick. Reversals of the snake's current
    /// direction are dropped so an earlier valid press survives them.
    fn queue_direction(&mut self, player: SnakeId, direction: Direction) {
        let Some(snake) = self.arena.snake(player) else {
            return;
        };
        if snake.direction().is_opposite(direction) {
            return;
        }
        if let Some(pending) = self.pending_directions.get_mut(player) {
            *pending = Some(direction);
        }
    }

    fn update_game(&mut self) -> Result<()> {
        let intents: Vec<Action> = self
            .pending_directions
            .iter_mut()
            .map(|pending| Action::from(pending.take()))
            .collect();

        let result = self.arena.tick(&intents).context("Failed to advance the arena")?;

        // Track round over
        if result.terminated {
            if let Some(round) = self.arena.result() {
                self.metrics.on_round_end(round);
            }
        }

        Ok(())
    }

    /// Start a fresh arena, carrying the current scores forward
    fn next_round(&mut self) -> Result<()> {
        let scores = self.arena.final_scores().points();
        let round = u64::from(self.metrics.current_round());
        let config = GameConfig {
            seed: self.config.seed.map(|seed| seed.wrapping_add(round)),
            ..self.config.clone()
        };

        self.arena = Arena::new(&config, &scores).context("Failed to set up the next round")?;
        self.metrics.on_round_start();
        self.pending_directions.iter_mut().for_each(|pending| *pending = None);
        debug!(round = self.metrics.current_round(), "next round");
        Ok(())
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

/// Log a failed teardown; the game loop's own error takes precedence
fn finish_session(result: Result<()>, cleanup: Result<()>) -> Result<()> {
    if let Err(err) = &cleanup {
        error!(error = ?err, "failed to restore terminal");
    }
    result.and(cleanup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ArenaError;
    use anyhow::anyhow;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn play_until_round_ends(mode: &mut PlayMode) {
        for _ in 0..1000 {
            if !mode.arena.is_running() {
                return;
            }
            mode.update_game().expect("tick");
        }
        panic!("round never ended");
    }

    #[test]
    fn test_game_initialization() {
        let mode = PlayMode::new(GameConfig::default().with_seed(1)).expect("valid config");
        assert!(mode.arena.is_running());
        assert_eq!(mode.arena.scores(), vec![0, 0]);
        assert_eq!(mode.pending_directions, vec![None, None]);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        assert!(PlayMode::new(GameConfig::default().with_players(4)).is_err());
    }

    #[test]
    fn test_latest_valid_direction_wins() {
        let mut mode = PlayMode::new(GameConfig::default().with_seed(1)).expect("valid config");

        mode.queue_direction(0, Direction::North);
        mode.queue_direction(0, Direction::West);
        assert_eq!(mode.pending_directions[0], Some(Direction::North));

        mode.queue_direction(0, Direction::South);
        assert_eq!(mode.pending_directions[0], Some(Direction::South));
        assert_eq!(mode.pending_directions[1], None);
    }

    #[test]
    fn test_single_player_ignores_second_keyset() {
        let mut mode =
            PlayMode::new(GameConfig::single_player().with_seed(1)).expect("valid config");
        mode.handle_event(key(KeyCode::Char('w'))).expect("event");
        assert_eq!(mode.pending_directions, vec![None]);

        mode.handle_event(key(KeyCode::Up)).expect("event");
        assert_eq!(mode.pending_directions, vec![Some(Direction::North)]);
    }

    #[test]
    fn test_update_applies_and_clears_pending() {
        let mut mode = PlayMode::new(GameConfig::default().with_seed(1)).expect("valid config");
        let head = mode.arena.snakes()[1].head().position();

        mode.handle_event(key(KeyCode::Char('s'))).expect("event");
        mode.update_game().expect("tick");

        assert_eq!(mode.arena.snakes()[1].direction(), Direction::South);
        assert_eq!(
            mode.arena.snakes()[1].head().position(),
            (head.0 + 1, head.1)
        );
        assert_eq!(mode.pending_directions, vec![None, None]);
    }

    #[test]
    fn test_quit_key() {
        let mut mode = PlayMode::new(GameConfig::default().with_seed(1)).expect("valid config");
        mode.handle_event(key(KeyCode::Char('q'))).expect("event");
        assert!(mode.should_quit);
    }

    #[test]
    fn test_next_round_ignored_while_running() {
        let mut mode = PlayMode::new(GameConfig::default().with_seed(1)).expect("valid config");
        mode.update_game().expect("tick");

        mode.handle_event(key(KeyCode::Char('r'))).expect("event");

        assert_eq!(mode.arena.ticks(), 1);
        assert_eq!(mode.metrics.rounds_played, 0);
    }

    #[test]
    fn test_next_round_carries_scores() {
        let mut mode = PlayMode::new(GameConfig::default().with_seed(5)).expect("valid config");
        play_until_round_ends(&mut mode);
        assert_eq!(mode.metrics.rounds_played, 1);
        let scores = mode.arena.final_scores().points();

        mode.handle_event(key(KeyCode::Char('r'))).expect("event");

        assert!(mode.arena.is_running());
        assert_eq!(mode.arena.ticks(), 0);
        assert_eq!(mode.arena.scores(), scores);
        assert_eq!(mode.metrics.current_round(), 2);
    }

    #[test]
    fn test_loop_error_survives_failed_cleanup() {
        let result: Result<()> =
            Err(ArenaError::GridFull { rows: 2, cols: 2 }).context("Failed to advance the arena");
        let cleanup = Err(anyhow!("Failed to disable raw mode"));

        let err = finish_session(result, cleanup).expect_err("session failed");
        assert!(matches!(
            err.downcast_ref::<ArenaError>(),
            Some(ArenaError::GridFull { .. })
        ));
    }

    #[test]
    fn test_cleanup_error_reported_after_clean_loop() {
        let err = finish_session(Ok(()), Err(anyhow!("Failed to show cursor")))
            .expect_err("cleanup failed");
        assert_eq!(err.to_string(), "Failed to show cursor");

        assert!(finish_session(Ok(()), Ok(())).is_ok());
    }
}
