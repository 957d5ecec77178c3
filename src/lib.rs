//! Snake Duel - two-player competitive Snake in the terminal
//!
//! This library provides:
//! - Core simulation: arena, snakes, food and collisions (game module)
//! - TUI rendering (render module)
//! - Keyboard input translation (input module)
//! - Session statistics (metrics module)
//! - The interactive play loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;

use anyhow::Result;

use crate::game::{FinalScores, GameConfig};
use crate::modes::PlayMode;

/// Play a session with `config` and return the final scores
pub async fn run(config: GameConfig) -> Result<FinalScores> {
    let mut play_mode = PlayMode::new(config)?;
    play_mode.run().await
}
