use std::time::{Duration, Instant};

use crate::game::RoundResult;

/// Statistics for one play session, across rounds
pub struct SessionMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub rounds_played: u32,
    /// Round wins per player, in player order
    pub wins: Vec<u32>,
    pub draws: u32,
}

impl SessionMetrics {
    pub fn new(players: usize) -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            rounds_played: 0,
            wins: vec![0; players],
            draws: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_round_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_round_end(&mut self, result: &RoundResult) {
        self.rounds_played += 1;
        if let Some(wins) = result.winner.and_then(|winner| self.wins.get_mut(winner)) {
            *wins += 1;
        } else if result.is_draw() {
            self.draws += 1;
        }
    }

    /// Round number currently in play, starting at 1
    pub fn current_round(&self) -> u32 {
        self.rounds_played + 1
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new(2)
    }
}
