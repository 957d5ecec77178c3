use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::error::ConfigError;

/// Configuration for a play session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of rows in the grid
    pub grid_rows: usize,
    /// Number of columns in the grid
    pub grid_cols: usize,
    /// Initial length of every snake
    pub initial_snake_length: usize,
    /// Number of snakes (1 or 2)
    pub players: usize,
    /// Points awarded for eating one food item
    pub food_reward: u32,
    /// Simulation ticks per second
    pub tick_rate_hz: u32,
    /// Random placements tried before scanning for a free food cell
    pub max_food_attempts: usize,
    /// Seed for food placement; random when absent
    pub seed: Option<u64>,

    // Terminal geometry
    /// Terminal columns per grid column
    pub cell_width: u16,
    /// Terminal rows per grid row
    pub cell_height: u16,
    /// Border thickness around the grid
    pub border_width: u16,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_rows: 20,
            grid_cols: 40,
            initial_snake_length: 10,
            players: 2,
            food_reward: 10,
            tick_rate_hz: 10,
            max_food_attempts: 1000,
            seed: None,
            cell_width: 2,
            cell_height: 1,
            border_width: 1,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            grid_rows: rows,
            grid_cols: cols,
            ..Default::default()
        }
    }

    /// Single-player variant of the default configuration
    pub fn single_player() -> Self {
        Self {
            players: 1,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self {
            initial_snake_length: 3,
            ..Self::new(10, 10)
        }
    }

    pub fn with_players(mut self, players: usize) -> Self {
        self.players = players;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Starting directions of the snakes in this session, in player order
    pub fn starting_directions(&self) -> &[Direction] {
        let count = self.players.min(Direction::STARTING.len());
        &Direction::STARTING[..count]
    }

    /// Check that a round can be laid out with this configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_rows == 0 || self.grid_cols == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.grid_rows,
                cols: self.grid_cols,
            });
        }
        if !(1..=2).contains(&self.players) {
            return Err(ConfigError::PlayerCount(self.players));
        }
        if self.initial_snake_length < 2 {
            return Err(ConfigError::SnakeTooShort(self.initial_snake_length));
        }
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        if self.cell_width == 0 || self.cell_height == 0 {
            return Err(ConfigError::ZeroCellSize);
        }

        // Screen coordinates of every cell, border included, must fit in an i32
        let room = i32::MAX as usize - 2 * usize::from(self.border_width);
        if self.grid_cols > room / usize::from(self.cell_width)
            || self.grid_rows > room / usize::from(self.cell_height)
        {
            return Err(ConfigError::GridTooLarge {
                rows: self.grid_rows,
                cols: self.grid_cols,
            });
        }

        // Snakes facing each other along one axis share that axis
        for direction in self.starting_directions() {
            let extent = match direction {
                Direction::East | Direction::West => self.grid_cols,
                Direction::South | Direction::North => self.grid_rows,
            };
            let sharing = self
                .starting_directions()
                .iter()
                .filter(|other| **other == *direction || other.is_opposite(*direction))
                .count();
            let too_long = self
                .initial_snake_length
                .checked_mul(sharing)
                .map_or(true, |needed| needed > extent);
            if too_long {
                return Err(ConfigError::SnakeTooLong {
                    length: self.initial_snake_length,
                    extent: extent / sharing,
                });
            }
        }

        Ok(())
    }
}
