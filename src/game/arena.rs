use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, error, info};

use super::{
    action::Action,
    config::GameConfig,
    entity::{Entity, EntityIds, Rgb},
    error::ArenaError,
    snake::Snake,
};

/// Index of a snake within its arena, in player order
pub type SnakeId = usize;

pub const FOOD_COLOR: Rgb = Rgb::BLUE;
const SNAKE_COLORS: [Rgb; 2] = [Rgb::RED, Rgb::GREEN];

/// Type of collision that ends a round for a snake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Head left the grid
    Wall,
    /// Head ran into its own body
    SelfCollision,
    /// Head ran into another snake's body
    Body,
    /// Head met another snake's head on the same cell
    HeadOn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub snake: SnakeId,
    pub kind: CollisionType,
}

/// How a round ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    /// Every snake that lost on the final tick, in snake order
    pub losers: Vec<SnakeId>,
    /// The sole survivor of a multi-snake round, if there is one
    pub winner: Option<SnakeId>,
    pub collisions: Vec<Collision>,
}

impl RoundResult {
    /// First losing snake in snake order
    pub fn loser(&self) -> Option<SnakeId> {
        self.losers.first().copied()
    }

    pub fn is_draw(&self) -> bool {
        self.winner.is_none() && self.losers.len() > 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundState {
    Running,
    Ended(RoundResult),
}

/// Information about a tick
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TickInfo {
    /// Snakes that ate food this tick
    pub fed: Vec<SnakeId>,
    /// Collisions detected this tick
    pub collisions: Vec<Collision>,
}

/// Result of an arena tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickResult {
    /// Whether the round is over
    pub terminated: bool,
    pub info: TickInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerScore {
    pub name: String,
    pub score: u32,
}

/// Scores per snake, in player order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FinalScores(pub Vec<PlayerScore>);

impl FinalScores {
    /// Bare points, suitable as the next round's starting scores
    pub fn points(&self) -> Vec<u32> {
        self.0.iter().map(|player| player.score).collect()
    }
}

/// One round of play: the grid, its snakes and its food
pub struct Arena {
    rows: usize,
    cols: usize,
    snakes: Vec<Snake>,
    food: Vec<Entity>,
    ids: EntityIds,
    rng: StdRng,
    food_reward: u32,
    max_food_attempts: usize,
    state: RoundState,
    ticks: u32,
}

impl Arena {
    /// Start a round. `starting_scores` is either empty or one score per snake.
    pub fn new(config: &GameConfig, starting_scores: &[u32]) -> Result<Self, ArenaError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, starting_scores, rng)
    }

    pub fn with_rng(
        config: &GameConfig,
        starting_scores: &[u32],
        rng: StdRng,
    ) -> Result<Self, ArenaError> {
        config.validate()?;

        let directions = config.starting_directions();
        if !starting_scores.is_empty() && starting_scores.len() != directions.len() {
            return Err(ArenaError::ScoreCount {
                expected: directions.len(),
                actual: starting_scores.len(),
            });
        }

        let mut ids = EntityIds::new();
        let snakes: Vec<Snake> = directions
            .iter()
            .enumerate()
            .map(|(index, direction)| {
                Snake::new(
                    &mut ids,
                    config.grid_rows,
                    config.grid_cols,
                    config.initial_snake_length,
                    *direction,
                    SNAKE_COLORS[index % SNAKE_COLORS.len()],
                    format!("Player {}", index + 1),
                )
                .with_score(starting_scores.get(index).copied().unwrap_or(0))
            })
            .collect();

        let mut arena = Self {
            rows: config.grid_rows,
            cols: config.grid_cols,
            snakes,
            food: Vec::new(),
            ids,
            rng,
            food_reward: config.food_reward,
            max_food_attempts: config.max_food_attempts,
            state: RoundState::Running,
            ticks: 0,
        };

        for _ in 0..arena.snakes.len() {
            arena.spawn_food()?;
        }

        info!(
            rows = arena.rows,
            cols = arena.cols,
            snakes = arena.snakes.len(),
            scores = ?arena.scores(),
            "round started"
        );

        Ok(arena)
    }

    /// Advance the round by one tick.
    ///
    /// `intents` holds one action per snake; missing entries mean
    /// [`Action::Continue`]. Once the round has ended the arena no longer
    /// changes and every call reports `terminated`.
    pub fn tick(&mut self, intents: &[Action]) -> Result<TickResult, ArenaError> {
        if let RoundState::Ended(result) = &self.state {
            return Ok(TickResult {
                terminated: true,
                info: TickInfo {
                    fed: Vec::new(),
                    collisions: result.collisions.clone(),
                },
            });
        }

        self.move_snakes(intents);
        let fed = self.consume_food()?;
        let collisions = self.detect_collisions();
        self.ticks += 1;

        let terminated = !collisions.is_empty();
        if terminated {
            self.end_round(collisions.clone());
        }

        Ok(TickResult {
            terminated,
            info: TickInfo { fed, collisions },
        })
    }

    fn move_snakes(&mut self, intents: &[Action]) {
        for (index, snake) in self.snakes.iter_mut().enumerate() {
            if let Some(Action::Move(direction)) = intents.get(index) {
                snake.set_direction(*direction);
            }
            snake.advance();
        }
    }

    /// Feed every snake whose head sits on food, in snake order, replacing
    /// each eaten item
    fn consume_food(&mut self) -> Result<Vec<SnakeId>, ArenaError> {
        let mut fed = Vec::new();

        for index in 0..self.snakes.len() {
            let head = self.snakes[index].head();
            let Some(bite) = self.food.iter().position(|food| head.collided_with(food)) else {
                continue;
            };

            let eaten = self.food.remove(bite);
            self.snakes[index].feed(&mut self.ids, self.food_reward);
            debug!(
                snake = index,
                row = eaten.row,
                col = eaten.col,
                score = self.snakes[index].score(),
                "food eaten"
            );
            fed.push(index);
            self.spawn_food()?;
        }

        Ok(fed)
    }

    fn detect_collisions(&self) -> Vec<Collision> {
        let mut collisions = Vec::new();

        for (index, snake) in self.snakes.iter().enumerate() {
            let head = snake.head();

            // Wall takes priority over body contact
            let kind = if !self.in_bounds(head.row, head.col) {
                Some(CollisionType::Wall)
            } else {
                self.body_collision(index, head)
            };

            if let Some(kind) = kind {
                collisions.push(Collision { snake: index, kind });
            }
        }

        collisions
    }

    fn body_collision(&self, index: SnakeId, head: &Entity) -> Option<CollisionType> {
        for (other_index, other) in self.snakes.iter().enumerate() {
            for segment in other.segments() {
                if !head.collided_with(segment) {
                    continue;
                }
                return Some(if other_index == index {
                    CollisionType::SelfCollision
                } else if other.is_head(segment) {
                    CollisionType::HeadOn
                } else {
                    CollisionType::Body
                });
            }
        }
        None
    }

    fn end_round(&mut self, collisions: Vec<Collision>) {
        let losers: Vec<SnakeId> = collisions.iter().map(|collision| collision.snake).collect();
        let survivors: Vec<SnakeId> = (0..self.snakes.len())
            .filter(|index| !losers.contains(index))
            .collect();

        let winner = match survivors.as_slice() {
            [survivor] if self.snakes.len() > 1 => Some(*survivor),
            _ => None,
        };

        info!(
            tick = self.ticks,
            ?losers,
            ?winner,
            scores = ?self.scores(),
            "round ended"
        );

        self.state = RoundState::Ended(RoundResult {
            losers,
            winner,
            collisions,
        });
    }

    fn spawn_food(&mut self) -> Result<(), ArenaError> {
        let Some((row, col)) = self.find_free_cell() else {
            error!(rows = self.rows, cols = self.cols, "no free cell left for food");
            return Err(ArenaError::GridFull {
                rows: self.rows,
                cols: self.cols,
            });
        };

        debug!(row, col, "spawned food");
        let id = self.ids.next_id();
        self.food.push(Entity::new(id, row, col, FOOD_COLOR));
        Ok(())
    }

    /// Uniformly random free cell: rejection sampling first, then a scan of
    /// all free cells once the attempts run out
    fn find_free_cell(&mut self) -> Option<(i32, i32)> {
        for _ in 0..self.max_food_attempts {
            let row = self.rng.gen_range(0..self.rows) as i32;
            let col = self.rng.gen_range(0..self.cols) as i32;
            if !self.is_occupied(row, col) {
                return Some((row, col));
            }
        }

        let free: Vec<(i32, i32)> = (0..self.rows as i32)
            .flat_map(|row| (0..self.cols as i32).map(move |col| (row, col)))
            .filter(|&(row, col)| !self.is_occupied(row, col))
            .collect();
        free.choose(&mut self.rng).copied()
    }

    pub fn is_occupied(&self, row: i32, col: i32) -> bool {
        self.snakes.iter().any(|snake| snake.occupies(row, col))
            || self.food.iter().any(|food| food.is_at(row, col))
    }

    /// Closed-open bounds check
    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && row < self.rows as i32 && col >= 0 && col < self.cols as i32
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    pub fn snake(&self, id: SnakeId) -> Option<&Snake> {
        self.snakes.get(id)
    }

    pub fn food(&self) -> &[Entity] {
        &self.food
    }

    /// Every live entity for drawing: food first, then each snake from tail
    /// to head so heads end up on top
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.food.iter().chain(
            self.snakes
                .iter()
                .flat_map(|snake| snake.segments().iter().rev()),
        )
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RoundState::Running
    }

    pub fn result(&self) -> Option<&RoundResult> {
        match &self.state {
            RoundState::Running => None,
            RoundState::Ended(result) => Some(result),
        }
    }

    /// The losing snake once the round has ended
    pub fn loser(&self) -> Option<SnakeId> {
        self.result().and_then(RoundResult::loser)
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn scores(&self) -> Vec<u32> {
        self.snakes.iter().map(Snake::score).collect()
    }

    pub fn final_scores(&self) -> FinalScores {
        FinalScores(
            self.snakes
                .iter()
                .map(|snake| PlayerScore {
                    name: snake.name().to_string(),
                    score: snake.score(),
                })
                .collect(),
        )
    }
}
