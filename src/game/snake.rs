use super::action::Direction;
use super::entity::{Entity, EntityIds, Rgb};

/// A snake on the arena grid
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0; never empty
    body: Vec<Entity>,
    /// Current direction of movement
    direction: Direction,
    score: u32,
    name: String,
    color: Rgb,
}

impl Snake {
    /// Lay out a snake of `length` segments for a `rows` x `cols` grid.
    ///
    /// The tail is anchored on the edge the snake travels away from, centred on
    /// the other axis, and the head sits `length - 1` cells further along
    /// `direction`. Positions are clamped to the grid.
    pub fn new(
        ids: &mut EntityIds,
        rows: usize,
        cols: usize,
        length: usize,
        direction: Direction,
        color: Rgb,
        name: impl Into<String>,
    ) -> Self {
        let (rows, cols) = (rows.max(1) as i32, cols.max(1) as i32);
        let (tail_row, tail_col) = match direction {
            Direction::East => (rows / 2, 0),
            Direction::West => (rows / 2, cols - 1),
            Direction::South => (0, cols / 2),
            Direction::North => (rows - 1, cols / 2),
        };

        let (dr, dc) = direction.delta();
        let length = length.max(1) as i32;
        let body = (0..length)
            .rev()
            .map(|steps| {
                let row = (tail_row + steps * dr).clamp(0, rows - 1);
                let col = (tail_col + steps * dc).clamp(0, cols - 1);
                Entity::new(ids.next_id(), row, col, color)
            })
            .collect();

        Self {
            body,
            direction,
            score: 0,
            name: name.into(),
            color,
        }
    }

    pub fn with_score(mut self, score: u32) -> Self {
        self.score = score;
        self
    }

    pub fn head(&self) -> &Entity {
        &self.body[0]
    }

    pub fn tail(&self) -> &Entity {
        &self.body[self.body.len() - 1]
    }

    /// All segments, head first
    pub fn segments(&self) -> &[Entity] {
        &self.body
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; the body is never empty
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn is_head(&self, entity: &Entity) -> bool {
        self.body[0].id() == entity.id()
    }

    pub fn occupies(&self, row: i32, col: i32) -> bool {
        self.body.iter().any(|segment| segment.is_at(row, col))
    }

    /// Turn to `direction` unless it reverses the current one.
    /// Returns whether the turn was accepted.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.direction.is_opposite(direction) {
            return false;
        }
        self.direction = direction;
        true
    }

    /// Step the head one cell along the current direction, each other segment
    /// taking its predecessor's previous cell
    pub fn advance(&mut self) {
        // Tail to head, so every segment reads a position not yet overwritten
        for i in (1..self.body.len()).rev() {
            let (row, col) = self.body[i - 1].position();
            self.body[i].row = row;
            self.body[i].col = col;
        }

        let (dr, dc) = self.direction.delta();
        let head = &mut self.body[0];
        head.row += dr;
        head.col += dc;
    }

    /// Append a segment on the tail's cell; it separates on the next advance
    pub fn grow(&mut self, ids: &mut EntityIds) {
        let (row, col) = self.tail().position();
        let segment = Entity::new(ids.next_id(), row, col, self.color);
        self.body.push(segment);
    }

    /// Grow after eating and collect `reward` points
    pub fn feed(&mut self, ids: &mut EntityIds, reward: u32) {
        self.grow(ids);
        self.score += reward;
    }
}
