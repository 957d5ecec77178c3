/// 24-bit color of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const GREEN: Rgb = Rgb(0, 255, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 255);
}

/// Stable identity of an entity within one arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// Hands out entity ids; ids are never reused
#[derive(Debug, Default)]
pub struct EntityIds {
    next: u32,
}

impl EntityIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

/// One occupied grid cell, either a snake segment or a food item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    id: EntityId,
    pub row: i32,
    pub col: i32,
    color: Rgb,
}

impl Entity {
    pub fn new(id: EntityId, row: i32, col: i32, color: Rgb) -> Self {
        Self { id, row, col, color }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn position(&self) -> (i32, i32) {
        (self.row, self.col)
    }

    pub fn is_at(&self, row: i32, col: i32) -> bool {
        self.row == row && self.col == col
    }

    /// True iff `other` is a different entity on the same cell
    pub fn collided_with(&self, other: &Entity) -> bool {
        self.id != other.id && self.is_at(other.row, other.col)
    }
}
