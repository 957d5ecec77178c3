//! Core simulation for Snake Duel
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The presentation layer only reads [`Arena`] snapshots and feeds it one
//! [`Action`] per snake each tick.

pub mod action;
pub mod arena;
pub mod config;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod snake;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use arena::{
    Arena, Collision, CollisionType, FinalScores, PlayerScore, RoundResult, RoundState, SnakeId,
    TickInfo, TickResult, FOOD_COLOR,
};
pub use config::GameConfig;
pub use entity::{Entity, EntityId, Rgb};
pub use error::{ArenaError, ConfigError};
pub use geometry::CellGeometry;
pub use snake::Snake;
