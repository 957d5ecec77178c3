use thiserror::Error;

/// Reasons a [`GameConfig`](super::GameConfig) cannot produce a playable round
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid must have at least one row and one column, got {rows}x{cols}")]
    EmptyGrid { rows: usize, cols: usize },

    #[error("grid of {rows}x{cols} cells does not fit on a terminal screen")]
    GridTooLarge { rows: usize, cols: usize },

    #[error("player count must be 1 or 2, got {0}")]
    PlayerCount(usize),

    #[error("initial snake length must be at least 2, got {0}")]
    SnakeTooShort(usize),

    #[error("snake of length {length} does not fit along an axis of {extent} cells")]
    SnakeTooLong { length: usize, extent: usize },

    #[error("tick rate must be non-zero")]
    ZeroTickRate,

    #[error("cell width and height must be non-zero")]
    ZeroCellSize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArenaError {
    #[error("no free cell left for food on a {rows}x{cols} grid")]
    GridFull { rows: usize, cols: usize },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("expected {expected} starting scores, got {actual}")]
    ScoreCount { expected: usize, actual: usize },
}
