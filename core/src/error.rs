use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Grid must have at least one row and one column")]
    InvalidTopology,
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Path must contain at least the start cell")]
    EmptyPath,
    #[error("Path visits the same cell twice")]
    DuplicateCell,
    #[error("Consecutive path cells are not adjacent")]
    NotAdjacent,
}

pub type Result<T> = core::result::Result<T, GameError>;
