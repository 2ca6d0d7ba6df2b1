use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Coordinates out of bounds")]
    OutOfBounds,
    #[error("Invalid board configuration")]
    InvalidConfiguration,
}

pub type Result<T> = std::result::Result<T, GameError>;
