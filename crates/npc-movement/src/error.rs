use thiserror::Error;

#[derive(Debug, Error)]
pub enum MovementError {
    #[error("mover configuration error: {0}")]
    Config(String),
}

pub type MovementResult<T> = Result<T, MovementError>;
