//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `NpcError` via `#[from]`.

use thiserror::Error;

/// Errors raised by `npc-core` itself.
#[derive(Debug, Error)]
pub enum NpcError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `npc-core`.
pub type NpcResult<T> = Result<T, NpcError>;
