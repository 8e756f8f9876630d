use thiserror::Error;

use npc_core::{AgentId, StateId};

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("behavior configuration error: {0}")]
    Config(String),

    /// An animation kind with no animator trigger reached the dispatch.
    #[error("unsupported animation kind: {0}")]
    UnsupportedAnimation(String),

    #[error("agent {0} updated before initialize()")]
    NotInitialized(AgentId),

    #[error("unknown state {0}")]
    UnknownState(StateId),

    #[error("waypoint parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
