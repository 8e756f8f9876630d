use npc_behavior::BehaviorError;
use npc_core::{AgentId, NpcError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] NpcError),

    #[error("agent {0} added twice")]
    DuplicateAgent(AgentId),

    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("simulation stepped before initialize()")]
    NotInitialized,

    #[error("behavior error: {0}")]
    Behavior(#[from] BehaviorError),
}

pub type SimResult<T> = Result<T, SimError>;
