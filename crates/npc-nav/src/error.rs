//! Navigation-subsystem error type.

use thiserror::Error;

use npc_core::NodeId;

/// Errors produced by graph-level queries in `npc-nav`.
///
/// World-space queries through [`NavigationService`](crate::NavigationService)
/// never fail with an error; they report a [`PathStatus`](crate::PathStatus).
#[derive(Debug, Error)]
pub enum NavError {
    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),
}

pub type NavResult<T> = Result<T, NavError>;
