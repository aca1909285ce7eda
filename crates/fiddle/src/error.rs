use std::{io, result::Result as StdResult};

use thiserror::Error;

use crate::{Axis, id::NodeId};

/// Result type for fiddle operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// A node's size depends, directly or transitively, on its own
    /// unresolved size. Nothing from the failed resolve is applied.
    #[error("structural cycle: size of {node:?} on axis {axis} cannot be resolved")]
    StructuralCycle {
        /// The node whose size could not be resolved.
        node: NodeId,
        /// The axis being resolved.
        axis: Axis,
    },
    #[error("node not found: {0:?}")]
    /// Node handle is not present in the arena.
    NodeNotFound(NodeId),
    #[error("node already attached: {0:?}")]
    /// Child already has a parent.
    AlreadyAttached(NodeId),
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    /// Attaching would make a node its own ancestor.
    WouldCreateCycle {
        /// Prospective parent.
        parent: NodeId,
        /// Prospective child.
        child: NodeId,
    },
    #[error("malformed tree: {0}")]
    /// Tree links are missing or inconsistent.
    Malformed(String),
    #[error("duplicate key: {0}")]
    /// Two widgets produced the same key within one frame.
    DuplicateKey(String),
    #[error("parent stack: {0}")]
    /// Builder parent stack misuse.
    ParentStack(String),
    #[error("render: {0}")]
    /// Writing debug output failed.
    Render(String),
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Render(e.to_string())
    }
}
