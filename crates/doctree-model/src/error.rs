//! Error types for tree mutation.

use crate::tree::BlockId;

/// Error from a tree mutation whose contract was violated.
///
/// These are programmer errors (wrong anchor, wrong receiver); the model
/// reports them loudly instead of silently degrading, and nothing in this
/// crate catches or retries them.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TreeError {
    /// The anchor passed to an insert or replace is not a child of the
    /// receiving block.
    #[error("block {anchor:?} is not a child of {parent:?}")]
    NotAChild { parent: BlockId, anchor: BlockId },

    /// The block is already detached (or is the root) and cannot be removed.
    #[error("block {0:?} has no parent")]
    AlreadyDetached(BlockId),

    /// The block still has a parent and cannot be attached elsewhere.
    #[error("block {0:?} still has a parent; remove it first")]
    StillAttached(BlockId),
}
