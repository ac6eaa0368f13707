//! Domain error types for the versioning engine.
//!
//! These represent caller-facing, recoverable failures of business
//! operations. Internal invariant breaks (for example a commit id collision
//! in the store) are not modelled here; they propagate loudly through the
//! `Storage` variant.

use thiserror::Error;

/// Errors surfaced by the engine's public operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A tracking or commit operation was attempted with no session started.
    #[error("no active session")]
    NoActiveSession,

    /// `start` was called while a session is already active. The caller must
    /// end the current session explicitly; the engine never auto-replaces.
    #[error("a session is already active: {0}")]
    SessionActive(String),

    /// `initiate_commit` was called for a path with no tracked content.
    #[error("nothing to commit for path: {path}")]
    NothingToCommit { path: String },

    /// A required field was empty or otherwise unusable.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// Verification failed. Deliberately undifferentiated so a caller cannot
    /// probe whether the id was unknown, the code wrong, or the pending
    /// commit expired or superseded.
    #[error("verification failed")]
    InvalidVerification,

    /// `snapshot_at` was called with an id that was never finalized.
    #[error("unknown commit: {id}")]
    UnknownCommit { id: String },

    /// Underlying storage failure.
    #[error("storage operation failed: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
