use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Unique identifier for a session.
pub type SessionId = String;

/// The scope within which tracking and committing occur.
///
/// A session bounds the lifetime of pending content and outstanding
/// verification codes: ending it discards both. Only one session may be
/// active per [`SessionManager`](crate::application::SessionManager) at a
/// time, made explicit at the type level instead of through module-level
/// singletons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub user_id: String,
    /// Start timestamp in RFC3339 format.
    pub started_at: String,
    /// End timestamp in RFC3339 format; `None` while the session is active.
    pub ended_at: Option<String>,
    /// Document paths committed to during this session.
    pub repositories: BTreeSet<String>,
    /// Number of commits finalized during this session.
    pub total_commits: u32,
}

impl Session {
    pub fn is_active(&self) -> bool {
        self.ended_at.is_none()
    }
}

/// Aggregate statistics over a session's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_commits: u32,
    pub total_repositories: u32,
    pub pending_changes: u32,
}
