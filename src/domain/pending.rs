use serde::{Deserialize, Serialize};

use crate::domain::ChangeStats;

/// An unverified, time-limited proposal to create a commit.
///
/// Transient: never persisted as history. Lives in the verification gate
/// from issuance until it is verified, expires, is superseded by a newer
/// issuance for the same path, or is abandoned when the session ends.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCommit {
    /// Pre-allocated at initiation so the UI can reference the commit
    /// before verification. The finalized commit gets a fresh id.
    pub commit_id: String,
    /// Short, single-use verification code gating finalization.
    pub code: String,
    pub path: String,
    pub content: String,
    pub message: String,
    pub author_email: String,
    /// Diff summary against the last committed snapshot, computed at
    /// initiation. Carried through so finalization does not re-diff.
    pub changes: ChangeStats,
    pub issued_at: chrono::DateTime<chrono::Utc>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl PendingCommit {
    pub fn is_expired_at(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        now > self.expires_at
    }
}

/// What `initiate_commit` hands back to the dashboard: the pre-allocated
/// commit id plus the verification code that was dispatched out-of-band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitTicket {
    pub commit_id: String,
    pub verification_code: String,
}
