use serde::{Deserialize, Serialize};

/// Unique identifier for a finalized commit.
pub type CommitId = String;

/// A document path; one repository (commit history) exists per distinct path.
pub type DocumentPath = String;

/// Line-level change summary relative to the parent commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeStats {
    pub added: u32,
    pub removed: u32,
    pub modified: u32,
}

impl ChangeStats {
    /// Total number of lines touched by the change.
    pub fn total(&self) -> u32 {
        self.added + self.removed + self.modified
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// An immutable, finalized record of a content change to one document path.
///
/// Commits carry the full content snapshot at that point rather than a
/// reverse diff, so reconstruction of any historical version is a direct
/// lookup instead of a replay over the history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    /// Unique identifier, generated at finalization (never at initiation).
    pub id: CommitId,
    /// Append sequence within the store. Strictly increasing across all
    /// commits, which makes the per-repository total order observable even
    /// when two commits share a timestamp.
    pub seq: i64,
    /// Document path this commit belongs to.
    pub path: DocumentPath,
    /// Commit message supplied at initiation.
    pub message: String,
    /// Verified author email.
    pub author: String,
    /// Line counts relative to the parent commit (or to empty content for
    /// the first commit on a path).
    pub changes: ChangeStats,
    /// Full content snapshot at this commit.
    pub content: String,
    /// xxhash64 fingerprint of `content`, hex-encoded.
    pub content_hash: String,
    /// Creation timestamp in RFC3339 format.
    pub created_at: String,
}
