//! Repository store: per-path, append-only commit histories.

use crate::domain::{ChangeStats, Commit, EngineError, EngineResult};
use crate::infra::db::repository::NewCommit;
use crate::infra::db::{CommitRepository, Database};
use crate::infra::hash::content_hash;
use std::collections::HashMap;

/// Owns the commit log and a cache of the latest committed snapshot per
/// document path.
///
/// Commits store the full content snapshot, so reconstruction at any commit
/// is a single lookup rather than a replay over the history. The cache is
/// rebuilt from the log on open, which makes a durable database survive
/// restarts without a separate state file.
pub struct RepositoryStore {
    commits: CommitRepository,
    latest: HashMap<String, String>,
}

impl RepositoryStore {
    /// Build a store over the given database, rebuilding the latest-snapshot
    /// cache from the commit log.
    pub fn open(db: &Database) -> EngineResult<Self> {
        let commits = CommitRepository::new(db.connection());
        let latest = commits.latest_snapshots()?.into_iter().collect();
        Ok(Self { commits, latest })
    }

    /// Finalize a commit: generate its id, timestamp it, append it to the
    /// path's history, and refresh the cached snapshot.
    ///
    /// History is never rewritten. An id collision (which would mean the
    /// uuid generator misbehaved) violates the table's UNIQUE constraint and
    /// surfaces as a storage error.
    pub fn append(
        &mut self,
        path: &str,
        content: &str,
        message: &str,
        author: &str,
        changes: ChangeStats,
    ) -> EngineResult<Commit> {
        let id = uuid::Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().to_rfc3339();
        let hash = content_hash(content);

        let seq = self.commits.append(&NewCommit {
            id: &id,
            path,
            author,
            message,
            changes,
            content,
            content_hash: &hash,
            created_at: &created_at,
        })?;

        self.latest.insert(path.to_string(), content.to_string());
        log::info!("appended commit {} to {} (seq {})", id, path, seq);

        Ok(Commit {
            id,
            seq,
            path: path.to_string(),
            message: message.to_string(),
            author: author.to_string(),
            changes,
            content: content.to_string(),
            content_hash: hash,
            created_at,
        })
    }

    /// Ordered commit history for a path, oldest to newest. Unknown paths
    /// yield an empty sequence.
    pub fn history(&self, path: &str) -> EngineResult<Vec<Commit>> {
        Ok(self.commits.history(path)?)
    }

    /// Reconstruct the content snapshot at a commit, looked up by id across
    /// all repositories (commit ids are globally unique).
    pub fn snapshot_at(&self, commit_id: &str) -> EngineResult<String> {
        match self.commits.find_by_id(commit_id)? {
            Some(commit) => Ok(commit.content),
            None => Err(EngineError::UnknownCommit {
                id: commit_id.to_string(),
            }),
        }
    }

    /// Latest committed snapshot for a path, if any commit exists.
    pub fn latest_snapshot(&self, path: &str) -> Option<&str> {
        self.latest.get(path).map(String::as_str)
    }

    /// Number of distinct document paths with at least one commit.
    pub fn repository_count(&self) -> usize {
        self.latest.len()
    }
}
