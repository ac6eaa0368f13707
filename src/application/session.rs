//! Session manager: the engine's public entry point.
//!
//! Owns the active session, the pending-content map, the repository store,
//! and the verification gate. The dashboard drives everything through this
//! type; the "one active session" rule is an invariant of the instance
//! rather than an accidental module-level singleton.

use crate::application::gate::{GateConfig, VerificationGate};
use crate::application::store::RepositoryStore;
use crate::domain::{
    Commit, CommitTicket, EngineError, EngineResult, Session, SessionStats,
};
use crate::infra::db::Database;
use crate::infra::diff::{compute_changes, DiffConfig};
use crate::infra::notify::{CodeNotifier, NullNotifier};
use std::collections::HashMap;

pub struct SessionManager {
    store: RepositoryStore,
    gate: VerificationGate,
    notifier: Box<dyn CodeNotifier>,
    diff_config: DiffConfig,
    session: Option<Session>,
    /// Uncommitted working content per document path.
    pending_content: HashMap<String, String>,
}

impl SessionManager {
    /// Engine over an in-memory database; history lives as long as the
    /// instance. Suits the dashboard's single-page lifecycle.
    pub fn new() -> EngineResult<Self> {
        Self::with_database(Database::open_in_memory()?)
    }

    /// Engine over a caller-provided (possibly durable) database.
    pub fn with_database(db: Database) -> EngineResult<Self> {
        Ok(Self {
            store: RepositoryStore::open(&db)?,
            gate: VerificationGate::default(),
            notifier: Box::new(NullNotifier),
            diff_config: DiffConfig::default(),
            session: None,
            pending_content: HashMap::new(),
        })
    }

    /// Replace the code-delivery collaborator.
    pub fn with_notifier(mut self, notifier: Box<dyn CodeNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_gate_config(mut self, config: GateConfig) -> Self {
        self.gate = VerificationGate::new(config);
        self
    }

    pub fn with_diff_config(mut self, config: DiffConfig) -> Self {
        self.diff_config = config;
        self
    }

    /// Start a session for a user.
    ///
    /// Fails if one is already active; the engine never replaces a session
    /// implicitly. Callers that want a fresh session call [`end`] first.
    ///
    /// [`end`]: SessionManager::end
    pub fn start(&mut self, user_id: &str) -> EngineResult<&Session> {
        if user_id.trim().is_empty() {
            return Err(EngineError::InvalidInput("user id must not be empty"));
        }
        if let Some(active) = &self.session {
            return Err(EngineError::SessionActive(active.id.clone()));
        }

        let session = Session {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            started_at: chrono::Utc::now().to_rfc3339(),
            ended_at: None,
            repositories: Default::default(),
            total_commits: 0,
        };
        log::info!("session {} started for {}", session.id, user_id);
        Ok(self.session.insert(session))
    }

    /// The active session, if any.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Record (or overwrite) the pending working content for a path.
    ///
    /// No diff is computed here; diffing happens at commit initiation
    /// against the last committed snapshot.
    pub fn track(&mut self, path: &str, content: &str) -> EngineResult<()> {
        self.require_session()?;
        if path.trim().is_empty() {
            return Err(EngineError::InvalidInput("path must not be empty"));
        }
        self.pending_content
            .insert(path.to_string(), content.to_string());
        Ok(())
    }

    /// Initiate a commit for tracked content: diff it against the last
    /// committed snapshot, issue a verification code, and dispatch the code
    /// through the notifier.
    ///
    /// Delivery failure is logged but does not invalidate the pending
    /// commit; an external resend path can recover it.
    pub fn initiate_commit(
        &mut self,
        path: &str,
        message: &str,
        author_email: &str,
    ) -> EngineResult<CommitTicket> {
        self.require_session()?;
        if message.trim().is_empty() {
            return Err(EngineError::InvalidInput("commit message must not be empty"));
        }
        if author_email.trim().is_empty() {
            return Err(EngineError::InvalidInput("author email must not be empty"));
        }
        let content = self
            .pending_content
            .get(path)
            .ok_or_else(|| EngineError::NothingToCommit {
                path: path.to_string(),
            })?
            .clone();

        let base = self.store.latest_snapshot(path).unwrap_or("");
        let changes = compute_changes(base, &content, &self.diff_config);

        let pending = self
            .gate
            .issue(path, &content, message, author_email, changes);

        if let Err(err) = self
            .notifier
            .deliver(author_email, &pending.commit_id, &pending.code)
        {
            log::warn!(
                "verification code delivery for commit {} failed: {}",
                pending.commit_id,
                err
            );
        }

        Ok(CommitTicket {
            commit_id: pending.commit_id,
            verification_code: pending.code,
        })
    }

    /// Finalize a commit: verify the code, append to history, clear the
    /// path's pending content, and update session counters.
    pub fn complete_commit(&mut self, commit_id: &str, code: &str) -> EngineResult<Commit> {
        self.require_session()?;
        let verified = self.gate.verify(commit_id, code)?;

        let commit = self.store.append(
            &verified.path,
            &verified.content,
            &verified.message,
            &verified.author_email,
            verified.changes,
        )?;

        self.pending_content.remove(&verified.path);
        if let Some(session) = &mut self.session {
            session.total_commits += 1;
            session.repositories.insert(verified.path.clone());
        }

        Ok(commit)
    }

    /// Ordered commit history for a path (oldest to newest); empty for
    /// unknown paths. Read-only, available with or without a session.
    pub fn history(&self, path: &str) -> EngineResult<Vec<Commit>> {
        self.store.history(path)
    }

    /// Content snapshot at a finalized commit.
    pub fn snapshot_at(&self, commit_id: &str) -> EngineResult<String> {
        self.store.snapshot_at(commit_id)
    }

    /// Paths tracked but not yet successfully committed this session.
    pub fn pending_changes(&self) -> &HashMap<String, String> {
        &self.pending_content
    }

    /// Aggregate statistics over the active session's lifetime.
    pub fn stats(&self) -> EngineResult<SessionStats> {
        let session = self.session.as_ref().ok_or(EngineError::NoActiveSession)?;
        Ok(SessionStats {
            total_commits: session.total_commits,
            total_repositories: session.repositories.len() as u32,
            pending_changes: self.pending_content.len() as u32,
        })
    }

    /// End the active session.
    ///
    /// Discards all pending content and abandons outstanding pending
    /// commits; their codes can never be verified afterward, including from
    /// a later session. Returns the closed session record.
    pub fn end(&mut self) -> EngineResult<Session> {
        let mut session = self.session.take().ok_or(EngineError::NoActiveSession)?;
        session.ended_at = Some(chrono::Utc::now().to_rfc3339());

        let abandoned = self.gate.outstanding();
        self.pending_content.clear();
        self.gate.clear();

        log::info!(
            "session {} ended: {} commits, {} pending commits abandoned",
            session.id,
            session.total_commits,
            abandoned
        );
        Ok(session)
    }

    fn require_session(&self) -> EngineResult<()> {
        if self.session.is_some() {
            Ok(())
        } else {
            Err(EngineError::NoActiveSession)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SessionManager {
        SessionManager::new().unwrap()
    }

    #[test]
    fn test_operations_require_active_session() {
        let mut manager = manager();
        assert!(matches!(
            manager.track("/doc.md", "x"),
            Err(EngineError::NoActiveSession)
        ));
        assert!(matches!(
            manager.initiate_commit("/doc.md", "m", "a@b.com"),
            Err(EngineError::NoActiveSession)
        ));
        assert!(matches!(
            manager.complete_commit("id", "CODE42"),
            Err(EngineError::NoActiveSession)
        ));
        assert!(matches!(manager.stats(), Err(EngineError::NoActiveSession)));
        assert!(matches!(manager.end(), Err(EngineError::NoActiveSession)));
    }

    #[test]
    fn test_single_active_session() {
        let mut manager = manager();
        manager.start("researcher").unwrap();
        assert!(manager.session().is_some_and(Session::is_active));
        assert!(matches!(
            manager.start("someone-else"),
            Err(EngineError::SessionActive(_))
        ));

        manager.end().unwrap();
        manager.start("someone-else").unwrap();
    }

    #[test]
    fn test_initiate_requires_tracked_content_and_fields() {
        let mut manager = manager();
        manager.start("researcher").unwrap();

        assert!(matches!(
            manager.initiate_commit("/doc.md", "m", "a@b.com"),
            Err(EngineError::NothingToCommit { .. })
        ));

        manager.track("/doc.md", "hello").unwrap();
        assert!(matches!(
            manager.initiate_commit("/doc.md", "", "a@b.com"),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(matches!(
            manager.initiate_commit("/doc.md", "m", "  "),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(manager.initiate_commit("/doc.md", "m", "a@b.com").is_ok());
    }

    #[test]
    fn test_end_discards_pending_state() {
        let mut manager = manager();
        manager.start("researcher").unwrap();
        manager.track("/doc.md", "hello").unwrap();
        let ticket = manager.initiate_commit("/doc.md", "m", "a@b.com").unwrap();

        let ended = manager.end().unwrap();
        assert!(!ended.is_active());
        assert!(ended.ended_at.is_some());
        assert!(manager.pending_changes().is_empty());

        // Codes from the ended session are dead in the next one.
        manager.start("researcher").unwrap();
        assert!(matches!(
            manager.complete_commit(&ticket.commit_id, &ticket.verification_code),
            Err(EngineError::InvalidVerification)
        ));
    }
}
