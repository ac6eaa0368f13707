//! Document versioning engine behind the WAS research dashboard.
//!
//! The dashboard drives the engine through [`SessionManager`]: track working
//! content for a document path, initiate a commit (which issues a
//! time-limited verification code delivered out-of-band), complete the
//! commit with the code, and read back history or any historical snapshot.
//!
//! Single writer, single active session, no branching or merging.
//!
//! ```no_run
//! use wasvc::SessionManager;
//!
//! # fn main() -> Result<(), wasvc::EngineError> {
//! let mut engine = SessionManager::new()?;
//! engine.start("researcher-1")?;
//! engine.track("/notes/experiment.md", "initial draft")?;
//! let ticket = engine.initiate_commit("/notes/experiment.md", "first draft", "r1@lab.example")?;
//! // ...the committer receives the code out-of-band and types it back...
//! let commit = engine.complete_commit(&ticket.commit_id, &ticket.verification_code)?;
//! assert_eq!(engine.history("/notes/experiment.md")?.len(), 1);
//! assert_eq!(engine.snapshot_at(&commit.id)?, "initial draft");
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod infra;

pub use application::{GateConfig, SessionManager};
pub use domain::{
    ChangeStats, Commit, CommitTicket, EngineError, EngineResult, PendingCommit, Session,
    SessionStats,
};
pub use infra::diff::{compute_changes, DiffConfig};
pub use infra::notify::{CodeNotifier, NullNotifier};
