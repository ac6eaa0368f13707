//! Application layer (use-cases, policies).
//!
//! Orchestrates domain logic over the infrastructure: commit verification,
//! the append-only repository store, and the session lifecycle.

pub mod gate;
pub mod session;
pub mod store;

pub use gate::{GateConfig, VerificationGate};
pub use session::SessionManager;
pub use store::RepositoryStore;
