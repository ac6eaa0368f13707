//! Domain types for the versioning engine
//! Defines the core data structures and business objects used throughout the engine.

pub mod commit;
pub mod error;
pub mod pending;
pub mod session;

pub use commit::*;
pub use error::*;
pub use pending::*;
pub use session::*;
