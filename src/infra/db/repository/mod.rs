//! Repository implementations for data access.
//!
//! Provides database operations for the append-only commit log.

mod commit;

pub use commit::{CommitRepository, NewCommit};

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

pub type DbConn = Arc<Mutex<Connection>>;
