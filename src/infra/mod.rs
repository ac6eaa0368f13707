//! Infrastructure layer (adapters/implementations).
//!
//! This module contains IO-heavy integrations (SQLite, diffing, delivery).

pub mod db;
pub mod diff;
pub mod hash;
pub mod notify;
