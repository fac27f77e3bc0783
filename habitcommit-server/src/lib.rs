//! habitcommit-server: habit tracking over HTTP
//!
//! Persists habits and their daily commits in SQLite and exposes them
//! through a small JSON API.

pub mod http;
pub mod models;
pub mod store;

pub use http::{build_router, run_server, ApiError, AppState, ServerConfig, ServerError};
pub use models::{Commit, Habit, HabitChanges, NewCommit, NewHabit, ValidationError};
pub use store::{CommitInsert, HabitStore, SqliteStore, StoreError, StoreResult};
