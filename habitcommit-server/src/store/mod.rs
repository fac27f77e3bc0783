//! Persistence layer for habits and commits
//!
//! # Design Principles
//!
//! - One connection per operation, closed when the operation finishes
//! - Rely on DB constraints, handle conflicts - no check-then-insert
//! - "Not found" and "duplicate" are ordinary results, not errors
//! - Cascade from habits to commits lives in the schema

pub mod sqlite;

use async_trait::async_trait;

use crate::models::{Commit, Habit, HabitChanges, NewCommit, NewHabit};

pub use sqlite::SqliteStore;

/// Store error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{resource} '{id}' already exists")]
    Conflict { resource: &'static str, id: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of inserting a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitInsert {
    Created(Commit),
    /// The habit already has a commit on that date (or the commit id is taken)
    Duplicate,
    /// `habit_id` does not reference an existing habit
    UnknownHabit,
}

/// Typed access to habits and commits.
///
/// The HTTP layer only sees this trait, so tests and alternative backends can
/// be swapped in through `AppState`.
#[async_trait]
pub trait HabitStore: Send + Sync + 'static {
    /// All habits, oldest `created_at` first.
    async fn list_habits(&self) -> StoreResult<Vec<Habit>>;

    async fn get_habit(&self, id: &str) -> StoreResult<Option<Habit>>;

    /// Insert a habit. A taken id is `StoreError::Conflict`.
    async fn create_habit(&self, habit: NewHabit) -> StoreResult<Habit>;

    /// Replace name and color. `None` when no habit has this id.
    async fn update_habit(&self, id: &str, changes: HabitChanges) -> StoreResult<Option<Habit>>;

    /// Delete a habit and, through the cascade, its commits. Returns whether
    /// a habit was removed.
    async fn delete_habit(&self, id: &str) -> StoreResult<bool>;

    /// All commits, newest `timestamp` first.
    async fn list_commits(&self) -> StoreResult<Vec<Commit>>;

    /// Commits of one habit, latest `date` first.
    async fn list_commits_by_habit(&self, habit_id: &str) -> StoreResult<Vec<Commit>>;

    async fn create_commit(&self, commit: NewCommit) -> StoreResult<CommitInsert>;

    /// Commits whose date equals `date` exactly.
    async fn list_commits_on_date(&self, date: &str) -> StoreResult<Vec<Commit>>;
}
