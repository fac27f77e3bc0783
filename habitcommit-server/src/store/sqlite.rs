//! SQLite implementation of [`HabitStore`]
//!
//! Every call opens a fresh connection from the stored options and closes it
//! before returning. SQLite itself serialises concurrent writers; the busy
//! timeout makes a blocked writer wait instead of failing straight away.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteJournalMode};
use sqlx::{ConnectOptions, Connection};
use tracing::{debug, info};

use super::{CommitInsert, HabitStore, StoreError, StoreResult};
use crate::models::{Commit, Habit, HabitChanges, NewCommit, NewHabit};

const SCHEMA: &str = include_str!("schema.sql");

/// How long a connection waits on a locked database before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed store
#[derive(Debug, Clone)]
pub struct SqliteStore {
    options: SqliteConnectOptions,
    path: PathBuf,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and apply the schema.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT)
            .foreign_keys(true);

        let store = Self { options, path };
        store.init_schema().await?;

        info!(path = %store.path.display(), "database ready");
        Ok(store)
    }

    /// Database file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the store. Lets SQLite refresh its query planner statistics on
    /// the way out.
    pub async fn close(self) -> StoreResult<()> {
        let mut conn = self.connect().await?;
        sqlx::query("PRAGMA optimize").execute(&mut conn).await?;
        conn.close().await?;

        info!(path = %self.path.display(), "database closed");
        Ok(())
    }

    async fn init_schema(&self) -> StoreResult<()> {
        let mut conn = self.connect().await?;
        sqlx::raw_sql(SCHEMA).execute(&mut conn).await?;
        conn.close().await?;
        Ok(())
    }

    async fn connect(&self) -> StoreResult<SqliteConnection> {
        Ok(self.options.connect().await?)
    }

    async fn fetch_commits(
        &self,
        sql: &'static str,
        arg: Option<&str>,
    ) -> StoreResult<Vec<Commit>> {
        let mut conn = self.connect().await?;
        let mut query = sqlx::query_as::<_, Commit>(sql);
        if let Some(arg) = arg {
            query = query.bind(arg.to_owned());
        }
        let commits = query.fetch_all(&mut conn).await?;
        conn.close().await?;
        Ok(commits)
    }
}

/// Constraint kind of a failed statement, if it was a constraint failure
fn violation(err: &sqlx::Error) -> Option<ErrorKind> {
    match err {
        sqlx::Error::Database(db) => Some(db.kind()),
        _ => None,
    }
}

#[async_trait]
impl HabitStore for SqliteStore {
    async fn list_habits(&self) -> StoreResult<Vec<Habit>> {
        let mut conn = self.connect().await?;
        let habits = sqlx::query_as::<_, Habit>(
            "SELECT id, name, color, created_at FROM habits ORDER BY created_at",
        )
        .fetch_all(&mut conn)
        .await?;
        conn.close().await?;

        debug!(count = habits.len(), "listed habits");
        Ok(habits)
    }

    async fn get_habit(&self, id: &str) -> StoreResult<Option<Habit>> {
        let mut conn = self.connect().await?;
        let habit = sqlx::query_as::<_, Habit>(
            "SELECT id, name, color, created_at FROM habits WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut conn)
        .await?;
        conn.close().await?;
        Ok(habit)
    }

    async fn create_habit(&self, habit: NewHabit) -> StoreResult<Habit> {
        let mut conn = self.connect().await?;
        let result = sqlx::query_as::<_, Habit>(
            r#"
            INSERT INTO habits (id, name, color, created_at)
            VALUES (?, ?, ?, COALESCE(?, CURRENT_TIMESTAMP))
            RETURNING id, name, color, created_at
            "#,
        )
        .bind(&habit.id)
        .bind(&habit.name)
        .bind(&habit.color)
        .bind(&habit.created_at)
        .fetch_one(&mut conn)
        .await;
        conn.close().await?;

        match result {
            Ok(created) => {
                debug!(id = %created.id, "created habit");
                Ok(created)
            }
            Err(err) if matches!(violation(&err), Some(ErrorKind::UniqueViolation)) => {
                Err(StoreError::Conflict {
                    resource: "habit",
                    id: habit.id,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn update_habit(&self, id: &str, changes: HabitChanges) -> StoreResult<Option<Habit>> {
        let mut conn = self.connect().await?;
        let habit = sqlx::query_as::<_, Habit>(
            r#"
            UPDATE habits SET name = ?, color = ?
            WHERE id = ?
            RETURNING id, name, color, created_at
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.color)
        .bind(id)
        .fetch_optional(&mut conn)
        .await?;
        conn.close().await?;

        debug!(id, updated = habit.is_some(), "update habit");
        Ok(habit)
    }

    async fn delete_habit(&self, id: &str) -> StoreResult<bool> {
        let mut conn = self.connect().await?;
        let result = sqlx::query("DELETE FROM habits WHERE id = ?")
            .bind(id)
            .execute(&mut conn)
            .await?;
        conn.close().await?;

        let deleted = result.rows_affected() > 0;
        debug!(id, deleted, "delete habit");
        Ok(deleted)
    }

    async fn list_commits(&self) -> StoreResult<Vec<Commit>> {
        self.fetch_commits(
            "SELECT id, habit_id, date, timestamp FROM commits ORDER BY timestamp DESC",
            None,
        )
        .await
    }

    async fn list_commits_by_habit(&self, habit_id: &str) -> StoreResult<Vec<Commit>> {
        self.fetch_commits(
            "SELECT id, habit_id, date, timestamp FROM commits WHERE habit_id = ? ORDER BY date DESC",
            Some(habit_id),
        )
        .await
    }

    async fn create_commit(&self, commit: NewCommit) -> StoreResult<CommitInsert> {
        let mut conn = self.connect().await?;
        let result = sqlx::query_as::<_, Commit>(
            r#"
            INSERT INTO commits (id, habit_id, date, timestamp)
            VALUES (?, ?, ?, COALESCE(?, CURRENT_TIMESTAMP))
            RETURNING id, habit_id, date, timestamp
            "#,
        )
        .bind(&commit.id)
        .bind(&commit.habit_id)
        .bind(&commit.date)
        .bind(&commit.timestamp)
        .fetch_one(&mut conn)
        .await;
        conn.close().await?;

        match result {
            Ok(created) => {
                debug!(
                    id = %created.id,
                    habit_id = %created.habit_id,
                    date = %created.date,
                    "created commit"
                );
                Ok(CommitInsert::Created(created))
            }
            Err(err) => match violation(&err) {
                Some(ErrorKind::UniqueViolation) => {
                    debug!(habit_id = %commit.habit_id, date = %commit.date, "duplicate commit");
                    Ok(CommitInsert::Duplicate)
                }
                Some(ErrorKind::ForeignKeyViolation) => {
                    debug!(habit_id = %commit.habit_id, "commit for unknown habit");
                    Ok(CommitInsert::UnknownHabit)
                }
                _ => Err(err.into()),
            },
        }
    }

    async fn list_commits_on_date(&self, date: &str) -> StoreResult<Vec<Commit>> {
        self.fetch_commits(
            "SELECT id, habit_id, date, timestamp FROM commits WHERE date = ?",
            Some(date),
        )
        .await
    }
}
