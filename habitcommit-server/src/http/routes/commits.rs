//! Commit endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::http::error::ApiError;
use crate::http::extractors::ApiJson;
use crate::http::server::AppState;
use crate::models::{Commit, CreateCommitRequest, NewCommit};
use crate::store::CommitInsert;

/// GET /commits - newest first
async fn list_commits(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Commit>>, ApiError> {
    Ok(Json(state.store.list_commits().await?))
}

/// GET /commits/habit/{id} - empty array when the habit has none
async fn list_habit_commits(
    State(state): State<Arc<AppState>>,
    Path(habit_id): Path<String>,
) -> Result<Json<Vec<Commit>>, ApiError> {
    Ok(Json(state.store.list_commits_by_habit(&habit_id).await?))
}

/// GET /commits/today/{date}
async fn list_commits_on_date(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<Json<Vec<Commit>>, ApiError> {
    Ok(Json(state.store.list_commits_on_date(&date).await?))
}

/// POST /commits
async fn create_commit(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateCommitRequest>,
) -> Result<(StatusCode, Json<Commit>), ApiError> {
    let commit = NewCommit::try_from(req)?;
    let habit_id = commit.habit_id.clone();

    match state.store.create_commit(commit).await? {
        CommitInsert::Created(created) => {
            tracing::info!(id = %created.id, %habit_id, date = %created.date, "commit created");
            Ok((StatusCode::CREATED, Json(created)))
        }
        CommitInsert::Duplicate => Err(ApiError::Conflict {
            message: "Commit already exists for this habit today".to_string(),
        }),
        CommitInsert::UnknownHabit => Err(ApiError::Conflict {
            message: format!("Habit '{habit_id}' does not exist"),
        }),
    }
}

/// Commit routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/commits", get(list_commits).post(create_commit))
        .route("/commits/habit/{id}", get(list_habit_commits))
        .route("/commits/today/{date}", get(list_commits_on_date))
}
