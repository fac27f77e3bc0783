//! Habit endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::extractors::ApiJson;
use crate::http::server::AppState;
use crate::models::{CreateHabitRequest, Habit, HabitChanges, NewHabit, UpdateHabitRequest};

/// Body returned after a successful delete
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: &'static str,
}

fn habit_not_found() -> ApiError {
    ApiError::NotFound { resource: "Habit" }
}

/// GET /habits - all habits, oldest first
async fn list_habits(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Habit>>, ApiError> {
    let habits = state.store.list_habits().await?;
    Ok(Json(habits))
}

/// GET /habits/{id}
async fn get_habit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Habit>, ApiError> {
    let habit = state
        .store
        .get_habit(&id)
        .await?
        .ok_or_else(habit_not_found)?;
    Ok(Json(habit))
}

/// POST /habits - a duplicate id surfaces as a store failure (500), not 409
async fn create_habit(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateHabitRequest>,
) -> Result<(StatusCode, Json<Habit>), ApiError> {
    let habit = NewHabit::try_from(req)?;
    let created = state.store.create_habit(habit).await?;

    tracing::info!(id = %created.id, "habit created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /habits/{id} - replaces name and color
async fn update_habit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateHabitRequest>,
) -> Result<Json<Habit>, ApiError> {
    let changes = HabitChanges::try_from(req)?;
    let habit = state
        .store
        .update_habit(&id, changes)
        .await?
        .ok_or_else(habit_not_found)?;
    Ok(Json(habit))
}

/// DELETE /habits/{id} - commits go with it
async fn delete_habit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    if !state.store.delete_habit(&id).await? {
        return Err(habit_not_found());
    }

    tracing::info!(%id, "habit deleted");
    Ok(Json(DeletedResponse {
        message: "Habit deleted successfully",
    }))
}

/// Habit routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/habits", get(list_habits).post(create_habit))
        .route(
            "/habits/{id}",
            get(get_habit).put(update_habit).delete(delete_habit),
        )
}
