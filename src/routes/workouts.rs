use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};

use super::{reply, CommandResult};
use crate::state::AppState;
use crate::types::form::FormFields;
use crate::types::workout::{Workout, WorkoutId};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/workouts", get(list).post(submit))
        .route("/api/workouts/:id", delete(remove))
        .route("/api/workouts/:id/edit", post(edit))
        .route("/api/workouts/:id/focus", post(focus))
        .route("/api/reset", post(reset))
}

async fn list(State(state): State<AppState>) -> Json<Vec<Workout>> {
    Json(state.read(|app| app.workouts().to_vec()).await)
}

async fn submit(State(state): State<AppState>, Json(fields): Json<FormFields>) -> CommandResult {
    let (result, commands) = state
        .dispatch(|app| app.submit(&fields).map(Some))
        .await;
    reply(result, commands)
}

async fn edit(State(state): State<AppState>, Path(id): Path<String>) -> CommandResult {
    let id = WorkoutId::from(id);
    let (result, commands) = state
        .dispatch(move |app| app.edit(&id).map(|()| Some(id)))
        .await;
    reply(result, commands)
}

async fn focus(State(state): State<AppState>, Path(id): Path<String>) -> CommandResult {
    let id = WorkoutId::from(id);
    let (result, commands) = state
        .dispatch(move |app| app.focus(&id).map(|()| Some(id)))
        .await;
    reply(result, commands)
}

async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> CommandResult {
    let id = WorkoutId::from(id);
    let (result, commands) = state
        .dispatch(|app| app.delete(&id).map(|removed| Some(removed.id().clone())))
        .await;
    reply(result, commands)
}

async fn reset(State(state): State<AppState>) -> CommandResult {
    let (result, commands) = state.dispatch(|app| app.reset().map(|()| None)).await;
    reply(result, commands)
}
