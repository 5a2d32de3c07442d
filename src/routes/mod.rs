pub mod health;
pub mod session;
pub mod workouts;

use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;

use crate::error::AppError;
use crate::outbox::UiCommand;
use crate::state::AppState;
use crate::types::workout::WorkoutId;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(session::router())
        .merge(workouts::router())
}

#[derive(Debug, Serialize)]
pub struct CommandReply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workout_id: Option<WorkoutId>,
    pub commands: Vec<UiCommand>,
}

// Carries whatever the controller emitted before failing, such as the alert.
#[derive(Debug)]
pub struct CommandError {
    error: AppError,
    commands: Vec<UiCommand>,
}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        Self {
            error,
            commands: Vec::new(),
        }
    }
}

impl IntoResponse for CommandError {
    fn into_response(self) -> Response {
        let status = self.error.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.error);
        }

        let body = Json(json!({
            "error": self.error.to_string(),
            "commands": self.commands
        }));

        (status, body).into_response()
    }
}

pub type CommandResult = Result<Json<CommandReply>, CommandError>;

pub fn reply(result: Result<Option<WorkoutId>, AppError>, commands: Vec<UiCommand>) -> CommandResult {
    match result {
        Ok(workout_id) => Ok(Json(CommandReply {
            workout_id,
            commands,
        })),
        Err(error) => Err(CommandError { error, commands }),
    }
}
