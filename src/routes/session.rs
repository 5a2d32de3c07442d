use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use super::{reply, CommandResult};
use crate::error::AppError;
use crate::state::AppState;
use crate::types::workout::{Coords, Kind};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/session", get(session))
        .route("/api/position", post(position))
        .route("/api/map/click", post(map_click))
        .route("/api/form/type", post(form_type))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl LatLng {
    fn coords(&self) -> Result<Coords, AppError> {
        if !(-90.0..=90.0).contains(&self.lat) || !(-180.0..=180.0).contains(&self.lng) {
            return Err(AppError::BadRequest(format!(
                "Coordinates out of range: {}, {}",
                self.lat, self.lng
            )));
        }
        Ok(Coords::new(self.lat, self.lng))
    }
}

#[derive(Deserialize)]
struct KindChange {
    #[serde(rename = "type")]
    kind: String,
}

async fn session(State(state): State<AppState>) -> CommandResult {
    let (result, commands) = state
        .dispatch(|app| {
            app.redraw();
            Ok(None)
        })
        .await;
    reply(result, commands)
}

async fn position(State(state): State<AppState>, Json(body): Json<LatLng>) -> CommandResult {
    let center = body.coords()?;
    let (result, commands) = state
        .dispatch(|app| {
            app.map_ready(center);
            Ok(None)
        })
        .await;
    reply(result, commands)
}

async fn map_click(State(state): State<AppState>, Json(body): Json<LatLng>) -> CommandResult {
    let coords = body.coords()?;
    let (result, commands) = state
        .dispatch(|app| app.map_clicked(coords).map(|()| None))
        .await;
    reply(result, commands)
}

async fn form_type(State(state): State<AppState>, Json(body): Json<KindChange>) -> CommandResult {
    let kind = Kind::from_str(&body.kind)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown workout type: {}", body.kind)))?;
    let (result, commands) = state
        .dispatch(|app| {
            app.kind_changed(kind);
            Ok(None)
        })
        .await;
    reply(result, commands)
}
