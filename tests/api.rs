use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use mapty_rs::app::geolocation::FixedLocation;
use mapty_rs::{config::Config, routes, state::AppState, storage::MemoryStore};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::session::router())
        .merge(routes::workouts::router())
        .with_state(state)
}

fn memory_state() -> AppState {
    AppState::with_store(Config::default(), Box::new(MemoryStore::new()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().uri(uri).method(method);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn command_names(reply: &Value) -> Vec<String> {
    reply["commands"]
        .as_array()
        .expect("commands")
        .iter()
        .map(|c| c["command"].as_str().expect("command name").to_string())
        .collect()
}

fn running_form() -> Value {
    json!({"type": "running", "distance": "5", "duration": "25", "cadence": "180", "elevation": ""})
}

async fn ready(app: &Router) {
    let (status, reply) = send(app, "POST", "/api/position", Some(json!({"lat": 10.0, "lng": 20.0}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(command_names(&reply), vec!["render_map", "add_tile_layer"]);
}

#[tokio::test]
async fn click_before_map_is_ready_conflicts() {
    let app = app(memory_state());
    let (status, reply) = send(&app, "POST", "/api/map/click", Some(json!({"lat": 1.0, "lng": 2.0}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(reply["error"], "Map is not ready");
}

#[tokio::test]
async fn out_of_range_coordinates_are_rejected() {
    let app = app(memory_state());
    let (status, _) = send(&app, "POST", "/api/position", Some(json!({"lat": 91.0, "lng": 0.0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn full_workout_lifecycle() {
    let app = app(memory_state());
    ready(&app).await;

    let (status, reply) = send(&app, "POST", "/api/map/click", Some(json!({"lat": 10.0, "lng": 20.0}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(command_names(&reply), vec!["show_form", "focus_distance"]);

    let (status, reply) = send(&app, "POST", "/api/workouts", Some(running_form())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(command_names(&reply), vec!["add_marker", "render_item", "hide_form"]);
    let id = reply["workout_id"].as_str().expect("workout id").to_string();
    assert_eq!(reply["commands"][0]["popup"]["className"], "running-popup");
    assert_eq!(reply["commands"][0]["coords"], json!([10.0, 20.0]));
    assert!(reply["commands"][1]["html"]
        .as_str()
        .expect("html")
        .contains(&format!("data-id=\"{id}\"")));

    let (_, list) = send(&app, "GET", "/api/workouts", None).await;
    assert_eq!(list.as_array().expect("list").len(), 1);
    assert_eq!(list[0]["type"], "running");
    assert_eq!(list[0]["pace"], 5.0);

    let (status, reply) = send(&app, "POST", &format!("/api/workouts/{id}/edit"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        command_names(&reply),
        vec!["fill_form", "show_kind_fields", "show_form", "focus_distance"]
    );
    assert_eq!(reply["commands"][0]["input"]["distance"], 5.0);

    let cycling = json!({"type": "cycling", "distance": "10", "duration": "30", "cadence": "", "elevation": "150"});
    let (status, reply) = send(&app, "POST", "/api/workouts", Some(cycling)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["workout_id"], id.as_str());
    assert_eq!(
        command_names(&reply),
        vec!["replace_item", "remove_marker", "add_marker", "hide_form"]
    );

    let (_, list) = send(&app, "GET", "/api/workouts", None).await;
    assert_eq!(list.as_array().expect("list").len(), 1);
    assert_eq!(list[0]["id"], id.as_str());
    assert_eq!(list[0]["type"], "cycling");
    assert_eq!(list[0]["speed"], 20.0);
    assert!(list[0]["description"]
        .as_str()
        .expect("description")
        .starts_with("Cycling on "));

    let (status, reply) = send(&app, "POST", &format!("/api/workouts/{id}/focus"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(command_names(&reply), vec!["set_view"]);
    assert_eq!(reply["commands"][0]["pan"]["animate"], true);

    let (status, reply) = send(&app, "DELETE", &format!("/api/workouts/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(command_names(&reply), vec!["remove_item", "remove_marker"]);

    let (_, list) = send(&app, "GET", "/api/workouts", None).await;
    assert!(list.as_array().expect("list").is_empty());

    let (status, reply) = send(&app, "DELETE", &format!("/api/workouts/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(reply["error"].as_str().expect("error").contains(&id));
}

#[tokio::test]
async fn invalid_submission_returns_alert() {
    let app = app(memory_state());
    ready(&app).await;
    send(&app, "POST", "/api/map/click", Some(json!({"lat": 1.0, "lng": 1.0}))).await;

    let bad = json!({"type": "running", "distance": "-1", "duration": "25", "cadence": "180"});
    let (status, reply) = send(&app, "POST", "/api/workouts", Some(bad)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(reply["error"], "Inputs have to be positive numbers!");
    assert_eq!(command_names(&reply), vec!["alert"]);

    let (_, list) = send(&app, "GET", "/api/workouts", None).await;
    assert!(list.as_array().expect("list").is_empty());
}

#[tokio::test]
async fn session_redraws_everything() {
    let app = app(memory_state());
    ready(&app).await;
    send(&app, "POST", "/api/map/click", Some(json!({"lat": 3.0, "lng": 4.0}))).await;
    send(&app, "POST", "/api/workouts", Some(running_form())).await;

    let (status, reply) = send(&app, "GET", "/api/session", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        command_names(&reply),
        vec!["render_map", "add_tile_layer", "add_marker", "render_item"]
    );
}

#[tokio::test]
async fn form_type_toggles_fields() {
    let app = app(memory_state());
    let (status, reply) = send(&app, "POST", "/api/form/type", Some(json!({"type": "cycling"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["commands"][0], json!({"command": "show_kind_fields", "kind": "cycling"}));

    let (status, _) = send(&app, "POST", "/api/form/type", Some(json!({"type": "rowing"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reset_empties_the_list() {
    let app = app(memory_state());
    ready(&app).await;
    send(&app, "POST", "/api/map/click", Some(json!({"lat": 3.0, "lng": 4.0}))).await;
    send(&app, "POST", "/api/workouts", Some(running_form())).await;

    let (status, reply) = send(&app, "POST", "/api/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(command_names(&reply), vec!["remove_item", "remove_marker", "hide_form"]);

    let (_, health) = send(&app, "GET", "/health", None).await;
    assert_eq!(health["workouts"], 0);
}

#[tokio::test]
async fn workouts_survive_restart_with_file_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        ..Config::default()
    };

    let first = app(AppState::new(config.clone()));
    ready(&first).await;
    send(&first, "POST", "/api/map/click", Some(json!({"lat": 3.0, "lng": 4.0}))).await;
    let (status, _) = send(&first, "POST", "/api/workouts", Some(running_form())).await;
    assert_eq!(status, StatusCode::OK);

    let state = AppState::new(config);
    state
        .initialize(&FixedLocation::unavailable())
        .await
        .expect("initialize");
    let second = app(state);

    let (_, list) = send(&second, "GET", "/api/workouts", None).await;
    assert_eq!(list.as_array().expect("list").len(), 1);
    assert_eq!(list[0]["coords"], json!([3.0, 4.0]));

    let (_, reply) = send(&second, "GET", "/api/session", None).await;
    assert_eq!(command_names(&reply), vec!["render_item"]);
}
