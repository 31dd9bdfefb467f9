use crate::console::{ConsoleSnapshot, Snapshot};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use dispatch_core::services::{nearest_services, ServiceReport};
use dispatch_core::{ConsoleError, ConsoleEvent};
use intake_registry::{validate_intake, SharedIntake};
use serde::Deserialize;
use std::sync::mpsc::Sender;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub tx: Sender<ConsoleEvent>,
    pub snapshot: Snapshot,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    text: String,
}

#[derive(Debug, Deserialize)]
pub struct NearestQuery {
    pub location: String,
}

pub fn console_router(state: AppState) -> Router {
    Router::new()
        .route("/intake/voice-agent", post(handle_intake))
        .route("/console/events", post(handle_event))
        .route("/console/chat", post(handle_chat))
        .route("/console", get(handle_snapshot))
        .route("/console/dispatch-label", get(handle_dispatch_label))
        .route("/services/nearest", get(handle_nearest_services))
        .with_state(state)
}

pub fn parse_intake(payload: &serde_json::Value) -> Result<ConsoleEvent, ConsoleError> {
    let intake = SharedIntake::from_value(payload)?;
    validate_intake(&intake)?;
    Ok(ConsoleEvent::ReceiveIntake { intake })
}

pub fn parse_event(payload: &serde_json::Value) -> Result<ConsoleEvent, ConsoleError> {
    Ok(serde_json::from_value(payload.clone())?)
}

pub fn parse_chat(payload: &serde_json::Value) -> Result<ConsoleEvent, ConsoleError> {
    let request: ChatRequest = serde_json::from_value(payload.clone())?;
    if request.text.trim().is_empty() {
        return Err(ConsoleError::EmptyChat);
    }
    Ok(ConsoleEvent::SendChat {
        text: request.text,
        at: Utc::now(),
    })
}

async fn handle_intake(
    State(app): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> StatusCode {
    send_event(&app.tx, "intake", parse_intake(&payload))
}

async fn handle_event(
    State(app): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> StatusCode {
    send_event(&app.tx, "event", parse_event(&payload))
}

async fn handle_chat(
    State(app): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> StatusCode {
    send_event(&app.tx, "chat", parse_chat(&payload))
}

async fn handle_snapshot(State(app): State<AppState>) -> Json<ConsoleSnapshot> {
    Json(read_snapshot(&app.snapshot))
}

async fn handle_dispatch_label(State(app): State<AppState>) -> Json<serde_json::Value> {
    let label = read_snapshot(&app.snapshot).state.dispatch_label();
    Json(serde_json::json!({ "label": label }))
}

async fn handle_nearest_services(
    Query(query): Query<NearestQuery>,
) -> Result<Json<ServiceReport>, StatusCode> {
    lookup_services(&query.location).map(Json)
}

pub fn lookup_services(location: &str) -> Result<ServiceReport, StatusCode> {
    nearest_services(location.trim()).ok_or_else(|| {
        warn!(location, "nearest services requested for unknown location");
        StatusCode::NOT_FOUND
    })
}

fn read_snapshot(snapshot: &Snapshot) -> ConsoleSnapshot {
    match snapshot.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

fn send_event(
    tx: &Sender<ConsoleEvent>,
    route: &'static str,
    event: Result<ConsoleEvent, ConsoleError>,
) -> StatusCode {
    let event = match event {
        Ok(event) => event,
        Err(err) => {
            warn!(route, error = %err, "rejected payload");
            return StatusCode::BAD_REQUEST;
        }
    };
    match tx.send(event) {
        Ok(_) => StatusCode::ACCEPTED,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
