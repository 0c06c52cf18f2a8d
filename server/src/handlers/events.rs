use axum::extract::State;
use axum::response::Response;

use crate::models::{EventFilter, NewEvent, StatusUpdate};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::extract::{Json, Path, Query};
use crate::utils::response::{created, success};

pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<NewEvent>,
) -> Result<Response, AppError> {
    let event = state.events.create_event(payload).await?;
    Ok(created(event, "Event created"))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Response, AppError> {
    let event = state.events.get_event(event_id).await?;
    Ok(success(event, "Event retrieved"))
}

pub async fn update_event_status(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(update): Json<StatusUpdate>,
) -> Result<Response, AppError> {
    let event = state
        .events
        .update_event_status(event_id, update.status)
        .await?;
    Ok(success(event, "Event status updated"))
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(filter): Query<EventFilter>,
) -> Result<Response, AppError> {
    let events = state.events.list_events(&filter).await?;
    Ok(success(events, "Events retrieved"))
}

pub async fn list_event_attendees(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Response, AppError> {
    let attendees = state.attendees.list_attendees(event_id).await?;
    Ok(success(attendees, "Attendees retrieved"))
}
