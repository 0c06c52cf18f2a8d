use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::response::Response;

use crate::models::NewAttendee;
use crate::services::parse_attendee_ids;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::extract::{Json, Path};
use crate::utils::response::{created, success};

/// Multipart field carrying the CSV file.
const BULK_FILE_FIELD: &str = "file";

pub async fn register_attendee(
    State(state): State<AppState>,
    Json(payload): Json<NewAttendee>,
) -> Result<Response, AppError> {
    let attendee = state.attendees.register_attendee(payload).await?;
    Ok(created(attendee, "Attendee registered"))
}

pub async fn check_in_attendee(
    State(state): State<AppState>,
    Path(attendee_id): Path<i64>,
) -> Result<Response, AppError> {
    let attendee = state.attendees.check_in(attendee_id).await?;
    Ok(success(attendee, "Attendee checked in"))
}

pub async fn bulk_check_in(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let mut multipart = multipart?;
    let mut contents = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ValidationError(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some(BULK_FILE_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::ValidationError(format!("Unreadable upload: {}", e)))?;
            contents = Some(bytes);
            break;
        }
    }

    let contents = contents.ok_or_else(|| {
        AppError::ValidationError(format!("Missing '{}' field in upload", BULK_FILE_FIELD))
    })?;

    let attendee_ids = parse_attendee_ids(&contents)?;
    let summary = state.attendees.bulk_check_in(&attendee_ids).await?;
    Ok(success(summary, "Bulk check-in completed"))
}
