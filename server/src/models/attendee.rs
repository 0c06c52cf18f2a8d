use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Attendee {
    pub attendee_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub event_id: i64,
    pub check_in_status: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAttendee {
    pub event_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

/// Outcome of a bulk check-in. Unknown ids are reported, not treated as errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkCheckInSummary {
    pub rows: usize,
    pub checked_in: Vec<i64>,
    pub not_found: Vec<i64>,
}
