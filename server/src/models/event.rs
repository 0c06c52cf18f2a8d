use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use super::datetime;

/// Lifecycle state of an event. Any state may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "event_status", rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Scheduled,
    Ongoing,
    Completed,
    Canceled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Scheduled => "scheduled",
            EventStatus::Ongoing => "ongoing",
            EventStatus::Completed => "completed",
            EventStatus::Canceled => "canceled",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub event_id: i64,
    pub name: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: String,
    pub max_attendees: i32,
    pub status: EventStatus,
}

/// Payload for creating an event. Times and capacity are stored as given.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub name: String,
    pub description: String,
    #[serde(deserialize_with = "datetime::deserialize")]
    pub start_time: DateTime<Utc>,
    #[serde(deserialize_with = "datetime::deserialize")]
    pub end_time: DateTime<Utc>,
    pub location: String,
    pub max_attendees: i32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StatusUpdate {
    pub status: EventStatus,
}

/// Optional filters for listing events, combined with AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFilter {
    pub status: Option<EventStatus>,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "datetime::deserialize_optional")]
    pub date: Option<DateTime<Utc>>,
}

impl EventFilter {
    /// The `[date, date + 24h]` window an event must fit entirely inside.
    ///
    /// Events that start before `date` or run past the end of the window are
    /// excluded, so a multi-day event never matches a single-day filter.
    pub fn day_window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.date.map(|from| (from, from + Duration::days(1)))
    }

    /// Location to match; an empty value means no location filter.
    pub fn location(&self) -> Option<&str> {
        self.location
            .as_deref()
            .filter(|location| !location.is_empty())
    }

    pub fn matches(&self, event: &Event) -> bool {
        if self.status.is_some_and(|status| status != event.status) {
            return false;
        }
        if self
            .location()
            .is_some_and(|location| location != event.location)
        {
            return false;
        }
        match self.day_window() {
            Some((from, until)) => event.start_time >= from && event.end_time <= until,
            None => true,
        }
    }
}
