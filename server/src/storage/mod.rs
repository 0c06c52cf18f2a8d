//! Persistence for events and attendees.
//!
//! [`Store`] is the seam between the services and the relational store.
//! Constraint checks that must hold under concurrent requests (event
//! capacity, unique emails) are enforced by the implementations, never by
//! the callers.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Attendee, Event, EventFilter, EventStatus, NewAttendee, NewEvent};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("event {0} not found")]
    EventNotFound(i64),

    #[error("event {event_id} is full ({max_attendees} attendees)")]
    EventFull { event_id: i64, max_attendees: i32 },

    #[error("email {0} is already registered")]
    DuplicateEmail(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_event(&self, event: NewEvent) -> StoreResult<Event>;

    async fn find_event(&self, event_id: i64) -> StoreResult<Option<Event>>;

    /// Returns `None` when the event does not exist.
    async fn update_event_status(
        &self,
        event_id: i64,
        status: EventStatus,
    ) -> StoreResult<Option<Event>>;

    async fn query_events(&self, filter: &EventFilter) -> StoreResult<Vec<Event>>;

    /// Inserts the attendee if the event exists and still has a free seat.
    ///
    /// The capacity check and the insert happen as one atomic step, so
    /// concurrent registrations can never overfill an event.
    async fn register_attendee(&self, attendee: NewAttendee) -> StoreResult<Attendee>;

    /// Returns `None` when the attendee does not exist.
    async fn check_in(&self, attendee_id: i64) -> StoreResult<Option<Attendee>>;

    /// Checks in every listed attendee that exists and returns their ids.
    /// Unknown ids are ignored. All updates commit together.
    async fn check_in_many(&self, attendee_ids: &[i64]) -> StoreResult<Vec<i64>>;

    async fn attendees_for_event(&self, event_id: i64) -> StoreResult<Vec<Attendee>>;
}
