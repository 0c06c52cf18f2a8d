use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Store, StoreError, StoreResult};
use crate::models::{Attendee, Event, EventFilter, EventStatus, NewAttendee, NewEvent};

#[derive(Debug, Default)]
struct Tables {
    events: BTreeMap<i64, Event>,
    attendees: BTreeMap<i64, Attendee>,
    last_event_id: i64,
    last_attendee_id: i64,
}

/// Process-local store used for development and tests.
///
/// Every operation holds the table lock for its whole duration, which gives
/// each call the same all-or-nothing behavior as a database transaction.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_event(&self, event: NewEvent) -> StoreResult<Event> {
        let mut tables = self.tables.lock().await;
        tables.last_event_id += 1;

        let event = Event {
            event_id: tables.last_event_id,
            name: event.name,
            description: event.description,
            start_time: event.start_time,
            end_time: event.end_time,
            location: event.location,
            max_attendees: event.max_attendees,
            status: EventStatus::Scheduled,
        };
        tables.events.insert(event.event_id, event.clone());
        Ok(event)
    }

    async fn find_event(&self, event_id: i64) -> StoreResult<Option<Event>> {
        Ok(self.tables.lock().await.events.get(&event_id).cloned())
    }

    async fn update_event_status(
        &self,
        event_id: i64,
        status: EventStatus,
    ) -> StoreResult<Option<Event>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.events.get_mut(&event_id).map(|event| {
            event.status = status;
            event.clone()
        }))
    }

    async fn query_events(&self, filter: &EventFilter) -> StoreResult<Vec<Event>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .events
            .values()
            .filter(|event| filter.matches(event))
            .cloned()
            .collect())
    }

    async fn register_attendee(&self, attendee: NewAttendee) -> StoreResult<Attendee> {
        let mut tables = self.tables.lock().await;

        let max_attendees = tables
            .events
            .get(&attendee.event_id)
            .map(|event| event.max_attendees)
            .ok_or(StoreError::EventNotFound(attendee.event_id))?;

        let registered = tables
            .attendees
            .values()
            .filter(|existing| existing.event_id == attendee.event_id)
            .count();
        if registered >= usize::try_from(max_attendees).unwrap_or(0) {
            return Err(StoreError::EventFull {
                event_id: attendee.event_id,
                max_attendees,
            });
        }

        if tables
            .attendees
            .values()
            .any(|existing| existing.email == attendee.email)
        {
            return Err(StoreError::DuplicateEmail(attendee.email));
        }

        tables.last_attendee_id += 1;
        let attendee = Attendee {
            attendee_id: tables.last_attendee_id,
            first_name: attendee.first_name,
            last_name: attendee.last_name,
            email: attendee.email,
            phone_number: attendee.phone_number,
            event_id: attendee.event_id,
            check_in_status: false,
        };
        tables
            .attendees
            .insert(attendee.attendee_id, attendee.clone());
        Ok(attendee)
    }

    async fn check_in(&self, attendee_id: i64) -> StoreResult<Option<Attendee>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.attendees.get_mut(&attendee_id).map(|attendee| {
            attendee.check_in_status = true;
            attendee.clone()
        }))
    }

    async fn check_in_many(&self, attendee_ids: &[i64]) -> StoreResult<Vec<i64>> {
        let mut tables = self.tables.lock().await;
        let mut checked_in = Vec::new();
        for attendee_id in attendee_ids {
            if let Some(attendee) = tables.attendees.get_mut(attendee_id) {
                attendee.check_in_status = true;
                checked_in.push(*attendee_id);
            }
        }
        Ok(checked_in)
    }

    async fn attendees_for_event(&self, event_id: i64) -> StoreResult<Vec<Attendee>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .attendees
            .values()
            .filter(|attendee| attendee.event_id == event_id)
            .cloned()
            .collect())
    }
}
