use std::sync::Arc;

use tracing::info;

use crate::models::{Event, EventFilter, EventStatus, NewEvent};
use crate::storage::Store;
use crate::utils::error::AppError;

#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn Store>,
}

impl EventService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Creates a scheduled event. Times and capacity are not validated.
    #[tracing::instrument(skip_all, fields(name = %new_event.name))]
    pub async fn create_event(&self, new_event: NewEvent) -> Result<Event, AppError> {
        let event = self.store.insert_event(new_event).await?;
        info!(event_id = event.event_id, "Event created");
        Ok(event)
    }

    pub async fn get_event(&self, event_id: i64) -> Result<Event, AppError> {
        self.store
            .find_event(event_id)
            .await?
            .ok_or_else(|| AppError::event_not_found(event_id))
    }

    /// Sets the status unconditionally; every transition is allowed.
    #[tracing::instrument(skip(self))]
    pub async fn update_event_status(
        &self,
        event_id: i64,
        status: EventStatus,
    ) -> Result<Event, AppError> {
        let event = self
            .store
            .update_event_status(event_id, status)
            .await?
            .ok_or_else(|| AppError::event_not_found(event_id))?;

        info!(event_id, status = %event.status, "Event status updated");
        Ok(event)
    }

    pub async fn list_events(&self, filter: &EventFilter) -> Result<Vec<Event>, AppError> {
        let events = self.store.query_events(filter).await?;
        tracing::debug!(count = events.len(), ?filter, "Listed events");
        Ok(events)
    }
}
