use std::sync::Arc;

use crate::services::{AttendeeService, EventService};
use crate::storage::Store;

/// Shared handler state. Cloned per request; the store behind it is shared.
#[derive(Clone)]
pub struct AppState {
    pub events: EventService,
    pub attendees: AttendeeService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            events: EventService::new(store.clone()),
            attendees: AttendeeService::new(store),
        }
    }
}
