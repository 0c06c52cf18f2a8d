pub mod attendee;
pub mod datetime;
pub mod event;

pub use attendee::{Attendee, BulkCheckInSummary, NewAttendee};
pub use event::{Event, EventFilter, EventStatus, NewEvent, StatusUpdate};
