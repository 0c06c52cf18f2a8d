pub mod attendees;
pub mod check_in_file;
pub mod events;

pub use attendees::AttendeeService;
pub use check_in_file::parse_attendee_ids;
pub use events::EventService;
