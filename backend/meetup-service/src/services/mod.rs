/// Business logic layer
pub mod meetups;

pub use meetups::{parse_meetup_id, MeetupService, DEFAULT_MAX_PAGE_SIZE};
