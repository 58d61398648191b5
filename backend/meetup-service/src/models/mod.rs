/// Data models for meetup-service
///
/// - `Meetup`: persisted row
/// - `MeetupPayload` / `MeetupFields`: request body and its validated form
/// - `MeetupResponse`: API representation with the computed `past` flag
pub mod meetup;

pub use meetup::{
    parse_meetup_date, start_of_hour, ListQuery, Meetup, MeetupFields, MeetupPayload,
    MeetupResponse,
};
