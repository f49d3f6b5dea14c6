//! Calendar (.ics) files for events.
//!
//! `generate` renders a single floating-time VEVENT, `store` decides whether
//! an event gets a file at all and keeps the output directory as the cache.

mod generate;
mod store;

pub use generate::generate_ics;
pub use store::{CalendarFile, CalendarFileGenerator, SkipReason, ensure_calendar_file};
