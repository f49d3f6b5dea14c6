/// Summary used when a submission has no title.
pub const DEFAULT_EVENT_TITLE: &str = "Protest Event";

/// Title shown on cards and calendar links when a submission has no title.
pub const UNTITLED_EVENT_TITLE: &str = "Untitled Event";

/// Length of a generated calendar file event.
pub const CALENDAR_EVENT_HOURS: i64 = 4;

/// Length of an "add to calendar" link event.
pub const CALENDAR_LINK_HOURS: i64 = 2;

/// Group key for events whose date column is empty.
pub const NO_DATE_KEY: &str = "No Date";

/// Sort key for events whose time column is empty.
pub const DEFAULT_TIME_KEY: &str = "00:00";

pub const DEFAULT_BASE_URL: &str = "https://theblop.org";

pub const ICS_EXTENSION: &str = "ics";
