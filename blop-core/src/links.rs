//! "Add to calendar" links for the hosted calendar services.
//!
//! Both services take floating times (no `Z`, no timezone parameter) so the
//! event lands at the listed wall-clock time wherever the reader is.

use chrono::{Duration, NaiveDateTime};
use url::form_urlencoded;

use crate::constants::{CALENDAR_LINK_HOURS, UNTITLED_EVENT_TITLE};
use crate::date::parse_event_start;
use crate::event::Event;

const GOOGLE_TEMPLATE_URL: &str = "https://calendar.google.com/calendar/render?action=TEMPLATE";
const OUTLOOK_COMPOSE_URL: &str =
    "https://outlook.office.com/calendar/0/deeplink/compose?path=/calendar/action/compose&rru=addevent";

fn encode(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes()).collect()
}

fn span(event: &Event, year: i32) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start = parse_event_start(&event.date_text, &event.time_text, year)?;
    Some((start, start + Duration::hours(CALENDAR_LINK_HOURS)))
}

fn title(event: &Event) -> &str {
    if event.title.is_empty() {
        UNTITLED_EVENT_TITLE
    } else {
        &event.title
    }
}

/// Meeting location, address, city and state, skipping the blank ones.
fn location(event: &Event) -> String {
    [
        &event.meeting_location,
        &event.address,
        &event.city,
        &event.state,
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .map(String::as_str)
    .collect::<Vec<_>>()
    .join(", ")
}

/// Google Calendar template link, or `None` when the date can't be parsed.
pub fn google_calendar_link(event: &Event, year: i32) -> Option<String> {
    let (start, end) = span(event, year)?;
    let format = "%Y%m%dT%H%M%S";

    Some(format!(
        "{}&text={}&dates={}/{}&details={}&location={}",
        GOOGLE_TEMPLATE_URL,
        encode(title(event)),
        start.format(format),
        end.format(format),
        encode(&event.description),
        encode(&location(event)),
    ))
}

/// Outlook compose link, or `None` when the date can't be parsed.
pub fn outlook_calendar_link(event: &Event, year: i32) -> Option<String> {
    let (start, end) = span(event, year)?;
    let format = "%Y-%m-%dT%H:%M:%S";

    Some(format!(
        "{}&startdt={}&enddt={}&subject={}&body={}&location={}",
        OUTLOOK_COMPOSE_URL,
        start.format(format),
        end.format(format),
        encode(title(event)),
        encode(&event.description),
        encode(&location(event)),
    ))
}
