//! ICS file generation.

use chrono::{Duration, NaiveDateTime};
use icalendar::{Calendar, Component, EventLike};

use crate::constants::{CALENDAR_EVENT_HOURS, DEFAULT_EVENT_TITLE};
use crate::error::{BlopError, BlopResult};
use crate::event::Event;
use crate::location::{display_address, maps_url};

const PRODID: &str = "PRODID:-//theblop.org//blop//EN";

/// Generate .ics content for an event starting at `start`.
///
/// Times are floating: DTSTART/DTEND carry neither a `Z` nor a TZID, so
/// calendar apps show the listed wall-clock time.
pub fn generate_ics(event: &Event, start: NaiveDateTime) -> BlopResult<String> {
    if event.uuid.is_empty() {
        return Err(BlopError::IcsGenerate("event has no UUID".to_string()));
    }

    let mut cal = Calendar::new();

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.uuid);

    let summary: &str = if event.title.is_empty() {
        DEFAULT_EVENT_TITLE
    } else {
        &event.title
    };
    ics_event.summary(summary);

    // DTSTAMP - required by RFC 5545
    let dtstamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    ics_event.add_property("DTSTAMP", &dtstamp);

    let end = start + Duration::hours(CALENDAR_EVENT_HOURS);
    add_floating_property(&mut ics_event, "DTSTART", start);
    add_floating_property(&mut ics_event, "DTEND", end);

    let description = format!("{}\n\n{}", event.description, event.meeting_location);
    ics_event.description(&description);

    let address = display_address(event);
    ics_event.location(&address);
    ics_event.add_property("URL", maps_url(&address));

    let ics_event = ics_event.done();
    cal.push(ics_event);
    let cal = cal.done();

    Ok(strip_ics_bloat(&cal.to_string()))
}

/// Floating datetime (no Z, no TZID)
fn add_floating_property(ics_event: &mut icalendar::Event, name: &str, time: NaiveDateTime) {
    ics_event.add_property(name, time.format("%Y%m%dT%H%M%S").to_string());
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with our own
/// - Remove CALSCALE:GREGORIAN (it's the default)
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str(PRODID);
            result.push_str("\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventRow;
    use chrono::NaiveDate;

    fn make_test_event() -> Event {
        Event::from_row(EventRow {
            uuid: Some("e1".to_string()),
            title: Some("Hands Off Rally".to_string()),
            date: Some("2025-03-05".to_string()),
            time: Some("10:00 AM".to_string()),
            description: Some("Bring signs".to_string()),
            meeting_location: Some("North steps".to_string()),
            address: Some("400 Broad St".to_string()),
            city: Some("Seattle".to_string()),
            state: Some("Washington".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    fn ten_am() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 5)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_generate_ics_floating_times() {
        let ics = generate_ics(&make_test_event(), ten_am()).unwrap();

        assert!(
            ics.contains("DTSTART:20250305T100000\r\n"),
            "DTSTART should be floating. ICS:\n{}",
            ics
        );
        assert!(
            ics.contains("DTEND:20250305T140000\r\n"),
            "DTEND should be four hours later. ICS:\n{}",
            ics
        );
        assert!(!ics.contains("TZID"), "No timezone expected. ICS:\n{}", ics);
    }

    #[test]
    fn test_generate_ics_single_event_fields() {
        let ics = generate_ics(&make_test_event(), ten_am()).unwrap();

        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 1);
        assert!(ics.contains("UID:e1\r\n"), "ICS:\n{}", ics);
        assert!(ics.contains("SUMMARY:Hands Off Rally\r\n"), "ICS:\n{}", ics);
        assert!(ics.contains("DESCRIPTION:Bring signs"), "ICS:\n{}", ics);
        assert!(ics.contains("LOCATION:400 Broad St"), "ICS:\n{}", ics);
        assert!(
            ics.contains("URL:https://www.google.com/maps/search/"),
            "ICS:\n{}",
            ics
        );
    }

    #[test]
    fn test_generate_ics_default_summary() {
        let mut event = make_test_event();
        event.title.clear();

        let ics = generate_ics(&event, ten_am()).unwrap();
        assert!(ics.contains("SUMMARY:Protest Event\r\n"), "ICS:\n{}", ics);
    }

    #[test]
    fn test_generate_ics_requires_uuid() {
        let mut event = make_test_event();
        event.uuid.clear();

        let err = generate_ics(&event, ten_am()).unwrap_err();
        assert!(matches!(err, BlopError::IcsGenerate(_)));
    }

    #[test]
    fn test_generate_ics_strips_bloat() {
        let ics = generate_ics(&make_test_event(), ten_am()).unwrap();

        assert!(ics.contains("PRODID:-//theblop.org//blop//EN\r\n"));
        assert_eq!(ics.matches("PRODID:").count(), 1);
        assert!(!ics.contains("CALSCALE:GREGORIAN"));
    }
}
