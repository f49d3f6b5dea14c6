//! The public JSON feed of events.

use std::path::Path;

use chrono::{Datelike, Local};
use serde::Serialize;

use crate::date::{compare_parsed_dates, humanize_date};
use crate::error::BlopResult;
use crate::event::Event;
use crate::links::{google_calendar_link, outlook_calendar_link};

/// Short words kept lowercase inside a title.
const MINOR_WORDS: [&str; 17] = [
    "a", "an", "and", "as", "at", "but", "by", "for", "from", "in", "nor", "of", "on", "or",
    "the", "to", "via",
];

/// An event as published in `events.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedEvent {
    pub id: String,
    pub title: String,
    /// Humanized date, empty when the date column can't be parsed
    pub date: String,
    pub time: String,
    pub description: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub meeting_location: String,
    /// "City, State" for listings
    pub location: String,
    pub image_url: Option<String>,
    pub links: Vec<String>,
    pub sponsors: Vec<String>,
    pub canonical_id: Option<String>,
    pub permalink: String,
    pub ical: String,
    pub google_calendar: Option<String>,
    pub outlook_calendar: Option<String>,
}

impl FeedEvent {
    pub fn from_event(event: &Event, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        let year = Local::now().year();

        FeedEvent {
            id: event.uuid.clone(),
            title: title_case(&event.title),
            date: humanize_date(&event.date_text),
            time: event.time_text.clone(),
            description: event.description.clone(),
            city: event.city.clone(),
            state: event.normalized_state.clone(),
            address: event.address.clone(),
            meeting_location: event.meeting_location.clone(),
            location: event.display_location(),
            image_url: Some(event.image_url.clone()).filter(|url| !url.is_empty()),
            links: event.links(),
            sponsors: event.sponsors(),
            canonical_id: event.canonical_uuid.clone(),
            permalink: format!("{}/events/{}.html", base_url, event.uuid),
            ical: format!("{}/assets/ical/{}.ics", base_url, event.uuid),
            google_calendar: google_calendar_link(event, year),
            outlook_calendar: outlook_calendar_link(event, year),
        }
    }
}

/// Capitalize the first letter of each word, leaving short joining words
/// lowercase unless they open or close the title. The rest of each word is
/// kept as typed, so acronyms survive.
pub fn title_case(title: &str) -> String {
    let words: Vec<&str> = title.split(' ').collect();
    let last = words.len().saturating_sub(1);

    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let minor = MINOR_WORDS.contains(&word.to_lowercase().as_str());
            if minor && i != 0 && i != last {
                return word.to_lowercase();
            }

            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Every event, earliest first, undated ones at the end.
pub fn build_feed(events: &[Event], base_url: &str) -> Vec<FeedEvent> {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by(|a, b| compare_parsed_dates(a, b));

    sorted
        .into_iter()
        .map(|event| FeedEvent::from_event(event, base_url))
        .collect()
}

pub fn write_feed(path: &Path, feed: &[FeedEvent]) -> BlopResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(feed)?;
    std::fs::write(path, json)?;
    Ok(())
}
