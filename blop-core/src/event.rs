//! Spreadsheet rows and the typed events built from them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::date::parse_date;
use crate::state::normalize_state;

/// One row of the submissions spreadsheet, keyed by its column headers.
///
/// Every column is optional: the sheet is filled in by hand and by scrapers,
/// so any cell can be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventRow {
    #[serde(rename = "UUID", default)]
    pub uuid: Option<String>,
    #[serde(rename = "Canonical UUID", default)]
    pub canonical_uuid: Option<String>,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
    #[serde(rename = "Time", default)]
    pub time: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "City", default)]
    pub city: Option<String>,
    #[serde(rename = "State", default)]
    pub state: Option<String>,
    #[serde(rename = "Address", default)]
    pub address: Option<String>,
    #[serde(rename = "Meeting Location", default)]
    pub meeting_location: Option<String>,
    #[serde(rename = "Links", default)]
    pub links: Option<String>,
    #[serde(rename = "Sponsors", default)]
    pub sponsors: Option<String>,
    #[serde(rename = "Image URL", default)]
    pub image_url: Option<String>,
}

/// A submitted event with its text fields trimmed and its date and state
/// normalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub uuid: String,
    pub canonical_uuid: Option<String>,
    /// Raw date text as typed into the sheet. Also the display group key.
    pub date_text: String,
    /// Raw time text as typed into the sheet.
    pub time_text: String,
    pub title: String,
    pub description: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub meeting_location: String,
    /// Comma-joined links, see [`Event::links`].
    pub links: String,
    /// Comma-joined sponsors, see [`Event::sponsors`].
    pub sponsors: String,
    pub image_url: String,

    /// `date_text` run through [`parse_date`], if it could be parsed at all
    pub parsed_instant: Option<NaiveDateTime>,
    /// Two-letter state code, or the trimmed state text if unrecognized
    pub normalized_state: String,
}

fn cell(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

impl Event {
    /// Build an event from a sheet row. Rows without a UUID are rejected.
    pub fn from_row(row: EventRow) -> Option<Event> {
        let uuid = cell(row.uuid);
        if uuid.is_empty() {
            tracing::warn!(title = ?row.title, "Skipping row with missing UUID");
            return None;
        }

        let canonical_uuid = Some(cell(row.canonical_uuid)).filter(|c| !c.is_empty());
        let date_text = cell(row.date);
        let city = cell(row.city);
        let state = cell(row.state);
        let parsed_instant = parse_date(&date_text);
        let normalized_state = normalize_state(&state, &city);

        Some(Event {
            uuid,
            canonical_uuid,
            date_text,
            time_text: cell(row.time),
            title: cell(row.title),
            description: cell(row.description),
            city,
            state,
            address: cell(row.address),
            meeting_location: cell(row.meeting_location),
            links: cell(row.links),
            sponsors: cell(row.sponsors),
            image_url: cell(row.image_url),
            parsed_instant,
            normalized_state,
        })
    }

    /// The UUID this event is an alias of, if it points somewhere other than
    /// itself.
    pub fn alias_target(&self) -> Option<&str> {
        self.canonical_uuid
            .as_deref()
            .filter(|canonical| *canonical != self.uuid)
    }

    pub fn links(&self) -> Vec<String> {
        split_list(&self.links)
    }

    pub fn sponsors(&self) -> Vec<String> {
        split_list(&self.sponsors)
    }

    /// "City, State" with a dangling separator removed when the state is
    /// missing.
    pub fn display_location(&self) -> String {
        let joined = format!("{}, {}", self.city, self.normalized_state);
        joined.trim_end().trim_end_matches(',').trim().to_string()
    }
}

fn split_list(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}
