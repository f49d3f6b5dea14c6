//! Tolerant parsing of the sheet's free-text date and time columns.
//!
//! Nothing in here fails loudly. Text that can't be understood comes back as
//! `None`, `false` or an empty string, so one badly typed row never stops a
//! build.
//!
//! Parsing runs in two stages. The strict stage only accepts a short list of
//! exact layouts ([`STRICT_DATE_PATTERNS`]). The lenient stage cleans the
//! text up (weekday prefixes, ordinals, "at" separators), tries every layout
//! the sheet has been seen to use, splits a trailing time off a leading date,
//! and finally hands the text to `fuzzydate`. Only text naming a full
//! calendar date (a year plus a month name or numeric day) reaches
//! `fuzzydate`, since it resolves relative words against the wall clock.

use std::cmp::Ordering;
use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::event::Event;

/// A date layout the sheet is known to use.
pub struct DatePattern {
    /// Layout name as organizers would write it, e.g. `MM/DD/YYYY`
    pub name: &'static str,
    shape: LazyLock<Regex>,
    format: &'static str,
    /// The layout carries no year, the reference year is filled in
    yearless: bool,
}

macro_rules! date_pattern {
    ($name:literal, $shape:literal, $format:literal) => {
        date_pattern!($name, $shape, $format, false)
    };
    ($name:literal, $shape:literal, $format:literal, $yearless:literal) => {
        DatePattern {
            name: $name,
            shape: LazyLock::new(|| Regex::new($shape).expect("date shape is a valid regex")),
            format: $format,
            yearless: $yearless,
        }
    };
}

impl DatePattern {
    /// Parse `text` if it has exactly this layout and names a real day.
    pub fn parse(&self, text: &str, year: i32) -> Option<NaiveDate> {
        if !self.shape.is_match(text) {
            return None;
        }

        if self.yearless {
            let with_year = format!("{} {}", text, year);
            let format = format!("{} %Y", self.format);
            NaiveDate::parse_from_str(&with_year, &format).ok()
        } else {
            NaiveDate::parse_from_str(text, self.format).ok()
        }
    }
}

/// Layouts accepted by the strict stage of [`parse_date`], in order.
pub static STRICT_DATE_PATTERNS: [DatePattern; 5] = [
    date_pattern!("YYYY-MM-DD", r"^\d{4}-\d{2}-\d{2}$", "%Y-%m-%d"),
    date_pattern!("MM/DD/YYYY", r"^\d{2}/\d{2}/\d{4}$", "%m/%d/%Y"),
    date_pattern!("M/D/YYYY", r"^\d{1,2}/\d{1,2}/\d{4}$", "%m/%d/%Y"),
    date_pattern!("MMM D, YYYY", r"^[A-Za-z]{3} \d{1,2}, \d{4}$", "%b %d, %Y"),
    date_pattern!("MMMM D, YYYY", r"^[A-Za-z]{3,9} \d{1,2}, \d{4}$", "%B %d, %Y"),
];

/// Layouts tried against the bare date column when building calendar files.
pub static CALENDAR_DATE_PATTERNS: [DatePattern; 8] = [
    date_pattern!("YYYY-MM-DD", r"^\d{4}-\d{1,2}-\d{1,2}$", "%Y-%m-%d"),
    date_pattern!("MM/DD/YYYY", r"^\d{1,2}/\d{1,2}/\d{4}$", "%m/%d/%Y"),
    date_pattern!("MM/DD/YY", r"^\d{1,2}/\d{1,2}/\d{2}$", "%m/%d/%y"),
    date_pattern!("YYYY/MM/DD", r"^\d{4}/\d{1,2}/\d{1,2}$", "%Y/%m/%d"),
    date_pattern!("MM-DD-YYYY", r"^\d{1,2}-\d{1,2}-\d{4}$", "%m-%d-%Y"),
    date_pattern!("MM-DD-YY", r"^\d{1,2}-\d{1,2}-\d{2}$", "%m-%d-%y"),
    date_pattern!("MM/DD", r"^\d{1,2}/\d{1,2}$", "%m/%d", true),
    date_pattern!("MM-DD", r"^\d{1,2}-\d{1,2}$", "%m-%d", true),
];

/// Spelled-out layouts, matched after commas, periods and ordinals are removed.
static LOOSE_DATE_PATTERNS: [DatePattern; 3] = [
    date_pattern!("MMMM D YYYY", r"^[A-Za-z]{3,9} \d{1,2} \d{4}$", "%B %d %Y"),
    date_pattern!("D MMMM YYYY", r"^\d{1,2} [A-Za-z]{3,9} \d{4}$", "%d %B %Y"),
    date_pattern!("MMMM D", r"^[A-Za-z]{3,9} \d{1,2}$", "%B %d", true),
];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

static WEEKDAY_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(monday|tuesday|wednesday|thursday|friday|saturday|sunday|mon|tues|tue|wed|thurs|thur|thu|fri|sat|sun)\.?,?\s+",
    )
    .expect("weekday prefix is a valid regex")
});

static ORDINAL_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d)(st|nd|rd|th)\b").expect("ordinal suffix is a valid regex")
});

static TIME_OF_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})(?:[:.](\d{2}))?(?::(\d{2}))?\s*(?:([AP])\.?\s?M\.?)?$")
        .expect("time of day is a valid regex")
});

static FULL_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}\b").expect("full year is a valid regex"));

static MONTH_OR_NUMERIC_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\b|\b\d{1,4}[/-]\d{1,2}\b",
    )
    .expect("month or numeric day is a valid regex")
});

fn first_match(patterns: &[DatePattern], text: &str, year: i32) -> Option<NaiveDate> {
    patterns.iter().find_map(|pattern| {
        let date = pattern.parse(text, year)?;
        tracing::trace!(text, layout = pattern.name, "Matched date layout");
        Some(date)
    })
}

fn start_of_day(date: NaiveDate) -> Option<NaiveDateTime> {
    date.and_hms_opt(0, 0, 0)
}

/// Parse a date column to the start of its day, or to the given time when
/// the text carries one. Yearless text is placed in the current local year.
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    parse_date_with_year(text, Local::now().year())
}

/// [`parse_date`] with an explicit year for layouts that omit it.
pub fn parse_date_with_year(text: &str, year: i32) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(date) = first_match(&STRICT_DATE_PATTERNS, text, year) {
        return start_of_day(date);
    }

    let parsed = parse_lenient(text, year);
    if parsed.is_none() {
        tracing::debug!(text, "Could not parse date");
    }
    parsed
}

fn parse_lenient(text: &str, year: i32) -> Option<NaiveDateTime> {
    let cleaned = clean(text);

    if let Some(date) = parse_day(&cleaned, year) {
        return start_of_day(date);
    }

    if let Some(datetime) = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&cleaned, format).ok())
    {
        return Some(datetime);
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(&cleaned) {
        return Some(datetime.naive_local());
    }

    split_date_time(&cleaned, year).or_else(|| parse_fuzzy(&cleaned))
}

/// Whether `text` names a day on its own, without relying on today.
fn has_absolute_date(text: &str) -> bool {
    FULL_YEAR.is_match(text) && MONTH_OR_NUMERIC_DAY.is_match(text)
}

/// Natural-language fallback. `fuzzydate` can panic on odd input, which is
/// contained here and reported as unparsable.
fn parse_fuzzy(text: &str) -> Option<NaiveDateTime> {
    if !has_absolute_date(text) {
        return None;
    }

    match std::panic::catch_unwind(|| fuzzydate::parse(text)) {
        Ok(parsed) => parsed.ok(),
        Err(_) => {
            tracing::warn!(text, "Date parser panicked");
            None
        }
    }
}

/// Collapse whitespace, drop a leading weekday and turn "at"/"@" into a plain
/// separator.
fn clean(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let without_weekday = WEEKDAY_PREFIX.replace(&collapsed, "");

    without_weekday
        .split(' ')
        .filter(|word| !word.eq_ignore_ascii_case("at") && *word != "@")
        .collect::<Vec<_>>()
        .join(" ")
}

/// A bare day in any layout the sheet uses.
fn parse_day(text: &str, year: i32) -> Option<NaiveDate> {
    first_match(&STRICT_DATE_PATTERNS, text, year)
        .or_else(|| first_match(&CALENDAR_DATE_PATTERNS, text, year))
        .or_else(|| {
            let loose = ORDINAL_SUFFIX.replace_all(text, "$1").replace([',', '.'], "");
            let loose = loose.split_whitespace().collect::<Vec<_>>().join(" ");
            first_match(&LOOSE_DATE_PATTERNS, &loose, year)
        })
}

/// "<date> <time>" where both halves parse on their own.
fn split_date_time(text: &str, year: i32) -> Option<NaiveDateTime> {
    let words: Vec<&str> = text.split(' ').collect();

    for split in 1..words.len() {
        let date_part = words[..split].join(" ");
        let Some(date) = parse_day(date_part.trim_end_matches(','), year) else {
            continue;
        };
        if let Some(time) = parse_time(&words[split..].join(" ")) {
            return Some(date.and_time(time));
        }
    }

    None
}

/// Parse a time column.
///
/// Twelve-hour `h:mm AM/PM` is the expected form, but `10am`, `10 a.m.`,
/// 24-hour `14:30` and `noon` are also accepted. For a range such as
/// `10:00 AM - 2:00 PM` only the start is read.
pub fn parse_time(text: &str) -> Option<NaiveTime> {
    let upper = text.trim().to_uppercase();
    let start = upper
        .split(['-', '–', '—'])
        .next()
        .and_then(|s| s.split(" TO ").next())
        .unwrap_or_default()
        .trim();

    match start {
        "" => return None,
        "NOON" => return NaiveTime::from_hms_opt(12, 0, 0),
        "MIDNIGHT" => return NaiveTime::from_hms_opt(0, 0, 0),
        _ => {}
    }

    let caps = TIME_OF_DAY.captures(start)?;
    let number = |i: usize| -> Option<u32> {
        caps.get(i).map_or(Some(0), |m| m.as_str().parse().ok())
    };
    let hour = number(1)?;
    let minute = number(2)?;
    let second = number(3)?;

    let hour = match caps.get(4).map(|m| m.as_str()) {
        Some(meridiem) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            let pm = if meridiem == "P" { 12 } else { 0 };
            hour % 12 + pm
        }
        None => hour,
    };

    NaiveTime::from_hms_opt(hour, minute, second)
}

/// Date and time of an event for its calendar file.
///
/// Tries the date and time columns together first, then the bare date
/// column against [`CALENDAR_DATE_PATTERNS`], then the bare date column
/// through [`parse_date_with_year`]. The latter two land on the start of the
/// day.
pub fn parse_event_start(date_text: &str, time_text: &str, year: i32) -> Option<NaiveDateTime> {
    let date_text = date_text.trim();
    if date_text.is_empty() {
        return None;
    }

    parse_date_with_year(&format!("{} {}", date_text, time_text.trim()), year)
        .or_else(|| first_match(&CALENDAR_DATE_PATTERNS, date_text, year).and_then(start_of_day))
        .or_else(|| parse_date_with_year(date_text, year))
}

/// Whether the date falls on `today` or later.
///
/// Unparsable text is never in the future.
pub fn is_future_on(text: &str, today: NaiveDate) -> bool {
    parse_date_with_year(text, today.year()).is_some_and(|instant| instant.date() >= today)
}

/// [`is_future_on`] against the local calendar day.
pub fn is_future(text: &str) -> bool {
    is_future_on(text, Local::now().date_naive())
}

/// "Wednesday, March 5, 2025", or empty when unparsable.
pub fn humanize_date(text: &str) -> String {
    parse_date(text)
        .map(|instant| instant.format("%A, %B %-d, %Y").to_string())
        .unwrap_or_default()
}

/// "6:30 PM", or empty when unparsable.
pub fn humanize_time(text: &str) -> String {
    parse_time(text)
        .map(|time| time.format("%-I:%M %p").to_string())
        .unwrap_or_default()
}

/// "Wednesday, March 5, 2025 at 6:30 PM", or empty when unparsable.
pub fn humanize_date_time(text: &str) -> String {
    parse_date(text)
        .map(|instant| instant.format("%A, %B %-d, %Y at %-I:%M %p").to_string())
        .unwrap_or_default()
}

/// Order by parsed date, events without one last.
pub fn compare_parsed_dates(a: &Event, b: &Event) -> Ordering {
    match (a.parsed_instant, b.parsed_instant) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort by parsed date, unparsable dates last.
pub fn sort_by_parsed_date(events: &mut [Event]) {
    events.sort_by(compare_parsed_dates);
}

/// Events dated `today` or later.
pub fn future_events(events: &[Event], today: NaiveDate) -> Vec<Event> {
    events
        .iter()
        .filter(|event| is_future_on(&event.date_text, today))
        .cloned()
        .collect()
}
