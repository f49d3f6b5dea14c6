//! Bucketing events by date for the index page.
//!
//! Groups are keyed by the date column exactly as typed, not by the parsed
//! day: "2025-03-05" and "3/5/2025" land in different groups, and the keys
//! only come out chronological when the sheet uses ISO dates.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::iter::Peekable;
use std::str::Chars;

use crate::constants::{DEFAULT_TIME_KEY, NO_DATE_KEY};
use crate::event::Event;

/// Events grouped by raw date text. Keys iterate in lexical order.
pub type DateGroups = BTreeMap<String, Vec<Event>>;

/// Group key for an event: its date text, or "No Date".
pub fn date_key(event: &Event) -> &str {
    if event.date_text.is_empty() {
        NO_DATE_KEY
    } else {
        &event.date_text
    }
}

fn time_key(event: &Event) -> &str {
    if event.time_text.is_empty() {
        DEFAULT_TIME_KEY
    } else {
        &event.time_text
    }
}

/// Group events by [`date_key`], each group ordered by its time text.
///
/// Events with equal time text keep their input order.
pub fn group_by_date(events: &[Event]) -> DateGroups {
    let mut groups = DateGroups::new();

    for event in events {
        groups
            .entry(date_key(event).to_string())
            .or_default()
            .push(event.clone());
    }

    for group in groups.values_mut() {
        group.sort_by(|a, b| compare_time_text(time_key(a), time_key(b)));
    }

    groups
}

/// Group keys in display order (plain lexical order of the raw text).
pub fn sorted_date_keys(groups: &DateGroups) -> Vec<String> {
    groups.keys().cloned().collect()
}

/// Compare two time cells as text, the way a locale-aware collator does:
/// case is ignored and runs of digits compare by value, so "9:00 AM" comes
/// before "10:00 AM". Nothing is parsed as a time, so "1:00 PM" still sorts
/// before "9:00 AM".
pub fn compare_time_text(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        let ordering = match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let x = take_digits(&mut left);
                let y = take_digits(&mut right);
                let x = x.trim_start_matches('0');
                let y = y.trim_start_matches('0');
                x.len().cmp(&y.len()).then_with(|| x.cmp(y))
            }
            (Some(x), Some(y)) => {
                left.next();
                right.next();
                x.to_lowercase().cmp(y.to_lowercase())
            }
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        digits.push(c);
    }
    digits
}
