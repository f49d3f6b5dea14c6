//! Collapsing duplicate submissions.
//!
//! The same protest is often submitted more than once. Editors mark the
//! copies by filling in "Canonical UUID" with the id of the record to keep.
//! Copies drop out of the listing but every original UUID still gets a page,
//! rendered from the canonical record, so links that went out keep working.

use std::collections::HashMap;

use serde::Serialize;

use crate::event::Event;

/// Events to list: those with no canonical UUID, an empty one, or their own.
///
/// Any other canonical UUID hides the event, even when it names no known
/// event. Only page resolution falls back to the event itself.
pub fn build_display_list(events: &[Event]) -> Vec<Event> {
    events
        .iter()
        .filter(|event| event.alias_target().is_none())
        .cloned()
        .collect()
}

/// The record whose fields are rendered on `event`'s page: the event its
/// canonical UUID points to, or the event itself when that points nowhere.
pub fn resolve_canonical<'a>(event: &'a Event, all: &'a [Event]) -> &'a Event {
    event
        .alias_target()
        .and_then(|target| all.iter().find(|e| e.uuid == target))
        .unwrap_or(event)
}

/// One generated page: an original UUID and the record shown on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageEntry {
    pub uuid: String,
    /// True when the page shows another event's record
    pub is_alias: bool,
    pub record: Event,
}

/// The listing and the per-UUID pages, built side by side without touching
/// the source events.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SiteIndex {
    pub display: Vec<Event>,
    pub pages: Vec<PageEntry>,
}

impl SiteIndex {
    /// Index `all`, listing only the events in `listed`.
    pub fn build(listed: &[Event], all: &[Event]) -> Self {
        let mut by_uuid: HashMap<&str, &Event> = HashMap::new();
        for event in all {
            by_uuid.entry(event.uuid.as_str()).or_insert(event);
        }

        let pages = all
            .iter()
            .map(|event| {
                let record = event
                    .alias_target()
                    .and_then(|target| by_uuid.get(target).copied())
                    .unwrap_or(event);

                PageEntry {
                    uuid: event.uuid.clone(),
                    is_alias: record.uuid != event.uuid,
                    record: record.clone(),
                }
            })
            .collect();

        SiteIndex {
            display: build_display_list(listed),
            pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::tests::{event, row};

    fn alias(uuid: &str, canonical: &str) -> Event {
        let mut r = row(uuid, "2025-03-05", "");
        r.canonical_uuid = Some(canonical.to_string());
        r.title = Some(format!("copy of {}", canonical));
        Event::from_row(r).unwrap()
    }

    fn page<'a>(index: &'a SiteIndex, uuid: &str) -> &'a PageEntry {
        index.pages.iter().find(|p| p.uuid == uuid).unwrap()
    }

    fn ids(events: &[Event]) -> Vec<&str> {
        events.iter().map(|e| e.uuid.as_str()).collect()
    }

    #[test]
    fn test_alias_is_left_out_of_listing() {
        let a = alias("a", "b");
        let b = event("b", "2025-03-05", "");
        let all = vec![a.clone(), b.clone()];

        assert_eq!(ids(&build_display_list(&all)), vec!["b"]);
        assert_eq!(resolve_canonical(&a, &all).uuid, "b");
        assert_eq!(resolve_canonical(&b, &all).uuid, "b");
    }

    #[test]
    fn test_self_and_empty_canonical_are_listed() {
        let all = vec![alias("a", "a"), alias("b", ""), event("c", "", "")];
        assert_eq!(ids(&build_display_list(&all)), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_dangling_canonical_is_hidden_but_renders_self() {
        let a = alias("a", "missing");
        let all = vec![a.clone()];

        assert!(build_display_list(&all).is_empty(), "aliases are never listed");
        assert_eq!(resolve_canonical(&a, &all).uuid, "a");
    }

    #[test]
    fn test_alias_of_unlisted_event_stays_hidden() {
        // the canonical record exists but is not itself listed (e.g. past)
        let a = alias("a", "b");
        let b = event("b", "2025-01-01", "");
        let all = vec![a.clone(), b];

        let index = SiteIndex::build(&[a], &all);
        assert!(index.display.is_empty());
        assert_eq!(page(&index, "a").record.uuid, "b");
    }

    #[test]
    fn test_site_index_keeps_a_page_per_uuid() {
        let all = vec![
            alias("a", "b"),
            event("b", "2025-03-05", ""),
            alias("c", "nowhere"),
        ];
        let index = SiteIndex::build(&all, &all);

        assert_eq!(ids(&index.display), vec!["b"]);
        assert_eq!(index.pages.len(), 3);

        let a = page(&index, "a");
        assert!(a.is_alias);
        assert_eq!(a.record.uuid, "b");

        let c = page(&index, "c");
        assert!(!c.is_alias);
        assert_eq!(c.record.uuid, "c");
        assert!(index.pages.iter().all(|p| p.uuid != "nowhere"));
    }

    #[test]
    fn test_alias_resolves_one_hop() {
        let all = vec![alias("a", "b"), alias("b", "c"), event("c", "", "")];
        assert_eq!(resolve_canonical(&all[0], &all).uuid, "b");
    }
}
