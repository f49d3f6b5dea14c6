//! One build of the site, from events to the manifest the renderer reads.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::canonical::{PageEntry, SiteIndex};
use crate::date::{future_events, sort_by_parsed_date};
use crate::error::BlopResult;
use crate::event::Event;
use crate::group::{DateGroups, group_by_date, sorted_date_keys};
use crate::ics::{CalendarFile, CalendarFileGenerator};
use crate::state::ALL_STATE_CODES;

/// Tally of calendar file outcomes for one build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CalendarStats {
    pub written: usize,
    pub cached: usize,
    pub skipped: usize,
}

impl CalendarStats {
    pub fn record(&mut self, outcome: &CalendarFile) {
        match outcome {
            CalendarFile::Written(_) => self.written += 1,
            CalendarFile::Cached(_) => self.cached += 1,
            CalendarFile::Skipped(_) => self.skipped += 1,
        }
    }
}

/// Everything the page renderer needs.
#[derive(Debug, Clone, Serialize)]
pub struct SiteBuild {
    /// Upcoming, deduplicated events grouped by raw date text
    pub groups: DateGroups,
    /// Group keys in display order
    pub date_keys: Vec<String>,
    /// One page per original UUID, past events included
    pub pages: Vec<PageEntry>,
    /// Calendar file per UUID, `None` where none could be made
    pub calendar_files: BTreeMap<String, Option<PathBuf>>,
    /// State filter options
    pub states: Vec<&'static str>,
    pub calendar_stats: CalendarStats,
}

impl SiteBuild {
    pub fn listed_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Run every transform over a batch of events.
///
/// Events are sorted by parsed date, upcoming ones are deduplicated and
/// grouped for the index, and every event (duplicates and past events
/// included) gets a page entry and a calendar file attempt.
pub fn build_site(mut events: Vec<Event>, calendars: &CalendarFileGenerator) -> SiteBuild {
    sort_by_parsed_date(&mut events);

    let upcoming = future_events(&events, calendars.today());
    let index = SiteIndex::build(&upcoming, &events);
    let groups = group_by_date(&index.display);
    let date_keys = sorted_date_keys(&groups);

    tracing::info!(
        total = events.len(),
        upcoming = upcoming.len(),
        listed = index.display.len(),
        groups = groups.len(),
        "Indexed events"
    );

    let (calendar_files, calendar_stats) = generate_calendar_files(&events, calendars);

    SiteBuild {
        groups,
        date_keys,
        pages: index.pages,
        calendar_files,
        states: ALL_STATE_CODES.to_vec(),
        calendar_stats,
    }
}

/// Calendar file attempt for each event, in order.
pub fn generate_calendar_files(
    events: &[Event],
    calendars: &CalendarFileGenerator,
) -> (BTreeMap<String, Option<PathBuf>>, CalendarStats) {
    let mut files = BTreeMap::new();
    let mut stats = CalendarStats::default();

    for event in events {
        let outcome = calendars.generate(event);
        stats.record(&outcome);
        files.insert(event.uuid.clone(), outcome.into_path());
    }

    (files, stats)
}

/// Write the build manifest as pretty JSON.
pub fn write_manifest(path: &Path, build: &SiteBuild) -> BlopResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(build)?;
    std::fs::write(path, json)?;
    Ok(())
}
