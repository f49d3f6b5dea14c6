//! Calendar files on disk.
//!
//! The output directory doubles as the cache: an event whose UUID already
//! starts a filename there is not generated again. The build is a single
//! sequential pass, so the directory scan and the write don't race.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, NaiveDate};

use crate::constants::ICS_EXTENSION;
use crate::date::parse_event_start;
use crate::error::BlopResult;
use crate::event::Event;
use crate::ics::generate_ics;

/// Why an event got no calendar file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The UUID can't be used as a file name
    UnsafeUuid,
    NoDate,
    UnparsableDate,
    PastEvent,
    IoFailure,
}

/// What happened when an event's calendar file was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarFile {
    /// Generated during this call
    Written(PathBuf),
    /// Already on disk from an earlier run
    Cached(PathBuf),
    Skipped(SkipReason),
}

impl CalendarFile {
    pub fn path(&self) -> Option<&Path> {
        match self {
            CalendarFile::Written(path) | CalendarFile::Cached(path) => Some(path.as_path()),
            CalendarFile::Skipped(_) => None,
        }
    }

    pub fn into_path(self) -> Option<PathBuf> {
        match self {
            CalendarFile::Written(path) | CalendarFile::Cached(path) => Some(path),
            CalendarFile::Skipped(_) => None,
        }
    }
}

/// Writes `{uuid}.ics` files into one directory.
#[derive(Debug, Clone)]
pub struct CalendarFileGenerator {
    dir: PathBuf,
    today: NaiveDate,
}

impl CalendarFileGenerator {
    /// Generator for `dir`, treating the local calendar day as today.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_today(dir, Local::now().date_naive())
    }

    pub fn with_today(dir: impl Into<PathBuf>, today: NaiveDate) -> Self {
        CalendarFileGenerator {
            dir: dir.into(),
            today,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Make sure `event` has a calendar file, writing one if needed.
    ///
    /// Events without a parsable date, and events before today, are skipped.
    /// Every failure is logged and reported as a skip; none is returned as an
    /// error, so the rest of the batch carries on.
    pub fn generate(&self, event: &Event) -> CalendarFile {
        let uuid = event.uuid.as_str();

        if !is_safe_file_stem(uuid) {
            tracing::warn!(uuid, "Skipping calendar file for event with unusable UUID");
            return CalendarFile::Skipped(SkipReason::UnsafeUuid);
        }

        if event.date_text.is_empty() {
            tracing::warn!(uuid, "Skipping calendar file for event with no date");
            return CalendarFile::Skipped(SkipReason::NoDate);
        }

        let Some(start) = parse_event_start(&event.date_text, &event.time_text, self.today.year())
        else {
            tracing::warn!(
                uuid,
                date = %event.date_text,
                time = %event.time_text,
                "Could not parse date/time for calendar file"
            );
            return CalendarFile::Skipped(SkipReason::UnparsableDate);
        };

        if start.date() < self.today {
            tracing::info!(uuid, date = %event.date_text, "Skipping calendar file for past event");
            return CalendarFile::Skipped(SkipReason::PastEvent);
        }

        match self.find_existing(uuid) {
            Ok(Some(path)) => {
                tracing::debug!(uuid, path = %path.display(), "Calendar file already exists");
                return CalendarFile::Cached(path);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(uuid, dir = %self.dir.display(), error = %e, "Could not read calendar directory");
                return CalendarFile::Skipped(SkipReason::IoFailure);
            }
        }

        match self.write(event, start) {
            Ok(path) => {
                tracing::info!(uuid, path = %path.display(), "Saved calendar file");
                CalendarFile::Written(path)
            }
            Err(e) => {
                tracing::error!(uuid, error = %e, "Could not write calendar file");
                CalendarFile::Skipped(SkipReason::IoFailure)
            }
        }
    }

    /// [`generate`](Self::generate), keeping only the resulting path.
    pub fn ensure(&self, event: &Event) -> Option<PathBuf> {
        self.generate(event).into_path()
    }

    /// First file (by name) in the directory whose name starts with `uuid`.
    fn find_existing(&self, uuid: &str) -> BlopResult<Option<PathBuf>> {
        if !self.dir.exists() {
            return Ok(None);
        }

        let existing = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(uuid))
            .map(|entry| entry.path())
            .min();

        Ok(existing)
    }

    fn write(&self, event: &Event, start: chrono::NaiveDateTime) -> BlopResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;

        let content = generate_ics(event, start)?;
        let path = self.dir.join(format!("{}.{}", event.uuid, ICS_EXTENSION));
        std::fs::write(&path, content)?;

        Ok(path)
    }
}

/// A UUID that stays inside the output directory once `.ics` is appended.
fn is_safe_file_stem(uuid: &str) -> bool {
    !uuid.is_empty()
        && uuid != "."
        && uuid != ".."
        && !uuid.contains(['/', '\\', '\0'])
}

/// Calendar file path for `event` in `dir`, generating it if needed.
pub fn ensure_calendar_file(event: &Event, dir: &Path) -> Option<PathBuf> {
    CalendarFileGenerator::new(dir).ensure(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventRow;
    use crate::event::tests::event;

    fn march(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn seattle_rally() -> Event {
        Event::from_row(EventRow {
            uuid: Some("e1".to_string()),
            date: Some("2025-03-05".to_string()),
            time: Some("10:00 AM".to_string()),
            city: Some("Seattle".to_string()),
            state: Some("Washington".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    fn ics_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_writes_floating_calendar_file() {
        let tmp = tempfile::tempdir().unwrap();
        let generator = CalendarFileGenerator::with_today(tmp.path(), march(1));

        let result = generator.generate(&seattle_rally());
        let path = tmp.path().join("e1.ics");
        assert_eq!(result, CalendarFile::Written(path.clone()));

        let ics = std::fs::read_to_string(&path).unwrap();
        assert!(ics.contains("DTSTART:20250305T100000\r\n"), "ICS:\n{}", ics);
        assert!(ics.contains("DTEND:20250305T140000\r\n"), "ICS:\n{}", ics);
    }

    #[test]
    fn test_second_call_reuses_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let generator = CalendarFileGenerator::with_today(tmp.path(), march(1));
        let event = seattle_rally();

        let first = generator.generate(&event);
        let written = std::fs::read_to_string(tmp.path().join("e1.ics")).unwrap();

        let second = generator.generate(&event);
        assert_eq!(second, CalendarFile::Cached(tmp.path().join("e1.ics")));
        assert_eq!(first.path(), second.path());
        assert_eq!(generator.ensure(&event), first.into_path());

        let after = std::fs::read_to_string(tmp.path().join("e1.ics")).unwrap();
        assert_eq!(written, after, "cached file must not be rewritten");
        assert_eq!(ics_files(tmp.path()), vec!["e1.ics"]);
    }

    #[test]
    fn test_any_file_starting_with_uuid_counts() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("e1-old.ics"), "stale").unwrap();
        let generator = CalendarFileGenerator::with_today(tmp.path(), march(1));

        let result = generator.generate(&seattle_rally());
        assert_eq!(result, CalendarFile::Cached(tmp.path().join("e1-old.ics")));
    }

    #[test]
    fn test_no_date_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let generator = CalendarFileGenerator::with_today(tmp.path(), march(1));

        let result = generator.generate(&event("e2", "", "10:00 AM"));
        assert_eq!(result, CalendarFile::Skipped(SkipReason::NoDate));
        assert!(ics_files(tmp.path()).is_empty());
    }

    #[test]
    fn test_unparsable_date_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let generator = CalendarFileGenerator::with_today(tmp.path(), march(1));

        let result = generator.generate(&event("e3", "TBD", ""));
        assert_eq!(result, CalendarFile::Skipped(SkipReason::UnparsableDate));
    }

    #[test]
    fn test_past_event_is_skipped_even_when_cached() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("e1.ics"), "old").unwrap();
        let generator = CalendarFileGenerator::with_today(tmp.path(), march(6));

        let result = generator.generate(&seattle_rally());
        assert_eq!(result, CalendarFile::Skipped(SkipReason::PastEvent));
    }

    #[test]
    fn test_event_today_is_written() {
        let tmp = tempfile::tempdir().unwrap();
        let generator = CalendarFileGenerator::with_today(tmp.path(), march(5));

        let mut event = seattle_rally();
        event.time_text = "7:00 AM".to_string();
        assert!(matches!(generator.generate(&event), CalendarFile::Written(_)));
    }

    #[test]
    fn test_missing_directory_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("assets").join("ical");
        let generator = CalendarFileGenerator::with_today(&dir, march(1));

        assert_eq!(generator.ensure(&seattle_rally()), Some(dir.join("e1.ics")));
    }

    #[test]
    fn test_ensure_calendar_file_uses_local_today() {
        let tmp = tempfile::tempdir().unwrap();
        let event = event("far", "2999-06-01", "10:00 AM");

        assert_eq!(ensure_calendar_file(&event, tmp.path()), Some(tmp.path().join("far.ics")));
        assert_eq!(ensure_calendar_file(&seattle_rally(), tmp.path()), None);
    }

    #[test]
    fn test_uuid_with_path_separators_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("ical");
        let generator = CalendarFileGenerator::with_today(&dir, march(1));

        for uuid in ["../escape", "a/b", "a\\b", ".."] {
            let mut event = seattle_rally();
            event.uuid = uuid.to_string();
            assert_eq!(
                generator.generate(&event),
                CalendarFile::Skipped(SkipReason::UnsafeUuid),
                "{:?} must not become a path",
                uuid
            );
        }
        assert!(!tmp.path().join("escape.ics").exists());
        assert!(!dir.exists(), "nothing should have been written");
    }

    #[test]
    fn test_unwritable_directory_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();
        let generator = CalendarFileGenerator::with_today(&blocker, march(1));

        let result = generator.generate(&seattle_rally());
        assert_eq!(result, CalendarFile::Skipped(SkipReason::IoFailure));
    }
}
