//! Reading submissions from the published sheet.

use std::path::Path;

use anyhow::{Context, Result};
use blop_core::{Event, EventRow};

/// Download the CSV export at `url`.
pub async fn fetch_csv(url: &str) -> Result<String> {
    let response = reqwest::get(url)
        .await
        .with_context(|| format!("Could not reach {}", url))?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("Fetching {} failed: HTTP {}", url, status);
    }

    response
        .text()
        .await
        .context("Could not read the sheet response body")
}

pub fn read_csv_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))
}

/// Rows of a CSV export. Rows that don't fit the columns are logged and
/// skipped.
pub fn parse_csv(text: &str) -> Vec<EventRow> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (i, record) in reader.deserialize::<EventRow>().enumerate() {
        match record {
            Ok(row) => rows.push(row),
            // +2: header line, 1-based
            Err(e) => tracing::warn!(line = i + 2, error = %e, "Skipping unreadable row"),
        }
    }
    rows
}

/// Events from a CSV export, rows without a UUID dropped.
pub fn events_from_csv(text: &str) -> Vec<Event> {
    parse_csv(text).into_iter().filter_map(Event::from_row).collect()
}

/// Fetch or read the CSV, preferring a local file when one is given.
pub async fn load_events(csv_file: Option<&Path>, sheet_url: Option<&str>) -> Result<Vec<Event>> {
    let text = match (csv_file, sheet_url) {
        (Some(path), _) => read_csv_file(path)?,
        (None, Some(url)) => {
            let spinner = crate::utils::tui::create_spinner("Fetching events".to_string());
            let result = fetch_csv(url).await;
            spinner.finish_and_clear();
            result?
        }
        (None, None) => anyhow::bail!(
            "No event source configured.\n\n\
            Set sheet_csv_url in blop.toml, export SHEET_CSV_URL, or pass --csv-file <path>."
        ),
    };

    let events = events_from_csv(&text);
    tracing::info!(count = events.len(), "Loaded events");
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "\
UUID,Canonical UUID,Title,Date,Time,City,State,Links,Extra Column
e1,,Rally,2025-03-05,10:00 AM,Seattle,Washington,\"https://a.example, https://b.example\",x
e2,e1,Rally again,2025-03-05,10:00 AM,Seattle,WA,,

,,,,,,,,
e3,,Short row,3/7/2025
";

    #[test]
    fn test_parse_csv_reads_named_columns() {
        let rows = parse_csv(SHEET);
        assert_eq!(rows[0].uuid.as_deref(), Some("e1"));
        assert_eq!(rows[0].title.as_deref(), Some("Rally"));
        assert_eq!(rows[1].canonical_uuid.as_deref(), Some("e1"));
        assert!(rows[0].description.is_none(), "missing column should be empty");
    }

    #[test]
    fn test_short_rows_are_kept() {
        let rows = parse_csv(SHEET);
        let short = rows.iter().find(|r| r.uuid.as_deref() == Some("e3")).unwrap();
        assert_eq!(short.date.as_deref(), Some("3/7/2025"));
        assert!(short.city.is_none());
    }

    #[test]
    fn test_events_without_uuid_are_dropped() {
        let events = events_from_csv(SHEET);
        let ids: Vec<_> = events.iter().map(|e| e.uuid.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e2", "e3"]);
        assert_eq!(events[0].normalized_state, "WA");
        assert_eq!(events[0].links(), vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_read_missing_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(read_csv_file(&tmp.path().join("nope.csv")).is_err());
    }

    #[tokio::test]
    async fn test_load_events_needs_a_source() {
        let err = load_events(None, None).await.unwrap_err();
        assert!(err.to_string().contains("No event source configured"));
    }

    #[tokio::test]
    async fn test_load_events_prefers_local_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("events.csv");
        std::fs::write(&path, SHEET).unwrap();

        let events = load_events(Some(&path), Some("http://127.0.0.1:1/unused.csv"))
            .await
            .unwrap();
        assert_eq!(events.len(), 3);
    }
}
