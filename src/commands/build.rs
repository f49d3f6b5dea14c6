use std::path::Path;

use anyhow::{Context, Result};
use blop_core::feed::{build_feed, write_feed};
use blop_core::ics::CalendarFileGenerator;
use blop_core::site::{build_site, write_manifest};
use chrono::Local;
use owo_colors::OwoColorize;

use super::load_config;
use crate::render::Render;
use crate::source::load_events;

pub async fn run(config_path: &Path, csv_file: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let events = load_events(csv_file, config.sheet_csv_url.as_deref()).await?;

    println!("{} {} events", "Read".bold(), events.len());

    let feed = build_feed(&events, &config.base_url);
    let calendars = CalendarFileGenerator::with_today(config.ical_path(), Local::now().date_naive());
    let site = build_site(events, &calendars);

    let manifest_path = config.manifest_path();
    write_manifest(&manifest_path, &site)
        .with_context(|| format!("Could not write manifest to {}", manifest_path.display()))?;

    let feed_path = config.feed_path();
    write_feed(&feed_path, &feed)
        .with_context(|| format!("Could not write feed to {}", feed_path.display()))?;

    println!("{}", site.render());
    println!(
        "\n{} {} and {}",
        "Wrote".green(),
        manifest_path.display(),
        feed_path.display()
    );

    Ok(())
}
