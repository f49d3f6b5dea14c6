use std::path::Path;

use anyhow::Result;
use blop_core::ics::CalendarFileGenerator;
use blop_core::site::generate_calendar_files;
use owo_colors::OwoColorize;

use super::load_config;
use crate::render::Render;
use crate::source::load_events;

pub async fn run(config_path: &Path, csv_file: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let events = load_events(csv_file, config.sheet_csv_url.as_deref()).await?;

    let calendars = CalendarFileGenerator::new(config.ical_path());
    let (_, stats) = generate_calendar_files(&events, &calendars);

    println!(
        "{} {}: {}",
        "Calendar files in".bold(),
        calendars.dir().display(),
        stats.render()
    );

    Ok(())
}
