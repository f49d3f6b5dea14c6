//! Colored terminal summaries of a build.

use blop_core::site::{CalendarStats, SiteBuild};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for CalendarStats {
    fn render(&self) -> String {
        let mut parts = Vec::new();
        if self.written > 0 {
            parts.push(format!("{} written", self.written).green().to_string());
        }
        if self.cached > 0 {
            parts.push(format!("{} cached", self.cached).dimmed().to_string());
        }
        if self.skipped > 0 {
            parts.push(format!("{} skipped", self.skipped).yellow().to_string());
        }

        if parts.is_empty() {
            "none".dimmed().to_string()
        } else {
            parts.join(", ")
        }
    }
}

impl Render for SiteBuild {
    fn render(&self) -> String {
        let listed = self.listed_count();
        let lines = [
            format!(
                "   {} {}",
                "Pages:".bold(),
                format!("{} {}", self.pages.len(), pluralize("page", self.pages.len()))
            ),
            format!(
                "   {} {} across {} {}",
                "Listed:".bold(),
                format!("{} {}", listed, pluralize("event", listed)).green(),
                self.date_keys.len(),
                pluralize("date", self.date_keys.len())
            ),
            format!("   {} {}", "Calendar files:".bold(), self.calendar_stats.render()),
        ];
        lines.join("\n")
    }
}

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("event", 1), "event");
        assert_eq!(pluralize("event", 0), "events");
        assert_eq!(pluralize("date", 3), "dates");
    }

    #[test]
    fn test_stats_render_lists_nonzero_counts() {
        let stats = CalendarStats {
            written: 2,
            cached: 0,
            skipped: 1,
        };
        let rendered = stats.render();
        assert!(rendered.contains("2 written"), "got {}", rendered);
        assert!(rendered.contains("1 skipped"), "got {}", rendered);
        assert!(!rendered.contains("cached"), "got {}", rendered);
        assert!(CalendarStats::default().render().contains("none"));
    }
}
