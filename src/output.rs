use std::io::{self, Write};

use serde::Serialize;

use crate::app::{Acquisition, ClearResult, Origin, ProgressEvent, ProgressSink};
use crate::domain::CanonicalEntry;

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Interactive,
    NonInteractive,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub entries: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LookupResult<'a> {
    pub requested: &'a str,
    pub available: bool,
    pub entries: &'a [CanonicalEntry],
}

pub fn summarize(acquisition: &Acquisition) -> Vec<CategorySummary> {
    acquisition
        .dataset
        .iter()
        .map(|(category, entries)| CategorySummary {
            category: category.to_string(),
            entries: entries.len(),
        })
        .collect()
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_acquisition(result: &Acquisition) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_categories(origin: &Origin, categories: &[CategorySummary]) -> io::Result<()> {
        #[derive(Serialize)]
        struct Categories<'a> {
            origin: &'a Origin,
            categories: &'a [CategorySummary],
        }
        Self::print_json(&Categories { origin, categories })
    }

    pub fn print_lookup(result: &LookupResult<'_>) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_clear(result: &ClearResult) -> io::Result<()> {
        Self::print_json(result)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

pub struct ConsoleOutput;

impl ConsoleOutput {
    pub fn print_summary(acquisition: &Acquisition) {
        let (label, color) = match &acquisition.origin {
            Origin::Baseline => ("bundled baseline (offline)".to_string(), YELLOW),
            Origin::FreshSnapshot { fetched_at } => {
                (format!("cached snapshot from {fetched_at}"), GREEN)
            }
            Origin::Network { source, fetched_at } => {
                (format!("{source} at {fetched_at}"), CYAN)
            }
            Origin::StaleSnapshot { fetched_at } => {
                (format!("stale snapshot from {fetched_at} (sources unreachable)"), YELLOW)
            }
        };
        println!("{color}source: {label}{RESET}");
        println!(
            "{} categories, {} entries",
            acquisition.dataset.len(),
            acquisition.dataset.entry_count()
        );
        for summary in summarize(acquisition) {
            println!("  {} ({})", summary.category, summary.entries);
        }
    }

    pub fn print_lookup(result: &LookupResult<'_>) {
        if !result.available {
            println!("{YELLOW}content unavailable: {}{RESET}", result.requested);
            return;
        }
        for entry in result.entries {
            println!("{CYAN}x{}{RESET} {}", entry.target(), entry.text);
            if !entry.description.is_empty() {
                println!("    {}", entry.description);
            }
            if !entry.reference.is_empty() {
                println!("    [{}]", entry.reference);
            }
        }
    }

    pub fn print_clear(result: &ClearResult) {
        if result.cleared {
            println!("{GREEN}snapshot cleared{RESET}");
        } else {
            println!("{YELLOW}snapshot could not be cleared{RESET}");
        }
    }
}

impl ProgressSink for ConsoleOutput {
    fn event(&self, event: ProgressEvent) {
        eprintln!("{CYAN}»{RESET} {}", event.message);
    }
}
