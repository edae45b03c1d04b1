//! Terminal output: notices and command results

use devclub_client::notify::{Level, Notice, Notifier};
use devclub_core::{Error, Result};
use serde::Serialize;
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};

/// Notifier that prints notices to stderr, keeping stdout for results
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    error_shown: AtomicBool,
}

impl ConsoleNotifier {
    /// Whether an error notice has been printed
    pub fn error_shown(&self) -> bool {
        self.error_shown.load(Ordering::SeqCst)
    }

    /// Print a command failure unless a notice already reported it
    pub fn report_failure(&self, err: &Error) {
        if !self.error_shown() {
            self.notify(Notice::from_error("Error", err));
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        if notice.level == Level::Error {
            self.error_shown.store(true, Ordering::SeqCst);
        }
        eprintln!("{}", format_notice(&notice));
    }
}

/// One-line rendering of a notice
pub fn format_notice(notice: &Notice) -> String {
    let marker = match notice.level {
        Level::Success => "[ok]",
        Level::Info => "[info]",
        Level::Error => "[error]",
    };
    format!("{marker} {}: {}", notice.title, notice.description)
}

/// Result printer honouring `--json`
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    /// Printer for the chosen format
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    /// Whether results are printed as JSON
    pub const fn is_json(self) -> bool {
        self.json
    }

    /// Print `value` as JSON, or `text` otherwise
    pub fn emit<T: Serialize>(self, value: &T, text: impl Display) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{text}");
        }
        Ok(())
    }
}

/// Left-aligned table with a header row
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let mut lines = vec![render(headers.to_vec())];
    lines.push(render(rule.iter().map(String::as_str).collect()));
    for row in rows {
        lines.push(render(row.iter().map(String::as_str).collect()));
    }
    lines.join("\n")
}
