//! Terminal output utilities for styled CLI output.

use std::fmt::Display;

use console::{Term, style};
use reelup_business::Severity;

/// Terminal output helper for consistent styled output.
pub struct Output {
    term: Term,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper writing to stdout.
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    /// Whether stdout is an interactive terminal that can redraw lines.
    pub fn is_interactive(&self) -> bool {
        self.term.is_term()
    }

    /// Print a success message with a green checkmark.
    pub fn success(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("✓").green().bold(), message)),
        );
    }

    /// Print an error message with a red X.
    pub fn error(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("✗").red().bold(), message)),
        );
    }

    /// Print a warning message with a yellow warning sign.
    pub fn warning(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("⚠").yellow().bold(), message)),
        );
    }

    /// Print an info message with a blue info icon.
    pub fn info(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("ℹ").blue().bold(), message)),
        );
    }

    /// Route a queue notification to the matching style.
    pub fn notify(&self, message: impl Display, severity: Severity) {
        match severity {
            Severity::Info => self.info(message),
            Severity::Success => self.success(message),
            Severity::Warning => self.warning(message),
            Severity::Error => self.error(message),
        }
    }

    /// Print a dim/muted message.
    pub fn dim(&self, message: impl Display) {
        drop(self.term.write_line(&style(message).dim().to_string()));
    }

    /// Print a labeled value with indentation.
    pub fn labeled_indent(&self, label: impl Display, value: impl Display, indent: usize) {
        let spaces = " ".repeat(indent);
        drop(
            self.term
                .write_line(&format!("{spaces}{}: {}", style(label).dim(), value)),
        );
    }

    /// Print a queued file (🎬 name - size).
    pub fn file_item(&self, name: impl Display, size: impl Display) {
        drop(self.term.write_line(&format!(
            "  {} {} - {}",
            style("🎬").bold(),
            style(name).white().bold(),
            style(size).cyan()
        )));
    }

    /// Redraw the current line with a progress bar.
    pub fn progress(&self, name: impl Display, percent: f64, speed: impl Display) {
        drop(self.term.clear_line());
        drop(self.term.write_str(&format!(
            "  {} {} {} {}",
            style(name).white(),
            progress_bar(percent, 24),
            style(format!("{percent:>5.1}%")).cyan(),
            style(speed).dim()
        )));
    }

    /// Drop a partially drawn progress line.
    pub fn clear_progress(&self) {
        drop(self.term.clear_line());
    }

    /// Print a count summary.
    pub fn count(&self, label: impl Display, count: usize) {
        drop(self.term.write_line(&format!(
            "{}: {} file(s)",
            style(label).dim(),
            style(count).cyan().bold()
        )));
    }
}

/// `[#####-----]` style bar, `width` cells wide.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_bounds() {
        assert_eq!(progress_bar(0.0, 4), "[----]");
        assert_eq!(progress_bar(50.0, 4), "[##--]");
        assert_eq!(progress_bar(100.0, 4), "[####]");
        assert_eq!(progress_bar(250.0, 4), "[####]");
        assert_eq!(progress_bar(-3.0, 4), "[----]");
    }
}
