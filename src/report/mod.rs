//! Progress report of an import run
//!
//! The report is written by the import worker and polled by the caller.
//! Entries are severity-tagged; a line can be built from several `print`
//! calls and is completed by `println`.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

/// Severity of a report entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportSeverity {
    Default,
    Headline,
    Note,
    Ok,
    Warning,
    Error,
}

impl ReportSeverity {
    fn marker(self) -> &'static str {
        match self {
            ReportSeverity::Default | ReportSeverity::Note | ReportSeverity::Ok => "",
            ReportSeverity::Headline => "== ",
            ReportSeverity::Warning => "WARNING: ",
            ReportSeverity::Error => "ERROR: ",
        }
    }
}

/// One fragment of report output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub text: String,
    pub severity: ReportSeverity,
    /// True if this fragment completes a line
    pub line_end: bool,
}

#[derive(Debug, Default)]
struct ReportState {
    entries: Vec<ReportEntry>,
    /// Rendered text of all entries
    buffer: String,
    /// Byte offset into `buffer` up to which text has been polled
    polled: usize,
    finished_at: Option<DateTime<Utc>>,
}

/// Append-only, thread-safe progress report
#[derive(Debug)]
pub struct Report {
    state: Mutex<ReportState>,
    started_at: DateTime<Utc>,
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

impl Report {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ReportState::default()),
            started_at: Utc::now(),
        }
    }

    /// Append to the current line
    pub fn print(&self, text: impl Into<String>, severity: ReportSeverity) {
        self.append(text.into(), severity, false);
    }

    /// Append to the current line and complete it
    pub fn println(&self, text: impl Into<String>, severity: ReportSeverity) {
        self.append(text.into(), severity, true);
    }

    /// Complete the current line without adding text
    pub fn newline(&self) {
        self.append(String::new(), ReportSeverity::Default, true);
    }

    fn append(&self, text: String, severity: ReportSeverity, line_end: bool) {
        let mut state = self.state.lock();

        let at_line_start = state.buffer.is_empty() || state.buffer.ends_with('\n');
        if at_line_start && !text.is_empty() {
            state.buffer.push_str(severity.marker());
        }
        state.buffer.push_str(&text);
        if line_end {
            state.buffer.push('\n');
        }

        state.entries.push(ReportEntry {
            text,
            severity,
            line_end,
        });
    }

    /// Text appended since the previous poll
    pub fn poll_update(&self) -> String {
        let mut state = self.state.lock();
        let update = state.buffer[state.polled..].to_string();
        state.polled = state.buffer.len();
        update
    }

    /// Full report text
    #[must_use]
    pub fn text(&self) -> String {
        self.state.lock().buffer.clone()
    }

    #[must_use]
    pub fn entries(&self) -> Vec<ReportEntry> {
        self.state.lock().entries.clone()
    }

    /// Check if any error was reported
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.count(ReportSeverity::Error) > 0
    }

    #[must_use]
    pub fn count(&self, severity: ReportSeverity) -> usize {
        self.state
            .lock()
            .entries
            .iter()
            .filter(|e| e.severity == severity && !e.text.is_empty())
            .count()
    }

    /// Freeze the runtime shown by [`Report::formatted_runtime`]
    pub fn mark_finished(&self) {
        self.state.lock().finished_at.get_or_insert_with(Utc::now);
    }

    /// Elapsed time since the report was created, `HH:MM:SS`
    #[must_use]
    pub fn formatted_runtime(&self) -> String {
        let end = self.state.lock().finished_at.unwrap_or_else(Utc::now);
        let secs = (end - self.started_at).num_seconds().max(0);

        let mut out = String::with_capacity(8);
        let _ = write!(
            out,
            "{:02}:{:02}:{:02}",
            secs / 3600,
            (secs % 3600) / 60,
            secs % 60
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_partial_lines() {
        let report = Report::new();
        report.print("Copying /a.html ... ", ReportSeverity::Note);
        report.println("ok", ReportSeverity::Ok);
        report.println("broken", ReportSeverity::Error);
        assert_eq!(report.text(), "Copying /a.html ... ok\nERROR: broken\n");
    }

    #[test]
    fn test_poll_returns_only_new_text() {
        let report = Report::new();
        report.println("first", ReportSeverity::Default);
        assert_eq!(report.poll_update(), "first\n");
        assert_eq!(report.poll_update(), "");
        report.print("second", ReportSeverity::Default);
        assert_eq!(report.poll_update(), "second");
        report.newline();
        assert_eq!(report.poll_update(), "\n");
    }

    #[test]
    fn test_error_detection() {
        let report = Report::new();
        report.println("fine", ReportSeverity::Ok);
        assert!(!report.has_errors());
        report.println("bad", ReportSeverity::Error);
        assert!(report.has_errors());
        assert_eq!(report.count(ReportSeverity::Error), 1);
    }

    #[test]
    fn test_runtime_format() {
        let report = Report::new();
        report.mark_finished();
        assert_eq!(report.formatted_runtime(), "00:00:00");
    }

    #[test]
    fn test_concurrent_poll_sees_every_line() {
        let report = Arc::new(Report::new());
        let writer = {
            let report = Arc::clone(&report);
            std::thread::spawn(move || {
                for i in 0..200 {
                    report.println(format!("line {i}"), ReportSeverity::Default);
                }
            })
        };

        let mut collected = String::new();
        while !writer.is_finished() {
            collected.push_str(&report.poll_update());
        }
        writer.join().unwrap();
        collected.push_str(&report.poll_update());

        assert_eq!(collected.lines().count(), 200);
        assert!(collected.lines().all(|l| l.starts_with("line ")));
    }
}
