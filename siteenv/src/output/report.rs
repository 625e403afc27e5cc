//! Progress reporting.
//!
//! Every component that talks to the user does so through a [`Reporter`],
//! so the same code can print to a terminal or be captured in tests.

use std::io::{self, Write};

use crate::logging::{LogLevel, Logger};

/// Severity of a logged message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Diagnostic detail.
    Debug,
    /// The operation completed.
    Success,
    /// Something was skipped or looks wrong.
    Warning,
    /// Something failed.
    Error,
}

/// Sink for user-facing output.
pub trait Reporter {
    /// Prints a line of regular output, indented by `indent` levels.
    fn print(&mut self, indent: usize, text: &str);

    /// Logs a message with a severity.
    fn log(&mut self, severity: Severity, text: &str);

    /// Prints an unindented line.
    fn line(&mut self, text: &str) {
        self.print(0, text);
    }

    /// Prints an empty line.
    fn blank(&mut self) {
        self.print(0, "");
    }

    /// Logs a warning.
    fn warn(&mut self, text: &str) {
        self.log(Severity::Warning, text);
    }

    /// Logs an error.
    fn error(&mut self, text: &str) {
        self.log(Severity::Error, text);
    }

    /// Logs a success message.
    fn success(&mut self, text: &str) {
        self.log(Severity::Success, text);
    }
}

/// Reporter that writes regular output to a writer and log messages
/// through a [`Logger`].
pub struct ConsoleReporter<W: Write> {
    out: W,
    logger: Logger,
}

impl ConsoleReporter<io::Stdout> {
    /// A reporter printing to standard output.
    #[must_use]
    pub fn stdout(logger: Logger) -> Self {
        Self::new(io::stdout(), logger)
    }
}

impl<W: Write> ConsoleReporter<W> {
    /// Creates a reporter over an arbitrary writer.
    pub fn new(out: W, logger: Logger) -> Self {
        Self { out, logger }
    }

    /// Consumes the reporter, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn print(&mut self, indent: usize, text: &str) {
        if self.logger.level() == LogLevel::Quiet {
            return;
        }
        let pad = " ".repeat(indent * 2);
        // Write errors on progress output are ignored.
        let _ = writeln!(self.out, "{pad}{text}");
    }

    fn log(&mut self, severity: Severity, text: &str) {
        match severity {
            Severity::Debug => self.logger.debug(text),
            Severity::Warning => self.logger.warn(text),
            Severity::Error => self.logger.error(text),
            Severity::Success => self.print(0, text),
        }
    }
}

/// One captured piece of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// Regular output with its indent level.
    Line(usize, String),
    /// A logged message.
    Log(Severity, String),
}

/// Reporter that keeps everything in memory.
///
/// # Examples
///
/// ```
/// use siteenv::output::{RecordingReporter, Reporter};
///
/// let mut reporter = RecordingReporter::default();
/// reporter.line("hello");
/// reporter.warn("careful");
///
/// assert_eq!(reporter.lines(), vec!["hello"]);
/// assert_eq!(reporter.warnings(), vec!["careful"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    records: Vec<Record>,
}

impl RecordingReporter {
    /// Everything captured so far, in order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Regular output lines, without indentation.
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter_map(|r| match r {
                Record::Line(_, text) => Some(text.as_str()),
                Record::Log(..) => None,
            })
            .collect()
    }

    /// Logged messages of one severity.
    #[must_use]
    pub fn logged(&self, severity: Severity) -> Vec<&str> {
        self.records
            .iter()
            .filter_map(|r| match r {
                Record::Log(s, text) if *s == severity => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Logged warnings.
    #[must_use]
    pub fn warnings(&self) -> Vec<&str> {
        self.logged(Severity::Warning)
    }

    /// Logged errors.
    #[must_use]
    pub fn errors(&self) -> Vec<&str> {
        self.logged(Severity::Error)
    }

    /// All captured text joined with newlines.
    #[must_use]
    pub fn text(&self) -> String {
        self.records
            .iter()
            .map(|r| match r {
                Record::Line(indent, text) => format!("{}{text}", " ".repeat(indent * 2)),
                Record::Log(_, text) => text.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Reporter for RecordingReporter {
    fn print(&mut self, indent: usize, text: &str) {
        self.records.push(Record::Line(indent, text.to_string()));
    }

    fn log(&mut self, severity: Severity, text: &str) {
        self.records.push(Record::Log(severity, text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_reporter_indents() {
        let mut reporter = ConsoleReporter::new(Vec::new(), Logger::new(LogLevel::Normal));
        reporter.line("Modules:");
        reporter.print(1, "devel");
        reporter.success("done");
        let out = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(out, "Modules:\n  devel\ndone\n");
    }

    #[test]
    fn test_console_reporter_quiet() {
        let mut reporter = ConsoleReporter::new(Vec::new(), Logger::new(LogLevel::Quiet));
        reporter.line("hidden");
        assert!(reporter.into_inner().is_empty());
    }

    #[test]
    fn test_recording_reporter_filters() {
        let mut reporter = RecordingReporter::default();
        reporter.print(2, "indented");
        reporter.error("broken");
        reporter.log(Severity::Debug, "detail");
        assert_eq!(reporter.lines(), vec!["indented"]);
        assert_eq!(reporter.errors(), vec!["broken"]);
        assert_eq!(reporter.logged(Severity::Debug), vec!["detail"]);
        assert_eq!(reporter.text(), "    indented\nbroken\ndetail");
    }
}
