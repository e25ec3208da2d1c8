//! The `Reporter` trait is the seam between application logic and whatever
//! shows messages to the user. The GUI implements it with a status bar and an
//! error dialog; tests use `RecordingReporter`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub level: Level,
    pub text: String,
}

impl Report {
    pub fn new(level: Level, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.level {
            Level::Info => "",
            Level::Warning => "warning: ",
            Level::Error => "error: ",
        };
        write!(f, "{prefix}{}", self.text)
    }
}

pub trait Reporter {
    fn report(&mut self, report: Report);

    fn info(&mut self, text: impl Into<String>)
    where
        Self: Sized,
    {
        self.report(Report::new(Level::Info, text))
    }

    fn warn(&mut self, text: impl Into<String>)
    where
        Self: Sized,
    {
        self.report(Report::new(Level::Warning, text))
    }

    fn error(&mut self, text: impl Into<String>)
    where
        Self: Sized,
    {
        self.report(Report::new(Level::Error, text))
    }
}

/// Headless reporter, keeps every report in order of arrival.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub reports: Vec<Report>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&Report> {
        self.reports.last()
    }

    pub fn count(&self, level: Level) -> usize {
        self.reports.iter().filter(|r| r.level == level).count()
    }
}

impl Reporter for RecordingReporter {
    fn report(&mut self, report: Report) {
        log::trace!("recorded report: {report}");
        self.reports.push(report);
    }
}
