//! Human-readable report lines
//!
//! Formatting is pure: every function here turns already-fetched records into
//! [`DisplayLine`]s and never fails. Coloring is left to the terminal side,
//! which only needs the outcome and the raw state of each line.

use crate::error::CiError;
use crate::orchestrator::StatusReport;
use crate::types::{BuildDetail, BuildOutcome, BuildSummary, JobSummary};
use git_travis_core::text::{first_line, truncate_chars_slice};
use git_travis_core::RepositoryRef;

/// Length of an abbreviated commit SHA
pub const SHORT_SHA_LEN: usize = 7;

/// Spaces per indent level
pub const INDENT_WIDTH: usize = 4;

/// One line of terminal output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    /// Nesting level; the renderer decides the width
    pub indent: usize,
    /// Status glyph to show, if any
    pub outcome: Option<BuildOutcome>,
    /// Main text
    pub text: String,
    /// Raw provider state, shown dimmed after the text
    pub state: Option<String>,
}

impl DisplayLine {
    fn new(indent: usize, outcome: Option<BuildOutcome>, text: impl Into<String>) -> Self {
        Self {
            indent,
            outcome,
            text: text.into(),
            state: None,
        }
    }

    fn with_state(mut self, state: &str) -> Self {
        self.state = Some(state.to_string());
        self
    }

    /// Render without color using `glyphs`
    pub fn to_plain(&self, glyphs: &Glyphs) -> String {
        let mut line = " ".repeat(self.indent * INDENT_WIDTH);
        if let Some(outcome) = self.outcome {
            line.push_str(glyphs.for_outcome(outcome));
            line.push(' ');
        }
        line.push_str(&self.text);
        if let Some(state) = &self.state {
            line.push_str(&format!(" ({state})"));
        }
        line
    }
}

/// Status glyph set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub passing: &'static str,
    pub failing: &'static str,
    pub in_progress: &'static str,
}

impl Glyphs {
    /// ✔ ✖ ♢
    pub const UNICODE: Glyphs = Glyphs {
        passing: "✔",
        failing: "✖",
        in_progress: "♢",
    };

    /// For consoles without unicode support
    pub const ASCII: Glyphs = Glyphs {
        passing: "OK",
        failing: "X",
        in_progress: "O",
    };

    pub fn for_outcome(&self, outcome: BuildOutcome) -> &'static str {
        match outcome {
            BuildOutcome::Passing => self.passing,
            BuildOutcome::Failing => self.failing,
            BuildOutcome::InProgress => self.in_progress,
        }
    }
}

/// Repository line for the selected build summary
pub fn format_summary(repo: &RepositoryRef, build: &BuildSummary) -> DisplayLine {
    DisplayLine::new(1, Some(build.outcome()), repo.to_string())
}

/// Compare URL, build summary and one line per job.
pub fn format_detail(detail: &BuildDetail) -> Vec<DisplayLine> {
    let mut lines = Vec::with_capacity(detail.jobs.len() + 2);

    if let Some(url) = detail.compare_url.as_deref().filter(|url| !url.is_empty()) {
        lines.push(DisplayLine::new(2, None, format!("Compare:  {url}")));
    }

    let text = format!(
        "{} ({}) {} ({} <{}>)",
        truncate_chars_slice(&detail.sha, SHORT_SHA_LEN),
        detail.branch,
        first_line(&detail.message),
        detail.author_name,
        detail.author_email,
    );
    lines.push(DisplayLine::new(2, Some(detail.outcome()), text).with_state(&detail.state));

    lines.extend(detail.jobs.iter().map(format_job));
    lines
}

fn format_job(job: &JobSummary) -> DisplayLine {
    let text = [job.number.as_str(), job.language.as_str(), job.config_value.as_str()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    DisplayLine::new(3, Some(job.outcome()), text).with_state(&job.state)
}

/// Every line of a finished run: advisory, summary, then detail or the
/// detail failure line.
pub fn format_report(report: &StatusReport) -> Vec<DisplayLine> {
    let mut lines = Vec::new();

    if let Some(advisory) = &report.advisory {
        lines.push(DisplayLine::new(1, None, advisory.clone()));
    }

    lines.push(format_summary(&report.repo, &report.build));

    match &report.detail {
        Ok(detail) => lines.extend(format_detail(detail)),
        Err(_) => lines.push(DisplayLine::new(
            1,
            Some(BuildOutcome::Failing),
            format!("failed to fetch info for {}", report.repo),
        )),
    }

    lines
}

/// Line shown when the run ended without a report
pub fn format_failure(error: &CiError) -> DisplayLine {
    DisplayLine::new(1, Some(BuildOutcome::Failing), error.to_string())
}
