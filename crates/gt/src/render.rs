//! Terminal rendering of report lines

use crossterm::style::Stylize;
use git_travis_ci_monitor::format::INDENT_WIDTH;
use git_travis_ci_monitor::{BuildOutcome, DisplayLine, Glyphs};

/// Turns [`DisplayLine`]s into text, colored when the terminal allows it
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
    glyphs: Glyphs,
}

impl Renderer {
    pub fn new(color: bool, glyphs: Glyphs) -> Self {
        Self { color, glyphs }
    }

    pub fn render(&self, line: &DisplayLine) -> String {
        if !self.color {
            return line.to_plain(&self.glyphs);
        }

        let mut out = " ".repeat(line.indent * INDENT_WIDTH);
        if let Some(outcome) = line.outcome {
            let glyph = self.glyphs.for_outcome(outcome);
            let styled = match outcome {
                BuildOutcome::Passing => glyph.green(),
                BuildOutcome::Failing => glyph.red(),
                BuildOutcome::InProgress => glyph.yellow(),
            };
            out.push_str(&styled.to_string());
            out.push(' ');
        }
        out.push_str(&line.text);
        if let Some(state) = &line.state {
            out.push(' ');
            out.push_str(&format!("({state})").white().to_string());
        }
        out
    }
}
