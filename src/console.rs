use std::{
    fmt::Display,
    io::{self, Write},
};
use yansi::Paint;

/// Human readable progress output.
///
/// Write errors are ignored: the report is best effort and must never
/// change a scenario's outcome.
pub struct Console<W = io::Stdout> {
    out: W,
    color: bool,
}

impl Console<io::Stdout> {
    pub fn stdout(color: bool) -> Self {
        Self {
            out: io::stdout(),
            color,
        }
    }
}

impl<W: Write> Console<W> {
    /// A console without colour, used for captured output.
    pub fn plain(out: W) -> Self {
        Self { out, color: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn line(&mut self, text: impl Display) {
        let _ = writeln!(self.out, "{text}");
    }

    pub fn blank(&mut self) {
        let _ = writeln!(self.out);
    }

    pub fn rule(&mut self, width: usize) {
        self.line("=".repeat(width));
    }

    /// A rule, a heading and another rule.
    pub fn banner(&mut self, title: impl Display, width: usize) {
        self.blank();
        self.rule(width);
        self.line(title);
        self.rule(width);
    }

    pub fn ok(&mut self, text: impl Display) {
        self.marked("✅", text, |s| s.green().to_string());
    }

    pub fn fail(&mut self, text: impl Display) {
        self.marked("❌", text, |s| s.red().to_string());
    }

    pub fn warn(&mut self, text: impl Display) {
        self.marked("⚠️ ", text, |s| s.yellow().to_string());
    }

    /// Pass/fail marker for the summary table.
    pub fn status(&self, passed: bool) -> String {
        match (passed, self.color) {
            (true, true) => "✅ PASS".green().bold().to_string(),
            (false, true) => "❌ FAIL".red().bold().to_string(),
            (true, false) => "✅ PASS".to_string(),
            (false, false) => "❌ FAIL".to_string(),
        }
    }

    fn marked(&mut self, mark: &str, text: impl Display, paint: fn(&str) -> String) {
        // indentation stays in front of the marker and outside the colour codes
        let text = text.to_string();
        let body = text.trim_start();
        let indent = &text[..text.len() - body.len()];
        let body = format!("{mark} {body}");
        let body = if self.color { paint(&body) } else { body };
        self.line(format!("{indent}{body}"));
    }
}
