//! Colored terminal output.
//!
//! [`Output`] writes status messages to stderr. [`ConsoleSink`] is the
//! styled describe sink for stdout.

use console::{Style, Term};
use probe_describe::{OutputStyle, Sink, Table, TableStyle, WriteMode};

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a hint (yellow).
    pub(crate) fn comment(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print a highlighted message (cyan bold).
    pub(crate) fn highlight(&self, msg: &str) {
        let _ = self
            .term
            .write_line(&self.cyan_bold.apply_to(msg).to_string());
    }
}

/// Describe sink writing to stdout with colors.
///
/// Colors are dropped automatically when stdout is not a terminal.
pub(crate) struct ConsoleSink {
    term: Term,
    heading: Style,
    decorated: Style,
}

impl ConsoleSink {
    pub(crate) fn stdout() -> Self {
        Self {
            term: Term::stdout(),
            heading: Style::new().yellow().bold(),
            decorated: Style::new().green(),
        }
    }

    fn underlined(&self, message: &str, underline: char) -> std::io::Result<()> {
        let rule: String = std::iter::repeat_n(underline, message.chars().count()).collect();
        self.term.write_line("")?;
        self.term
            .write_line(&self.heading.apply_to(message).to_string())?;
        self.term.write_line(&self.heading.apply_to(rule).to_string())?;
        self.term.write_line("")
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, content: &str, mode: WriteMode) -> std::io::Result<()> {
        match mode {
            WriteMode::Raw => self.term.write_str(content),
            WriteMode::Decorated => {
                // Style the text only, so the reset code lands before the newline.
                let body = content.trim_end_matches('\n');
                let styled = self.decorated.apply_to(body).to_string();
                self.term.write_str(&styled)?;
                self.term.write_str(&content[body.len()..])
            }
        }
    }

    fn style(&mut self) -> Option<&mut dyn OutputStyle> {
        Some(self)
    }
}

impl OutputStyle for ConsoleSink {
    fn title(&mut self, message: &str) -> std::io::Result<()> {
        self.underlined(message, '=')
    }

    fn section(&mut self, message: &str) -> std::io::Result<()> {
        self.underlined(message, '-')
    }

    fn table(&mut self, headers: &[&str], rows: &[Vec<String>]) -> std::io::Result<()> {
        let rendered = Table::new(TableStyle::Compact)
            .headers(headers)
            .rows(rows.to_vec())
            .render();
        self.term.write_str(&rendered)?;
        self.term.write_line("")
    }
}
