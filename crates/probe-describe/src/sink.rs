//! Output sinks.

use std::io;

use crate::table::{Table, TableStyle};

/// How a write should be treated by the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Emit verbatim.
    Raw,
    /// The sink may style the content (colors, emphasis).
    Decorated,
}

/// Interactive output helpers used by the text renderer.
pub trait OutputStyle {
    /// Write a page title.
    fn title(&mut self, message: &str) -> io::Result<()>;

    /// Write a section heading.
    fn section(&mut self, message: &str) -> io::Result<()>;

    /// Write a table.
    fn table(&mut self, headers: &[&str], rows: &[Vec<String>]) -> io::Result<()>;
}

/// Destination of rendered output.
pub trait Sink {
    /// Write `content`.
    fn write(&mut self, content: &str, mode: WriteMode) -> io::Result<()>;

    /// Interactive style, if the sink has one.
    fn style(&mut self) -> Option<&mut dyn OutputStyle> {
        None
    }
}

/// Underlined title block.
#[must_use]
pub fn title_block(message: &str) -> String {
    underlined(message, '=')
}

/// Underlined section block.
#[must_use]
pub fn section_block(message: &str) -> String {
    underlined(message, '-')
}

fn underlined(message: &str, underline: char) -> String {
    let width = message.chars().count();
    let rule: String = std::iter::repeat_n(underline, width).collect();
    format!("\n{message}\n{rule}\n\n")
}

/// In-memory sink.
#[derive(Debug, Default)]
pub struct BufferSink {
    buffer: String,
}

impl BufferSink {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Take the buffered output.
    #[must_use]
    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl Sink for BufferSink {
    fn write(&mut self, content: &str, _mode: WriteMode) -> io::Result<()> {
        self.buffer.push_str(content);
        Ok(())
    }
}

/// Sink over any [`io::Write`].
#[derive(Debug)]
pub struct IoSink<W> {
    inner: W,
}

impl<W: io::Write> IoSink<W> {
    /// Wrap a writer.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> Sink for IoSink<W> {
    fn write(&mut self, content: &str, _mode: WriteMode) -> io::Result<()> {
        self.inner.write_all(content.as_bytes())
    }
}

/// Sink with an undecorated interactive style.
///
/// Titles and sections are underlined and tables use the compact
/// borderless layout.
#[derive(Debug)]
pub struct StyledSink<S> {
    inner: S,
}

impl<S: Sink> StyledSink<S> {
    /// Wrap a sink.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Unwrap the sink.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Sink> Sink for StyledSink<S> {
    fn write(&mut self, content: &str, mode: WriteMode) -> io::Result<()> {
        self.inner.write(content, mode)
    }

    fn style(&mut self) -> Option<&mut dyn OutputStyle> {
        Some(self)
    }
}

impl<S: Sink> OutputStyle for StyledSink<S> {
    fn title(&mut self, message: &str) -> io::Result<()> {
        self.inner.write(&title_block(message), WriteMode::Raw)
    }

    fn section(&mut self, message: &str) -> io::Result<()> {
        self.inner.write(&section_block(message), WriteMode::Raw)
    }

    fn table(&mut self, headers: &[&str], rows: &[Vec<String>]) -> io::Result<()> {
        let mut rendered = Table::new(TableStyle::Compact)
            .headers(headers)
            .rows(rows.to_vec())
            .render();
        rendered.push('\n');
        self.inner.write(&rendered, WriteMode::Raw)
    }
}
