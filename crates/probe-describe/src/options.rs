//! Options recognized by the descriptors.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use bitflags::bitflags;

use crate::error::DescribeError;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// Tables and plain text.
    #[default]
    Text,
    /// Pretty-printed JSON document.
    Json,
    /// XML document.
    Xml,
    /// Markdown bullet lists.
    Markdown,
}

impl Format {
    /// Every format, in registration order.
    pub const ALL: [Self; 4] = [Self::Text, Self::Xml, Self::Json, Self::Markdown];

    /// Short name used on the command line and in configuration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Markdown => "md",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = DescribeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| DescribeError::UnsupportedFormat(s.to_owned()))
    }
}

bitflags! {
    /// Escaping applied by the JSON renderer on top of pretty-printing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct JsonEncoding: u32 {
        /// Write `/` as `\/`.
        const ESCAPE_SLASHES = 1 << 0;
        /// Write non-ASCII characters as `\uXXXX` escapes.
        const ESCAPE_UNICODE = 1 << 1;
    }
}

impl Default for JsonEncoding {
    fn default() -> Self {
        Self::empty()
    }
}

/// Options bag passed to every describe call.
#[derive(Debug, Clone, Default)]
pub struct DescribeOptions {
    /// Output format.
    pub format: Format,
    /// Write text without decoration.
    pub raw_text: bool,
    /// Bypass sink decoration entirely.
    pub raw_output: bool,
    /// Only describe listeners of this event.
    pub event: Option<String>,
    /// Name of the single route being described.
    pub name: Option<String>,
    /// Add a controller column to route tables (text only).
    pub show_controllers: bool,
    /// Root that closure file paths are shown relative to.
    pub project_dir: Option<PathBuf>,
    /// JSON escaping flags.
    pub json_encoding: JsonEncoding,
}

impl DescribeOptions {
    /// Options for `format` with everything else at its default.
    #[must_use]
    pub fn new(format: Format) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Filter listeners to one event.
    #[must_use]
    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Name the route being described.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Show the controller column in route tables.
    #[must_use]
    pub fn with_controllers(mut self, project_dir: Option<PathBuf>) -> Self {
        self.show_controllers = true;
        self.project_dir = project_dir;
        self
    }

    /// Whether text writes should skip decoration.
    #[must_use]
    pub(crate) fn is_raw(&self) -> bool {
        self.raw_text || self.raw_output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("txt".parse::<Format>().unwrap(), Format::Text);
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("xml".parse::<Format>().unwrap(), Format::Xml);
        assert_eq!("md".parse::<Format>().unwrap(), Format::Markdown);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let err = "yaml".parse::<Format>().unwrap_err();
        assert!(matches!(err, DescribeError::UnsupportedFormat(ref f) if f == "yaml"));
        assert_eq!(err.to_string(), "Unsupported format \"yaml\".");
    }

    #[test]
    fn test_default_options() {
        let options = DescribeOptions::default();
        assert_eq!(options.format, Format::Text);
        assert!(options.event.is_none());
        assert!(!options.show_controllers);
        assert_eq!(options.json_encoding, JsonEncoding::empty());
    }

    #[test]
    fn test_builder_helpers() {
        let options = DescribeOptions::new(Format::Json)
            .with_event("kernel.request")
            .with_name("home")
            .with_controllers(Some(PathBuf::from("/srv/app")));
        assert_eq!(options.event.as_deref(), Some("kernel.request"));
        assert_eq!(options.name.as_deref(), Some("home"));
        assert!(options.show_controllers);
        assert_eq!(options.project_dir, Some(PathBuf::from("/srv/app")));
    }
}
