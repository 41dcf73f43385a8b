//! CLI command implementations.

pub(crate) mod container;
pub(crate) mod events;
pub(crate) mod router;

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use probe_config::{CliSettings, Config};
use probe_describe::{DescribeError, DescribeOptions, Format, IoSink, JsonEncoding, Sink};

use crate::error::CliError;
use crate::manifest::Application;
use crate::output::ConsoleSink;

pub(crate) use container::ContainerArgs;
pub(crate) use events::EventsArgs;
pub(crate) use router::RouterArgs;

/// Arguments shared by every describe command.
#[derive(Args, Debug)]
pub(crate) struct DescribeArgs {
    /// Path to configuration file (default: auto-discover probe.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Application manifest (overrides config).
    #[arg(short, long, env = "PROBE_MANIFEST")]
    manifest: Option<PathBuf>,

    /// Directory closure locations are shown relative to (overrides config).
    #[arg(long)]
    project_dir: Option<PathBuf>,

    /// Output format (overrides config).
    #[arg(long, value_parser = ["txt", "xml", "json", "md"])]
    format: Option<String>,

    /// Output raw description.
    #[arg(long)]
    raw: bool,
}

/// Loaded state a command describes from.
pub(crate) struct Session {
    pub(crate) options: DescribeOptions,
    pub(crate) app: Application,
}

impl DescribeArgs {
    /// Load config and manifest.
    ///
    /// `show_controllers` overrides the configured controller column.
    pub(crate) fn load(self, show_controllers: Option<bool>) -> Result<Session, CliError> {
        let cli_settings = CliSettings {
            manifest: self.manifest,
            project_dir: self.project_dir,
            format: self.format,
            raw: self.raw.then_some(true),
            show_controllers,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let options = describe_options(&config)?;
        let app = Application::load(&config.app_resolved.manifest)?;
        Ok(Session { options, app })
    }
}

/// Build describe options from configuration.
fn describe_options(config: &Config) -> Result<DescribeOptions, DescribeError> {
    let format: Format = config.describe.format.parse()?;

    let mut json_encoding = JsonEncoding::empty();
    json_encoding.set(
        JsonEncoding::ESCAPE_SLASHES,
        config.describe.json.escape_slashes,
    );
    json_encoding.set(
        JsonEncoding::ESCAPE_UNICODE,
        config.describe.json.escape_unicode,
    );

    Ok(DescribeOptions {
        format,
        raw_text: config.describe.raw,
        // Machine-readable formats are never decorated.
        raw_output: format != Format::Text,
        show_controllers: config.describe.show_controllers,
        project_dir: Some(config.app_resolved.project_dir.clone()),
        json_encoding,
        ..DescribeOptions::default()
    })
}

/// Run `render` against stdout.
///
/// Raw output goes straight to stdout; decorated output goes through the
/// console sink.
pub(crate) fn render_to_stdout<F>(options: &DescribeOptions, render: F) -> Result<(), CliError>
where
    F: FnOnce(&mut dyn Sink) -> Result<(), DescribeError>,
{
    if options.raw_text || options.raw_output {
        let mut sink = IoSink::new(std::io::stdout().lock());
        render(&mut sink)?;
        sink.into_inner().flush()?;
    } else {
        let mut sink = ConsoleSink::stdout();
        render(&mut sink)?;
    }
    Ok(())
}
