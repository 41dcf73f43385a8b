//! `probe events` command implementation.

use clap::Args;
use probe_describe::{DescriptorHelper, Subject};

use super::{DescribeArgs, render_to_stdout};
use crate::error::CliError;

/// Arguments for the events command.
#[derive(Args, Debug)]
pub(crate) struct EventsArgs {
    /// An event name.
    event: Option<String>,

    #[command(flatten)]
    describe: DescribeArgs,
}

impl EventsArgs {
    /// Execute the events command.
    ///
    /// An event without listeners is described as empty rather than
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or describing fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let session = self.describe.load(None)?;
        let mut options = session.options;
        options.event = self.event;

        let subject = Subject::EventListeners(&session.app.dispatcher);
        render_to_stdout(&options, |out| {
            DescriptorHelper::new().describe(out, &subject, &options)
        })
    }
}
