//! `probe router` command implementation.

use clap::Args;
use probe_describe::{DescriptorHelper, Subject};

use super::{DescribeArgs, render_to_stdout};
use crate::error::CliError;

/// Arguments for the router command.
#[derive(Args, Debug)]
pub(crate) struct RouterArgs {
    /// A route name.
    name: Option<String>,

    /// Show the assigned controllers in the route list.
    #[arg(long)]
    show_controllers: bool,

    #[command(flatten)]
    describe: DescribeArgs,
}

impl RouterArgs {
    /// Execute the router command.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the named route does not exist.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let session = self
            .describe
            .load(self.show_controllers.then_some(true))?;
        let helper = DescriptorHelper::new();

        match self.name {
            Some(name) => {
                let route = session.app.routes.get(&name).ok_or_else(|| {
                    CliError::NotFound(format!("The route \"{name}\" does not exist."))
                })?;
                let options = session.options.with_name(name.as_str());
                render_to_stdout(&options, |out| {
                    helper.describe(out, &Subject::Route(route), &options)
                })
            }
            None => {
                let subject = Subject::RouteCollection(&session.app.routes);
                render_to_stdout(&session.options, |out| {
                    helper.describe(out, &subject, &session.options)
                })
            }
        }
    }
}
