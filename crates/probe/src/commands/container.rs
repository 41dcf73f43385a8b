//! `probe container` command implementation.

use clap::Args;
use probe_describe::{DescriptorHelper, Subject, describe_parameter, describe_parameters};

use super::{DescribeArgs, render_to_stdout};
use crate::error::CliError;
use crate::manifest::Application;
use crate::output::Output;

/// Service exposing the route collection.
const ROUTES_SERVICE: &str = "routes";

/// Service exposing the event dispatcher.
const DISPATCHER_SERVICE: &str = "dispatcher";

/// Arguments for the container command.
#[derive(Args, Debug)]
pub(crate) struct ContainerArgs {
    /// A service name.
    name: Option<String>,

    /// Display a specific parameter.
    #[arg(long)]
    parameter: Option<String>,

    /// Display all parameters.
    #[arg(long)]
    parameters: bool,

    #[command(flatten)]
    describe: DescribeArgs,
}

impl ContainerArgs {
    /// Execute the container command.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments conflict, loading fails, or the
    /// named entry does not exist or cannot be described.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        self.validate()?;

        let output = Output::new();
        let session = self.describe.load(None)?;
        let options = &session.options;
        let app = &session.app;
        let decorated = !(options.raw_text || options.raw_output);

        if self.parameters {
            render_to_stdout(options, |out| describe_parameters(out, &app.parameters, options))?;
            if decorated {
                output.comment(
                    "To search for a specific parameter, re-run this command with a search term. \
                     (e.g. probe container --parameter=locale)",
                );
            }
            return Ok(());
        }

        if let Some(key) = &self.parameter {
            let value = app.parameters.get(key).ok_or_else(|| {
                CliError::NotFound(format!("The parameter \"{key}\" does not exist."))
            })?;
            return render_to_stdout(options, |out| describe_parameter(out, key, value, options));
        }

        let Some(name) = &self.name else {
            output.highlight("Available services:");
            for service in service_names(app) {
                output.info(&format!("  {service}"));
            }
            if decorated {
                output.comment(
                    "To search for a specific service, re-run this command with a search term. \
                     (e.g. probe container dispatcher)",
                );
            }
            return Ok(());
        };

        let subject = service_subject(app, name)?;
        render_to_stdout(options, |out| {
            DescriptorHelper::new().describe(out, &subject, options)
        })
    }

    /// Reject conflicting selections before anything is loaded.
    pub(crate) fn validate(&self) -> Result<(), CliError> {
        let selected = usize::from(self.parameters) + usize::from(self.parameter.is_some());

        if self.name.is_some() && selected > 0 {
            return Err(CliError::Validation(
                "The options parameters & parameter cannot be combined with the service name argument."
                    .to_owned(),
            ));
        }
        if selected > 1 {
            return Err(CliError::Validation(
                "The options parameters & parameter cannot be combined together.".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Resolve a service name to a subject.
///
/// Declared services shadow the built-in `routes` and `dispatcher`.
fn service_subject<'a>(app: &'a Application, name: &str) -> Result<Subject<'a>, CliError> {
    if let Some(value) = app.services.get(name) {
        return Ok(Subject::from_value(value)?);
    }
    match name {
        ROUTES_SERVICE => Ok(Subject::RouteCollection(&app.routes)),
        DISPATCHER_SERVICE => Ok(Subject::EventListeners(&app.dispatcher)),
        _ => Err(CliError::NotFound(format!(
            "The service \"{name}\" does not exist."
        ))),
    }
}

fn service_names(app: &Application) -> Vec<&str> {
    let mut names: Vec<&str> = app
        .services
        .keys()
        .map(String::as_str)
        .chain([ROUTES_SERVICE, DISPATCHER_SERVICE])
        .collect();
    names.sort_unstable();
    names.dedup();
    names
}
