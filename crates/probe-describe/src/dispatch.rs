//! Routing subjects to renderers.

use crate::callable::{CallableRecord, normalize};
use crate::error::DescribeError;
use crate::listener::{self, ListenerGroups};
use crate::options::DescribeOptions;
use crate::route::{self, RouteRecord};
use crate::sink::Sink;
use crate::subject::Subject;

/// Format-specific rendering of extracted records.
///
/// Implementations write to the sink they are given and hold no state
/// between calls.
pub trait Renderer {
    /// Render named routes in collection order.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the sink fails.
    fn render_route_collection(
        &self,
        out: &mut dyn Sink,
        routes: &[(String, RouteRecord)],
        options: &DescribeOptions,
    ) -> Result<(), DescribeError>;

    /// Render a single route.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the sink fails.
    fn render_route(
        &self,
        out: &mut dyn Sink,
        route: &RouteRecord,
        options: &DescribeOptions,
    ) -> Result<(), DescribeError>;

    /// Render event listeners.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the sink fails.
    fn render_listeners(
        &self,
        out: &mut dyn Sink,
        listeners: &ListenerGroups,
        options: &DescribeOptions,
    ) -> Result<(), DescribeError>;

    /// Render a callable.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the sink fails.
    fn render_callable(
        &self,
        out: &mut dyn Sink,
        callable: &CallableRecord,
        options: &DescribeOptions,
    ) -> Result<(), DescribeError>;
}

/// Extract the records of `subject` and render them with `renderer`.
///
/// # Errors
///
/// Returns an error if a listener or callable cannot be normalized, or if
/// the renderer fails.
pub fn describe(
    renderer: &dyn Renderer,
    out: &mut dyn Sink,
    subject: &Subject<'_>,
    options: &DescribeOptions,
) -> Result<(), DescribeError> {
    tracing::debug!(subject = subject.kind(), format = %options.format, "Describing subject");

    match subject {
        Subject::RouteCollection(routes) => {
            let records: Vec<(String, RouteRecord)> = routes
                .iter()
                .map(|(name, route)| (name.to_owned(), route::extract(route)))
                .collect();
            renderer.render_route_collection(out, &records, options)
        }
        Subject::Route(route) => renderer.render_route(out, &route::extract(route), options),
        Subject::EventListeners(registry) => {
            let groups = listener::extract(*registry, options.event.as_deref())?;
            renderer.render_listeners(out, &groups, options)
        }
        Subject::Callable(callable) => {
            renderer.render_callable(out, &normalize(callable)?, options)
        }
    }
}
