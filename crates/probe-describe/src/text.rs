//! Plain-text renderer.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;

use probe_model::Value;

use crate::callable::CallableRecord;
use crate::dispatch::Renderer;
use crate::error::DescribeError;
use crate::listener::{ListenerEntry, ListenerGroups};
use crate::options::DescribeOptions;
use crate::route::{NO_CUSTOM, NONE, RouteRecord};
use crate::sink::{Sink, WriteMode, section_block, title_block};
use crate::table::{Table, TableStyle};
use crate::value::{format_closure, format_value};

/// Route default holding the route's controller.
const CONTROLLER_KEY: &str = "_controller";

/// Renders tables and plain text.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn render_route_collection(
        &self,
        out: &mut dyn Sink,
        routes: &[(String, RouteRecord)],
        options: &DescribeOptions,
    ) -> Result<(), DescribeError> {
        let mut headers = vec!["Name", "Method", "Scheme", "Host", "Path"];
        if options.show_controllers {
            headers.push("Controller");
        }

        let rows: Vec<Vec<String>> = routes
            .iter()
            .map(|(name, route)| {
                let mut row = vec![
                    name.clone(),
                    route.method(),
                    route.scheme(),
                    route.host_or_any().to_owned(),
                    route.path.clone(),
                ];
                if options.show_controllers {
                    row.push(controller_cell(route, options.project_dir.as_deref()));
                }
                row
            })
            .collect();

        write_table(out, &headers, &rows)
    }

    fn render_route(
        &self,
        out: &mut dyn Sink,
        route: &RouteRecord,
        options: &DescribeOptions,
    ) -> Result<(), DescribeError> {
        let project_dir = options.project_dir.as_deref();
        let requirements = if route.requirements.is_empty() {
            NO_CUSTOM.to_owned()
        } else {
            config_cell(&route.requirements, |pattern| pattern.clone())
        };

        let rows = vec![
            property("Route Name", options.name.as_deref().unwrap_or("")),
            property("Path", &route.path),
            property("Path Regex", &route.path_regex),
            property("Host", route.host_or_any()),
            property("Host Regex", route.host_regex_or_empty()),
            property("Scheme", route.scheme()),
            property("Method", route.method()),
            property("Requirements", requirements),
            property("Class", &route.class),
            property("Defaults", value_config_cell(&route.defaults, project_dir)),
            property("Options", value_config_cell(&route.options, project_dir)),
        ];

        let table = Table::new(TableStyle::Boxed)
            .headers(&["Property", "Value"])
            .rows(rows);
        out.write(&table.render(), WriteMode::Raw)?;
        Ok(())
    }

    fn render_listeners(
        &self,
        out: &mut dyn Sink,
        listeners: &ListenerGroups,
        _options: &DescribeOptions,
    ) -> Result<(), DescribeError> {
        match listeners {
            ListenerGroups::Single { event, entries } => {
                write_title(out, &format!("Registered Listeners for \"{event}\" Event"))?;
                write_listener_table(out, entries)
            }
            ListenerGroups::Grouped(groups) => {
                write_title(out, "Registered Listeners Grouped by Event")?;
                for (event, entries) in groups {
                    write_section(out, &format!("\"{event}\" event"))?;
                    write_listener_table(out, entries)?;
                }
                Ok(())
            }
        }
    }

    fn render_callable(
        &self,
        out: &mut dyn Sink,
        callable: &CallableRecord,
        options: &DescribeOptions,
    ) -> Result<(), DescribeError> {
        let mode = if options.is_raw() {
            WriteMode::Raw
        } else {
            WriteMode::Decorated
        };
        out.write(&format!("{}\n", format_callable(callable)), mode)?;
        Ok(())
    }
}

/// One-line signature of a callable.
#[must_use]
pub fn format_callable(callable: &CallableRecord) -> String {
    match callable {
        CallableRecord::Function { name } => format!("{name}()"),
        CallableRecord::StaticMethod {
            class,
            name,
            parent: true,
        } => format!("{class}::parent::{name}()"),
        CallableRecord::StaticMethod { class, name, .. }
        | CallableRecord::BoundMethod { class, name } => format!("{class}::{name}()"),
        CallableRecord::Closure => "Closure()".to_owned(),
        CallableRecord::Invocable { class } => format!("{class}::invoke()"),
    }
}

fn property(name: &str, value: impl Display) -> Vec<String> {
    vec![name.to_owned(), value.to_string()]
}

fn controller_cell(route: &RouteRecord, project_dir: Option<&Path>) -> String {
    match route.defaults.get(CONTROLLER_KEY) {
        None => String::new(),
        Some(Value::Closure(closure)) => format_closure(closure, project_dir),
        Some(Value::Object(object)) => object.type_name().to_owned(),
        Some(other) => format_value(other),
    }
}

fn value_config_cell(config: &BTreeMap<String, Value>, project_dir: Option<&Path>) -> String {
    config_cell(config, |value| match value {
        Value::Closure(closure) => format_closure(closure, project_dir),
        other => format_value(other),
    })
}

fn config_cell<V>(config: &BTreeMap<String, V>, format: impl Fn(&V) -> String) -> String {
    if config.is_empty() {
        return NONE.to_owned();
    }
    config
        .iter()
        .map(|(key, value)| format!("{key}: {}", format(value)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn write_listener_table(out: &mut dyn Sink, entries: &[ListenerEntry]) -> Result<(), DescribeError> {
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|entry| {
            vec![
                format!("#{}", entry.order),
                format_callable(&entry.callable),
                entry.priority.to_string(),
            ]
        })
        .collect();
    write_table(out, &["Order", "Callable", "Priority"], &rows)
}

pub(crate) fn write_title(out: &mut dyn Sink, message: &str) -> Result<(), DescribeError> {
    match out.style() {
        Some(style) => style.title(message)?,
        None => out.write(&title_block(message), WriteMode::Raw)?,
    }
    Ok(())
}

fn write_section(out: &mut dyn Sink, message: &str) -> Result<(), DescribeError> {
    match out.style() {
        Some(style) => style.section(message)?,
        None => out.write(&section_block(message), WriteMode::Raw)?,
    }
    Ok(())
}

pub(crate) fn write_table(
    out: &mut dyn Sink,
    headers: &[&str],
    rows: &[Vec<String>],
) -> Result<(), DescribeError> {
    if let Some(style) = out.style() {
        style.table(headers, rows)?;
        return Ok(());
    }
    let table = Table::new(TableStyle::Boxed)
        .headers(headers)
        .rows(rows.to_vec());
    out.write(&table.render(), WriteMode::Raw)?;
    Ok(())
}
