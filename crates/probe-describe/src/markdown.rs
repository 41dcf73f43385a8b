//! Markdown renderer.

use std::collections::BTreeMap;
use std::fmt::Write;

use probe_model::Value;

use crate::callable::CallableRecord;
use crate::dispatch::Renderer;
use crate::error::DescribeError;
use crate::listener::{ListenerEntry, ListenerGroups};
use crate::options::DescribeOptions;
use crate::route::{NO_CUSTOM, NONE, RouteRecord};
use crate::sink::{Sink, WriteMode};
use crate::value::format_value;

/// Renders Markdown bullet lists.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render_route_collection(
        &self,
        out: &mut dyn Sink,
        routes: &[(String, RouteRecord)],
        _options: &DescribeOptions,
    ) -> Result<(), DescribeError> {
        let sections: Vec<String> = routes
            .iter()
            .map(|(name, route)| route_section(Some(name), route))
            .collect();
        let mut content = sections.join("\n\n");
        content.push('\n');
        out.write(&content, WriteMode::Raw)?;
        Ok(())
    }

    fn render_route(
        &self,
        out: &mut dyn Sink,
        route: &RouteRecord,
        options: &DescribeOptions,
    ) -> Result<(), DescribeError> {
        out.write(&route_section(options.name.as_deref(), route), WriteMode::Raw)?;
        Ok(())
    }

    fn render_listeners(
        &self,
        out: &mut dyn Sink,
        listeners: &ListenerGroups,
        _options: &DescribeOptions,
    ) -> Result<(), DescribeError> {
        let mut content = String::from("# Registered listeners");
        match listeners {
            ListenerGroups::Single { event, entries } => {
                writeln!(content, " for event `{event}` ordered by descending priority").unwrap();
                push_entries(&mut content, entries, "##");
            }
            ListenerGroups::Grouped(groups) => {
                content.push('\n');
                for (event, entries) in groups {
                    writeln!(content, "\n## {event}").unwrap();
                    push_entries(&mut content, entries, "###");
                }
            }
        }
        out.write(&content, WriteMode::Raw)?;
        Ok(())
    }

    fn render_callable(
        &self,
        out: &mut dyn Sink,
        callable: &CallableRecord,
        _options: &DescribeOptions,
    ) -> Result<(), DescribeError> {
        out.write(&callable_block(callable), WriteMode::Raw)?;
        Ok(())
    }
}

fn route_section(name: Option<&str>, route: &RouteRecord) -> String {
    let requirements = if route.requirements.is_empty() {
        NO_CUSTOM.to_owned()
    } else {
        config_list(&route.requirements, Clone::clone)
    };

    let mut content = String::new();
    if let Some(name) = name.filter(|name| !name.is_empty()) {
        let underline = "-".repeat(name.chars().count());
        writeln!(content, "{name}\n{underline}\n").unwrap();
    }
    writeln!(
        content,
        "- Path: {}\n\
         - Path Regex: {}\n\
         - Host: {}\n\
         - Host Regex: {}\n\
         - Scheme: {}\n\
         - Method: {}\n\
         - Class: {}\n\
         - Defaults: {}\n\
         - Requirements: {}\n\
         - Options: {}",
        route.path,
        route.path_regex,
        route.host_or_any(),
        route.host_regex_or_empty(),
        route.scheme(),
        route.method(),
        route.class,
        value_list(&route.defaults),
        requirements,
        value_list(&route.options),
    )
    .unwrap();
    content
}

fn value_list(config: &BTreeMap<String, Value>) -> String {
    config_list(config, format_value)
}

fn config_list<V>(config: &BTreeMap<String, V>, format: impl Fn(&V) -> String) -> String {
    if config.is_empty() {
        return NONE.to_owned();
    }
    let mut list = String::new();
    for (key, value) in config {
        write!(list, "\n    - `{key}`: {}", format(value)).unwrap();
    }
    list
}

fn push_entries(content: &mut String, entries: &[ListenerEntry], heading: &str) {
    for entry in entries {
        writeln!(content, "\n{heading} Listener {}", entry.order).unwrap();
        content.push_str(&callable_block(&entry.callable));
        writeln!(content, "- Priority: `{}`", entry.priority).unwrap();
    }
}

fn callable_block(callable: &CallableRecord) -> String {
    let mut block = format!("\n- Type: `{}`", callable.kind().wire_type());
    if let Some(name) = callable.name() {
        write!(block, "\n- Name: `{name}`").unwrap();
    }
    if !matches!(callable, CallableRecord::Invocable { .. })
        && let Some(class) = callable.owner_type()
    {
        write!(block, "\n- Class: `{class}`").unwrap();
    }
    if callable.is_static() {
        block.push_str("\n- Static: yes");
    }
    if callable.is_parent_call() {
        block.push_str("\n- Parent: yes");
    }
    block.push('\n');
    block
}
