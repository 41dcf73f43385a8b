//! XML renderer.

use std::io;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::callable::CallableRecord;
use crate::dispatch::Renderer;
use crate::error::DescribeError;
use crate::listener::{ListenerEntry, ListenerGroups};
use crate::options::DescribeOptions;
use crate::route::RouteRecord;
use crate::sink::{Sink, WriteMode};
use crate::value::format_value;

/// Renders XML documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlRenderer;

impl Renderer for XmlRenderer {
    fn render_route_collection(
        &self,
        out: &mut dyn Sink,
        routes: &[(String, RouteRecord)],
        _options: &DescribeOptions,
    ) -> Result<(), DescribeError> {
        let mut doc = XmlDocument::new()?;
        if routes.is_empty() {
            doc.empty("routes", &[])?;
        } else {
            doc.start("routes", &[])?;
            for (name, route) in routes {
                write_route(&mut doc, Some(name), route)?;
            }
            doc.end("routes")?;
        }
        doc.finish(out)
    }

    fn render_route(
        &self,
        out: &mut dyn Sink,
        route: &RouteRecord,
        options: &DescribeOptions,
    ) -> Result<(), DescribeError> {
        let mut doc = XmlDocument::new()?;
        write_route(&mut doc, options.name.as_deref(), route)?;
        doc.finish(out)
    }

    fn render_listeners(
        &self,
        out: &mut dyn Sink,
        listeners: &ListenerGroups,
        _options: &DescribeOptions,
    ) -> Result<(), DescribeError> {
        let mut doc = XmlDocument::new()?;
        match listeners {
            ListenerGroups::Single { entries, .. } if entries.is_empty() => {
                doc.empty("event-dispatcher", &[])?;
            }
            ListenerGroups::Grouped(groups) if groups.is_empty() => {
                doc.empty("event-dispatcher", &[])?;
            }
            ListenerGroups::Single { entries, .. } => {
                doc.start("event-dispatcher", &[])?;
                write_entries(&mut doc, entries)?;
                doc.end("event-dispatcher")?;
            }
            ListenerGroups::Grouped(groups) => {
                doc.start("event-dispatcher", &[])?;
                for (event, entries) in groups {
                    doc.start("event", &[("name", event.as_str())])?;
                    write_entries(&mut doc, entries)?;
                    doc.end("event")?;
                }
                doc.end("event-dispatcher")?;
            }
        }
        doc.finish(out)
    }

    fn render_callable(
        &self,
        out: &mut dyn Sink,
        callable: &CallableRecord,
        _options: &DescribeOptions,
    ) -> Result<(), DescribeError> {
        let mut doc = XmlDocument::new()?;
        write_callable(&mut doc, callable, None)?;
        doc.finish(out)
    }
}

fn write_route(
    doc: &mut XmlDocument,
    name: Option<&str>,
    route: &RouteRecord,
) -> Result<(), DescribeError> {
    let mut attributes = Vec::with_capacity(2);
    if let Some(name) = name.filter(|name| !name.is_empty()) {
        attributes.push(("name", name));
    }
    attributes.push(("class", route.class.as_str()));
    doc.start("route", &attributes)?;

    doc.text_element("path", &[("regex", route.path_regex.as_str())], &route.path)?;
    if let Some(host) = &route.host {
        doc.text_element("host", &[("regex", route.host_regex_or_empty())], host)?;
    }
    for scheme in &route.schemes {
        doc.text_element("scheme", &[], scheme)?;
    }
    for method in &route.methods {
        doc.text_element("method", &[], method)?;
    }

    write_config(
        doc,
        "defaults",
        "default",
        route.defaults.iter().map(|(k, v)| (k, format_value(v))),
    )?;
    write_config(
        doc,
        "requirements",
        "requirement",
        route.requirements.iter().map(|(k, v)| (k, v.clone())),
    )?;
    write_config(
        doc,
        "options",
        "option",
        route.options.iter().map(|(k, v)| (k, format_value(v))),
    )?;

    doc.end("route")
}

/// Writes `<block><item key="k">v</item>...</block>`, or nothing when empty.
fn write_config<'a>(
    doc: &mut XmlDocument,
    block: &str,
    item: &str,
    entries: impl ExactSizeIterator<Item = (&'a String, String)>,
) -> Result<(), DescribeError> {
    if entries.len() == 0 {
        return Ok(());
    }
    doc.start(block, &[])?;
    for (key, value) in entries {
        doc.text_element(item, &[("key", key.as_str())], &value)?;
    }
    doc.end(block)
}

fn write_entries(doc: &mut XmlDocument, entries: &[ListenerEntry]) -> Result<(), DescribeError> {
    for entry in entries {
        write_callable(doc, &entry.callable, Some(entry.priority))?;
    }
    Ok(())
}

fn write_callable(
    doc: &mut XmlDocument,
    callable: &CallableRecord,
    priority: Option<i32>,
) -> Result<(), DescribeError> {
    let priority = priority.map(|p| p.to_string());

    let mut attributes = vec![("type", callable.kind().wire_type())];
    if let Some(name) = callable.name() {
        attributes.push(("name", name));
    }
    if !matches!(callable, CallableRecord::Invocable { .. })
        && let Some(class) = callable.owner_type()
    {
        attributes.push(("class", class));
    }
    if callable.is_static() {
        attributes.push(("static", "true"));
    }
    if callable.is_parent_call() {
        attributes.push(("parent", "true"));
    }
    if let Some(priority) = &priority {
        attributes.push(("priority", priority.as_str()));
    }
    doc.empty("callable", &attributes)
}

/// Indented XML document with a UTF-8 declaration.
pub(crate) struct XmlDocument {
    writer: Writer<Vec<u8>>,
}

impl XmlDocument {
    pub(crate) fn new() -> Result<Self, DescribeError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(Self { writer })
    }

    pub(crate) fn start(
        &mut self,
        name: &str,
        attributes: &[(&str, &str)],
    ) -> Result<(), DescribeError> {
        let element = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.writer.write_event(Event::Start(element))?;
        Ok(())
    }

    pub(crate) fn end(&mut self, name: &str) -> Result<(), DescribeError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    pub(crate) fn empty(
        &mut self,
        name: &str,
        attributes: &[(&str, &str)],
    ) -> Result<(), DescribeError> {
        let element = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.writer.write_event(Event::Empty(element))?;
        Ok(())
    }

    pub(crate) fn text_element(
        &mut self,
        name: &str,
        attributes: &[(&str, &str)],
        text: &str,
    ) -> Result<(), DescribeError> {
        self.start(name, attributes)?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    pub(crate) fn finish(self, out: &mut dyn Sink) -> Result<(), DescribeError> {
        let mut xml = String::from_utf8(self.writer.into_inner())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        xml.push('\n');
        out.write(&xml, WriteMode::Raw)?;
        Ok(())
    }
}
