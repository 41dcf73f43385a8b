//! JSON renderer.

use std::collections::BTreeMap;
use std::io;

use serde::Serialize;
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde_json::ser::{Formatter, PrettyFormatter};

use probe_model::Value;

use crate::callable::CallableRecord;
use crate::dispatch::Renderer;
use crate::error::DescribeError;
use crate::listener::{ListenerEntry, ListenerGroups};
use crate::options::{DescribeOptions, JsonEncoding};
use crate::route::{NO_CUSTOM, RouteRecord};
use crate::sink::{Sink, WriteMode};
use crate::value::format_value;

/// Renders pretty-printed JSON documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render_route_collection(
        &self,
        out: &mut dyn Sink,
        routes: &[(String, RouteRecord)],
        options: &DescribeOptions,
    ) -> Result<(), DescribeError> {
        write_data(out, &JsonRoutes(routes), options)
    }

    fn render_route(
        &self,
        out: &mut dyn Sink,
        route: &RouteRecord,
        options: &DescribeOptions,
    ) -> Result<(), DescribeError> {
        write_data(out, &JsonRoute::from(route), options)
    }

    fn render_listeners(
        &self,
        out: &mut dyn Sink,
        listeners: &ListenerGroups,
        options: &DescribeOptions,
    ) -> Result<(), DescribeError> {
        match listeners {
            ListenerGroups::Single { entries, .. } => {
                write_data(out, &JsonListeners(entries), options)
            }
            ListenerGroups::Grouped(groups) => write_data(out, &JsonGroups(groups), options),
        }
    }

    fn render_callable(
        &self,
        out: &mut dyn Sink,
        callable: &CallableRecord,
        options: &DescribeOptions,
    ) -> Result<(), DescribeError> {
        write_data(out, &JsonCallable::new(callable, None), options)
    }
}

pub(crate) fn write_data<T: Serialize>(
    out: &mut dyn Sink,
    data: &T,
    options: &DescribeOptions,
) -> Result<(), DescribeError> {
    let mut buf = Vec::new();
    let formatter = EscapingFormatter::new(options.json_encoding);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    data.serialize(&mut serializer)?;
    buf.push(b'\n');

    let json = String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    out.write(&json, WriteMode::Raw)?;
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonRoute<'a> {
    path: &'a str,
    path_regex: &'a str,
    host: &'a str,
    host_regex: &'a str,
    scheme: String,
    method: String,
    class: &'a str,
    defaults: JsonMap<'a>,
    requirements: JsonRequirements<'a>,
    options: JsonMap<'a>,
}

impl<'a> From<&'a RouteRecord> for JsonRoute<'a> {
    fn from(route: &'a RouteRecord) -> Self {
        Self {
            path: &route.path,
            path_regex: &route.path_regex,
            host: route.host_or_any(),
            host_regex: route.host_regex_or_empty(),
            scheme: route.scheme(),
            method: route.method(),
            class: &route.class,
            defaults: JsonMap(&route.defaults),
            requirements: if route.requirements.is_empty() {
                JsonRequirements::NoCustom(NO_CUSTOM)
            } else {
                JsonRequirements::Custom(&route.requirements)
            },
            options: JsonMap(&route.options),
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum JsonRequirements<'a> {
    NoCustom(&'static str),
    Custom(&'a BTreeMap<String, String>),
}

struct JsonRoutes<'a>(&'a [(String, RouteRecord)]);

impl Serialize for JsonRoutes<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.0
                .iter()
                .map(|(name, route)| (name, JsonRoute::from(route))),
        )
    }
}

struct JsonMap<'a>(&'a BTreeMap<String, Value>);

impl Serialize for JsonMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(key, value)| (key, JsonValue(value))))
    }
}

/// Native JSON for plain data; objects and closures as their formatted label.
pub(crate) struct JsonValue<'a>(pub(crate) &'a Value);

impl Serialize for JsonValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&JsonValue(item))?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, item) in entries {
                    map.serialize_entry(key, &JsonValue(item))?;
                }
                map.end()
            }
            other @ (Value::Object(_) | Value::Closure(_)) => {
                serializer.serialize_str(&format_value(other))
            }
        }
    }
}

#[derive(Serialize)]
struct JsonCallable<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    class: Option<&'a str>,
    #[serde(rename = "static", skip_serializing_if = "Option::is_none")]
    is_static: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<i32>,
}

impl<'a> JsonCallable<'a> {
    fn new(callable: &'a CallableRecord, priority: Option<i32>) -> Self {
        // Invocables report their type as the name, not as a class.
        let class = match callable {
            CallableRecord::Invocable { .. } => None,
            other => other.owner_type(),
        };
        Self {
            kind: callable.kind().wire_type(),
            name: callable.name(),
            class,
            is_static: callable.is_static().then_some(true),
            parent: callable.is_parent_call().then_some(true),
            priority,
        }
    }
}

struct JsonListeners<'a>(&'a [ListenerEntry]);

impl Serialize for JsonListeners<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            self.0
                .iter()
                .map(|entry| JsonCallable::new(&entry.callable, Some(entry.priority))),
        )
    }
}

struct JsonGroups<'a>(&'a [(String, Vec<ListenerEntry>)]);

impl Serialize for JsonGroups<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.0
                .iter()
                .map(|(event, entries)| (event, JsonListeners(entries))),
        )
    }
}

/// Pretty formatter with optional slash and non-ASCII escaping.
struct EscapingFormatter {
    inner: PrettyFormatter<'static>,
    encoding: JsonEncoding,
}

impl EscapingFormatter {
    fn new(encoding: JsonEncoding) -> Self {
        Self {
            inner: PrettyFormatter::with_indent(b"    "),
            encoding,
        }
    }
}

impl Formatter for EscapingFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if self.encoding.is_empty() {
            return writer.write_all(fragment.as_bytes());
        }

        let escape_slashes = self.encoding.contains(JsonEncoding::ESCAPE_SLASHES);
        let escape_unicode = self.encoding.contains(JsonEncoding::ESCAPE_UNICODE);
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            let slash = escape_slashes && c == '/';
            let unicode = escape_unicode && !c.is_ascii();
            if !slash && !unicode {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..i])?;
            if slash {
                writer.write_all(b"\\/")?;
            } else {
                let mut units = [0_u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
            start = i + c.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }

    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_array(writer)
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object(writer)
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object_value(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::extract;
    use crate::sink::BufferSink;
    use pretty_assertions::assert_eq;
    use probe_model::{ClosureRef, ObjectRef, Route};
    use serde_json::json;

    fn hello_route() -> RouteRecord {
        extract(
            &Route::builder("/hello/{name}")
                .host("localhost")
                .schemes(["http", "https"])
                .methods(["get", "head"])
                .default("name", "Joseph")
                .requirement("name", "[a-z]+")
                .option("opt2", "val2")
                .option("opt1", "val1")
                .build()
                .unwrap(),
        )
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut BufferSink) -> Result<(), DescribeError>,
    {
        let mut out = BufferSink::new();
        f(&mut out).unwrap();
        out.into_string()
    }

    #[test]
    fn test_route_fields_and_order() {
        let output = render(|out| {
            JsonRenderer.render_route(out, &hello_route(), &DescribeOptions::default())
        });

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            parsed,
            json!({
                "path": "/hello/{name}",
                "pathRegex": "^/hello(?:/(?P<name>[a-z]+))?$",
                "host": "localhost",
                "hostRegex": "(?i)^localhost$",
                "scheme": "http|https",
                "method": "GET|HEAD",
                "class": "Route",
                "defaults": {"name": "Joseph"},
                "requirements": {"name": "[a-z]+"},
                "options": {"opt1": "val1", "opt2": "val2"},
            })
        );

        let keys: Vec<&str> = output
            .lines()
            .filter(|l| l.starts_with("    \""))
            .map(|l| l.trim_start().split('"').nth(1).unwrap())
            .collect();
        assert_eq!(
            keys,
            [
                "path",
                "pathRegex",
                "host",
                "hostRegex",
                "scheme",
                "method",
                "class",
                "defaults",
                "requirements",
                "options"
            ]
        );
        assert!(output.ends_with("}\n"));
    }

    #[test]
    fn test_empty_route_sentinels() {
        let record = extract(&Route::builder("/").build().unwrap());
        let output = render(|out| JsonRenderer.render_route(out, &record, &DescribeOptions::default()));

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["host"], "ANY");
        assert_eq!(parsed["hostRegex"], "");
        assert_eq!(parsed["scheme"], "ANY");
        assert_eq!(parsed["method"], "ANY");
        assert_eq!(parsed["requirements"], "NO CUSTOM");
        assert_eq!(parsed["defaults"], json!({}));
    }

    #[test]
    fn test_pretty_print_uses_four_spaces() {
        let callable = CallableRecord::Function {
            name: "strlen".to_owned(),
        };
        let output =
            render(|out| JsonRenderer.render_callable(out, &callable, &DescribeOptions::default()));
        assert_eq!(
            output,
            "{\n    \"type\": \"function\",\n    \"name\": \"strlen\"\n}\n"
        );
    }

    #[test]
    fn test_callable_shapes() {
        let cases = [
            (
                CallableRecord::StaticMethod {
                    class: "ExtendedCallableClass".to_owned(),
                    name: "staticMethod".to_owned(),
                    parent: true,
                },
                json!({"type": "function", "name": "staticMethod", "class": "ExtendedCallableClass", "static": true, "parent": true}),
            ),
            (
                CallableRecord::BoundMethod {
                    class: "CallableClass".to_owned(),
                    name: "method".to_owned(),
                },
                json!({"type": "function", "name": "method", "class": "CallableClass"}),
            ),
            (CallableRecord::Closure, json!({"type": "closure"})),
            (
                CallableRecord::Invocable {
                    class: "CallableClass".to_owned(),
                },
                json!({"type": "object", "name": "CallableClass"}),
            ),
        ];

        for (record, expected) in cases {
            let output =
                render(|out| JsonRenderer.render_callable(out, &record, &DescribeOptions::default()));
            let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
            assert_eq!(parsed, expected);
        }
    }

    #[test]
    fn test_listeners_grouped_and_filtered() {
        let entries = vec![
            ListenerEntry {
                order: 1,
                callable: CallableRecord::Function {
                    name: "global_function".to_owned(),
                },
                priority: 255,
            },
            ListenerEntry {
                order: 2,
                callable: CallableRecord::Closure,
                priority: -1,
            },
        ];

        let grouped = ListenerGroups::Grouped(vec![("event1".to_owned(), entries.clone())]);
        let output =
            render(|out| JsonRenderer.render_listeners(out, &grouped, &DescribeOptions::default()));
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            parsed,
            json!({"event1": [
                {"type": "function", "name": "global_function", "priority": 255},
                {"type": "closure", "priority": -1},
            ]})
        );

        let single = ListenerGroups::Single {
            event: "event1".to_owned(),
            entries,
        };
        let output =
            render(|out| JsonRenderer.render_listeners(out, &single, &DescribeOptions::default()));
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[1]["priority"], -1);
    }

    #[test]
    fn test_non_native_values_use_labels() {
        let record = extract(
            &Route::builder("/")
                .default("_controller", ClosureRef::at("/a.rs", 3))
                .default("service", ObjectRef::new("App\\Mailer"))
                .default("page", 1_i64)
                .build()
                .unwrap(),
        );
        let output = render(|out| JsonRenderer.render_route(out, &record, &DescribeOptions::default()));
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            parsed["defaults"],
            json!({"_controller": "object(Closure)", "page": 1, "service": "object(App\\Mailer)"})
        );
    }

    #[test]
    fn test_escaping_flags() {
        let record = extract(&Route::builder("/café").build().unwrap());

        let plain = render(|out| JsonRenderer.render_route(out, &record, &DescribeOptions::default()));
        assert!(plain.contains("\"path\": \"/café\""));

        let options = DescribeOptions {
            json_encoding: JsonEncoding::ESCAPE_SLASHES | JsonEncoding::ESCAPE_UNICODE,
            ..DescribeOptions::default()
        };
        let escaped = render(|out| JsonRenderer.render_route(out, &record, &options));
        assert!(escaped.contains(r#""path": "\/caf\u00e9""#));

        let parsed: serde_json::Value = serde_json::from_str(&escaped).unwrap();
        assert_eq!(parsed["path"], "/café");
    }
}
