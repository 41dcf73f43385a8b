//! Format registry.

use crate::dispatch::{Renderer, describe};
use crate::error::DescribeError;
use crate::json::JsonRenderer;
use crate::markdown::MarkdownRenderer;
use crate::options::{DescribeOptions, Format};
use crate::sink::Sink;
use crate::subject::Subject;
use crate::text::TextRenderer;
use crate::xml::XmlRenderer;

/// Picks the renderer registered for the requested format.
pub struct DescriptorHelper {
    renderers: Vec<(Format, Box<dyn Renderer>)>,
}

impl DescriptorHelper {
    /// Helper with the text, XML, JSON and Markdown renderers.
    #[must_use]
    pub fn new() -> Self {
        let mut helper = Self::empty();
        helper.register(Format::Text, TextRenderer);
        helper.register(Format::Xml, XmlRenderer);
        helper.register(Format::Json, JsonRenderer);
        helper.register(Format::Markdown, MarkdownRenderer);
        helper
    }

    /// Helper without any renderer.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            renderers: Vec::new(),
        }
    }

    /// Register `renderer` for `format`, replacing any previous one.
    pub fn register(&mut self, format: Format, renderer: impl Renderer + 'static) {
        self.renderers.retain(|(registered, _)| *registered != format);
        self.renderers.push((format, Box::new(renderer)));
    }

    /// Formats with a registered renderer.
    pub fn formats(&self) -> impl Iterator<Item = Format> + '_ {
        self.renderers.iter().map(|(format, _)| *format)
    }

    /// Describe `subject` in `options.format`.
    ///
    /// # Errors
    ///
    /// Returns [`DescribeError::UnsupportedFormat`] when no renderer is
    /// registered for the format, or any error raised while describing.
    pub fn describe(
        &self,
        out: &mut dyn Sink,
        subject: &Subject<'_>,
        options: &DescribeOptions,
    ) -> Result<(), DescribeError> {
        let renderer = self
            .renderers
            .iter()
            .find(|(format, _)| *format == options.format)
            .map(|(_, renderer)| renderer.as_ref())
            .ok_or_else(|| DescribeError::UnsupportedFormat(options.format.to_string()))?;
        describe(renderer, out, subject, options)
    }
}

impl Default for DescriptorHelper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::BufferSink;
    use pretty_assertions::assert_eq;
    use probe_model::{
        ClosureRef, EventDispatcher, ObjectRef, RawCallable, Route, RouteCollection, Value,
    };
    use quick_xml::Reader;
    use quick_xml::events::Event;
    use std::collections::BTreeMap;

    type Fields = BTreeMap<String, String>;

    fn hello_route() -> Route {
        Route::builder("/hello/{name}")
            .host("localhost")
            .schemes(["http", "https"])
            .methods(["get", "head"])
            .default("name", "Joseph")
            .default("_locale", "en")
            .requirement("name", "[a-z]+")
            .option("opt2", "val2")
            .option("opt1", "val1")
            .build()
            .unwrap()
    }

    fn render(subject: &Subject<'_>, options: &DescribeOptions) -> String {
        let mut out = BufferSink::new();
        DescriptorHelper::new()
            .describe(&mut out, subject, options)
            .unwrap();
        out.into_string()
    }

    fn fields<V: AsRef<str>>(pairs: &[(&str, V)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.as_ref().to_owned()))
            .collect()
    }

    /// Records a mapping as its keys in output order plus one field per
    /// entry.
    fn insert_config(found: &mut Fields, block: &str, entries: &[(String, String)]) {
        let keys: Vec<&str> = entries.iter().map(|(key, _)| key.as_str()).collect();
        found.insert(block.to_owned(), keys.join(","));
        for (key, value) in entries {
            found.insert(format!("{block}.{key}"), value.clone());
        }
    }

    fn text_fields(output: &str) -> Fields {
        let mut pairs: Vec<(String, String)> = Vec::new();
        for line in output.lines().filter(|l| l.starts_with("| ")) {
            let (key, value) = line[2..line.len() - 2].split_once(" | ").unwrap();
            let (key, value) = (key.trim(), value.trim_end());
            match pairs.last_mut() {
                Some(last) if key.is_empty() => {
                    last.1.push('\n');
                    last.1.push_str(value);
                }
                _ => pairs.push((key.to_owned(), value.to_owned())),
            }
        }
        let get = |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        let entries = |cell: &str| -> Vec<(String, String)> {
            if cell == "NONE" {
                return Vec::new();
            }
            cell.lines()
                .map(|line| {
                    let (key, value) = line.split_once(": ").unwrap();
                    (key.to_owned(), value.to_owned())
                })
                .collect()
        };

        let mut found = fields(&[
            ("path", get("Path")),
            ("pathRegex", get("Path Regex")),
            ("host", get("Host")),
            ("hostRegex", get("Host Regex")),
            ("scheme", get("Scheme")),
            ("method", get("Method")),
            ("class", get("Class")),
        ]);
        insert_config(&mut found, "defaults", &entries(&get("Defaults")));
        insert_config(&mut found, "options", &entries(&get("Options")));
        let requirements = get("Requirements");
        if requirements == "NO CUSTOM" {
            found.insert("requirements".to_owned(), requirements);
        } else {
            insert_config(&mut found, "requirements", &entries(&requirements));
        }
        found
    }

    fn json_fields(output: &str) -> Fields {
        let parsed: serde_json::Value = serde_json::from_str(output).unwrap();
        let get = |key: &str| parsed[key].as_str().unwrap().to_owned();
        // Key order as written; the parsed map is sorted regardless.
        let entries = |block: &str| -> Vec<(String, String)> {
            let object = parsed[block].as_object().unwrap();
            let section = &output[output.find(&format!("\"{block}\":")).unwrap()..];
            let mut entries: Vec<(usize, String, String)> = object
                .iter()
                .map(|(key, value)| {
                    let position = section.find(&format!("\"{key}\":")).unwrap();
                    (position, key.clone(), value.as_str().unwrap().to_owned())
                })
                .collect();
            entries.sort();
            entries.into_iter().map(|(_, k, v)| (k, v)).collect()
        };

        let mut found = fields(&[
            ("path", get("path")),
            ("pathRegex", get("pathRegex")),
            ("host", get("host")),
            ("hostRegex", get("hostRegex")),
            ("scheme", get("scheme")),
            ("method", get("method")),
            ("class", get("class")),
        ]);
        insert_config(&mut found, "defaults", &entries("defaults"));
        insert_config(&mut found, "options", &entries("options"));
        if parsed["requirements"].is_string() {
            found.insert("requirements".to_owned(), get("requirements"));
        } else {
            insert_config(&mut found, "requirements", &entries("requirements"));
        }
        found
    }

    /// Absent `host`, `scheme`, `method` and `requirements` elements stand
    /// for `ANY` and `NO CUSTOM`.
    fn xml_fields(output: &str) -> Fields {
        let mut reader = Reader::from_str(output);
        let mut found = fields(&[
            ("host", "ANY"),
            ("hostRegex", ""),
            ("requirements", "NO CUSTOM"),
        ]);
        let mut current: Option<String> = None;
        let mut current_key: Option<String> = None;
        let mut schemes = Vec::new();
        let mut methods = Vec::new();
        let mut config: BTreeMap<&str, Vec<(String, String)>> = BTreeMap::new();

        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) => {
                    let name = String::from_utf8(e.name().as_ref().to_vec()).unwrap();
                    for attr in e.attributes().flatten() {
                        let key = String::from_utf8(attr.key.as_ref().to_vec()).unwrap();
                        let value = attr.unescape_value().unwrap().into_owned();
                        match (name.as_str(), key.as_str()) {
                            ("route", "class") => {
                                found.insert("class".to_owned(), value);
                            }
                            ("path", "regex") => {
                                found.insert("pathRegex".to_owned(), value);
                            }
                            ("host", "regex") => {
                                found.insert("hostRegex".to_owned(), value);
                            }
                            (_, "key") => current_key = Some(value),
                            _ => {}
                        }
                    }
                    current = Some(name);
                }
                Event::Text(e) => {
                    let text = reader.decoder().decode(&e).unwrap().into_owned();
                    match current.as_deref() {
                        Some("path") => {
                            found.insert("path".to_owned(), text);
                        }
                        Some("host") => {
                            found.insert("host".to_owned(), text);
                        }
                        Some("scheme") => schemes.push(text),
                        Some("method") => methods.push(text),
                        Some(item @ ("default" | "requirement" | "option")) => {
                            let block = match item {
                                "default" => "defaults",
                                "requirement" => "requirements",
                                _ => "options",
                            };
                            let key = current_key.take().unwrap();
                            config.entry(block).or_default().push((key, text));
                        }
                        _ => {}
                    }
                }
                Event::End(_) => current = None,
                Event::Eof => break,
                _ => {}
            }
        }
        let join_or_any = |items: &[String]| {
            if items.is_empty() {
                "ANY".to_owned()
            } else {
                items.join("|")
            }
        };
        found.insert("scheme".to_owned(), join_or_any(&schemes));
        found.insert("method".to_owned(), join_or_any(&methods));
        for block in ["defaults", "requirements", "options"] {
            match config.get(block) {
                Some(entries) => insert_config(&mut found, block, entries),
                None if block == "requirements" => {}
                None => insert_config(&mut found, block, &[]),
            }
        }
        found
    }

    fn markdown_fields(output: &str) -> Fields {
        let mut found = Fields::new();
        let mut lines = output.lines().peekable();
        while let Some(line) = lines.next() {
            let Some((key, value)) = line.strip_prefix("- ").and_then(|l| l.split_once(": ")) else {
                continue;
            };
            let key = match key {
                "Path" => "path",
                "Path Regex" => "pathRegex",
                "Host" => "host",
                "Host Regex" => "hostRegex",
                "Scheme" => "scheme",
                "Method" => "method",
                "Class" => "class",
                "Defaults" | "Requirements" | "Options" => {
                    let block = key.to_lowercase();
                    if value == "NO CUSTOM" {
                        found.insert(block, value.to_owned());
                        continue;
                    }
                    let mut entries = Vec::new();
                    while let Some(nested) = lines.next_if(|l| l.starts_with("    - `")) {
                        let (key, value) = nested["    - `".len()..].split_once("`: ").unwrap();
                        entries.push((key.to_owned(), value.to_owned()));
                    }
                    insert_config(&mut found, &block, &entries);
                    continue;
                }
                _ => continue,
            };
            found.insert(key.to_owned(), value.to_owned());
        }
        found
    }

    fn assert_same_in_every_format(route: &Route, expected: &Fields) {
        let subject = Subject::from(route);
        let text = render(&subject, &DescribeOptions::new(Format::Text));
        let json = render(&subject, &DescribeOptions::new(Format::Json));
        let xml = render(&subject, &DescribeOptions::new(Format::Xml));
        let markdown = render(&subject, &DescribeOptions::new(Format::Markdown));

        assert_eq!(&text_fields(&text), expected);
        assert_eq!(&json_fields(&json), expected);
        assert_eq!(&xml_fields(&xml), expected);
        assert_eq!(&markdown_fields(&markdown), expected);
    }

    #[test]
    fn test_route_content_is_identical_across_formats() {
        let expected = fields(&[
            ("path", "/hello/{name}"),
            ("pathRegex", "^/hello(?:/(?P<name>[a-z]+))?$"),
            ("host", "localhost"),
            ("hostRegex", "(?i)^localhost$"),
            ("scheme", "http|https"),
            ("method", "GET|HEAD"),
            ("class", "Route"),
            ("defaults", "_locale,name"),
            ("defaults._locale", "en"),
            ("defaults.name", "Joseph"),
            ("requirements", "name"),
            ("requirements.name", "[a-z]+"),
            ("options", "opt1,opt2"),
            ("options.opt1", "val1"),
            ("options.opt2", "val2"),
        ]);
        assert_same_in_every_format(&hello_route(), &expected);
    }

    #[test]
    fn test_empty_route_sentinels_across_formats() {
        let route = Route::builder("/").build().unwrap();
        let expected = fields(&[
            ("path", "/"),
            ("pathRegex", "^/$"),
            ("host", "ANY"),
            ("hostRegex", ""),
            ("scheme", "ANY"),
            ("method", "ANY"),
            ("class", "Route"),
            ("defaults", ""),
            ("requirements", "NO CUSTOM"),
            ("options", ""),
        ]);
        assert_same_in_every_format(&route, &expected);
    }

    #[test]
    fn test_route_collection_in_every_format() {
        let mut routes = RouteCollection::new();
        routes.add("hello", hello_route());
        routes.add("home", Route::builder("/").build().unwrap());
        let subject = Subject::from(&routes);

        let json = render(&subject, &DescribeOptions::new(Format::Json));
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let names: Vec<&String> = parsed.as_object().unwrap().keys().collect();
        assert_eq!(names.len(), 2);
        assert_eq!(parsed["home"]["requirements"], "NO CUSTOM");

        let xml = render(&subject, &DescribeOptions::new(Format::Xml));
        assert!(xml.contains(r#"<route name="hello" class="Route">"#));
        assert!(xml.contains(r#"<route name="home" class="Route">"#));

        let markdown = render(&subject, &DescribeOptions::new(Format::Markdown));
        assert!(markdown.starts_with("hello\n-----\n"));
        assert!(markdown.contains("\n\n\nhome\n----\n"));

        let text = render(&subject, &DescribeOptions::new(Format::Text));
        let names: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with("| h"))
            .map(|l| l[2..].split_whitespace().next().unwrap())
            .collect();
        assert_eq!(names, ["hello", "home"]);
    }

    fn dispatcher() -> EventDispatcher {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_listener("event2", ObjectRef::invocable("CallableClass"), 0);
        dispatcher.add_listener("event1", "global_function", 255);
        dispatcher.add_listener("event1", ClosureRef::at("/app/listeners.rs", 7), -1);
        dispatcher
    }

    #[test]
    fn test_listeners_grouped_by_event_name() {
        let dispatcher = dispatcher();
        let subject = Subject::EventListeners(&dispatcher);

        let json = render(&subject, &DescribeOptions::new(Format::Json));
        let event1 = json.find("\"event1\"").unwrap();
        let event2 = json.find("\"event2\"").unwrap();
        assert!(event1 < event2);

        let text = render(&subject, &DescribeOptions::new(Format::Text));
        assert!(text.find("\"event1\" event").unwrap() < text.find("\"event2\" event").unwrap());

        let markdown = render(&subject, &DescribeOptions::new(Format::Markdown));
        assert!(markdown.find("## event1").unwrap() < markdown.find("## event2").unwrap());

        let xml = render(&subject, &DescribeOptions::new(Format::Xml));
        assert!(xml.find("name=\"event1\"").unwrap() < xml.find("name=\"event2\"").unwrap());
    }

    #[test]
    fn test_listeners_filtered_by_event() {
        let dispatcher = dispatcher();
        let subject = Subject::EventListeners(&dispatcher);
        let options = DescribeOptions::new(Format::Json).with_event("event1");

        let parsed: serde_json::Value = serde_json::from_str(&render(&subject, &options)).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!([
                {"type": "function", "name": "global_function", "priority": 255},
                {"type": "closure", "priority": -1},
            ])
        );

        let options = DescribeOptions::new(Format::Text).with_event("event1");
        let text = render(&subject, &options);
        assert!(text.contains("Registered Listeners for \"event1\" Event"));
        assert!(text.contains("| #1    | global_function() | 255      |"));
        assert!(text.contains("| #2    | Closure()         | -1       |"));
        assert!(!text.contains("CallableClass"));
    }

    #[test]
    fn test_callable_from_dynamic_value() {
        let value = Value::from(ObjectRef::invocable("CallableClass"));
        let subject = Subject::from_value(&value).unwrap();
        assert_eq!(
            render(&subject, &DescribeOptions::new(Format::Text)),
            "CallableClass::invoke()\n"
        );
    }

    #[test]
    fn test_parent_call_pair() {
        let callable = RawCallable::bound(
            ObjectRef::new("ExtendedCallableClass"),
            "parent::staticMethod",
        );
        let subject = Subject::from(&callable);
        assert_eq!(
            render(&subject, &DescribeOptions::new(Format::Text)),
            "ExtendedCallableClass::parent::staticMethod()\n"
        );
    }

    #[test]
    fn test_unregistered_format() {
        let route = hello_route();
        let mut out = BufferSink::new();
        let err = DescriptorHelper::empty()
            .describe(&mut out, &Subject::from(&route), &DescribeOptions::new(Format::Xml))
            .unwrap_err();
        assert_eq!(err.to_string(), "Unsupported format \"xml\".");
    }

    #[test]
    fn test_registered_formats() {
        let formats: Vec<Format> = DescriptorHelper::new().formats().collect();
        assert_eq!(formats, Format::ALL);
    }
}
