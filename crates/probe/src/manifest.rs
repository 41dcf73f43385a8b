//! Application manifest loading.
//!
//! The manifest is a TOML file describing the state a debugging session
//! inspects:
//!
//! ```toml
//! [parameters]
//! locale = "en"
//!
//! [[routes]]
//! name = "hello"
//! path = "/hello/{name}"
//! methods = ["GET"]
//! defaults = { name = "World", _controller = { closure = { file = "src/app.rs", line = 12 } } }
//! requirements = { name = "[a-z]+" }
//!
//! [[listeners]]
//! event = "kernel.request"
//! callable = ["Router", "onRequest"]
//! priority = 32
//!
//! [services]
//! greeter = { object = "Greeter", invocable = true }
//! ```
//!
//! Values are plain TOML, except for two table shapes: `{ object = "Type" }`
//! (with optional `invocable = true`) and `{ closure = { file, line } }`
//! (or `{ closure = true }` when the location is unknown). Callables are a
//! function name, a `["Type", "method"]` pair, `{ instance = "Type", method =
//! "m" }`, a closure or an object.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use probe_model::{
    ClosureRef, EventDispatcher, ObjectRef, RawCallable, Route, RouteCollection, RouteError, Value,
};
use serde::Deserialize;

/// Manifest error.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ManifestError {
    /// Manifest file missing.
    #[error("Manifest not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("Manifest parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// A route failed to build.
    #[error("Invalid route \"{name}\": {source}")]
    Route {
        /// Route name.
        name: String,
        /// Build error.
        #[source]
        source: RouteError,
    },
}

/// Everything a manifest declares.
#[derive(Debug, Default)]
pub(crate) struct Application {
    pub(crate) parameters: BTreeMap<String, Value>,
    pub(crate) routes: RouteCollection,
    pub(crate) dispatcher: EventDispatcher,
    pub(crate) services: BTreeMap<String, Value>,
}

impl Application {
    /// Load the manifest at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, ManifestError> {
        if !path.exists() {
            return Err(ManifestError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let app = Self::parse(&content)?;
        tracing::info!(
            manifest = %path.display(),
            routes = app.routes.len(),
            parameters = app.parameters.len(),
            services = app.services.len(),
            "Loaded manifest"
        );
        Ok(app)
    }

    /// Build the application from manifest text.
    pub(crate) fn parse(content: &str) -> Result<Self, ManifestError> {
        let manifest: ManifestFile = toml::from_str(content)?;

        let mut routes = RouteCollection::new();
        for spec in manifest.routes {
            let name = spec.name.clone();
            let route = spec
                .build()
                .map_err(|source| ManifestError::Route { name: name.clone(), source })?;
            routes.add(name, route);
        }

        let mut dispatcher = EventDispatcher::new();
        for listener in manifest.listeners {
            dispatcher.add_listener(listener.event, listener.callable, listener.priority);
        }

        Ok(Self {
            parameters: convert_map(manifest.parameters),
            routes,
            dispatcher,
            services: convert_map(manifest.services),
        })
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ManifestFile {
    parameters: BTreeMap<String, ValueSpec>,
    routes: Vec<RouteSpec>,
    listeners: Vec<ListenerSpec>,
    services: BTreeMap<String, ValueSpec>,
}

#[derive(Debug, Deserialize)]
struct RouteSpec {
    name: String,
    path: String,
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    schemes: Vec<String>,
    #[serde(default)]
    methods: Vec<String>,
    #[serde(default)]
    class: Option<String>,
    #[serde(default)]
    defaults: BTreeMap<String, ValueSpec>,
    #[serde(default)]
    requirements: BTreeMap<String, String>,
    #[serde(default)]
    options: BTreeMap<String, ValueSpec>,
}

impl RouteSpec {
    fn build(self) -> Result<Route, RouteError> {
        let mut builder = Route::builder(self.path)
            .schemes(self.schemes)
            .methods(self.methods);
        if let Some(host) = self.host {
            builder = builder.host(host);
        }
        if let Some(class) = self.class {
            builder = builder.class(class);
        }
        for (name, value) in self.defaults {
            builder = builder.default(name, Value::from(value));
        }
        for (name, pattern) in self.requirements {
            builder = builder.requirement(name, pattern);
        }
        for (name, value) in self.options {
            builder = builder.option(name, Value::from(value));
        }
        builder.build()
    }
}

#[derive(Debug, Deserialize)]
struct ListenerSpec {
    event: String,
    callable: CallableSpec,
    #[serde(default)]
    priority: i32,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CallableSpec {
    Name(String),
    Pair(String, String),
    Bound { instance: String, method: String },
    Closure { closure: ClosureSpec },
    Object {
        object: String,
        #[serde(default)]
        invocable: bool,
    },
}

impl From<CallableSpec> for RawCallable {
    fn from(spec: CallableSpec) -> Self {
        match spec {
            CallableSpec::Name(name) => Self::Name(name),
            CallableSpec::Pair(type_name, function) => Self::static_pair(type_name, function),
            CallableSpec::Bound { instance, method } => {
                Self::bound(ObjectRef::new(instance), method)
            }
            CallableSpec::Closure { closure } => Self::Closure(closure.into()),
            CallableSpec::Object { object, invocable } => Self::Object(object_ref(object, invocable)),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClosureSpec {
    At { file: PathBuf, line: u32 },
    Unknown(bool),
}

impl From<ClosureSpec> for ClosureRef {
    fn from(spec: ClosureSpec) -> Self {
        match spec {
            ClosureSpec::At { file, line } => Self::at(file, line),
            ClosureSpec::Unknown(_) => Self::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ValueSpec {
    Closure {
        closure: ClosureSpec,
    },
    Object {
        object: String,
        #[serde(default)]
        invocable: bool,
    },
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<ValueSpec>),
    Map(BTreeMap<String, ValueSpec>),
}

impl From<ValueSpec> for Value {
    fn from(spec: ValueSpec) -> Self {
        match spec {
            ValueSpec::Closure { closure } => Self::Closure(closure.into()),
            ValueSpec::Object { object, invocable } => Self::Object(object_ref(object, invocable)),
            ValueSpec::Bool(b) => Self::Bool(b),
            ValueSpec::Int(i) => Self::Int(i),
            ValueSpec::Float(f) => Self::Float(f),
            ValueSpec::String(s) => Self::String(s),
            ValueSpec::List(items) => Self::List(items.into_iter().map(Self::from).collect()),
            ValueSpec::Map(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

fn object_ref(type_name: String, invocable: bool) -> ObjectRef {
    if invocable {
        ObjectRef::invocable(type_name)
    } else {
        ObjectRef::new(type_name)
    }
}

fn convert_map(specs: BTreeMap<String, ValueSpec>) -> BTreeMap<String, Value> {
    specs
        .into_iter()
        .map(|(key, spec)| (key, Value::from(spec)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use probe_model::{CallableOwner, ListenerRegistry};

    const MANIFEST: &str = r#"
[parameters]
locale = "en"
debug = true
limits = { page = 10, ratio = 0.5 }
mailer = { object = "Mailer" }

[[routes]]
name = "home"
path = "/"

[[routes]]
name = "hello"
path = "/hello/{name}"
host = "localhost"
schemes = ["HTTPS"]
methods = ["get", "head"]
defaults = { name = "World", _controller = { closure = { file = "src/app.rs", line = 12 } } }
requirements = { name = "^[a-z]+$" }
options = { compiler_class = "RouteCompiler" }

[[listeners]]
event = "kernel.request"
callable = "strlen"

[[listeners]]
event = "kernel.request"
callable = ["Router", "onRequest"]
priority = 32

[[listeners]]
event = "kernel.response"
callable = { instance = "Profiler", method = "onResponse" }
priority = -10

[[listeners]]
event = "kernel.terminate"
callable = { closure = true }

[services]
greeter = { object = "Greeter", invocable = true }
factory = { closure = { file = "src/services.rs", line = 3 } }
"#;

    #[test]
    fn test_parse_parameters() {
        let app = Application::parse(MANIFEST).unwrap();
        assert_eq!(app.parameters["locale"], Value::from("en"));
        assert_eq!(app.parameters["debug"], Value::Bool(true));
        assert_eq!(
            app.parameters["limits"],
            Value::Map(vec![
                ("page".to_owned(), Value::Int(10)),
                ("ratio".to_owned(), Value::Float(0.5)),
            ])
        );
        assert_eq!(
            app.parameters["mailer"],
            Value::Object(ObjectRef::new("Mailer"))
        );
    }

    #[test]
    fn test_parse_routes_keep_declaration_order() {
        let app = Application::parse(MANIFEST).unwrap();
        let names: Vec<&str> = app.routes.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["home", "hello"]);

        let hello = app.routes.get("hello").unwrap();
        assert_eq!(hello.host(), Some("localhost"));
        assert_eq!(hello.schemes(), ["https"]);
        assert_eq!(hello.methods(), ["GET", "HEAD"]);
        assert_eq!(hello.requirements(), [("name".to_owned(), "[a-z]+".to_owned())]);
        assert_eq!(
            hello.default_value("_controller"),
            Some(&Value::Closure(ClosureRef::at("src/app.rs", 12)))
        );
        assert_eq!(
            hello.compiled().path_regex(),
            "^/hello(?:/(?P<name>[a-z]+))?$"
        );
    }

    #[test]
    fn test_parse_listeners() {
        let app = Application::parse(MANIFEST).unwrap();
        assert_eq!(
            app.dispatcher.listeners("kernel.request"),
            [
                (
                    &RawCallable::Pair(CallableOwner::Type("Router".to_owned()), "onRequest".to_owned()),
                    32,
                ),
                (&RawCallable::Name("strlen".to_owned()), 0),
            ]
        );
        assert_eq!(
            app.dispatcher.listeners("kernel.response"),
            [(&RawCallable::bound(ObjectRef::new("Profiler"), "onResponse"), -10)]
        );
        assert_eq!(
            app.dispatcher.listeners("kernel.terminate"),
            [(&RawCallable::Closure(ClosureRef::new()), 0)]
        );
    }

    #[test]
    fn test_parse_services() {
        let app = Application::parse(MANIFEST).unwrap();
        assert_eq!(
            app.services["greeter"],
            Value::Object(ObjectRef::invocable("Greeter"))
        );
        assert_eq!(
            app.services["factory"],
            Value::Closure(ClosureRef::at("src/services.rs", 3))
        );
    }

    #[test]
    fn test_empty_manifest() {
        let app = Application::parse("").unwrap();
        assert!(app.routes.is_empty());
        assert!(app.parameters.is_empty());
        assert!(app.services.is_empty());
    }

    #[test]
    fn test_invalid_route_names_the_route() {
        let manifest = r#"
[[routes]]
name = "broken"
path = "/{id}/{id}"
"#;
        let err = Application::parse(manifest).unwrap_err();
        assert!(matches!(err, ManifestError::Route { ref name, .. } if name == "broken"));
        assert!(err.to_string().starts_with("Invalid route \"broken\":"));
    }

    #[test]
    fn test_load_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let err = Application::load(&dir.path().join("app.toml")).unwrap_err();
        assert!(matches!(err, ManifestError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.toml");
        std::fs::write(&path, MANIFEST).unwrap();
        let app = Application::load(&path).unwrap();
        assert_eq!(app.routes.len(), 2);
    }
}
