//! Routing rules and ordered route collections.

use regex::Regex;

use crate::compiler::{CompiledRoute, RouteCompiler};
use crate::value::Value;

/// Class reported for routes that do not set one.
const DEFAULT_ROUTE_CLASS: &str = "Route";

/// Error building a route.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RouteError {
    /// A variable appears twice in one pattern.
    #[error("variable \"{name}\" cannot be used more than once in pattern \"{pattern}\"")]
    DuplicateVariable {
        /// Variable name.
        name: String,
        /// Offending pattern.
        pattern: String,
    },

    /// A variable name starts with a digit.
    #[error("variable \"{name}\" in pattern \"{pattern}\" cannot start with a digit")]
    InvalidVariableName {
        /// Variable name.
        name: String,
        /// Offending pattern.
        pattern: String,
    },

    /// A variable name exceeds the maximum length.
    #[error("variable \"{name}\" in pattern \"{pattern}\" is longer than {max} characters")]
    VariableNameTooLong {
        /// Variable name.
        name: String,
        /// Offending pattern.
        pattern: String,
        /// Maximum accepted length.
        max: usize,
    },

    /// A requirement is not a valid regex.
    #[error("invalid requirement for \"{name}\"")]
    InvalidRequirement {
        /// Variable the requirement applies to.
        name: String,
        /// Regex error.
        #[source]
        source: regex::Error,
    },

    /// The assembled pattern is not a valid regex.
    #[error("pattern \"{pattern}\" does not compile")]
    InvalidPattern {
        /// Path or host pattern.
        pattern: String,
        /// Regex error.
        #[source]
        source: regex::Error,
    },
}

/// A single routing rule.
///
/// Routes are immutable once built and always hold their compiled form, so
/// inspecting a route never fails.
#[derive(Debug, Clone)]
pub struct Route {
    path: String,
    host: Option<String>,
    schemes: Vec<String>,
    methods: Vec<String>,
    defaults: Vec<(String, Value)>,
    requirements: Vec<(String, String)>,
    options: Vec<(String, Value)>,
    class: String,
    compiled: CompiledRoute,
}

impl Route {
    /// Start building a route for `path`.
    #[must_use]
    pub fn builder(path: impl Into<String>) -> RouteBuilder {
        RouteBuilder::new(path)
    }

    /// Path pattern, always starting with `/`.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Host pattern, if the route is bound to a host.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Accepted schemes, lower-cased. Empty means any.
    #[must_use]
    pub fn schemes(&self) -> &[String] {
        &self.schemes
    }

    /// Accepted methods, upper-cased. Empty means any.
    #[must_use]
    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    /// Default values, in insertion order.
    #[must_use]
    pub fn defaults(&self) -> &[(String, Value)] {
        &self.defaults
    }

    /// Look up one default value.
    #[must_use]
    pub fn default_value(&self, name: &str) -> Option<&Value> {
        self.defaults
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Variable requirements, in insertion order.
    #[must_use]
    pub fn requirements(&self) -> &[(String, String)] {
        &self.requirements
    }

    /// Route options, in insertion order.
    #[must_use]
    pub fn options(&self) -> &[(String, Value)] {
        &self.options
    }

    /// Implementing class reported by descriptions.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Compiled matchers.
    #[must_use]
    pub fn compiled(&self) -> &CompiledRoute {
        &self.compiled
    }
}

/// Builder for [`Route`].
#[derive(Debug, Default)]
pub struct RouteBuilder {
    path: String,
    host: Option<String>,
    schemes: Vec<String>,
    methods: Vec<String>,
    defaults: Vec<(String, Value)>,
    requirements: Vec<(String, String)>,
    options: Vec<(String, Value)>,
    class: Option<String>,
}

impl RouteBuilder {
    /// Create a builder for `path`.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..<Self as Default>::default()
        }
    }

    /// Bind the route to a host pattern. An empty host means any host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        let host = host.into();
        self.host = (!host.is_empty()).then_some(host);
        self
    }

    /// Restrict accepted schemes.
    #[must_use]
    pub fn schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.schemes = schemes
            .into_iter()
            .map(|s| s.as_ref().to_lowercase())
            .collect();
        self
    }

    /// Restrict accepted methods.
    #[must_use]
    pub fn methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.methods = methods
            .into_iter()
            .map(|m| m.as_ref().to_uppercase())
            .collect();
        self
    }

    /// Set a default value, replacing any previous one for `name`.
    #[must_use]
    pub fn default(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        upsert(&mut self.defaults, name.into(), value.into());
        self
    }

    /// Set a requirement. Leading `^` and trailing `$` anchors are dropped.
    #[must_use]
    pub fn requirement(mut self, name: impl Into<String>, pattern: impl AsRef<str>) -> Self {
        let pattern = pattern.as_ref();
        let pattern = pattern.strip_prefix('^').unwrap_or(pattern);
        let pattern = pattern.strip_suffix('$').unwrap_or(pattern);
        upsert(&mut self.requirements, name.into(), pattern.to_owned());
        self
    }

    /// Set an option.
    #[must_use]
    pub fn option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        upsert(&mut self.options, name.into(), value.into());
        self
    }

    /// Override the reported route class.
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Validate and compile the route.
    ///
    /// # Errors
    ///
    /// Returns an error when a requirement is not a valid regex or the path or
    /// host pattern contains malformed variables.
    pub fn build(self) -> Result<Route, RouteError> {
        for (name, pattern) in &self.requirements {
            Regex::new(pattern).map_err(|source| RouteError::InvalidRequirement {
                name: name.clone(),
                source,
            })?;
        }

        let path = format!("/{}", self.path.trim().trim_start_matches('/'));
        let compiled = RouteCompiler::new(&self.requirements, &self.defaults)
            .compile(&path, self.host.as_deref())?;

        Ok(Route {
            path,
            host: self.host,
            schemes: self.schemes,
            methods: self.methods,
            defaults: self.defaults,
            requirements: self.requirements,
            options: self.options,
            class: self
                .class
                .unwrap_or_else(|| DEFAULT_ROUTE_CLASS.to_owned()),
            compiled,
        })
    }
}

fn upsert<V>(entries: &mut Vec<(String, V)>, key: String, value: V) {
    match entries.iter_mut().find(|(existing, _)| *existing == key) {
        Some(entry) => entry.1 = value,
        None => entries.push((key, value)),
    }
}

/// Named routes in insertion order.
#[derive(Debug, Clone, Default)]
pub struct RouteCollection {
    routes: Vec<(String, Route)>,
}

impl RouteCollection {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route. Re-adding an existing name moves it to the end.
    pub fn add(&mut self, name: impl Into<String>, route: Route) {
        let name = name.into();
        self.routes.retain(|(existing, _)| *existing != name);
        self.routes.push((name, route));
    }

    /// Look up a route by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Route> {
        self.routes
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, route)| route)
    }

    /// Iterate `(name, route)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Route)> {
        self.routes.iter().map(|(name, route)| (name.as_str(), route))
    }

    /// Number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
