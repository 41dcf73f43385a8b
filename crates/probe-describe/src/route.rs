//! Extraction of route records.

use std::collections::BTreeMap;

use probe_model::{Route, Value};

/// Sentinel for an unrestricted host, scheme or method.
pub const ANY: &str = "ANY";
/// Sentinel for empty defaults or options.
pub const NONE: &str = "NONE";
/// Sentinel for empty requirements.
pub const NO_CUSTOM: &str = "NO CUSTOM";

/// Everything a renderer shows about one route.
///
/// Mappings are key-sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRecord {
    pub path: String,
    pub path_regex: String,
    pub host: Option<String>,
    pub host_regex: Option<String>,
    pub schemes: Vec<String>,
    pub methods: Vec<String>,
    pub class: String,
    pub defaults: BTreeMap<String, Value>,
    pub requirements: BTreeMap<String, String>,
    pub options: BTreeMap<String, Value>,
}

impl RouteRecord {
    /// Host pattern, or [`ANY`].
    #[must_use]
    pub fn host_or_any(&self) -> &str {
        self.host.as_deref().unwrap_or(ANY)
    }

    /// Host regex, or an empty string.
    #[must_use]
    pub fn host_regex_or_empty(&self) -> &str {
        self.host_regex.as_deref().unwrap_or("")
    }

    /// Schemes joined by `|`, or [`ANY`].
    #[must_use]
    pub fn scheme(&self) -> String {
        join_or_any(&self.schemes)
    }

    /// Methods joined by `|`, or [`ANY`].
    #[must_use]
    pub fn method(&self) -> String {
        join_or_any(&self.methods)
    }
}

fn join_or_any(items: &[String]) -> String {
    if items.is_empty() {
        ANY.to_owned()
    } else {
        items.join("|")
    }
}

/// Extract the record of `route`.
#[must_use]
pub fn extract(route: &Route) -> RouteRecord {
    let compiled = route.compiled();
    RouteRecord {
        path: route.path().to_owned(),
        path_regex: compiled.path_regex().to_owned(),
        host: route.host().map(str::to_owned),
        host_regex: compiled.host_regex().map(str::to_owned),
        schemes: route.schemes().to_vec(),
        methods: route.methods().to_vec(),
        class: route.class().to_owned(),
        defaults: route.defaults().iter().cloned().collect(),
        requirements: route.requirements().iter().cloned().collect(),
        options: route.options().iter().cloned().collect(),
    }
}
