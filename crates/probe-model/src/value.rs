//! Dynamic values carried by routes and container parameters.

use std::path::PathBuf;

/// Type name reported for closures.
const CLOSURE_TYPE: &str = "Closure";

/// Where a closure was defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Source file path.
    pub file: PathBuf,
    /// 1-based line of the closure definition.
    pub line: u32,
}

/// Reference to an anonymous function.
///
/// The location is best-effort: hosts that cannot locate closures leave it
/// empty and renderers fall back to a generic label.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClosureRef {
    location: Option<SourceLocation>,
}

impl ClosureRef {
    /// Closure without a known definition site.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Closure defined at `file:line`.
    #[must_use]
    pub fn at(file: impl Into<PathBuf>, line: u32) -> Self {
        Self {
            location: Some(SourceLocation {
                file: file.into(),
                line,
            }),
        }
    }

    /// Definition site, if the host could provide one.
    #[must_use]
    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }
}

/// Reference to a live object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    type_name: String,
    invocable: bool,
}

impl ObjectRef {
    /// Plain object of the given runtime type.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            invocable: false,
        }
    }

    /// Object exposing a call operator.
    #[must_use]
    pub fn invocable(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            invocable: true,
        }
    }

    /// Runtime type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Whether the object can be called directly.
    #[must_use]
    pub fn is_invocable(&self) -> bool {
        self.invocable
    }
}

/// A dynamically typed value.
///
/// Maps keep insertion order; renderers that need key order sort on their own.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(Vec<(String, Value)>),
    Object(ObjectRef),
    Closure(ClosureRef),
}

impl Value {
    /// Runtime type name, as reported in error messages.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) | Self::Map(_) => "array",
            Self::Object(object) => object.type_name(),
            Self::Closure(_) => CLOSURE_TYPE,
        }
    }

    /// Borrow the string content, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<ObjectRef> for Value {
    fn from(value: ObjectRef) -> Self {
        Self::Object(value)
    }
}

impl From<ClosureRef> for Value {
    fn from(value: ClosureRef) -> Self {
        Self::Closure(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name_of_scalars() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::from(true).type_name(), "bool");
        assert_eq!(Value::from(3_i64).type_name(), "int");
        assert_eq!(Value::from(1.5_f64).type_name(), "float");
        assert_eq!(Value::from("x").type_name(), "string");
        assert_eq!(Value::List(vec![]).type_name(), "array");
    }

    #[test]
    fn test_type_name_of_object_is_runtime_type() {
        let value = Value::from(ObjectRef::new("App\\Logger"));
        assert_eq!(value.type_name(), "App\\Logger");
    }

    #[test]
    fn test_closure_location() {
        let closure = ClosureRef::at("/srv/app/routes.rs", 12);
        let location = closure.location().unwrap();
        assert_eq!(location.file, PathBuf::from("/srv/app/routes.rs"));
        assert_eq!(location.line, 12);
        assert!(ClosureRef::new().location().is_none());
        assert_eq!(Value::from(closure).type_name(), "Closure");
    }

    #[test]
    fn test_invocable_flag() {
        assert!(ObjectRef::invocable("Handler").is_invocable());
        assert!(!ObjectRef::new("Handler").is_invocable());
    }
}
