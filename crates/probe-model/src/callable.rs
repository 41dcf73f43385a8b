//! Callables as the host registers them.

use crate::value::{ClosureRef, ObjectRef};

/// Left side of a `(owner, member)` callable pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallableOwner {
    /// A live instance; the member is called on it.
    Instance(ObjectRef),
    /// A type name; the member is a static function of that type.
    Type(String),
}

/// A callable in one of the loose shapes a host accepts.
///
/// These shapes overlap (a name may or may not contain `::`, a pair may or
/// may not hold an instance). `probe-describe` normalizes them into one
/// closed record before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawCallable {
    /// `"function"` or `"Type::function"`.
    Name(String),
    /// `(owner, member)`.
    Pair(CallableOwner, String),
    /// Anonymous function.
    Closure(ClosureRef),
    /// Object that may expose a call operator.
    Object(ObjectRef),
}

impl RawCallable {
    /// `(instance, method)` pair.
    #[must_use]
    pub fn bound(instance: ObjectRef, method: impl Into<String>) -> Self {
        Self::Pair(CallableOwner::Instance(instance), method.into())
    }

    /// `(type, function)` pair.
    #[must_use]
    pub fn static_pair(type_name: impl Into<String>, function: impl Into<String>) -> Self {
        Self::Pair(CallableOwner::Type(type_name.into()), function.into())
    }
}

impl From<&str> for RawCallable {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for RawCallable {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<ClosureRef> for RawCallable {
    fn from(closure: ClosureRef) -> Self {
        Self::Closure(closure)
    }
}

impl From<ObjectRef> for RawCallable {
    fn from(object: ObjectRef) -> Self {
        Self::Object(object)
    }
}
