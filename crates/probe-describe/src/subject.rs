//! Describable subjects.

use std::borrow::Cow;
use std::fmt;

use probe_model::{ListenerRegistry, RawCallable, Route, RouteCollection, Value};

use crate::error::DescribeError;

/// Something that can be described.
///
/// Subjects borrow the described state; describing never mutates it.
pub enum Subject<'a> {
    RouteCollection(&'a RouteCollection),
    Route(&'a Route),
    EventListeners(&'a dyn ListenerRegistry),
    Callable(Cow<'a, RawCallable>),
}

impl<'a> Subject<'a> {
    /// Classify a dynamic value.
    ///
    /// Closures and invocable objects are callables. Plain values cannot be
    /// described.
    ///
    /// # Errors
    ///
    /// Returns [`DescribeError::UnsupportedSubject`] naming the value's type.
    pub fn from_value(value: &'a Value) -> Result<Self, DescribeError> {
        match value {
            Value::Closure(closure) => Ok(Self::Callable(Cow::Owned(RawCallable::Closure(
                closure.clone(),
            )))),
            Value::Object(object) if object.is_invocable() => Ok(Self::Callable(Cow::Owned(
                RawCallable::Object(object.clone()),
            ))),
            other => Err(DescribeError::UnsupportedSubject {
                type_name: other.type_name().to_owned(),
            }),
        }
    }

    /// Short kind name, for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RouteCollection(_) => "route-collection",
            Self::Route(_) => "route",
            Self::EventListeners(_) => "event-listeners",
            Self::Callable(_) => "callable",
        }
    }
}

impl fmt::Debug for Subject<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RouteCollection(routes) => f.debug_tuple("RouteCollection").field(routes).finish(),
            Self::Route(route) => f.debug_tuple("Route").field(route).finish(),
            Self::EventListeners(_) => f.write_str("EventListeners(..)"),
            Self::Callable(callable) => f.debug_tuple("Callable").field(callable).finish(),
        }
    }
}

impl<'a> From<&'a RouteCollection> for Subject<'a> {
    fn from(routes: &'a RouteCollection) -> Self {
        Self::RouteCollection(routes)
    }
}

impl<'a> From<&'a Route> for Subject<'a> {
    fn from(route: &'a Route) -> Self {
        Self::Route(route)
    }
}

impl<'a> From<&'a RawCallable> for Subject<'a> {
    fn from(callable: &'a RawCallable) -> Self {
        Self::Callable(Cow::Borrowed(callable))
    }
}
