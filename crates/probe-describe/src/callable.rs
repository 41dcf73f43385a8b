//! Normalization of raw callables into one closed record.

use probe_model::{CallableOwner, RawCallable};

use crate::error::DescribeError;

/// Prefix marking a call that resolves against the parent type.
const PARENT_PREFIX: &str = "parent::";

/// Kind of a normalized callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallableKind {
    Function,
    StaticMethod,
    BoundMethod,
    Closure,
    Invocable,
}

impl CallableKind {
    /// Descriptive kind name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::StaticMethod => "static-method",
            Self::BoundMethod => "bound-method",
            Self::Closure => "closure",
            Self::Invocable => "invocable",
        }
    }

    /// Value of the `type` field in structured output.
    #[must_use]
    pub fn wire_type(self) -> &'static str {
        match self {
            Self::Function | Self::StaticMethod | Self::BoundMethod => "function",
            Self::Closure => "closure",
            Self::Invocable => "object",
        }
    }
}

/// A callable in normalized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallableRecord {
    /// Free function.
    Function { name: String },
    /// Function of a type, possibly resolved against its parent type.
    StaticMethod {
        class: String,
        name: String,
        parent: bool,
    },
    /// Method called on an instance.
    BoundMethod { class: String, name: String },
    /// Anonymous function.
    Closure,
    /// Object called through its call operator.
    Invocable { class: String },
}

impl CallableRecord {
    #[must_use]
    pub fn kind(&self) -> CallableKind {
        match self {
            Self::Function { .. } => CallableKind::Function,
            Self::StaticMethod { .. } => CallableKind::StaticMethod,
            Self::BoundMethod { .. } => CallableKind::BoundMethod,
            Self::Closure => CallableKind::Closure,
            Self::Invocable { .. } => CallableKind::Invocable,
        }
    }

    /// Function or method name. Invocables report their type name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Function { name }
            | Self::StaticMethod { name, .. }
            | Self::BoundMethod { name, .. } => Some(name),
            Self::Invocable { class } => Some(class),
            Self::Closure => None,
        }
    }

    /// Type the callable belongs to.
    #[must_use]
    pub fn owner_type(&self) -> Option<&str> {
        match self {
            Self::StaticMethod { class, .. }
            | Self::BoundMethod { class, .. }
            | Self::Invocable { class } => Some(class),
            Self::Function { .. } | Self::Closure => None,
        }
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        matches!(self, Self::StaticMethod { .. })
    }

    #[must_use]
    pub fn is_parent_call(&self) -> bool {
        matches!(self, Self::StaticMethod { parent: true, .. })
    }
}

/// Normalize a raw callable.
///
/// # Errors
///
/// Returns [`DescribeError::NotDescribable`] for objects without a call
/// operator.
pub fn normalize(callable: &RawCallable) -> Result<CallableRecord, DescribeError> {
    let record = match callable {
        RawCallable::Pair(owner, member) => {
            let class = match owner {
                CallableOwner::Instance(object) => object.type_name().to_owned(),
                CallableOwner::Type(name) => name.clone(),
            };
            if let Some(name) = member.strip_prefix(PARENT_PREFIX) {
                CallableRecord::StaticMethod {
                    class,
                    name: name.to_owned(),
                    parent: true,
                }
            } else if matches!(owner, CallableOwner::Instance(_)) {
                CallableRecord::BoundMethod {
                    class,
                    name: member.clone(),
                }
            } else {
                CallableRecord::StaticMethod {
                    class,
                    name: member.clone(),
                    parent: false,
                }
            }
        }
        RawCallable::Name(name) => match name.split_once("::") {
            Some((class, name)) => CallableRecord::StaticMethod {
                class: class.to_owned(),
                name: name.to_owned(),
                parent: false,
            },
            None => CallableRecord::Function { name: name.clone() },
        },
        RawCallable::Closure(_) => CallableRecord::Closure,
        RawCallable::Object(object) if object.is_invocable() => CallableRecord::Invocable {
            class: object.type_name().to_owned(),
        },
        RawCallable::Object(_) => return Err(DescribeError::NotDescribable),
    };
    Ok(record)
}
