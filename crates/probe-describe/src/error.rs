//! Error types for describing subjects.

/// Error raised while describing a subject.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DescribeError {
    /// The value is not one of the describable subject kinds.
    #[error("Object of type \"{type_name}\" is not describable.")]
    UnsupportedSubject {
        /// Runtime type name of the rejected value.
        type_name: String,
    },

    /// A callable matched none of the recognized callable shapes.
    #[error("Callable is not describable.")]
    NotDescribable,

    /// No renderer is registered for the requested format.
    #[error("Unsupported format \"{0}\".")]
    UnsupportedFormat(String),

    /// Writing to the sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML serialization failed.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
