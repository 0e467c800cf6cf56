//! Error types for strict element parsing.
//!
//! Message and event parsing never fails as a whole; these errors surface
//! only from the strict entry points (single element parsing, outbound
//! chains) and are recorded inside a message when a chain is discarded.

use thiserror::Error;

/// Errors that can occur while parsing a single wire element.
#[derive(Debug, Error)]
pub enum ElementError {
    /// The element is not a JSON object.
    #[error("element is not an object")]
    NotAnObject,

    /// An outbound chain is not a JSON array.
    #[error("chain is not an array")]
    NotAnArray,

    /// The element has no `type` key.
    #[error("element has no `type` discriminant")]
    MissingType,

    /// The `type` field names no known element variant.
    #[error("unknown element discriminant '{0}'")]
    UnknownDiscriminant(String),

    /// A known element variant carried fields of the wrong shape.
    #[error("malformed '{tag}' element: {source}")]
    Malformed {
        /// The discriminant of the malformed element.
        tag: String,
        /// The underlying deserialization failure.
        #[source]
        source: serde_json::Error,
    },
}

impl ElementError {
    /// Creates a malformed element error.
    pub fn malformed(tag: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Malformed {
            tag: tag.into(),
            source,
        }
    }

    /// Returns true if this error only means the discriminant is not known.
    ///
    /// Unknown discriminants are a data condition during chain assembly,
    /// every other variant is a structural failure.
    pub fn is_unknown_discriminant(&self) -> bool {
        matches!(self, Self::UnknownDiscriminant(_))
    }
}

/// Result type for element parsing.
pub type ElementResult<T> = Result<T, ElementError>;
