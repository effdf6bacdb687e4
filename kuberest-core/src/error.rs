use thiserror::Error;

use crate::{
    gvk::{GroupVersionKind, ParseGroupVersionError},
    metadata::TypeId,
};

/// Possible errors when mapping raw data into typed models
#[derive(Error, Debug)]
pub enum Error {
    /// The provider has no metadata for the requested type
    #[error("no metadata registered for type {0}")]
    UnknownType(TypeId),

    /// A watch event payload's (apiVersion, kind) pair is not in the catalog
    #[error("no model resolves {}/{}", .0.api_version(), .0.kind)]
    UnresolvedKind(GroupVersionKind),

    /// A date-time field's raw value could not be parsed
    #[error("malformed date-time: {0}")]
    MalformedDateTime(#[source] chrono::ParseError),

    /// A raw value's shape disagrees with the field kind in metadata
    #[error("field {field:?} expected {expected}, got {found}")]
    ShapeMismatch {
        /// The field being mapped
        field: &'static str,
        /// The shape the field kind requires
        expected: &'static str,
        /// The shape found in the raw data
        found: &'static str,
    },

    /// A watch event payload lacks a key needed to resolve its type
    #[error("watch event is missing the {0:?} discriminant")]
    MissingDiscriminant(&'static str),

    /// A watch event carries a discriminant outside the known set
    #[error("unrecognized watch event type {0:?}")]
    UnknownEventType(String),

    /// A payload's apiVersion string could not be split into group/version
    #[error("invalid apiVersion: {0}")]
    ParseGroupVersion(#[source] ParseGroupVersionError),

    /// Model nesting went past the mapper's recursion cap
    #[error("model nesting exceeded {0} levels")]
    DepthLimitExceeded(usize),
}
