//! Types and traits for mapping Kubernetes-style API data into typed models
//!
//! This crate is the client-less half of `kuberest`: per-type field metadata,
//! the recursive model mapper that consumes it, and the watch event envelope.
//! The request-building half lives in `kuberest-client`, which re-exports
//! everything here under `kuberest_client::core`.
#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod gvk;
pub use gvk::{GroupVersion, GroupVersionKind};

pub mod metadata;
pub use metadata::{FieldDescriptor, FieldKind, MetadataCache, MetadataProvider, TypeId, TypeMetadata};

pub mod mapper;
pub use mapper::ModelMapper;

pub mod object;
pub use object::{TypedObject, TypedValue};

pub mod watch;
pub use watch::{EventType, WatchEvent};

mod error;
pub use error::Error;

/// Convient alias for `Result<T, Error>`
pub type Result<T, E = Error> = std::result::Result<T, E>;
