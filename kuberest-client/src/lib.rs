//! Request construction for Kubernetes-style resource APIs
//!
//! Builds fully-formed, authenticated `http::Request`s from logical resource
//! actions (`list`, `get`, `watch`, `patch`, …) and a target URI. Transports
//! that actually perform I/O, and the parsing of on-disk configuration into
//! [`AuthConfig`], are external collaborators.
#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub use config::{AuthConfig, AuthType};

pub mod request;
pub use request::{RequestFactory, RequestOptions};

mod error;
pub use error::Error;

/// Convient alias for `Result<T, Error>`
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Re-exports from `kuberest-core`
pub mod core {
    pub use kuberest_core::*;
}
