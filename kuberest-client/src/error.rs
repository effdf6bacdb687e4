use http::header::InvalidHeaderValue;
use thiserror::Error;

/// Possible errors when constructing requests
#[derive(Error, Debug)]
pub enum Error {
    /// The action has no table entry and no explicit method was given
    #[error("the action {0:?} has no recognized HTTP method")]
    UnrecognizedAction(String),

    /// Http based error
    #[error("HttpError: {0}")]
    HttpError(#[source] http::Error),

    /// Failed to construct a URI.
    #[error("InvalidUri: {0}")]
    InvalidUri(#[source] http::uri::InvalidUri),

    /// Invalid bearer token
    #[error("invalid bearer token: {0}")]
    InvalidBearerToken(#[source] InvalidHeaderValue),

    /// Invalid basic auth
    #[error("invalid basic auth: {0}")]
    InvalidBasicAuth(#[source] InvalidHeaderValue),
}
