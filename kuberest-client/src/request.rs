//! A request factory for Kubernetes-style resource APIs
//!
//! Turns a logical action plus target URI into a ready-to-send
//! `http::Request`, with authentication injected per [`AuthConfig`]. Pure
//! construction; no I/O and no retries happen here.
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use http::{
    header::{HeaderMap, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method, Request, Uri,
};
use secrecy::ExposeSecret;

use crate::{
    config::{AuthConfig, AuthType},
    Error, Result,
};

/// Default mime type for request bodies
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// The fixed action table from API conventions.
///
/// Only an explicit method on [`RequestOptions`] overrides it, per call.
fn method_for(action: &str) -> Option<Method> {
    match action {
        "post" => Some(Method::POST),
        "get" | "get-status" | "connect" | "list" | "watch" | "watchlist" => Some(Method::GET),
        "patch" | "patch-status" => Some(Method::PATCH),
        "put" | "put-status" => Some(Method::PUT),
        "delete" | "deletecollection" => Some(Method::DELETE),
        _ => None,
    }
}

/// Optional parts of a request under construction.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    /// Value for the `Accept` header
    pub accept: Option<String>,
    /// Request payload; an empty body attaches nothing
    pub body: Option<Vec<u8>>,
    /// Value for `Content-Type` when a body is attached
    pub content_type: Option<String>,
    /// Explicit HTTP method, bypassing the action table
    pub method: Option<Method>,
}

impl RequestOptions {
    /// Set the `Accept` header
    #[must_use]
    pub fn accept(mut self, accept: &str) -> Self {
        self.accept = Some(accept.to_string());
        self
    }

    /// Attach a payload
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the payload's `Content-Type`, defaulting to [`CONTENT_TYPE_JSON`]
    #[must_use]
    pub fn content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }

    /// Force an HTTP method instead of consulting the action table
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }
}

/// Builds authenticated `http::Request`s from logical actions.
///
/// Stateless apart from the externally-owned [`AuthConfig`] it reads; safe to
/// share across threads.
#[derive(Clone, Debug)]
pub struct RequestFactory {
    auth: AuthConfig,
}

impl RequestFactory {
    /// Construct a factory reading credentials from `auth`
    pub fn new(auth: AuthConfig) -> Self {
        Self { auth }
    }

    /// Build a request for a logical action against a URI
    ///
    /// The method comes from `options.method` if set, otherwise from the
    /// action table; an action outside the table with no explicit method is
    /// [`Error::UnrecognizedAction`] and nothing is produced.
    pub fn build(&self, uri: &str, action: &str, options: RequestOptions) -> Result<Request<Vec<u8>>> {
        let method = options
            .method
            .or_else(|| method_for(action))
            .ok_or_else(|| Error::UnrecognizedAction(action.to_string()))?;

        let mut builder = Request::builder().method(method.clone()).uri(uri);
        let body = options.body.unwrap_or_default();
        if !body.is_empty() {
            builder = builder.header(
                CONTENT_TYPE,
                options.content_type.as_deref().unwrap_or(CONTENT_TYPE_JSON),
            );
        }
        if let Some(accept) = &options.accept {
            builder = builder.header(ACCEPT, accept);
        }
        let mut request = builder.body(body).map_err(Error::HttpError)?;
        self.apply_auth(request.headers_mut())?;
        tracing::debug!(%method, uri, "built request");
        Ok(request)
    }

    /// Re-target an already-built request at a different URI
    ///
    /// Headers and body are kept as-is; the auth policy is re-applied so a
    /// stale `Authorization` header is overwritten, never duplicated. Used
    /// when a request must be redirected, e.g. for pagination continuation.
    pub fn adapt(&self, uri: &str, request: Request<Vec<u8>>) -> Result<Request<Vec<u8>>> {
        let (mut parts, body) = request.into_parts();
        parts.uri = uri.parse::<Uri>().map_err(Error::InvalidUri)?;
        let mut request = Request::from_parts(parts, body);
        self.apply_auth(request.headers_mut())?;
        Ok(request)
    }

    /// Write the `Authorization` header the configured auth semantic calls for.
    ///
    /// At most one header write; `HeaderMap::insert` replaces any existing
    /// value, so re-application is idempotent.
    fn apply_auth(&self, headers: &mut HeaderMap) -> Result<()> {
        let value = match self.auth.auth_type {
            AuthType::Token => match &self.auth.token {
                Some(token) if !token.expose_secret().is_empty() => {
                    Some(
                        HeaderValue::try_from(format!("Bearer {}", token.expose_secret()))
                            .map_err(Error::InvalidBearerToken)?,
                    )
                }
                // an empty or absent token writes nothing; not an error
                _ => None,
            },
            AuthType::Basic => {
                let username = self.auth.username.as_deref().unwrap_or_default();
                let password = self
                    .auth
                    .password
                    .as_ref()
                    .map(ExposeSecret::expose_secret)
                    .unwrap_or_default();
                let encoded = BASE64_STANDARD.encode(format!("{username}:{password}"));
                Some(HeaderValue::try_from(format!("Basic {encoded}")).map_err(Error::InvalidBasicAuth)?)
            }
            AuthType::None => None,
        };
        if let Some(mut value) = value {
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anonymous() -> RequestFactory {
        RequestFactory::new(AuthConfig::none())
    }

    #[test]
    fn action_table_maps_every_action() {
        let table = [
            ("post", Method::POST),
            ("get", Method::GET),
            ("get-status", Method::GET),
            ("patch", Method::PATCH),
            ("patch-status", Method::PATCH),
            ("put", Method::PUT),
            ("put-status", Method::PUT),
            ("connect", Method::GET),
            ("delete", Method::DELETE),
            ("deletecollection", Method::DELETE),
            ("list", Method::GET),
            ("watch", Method::GET),
            ("watchlist", Method::GET),
        ];
        let factory = anonymous();
        for (action, method) in table {
            let req = factory
                .build("/api/v1/pods", action, RequestOptions::default())
                .unwrap();
            assert_eq!(req.method(), method, "action {action}");
            assert_eq!(req.uri(), "/api/v1/pods");
        }
    }

    #[test]
    fn explicit_method_always_wins() {
        let factory = anonymous();
        let req = factory
            .build("/api/v1/pods", "list", RequestOptions::default().method(Method::POST))
            .unwrap();
        assert_eq!(req.method(), Method::POST);

        // even for actions outside the table
        let req = factory
            .build(
                "/api/v1/pods",
                "no-such-action",
                RequestOptions::default().method(Method::HEAD),
            )
            .unwrap();
        assert_eq!(req.method(), Method::HEAD);
    }

    #[test]
    fn unknown_action_without_method_fails() {
        let err = anonymous()
            .build("/api/v1/pods", "no-such-action", RequestOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::UnrecognizedAction(action) if action == "no-such-action"));
    }

    #[test]
    fn body_gets_a_default_content_type() {
        let req = anonymous()
            .build("/api/v1/pods", "post", RequestOptions::default().body(r#"{"a":1}"#))
            .unwrap();
        assert_eq!(req.headers()[CONTENT_TYPE], CONTENT_TYPE_JSON);
        assert_eq!(req.body(), br#"{"a":1}"#);
    }

    #[test]
    fn explicit_content_type_is_kept() {
        let req = anonymous()
            .build(
                "/api/v1/pods/web-0",
                "patch",
                RequestOptions::default()
                    .body(r#"{"op":"remove","path":"/a"}"#)
                    .content_type("application/json-patch+json"),
            )
            .unwrap();
        assert_eq!(req.headers()[CONTENT_TYPE], "application/json-patch+json");
    }

    #[test]
    fn empty_body_attaches_nothing() {
        let req = anonymous()
            .build("/api/v1/pods", "post", RequestOptions::default().body(""))
            .unwrap();
        assert!(req.headers().get(CONTENT_TYPE).is_none());
        assert!(req.body().is_empty());
    }

    #[test]
    fn accept_header_is_set_when_given() {
        let req = anonymous()
            .build(
                "/api/v1/pods",
                "list",
                RequestOptions::default().accept("application/json;stream=watch"),
            )
            .unwrap();
        assert_eq!(req.headers()[ACCEPT], "application/json;stream=watch");
    }

    #[test]
    fn token_auth_sets_bearer_header() {
        let factory = RequestFactory::new(AuthConfig::token("abc"));
        let req = factory
            .build("/api/v1/pods", "get", RequestOptions::default())
            .unwrap();
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer abc");
        assert!(req.headers()[AUTHORIZATION].is_sensitive());
    }

    #[test]
    fn empty_token_writes_no_header() {
        let factory = RequestFactory::new(AuthConfig::token(""));
        let req = factory
            .build("/api/v1/pods", "get", RequestOptions::default())
            .unwrap();
        assert!(req.headers().get(AUTHORIZATION).is_none());

        let absent = RequestFactory::new(AuthConfig {
            auth_type: AuthType::Token,
            ..AuthConfig::default()
        });
        let req = absent
            .build("/api/v1/pods", "get", RequestOptions::default())
            .unwrap();
        assert!(req.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn basic_auth_sets_encoded_header() {
        let factory = RequestFactory::new(AuthConfig::basic("u", "p"));
        let req = factory
            .build("/api/v1/pods", "get", RequestOptions::default())
            .unwrap();
        // base64("u:p")
        assert_eq!(req.headers()[AUTHORIZATION], "Basic dTpw");
    }

    #[test]
    fn basic_auth_is_written_even_for_empty_credentials() {
        let factory = RequestFactory::new(AuthConfig::basic("", ""));
        let req = factory
            .build("/api/v1/pods", "get", RequestOptions::default())
            .unwrap();
        // base64(":")
        assert_eq!(req.headers()[AUTHORIZATION], "Basic Og==");
    }

    #[test]
    fn none_auth_writes_no_header() {
        let req = anonymous()
            .build("/api/v1/pods", "get", RequestOptions::default())
            .unwrap();
        assert!(req.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn adapt_swaps_uri_and_keeps_everything_else() {
        let factory = RequestFactory::new(AuthConfig::token("abc"));
        let req = factory
            .build(
                "/api/v1/pods",
                "list",
                RequestOptions::default().accept(CONTENT_TYPE_JSON),
            )
            .unwrap();
        let req = factory.adapt("/api/v1/pods?continue=tok123", req).unwrap();
        assert_eq!(req.uri(), "/api/v1/pods?continue=tok123");
        assert_eq!(req.method(), Method::GET);
        assert_eq!(req.headers()[ACCEPT], CONTENT_TYPE_JSON);
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer abc");
    }

    #[test]
    fn adapt_overwrites_a_stale_authorization_header() {
        let stale = Request::builder()
            .method(Method::GET)
            .uri("/api/v1/pods")
            .header(AUTHORIZATION, "Bearer stale")
            .body(Vec::new())
            .unwrap();
        let factory = RequestFactory::new(AuthConfig::token("fresh"));
        let req = factory.adapt("/api/v1/pods", stale).unwrap();
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer fresh");
        assert_eq!(req.headers().get_all(AUTHORIZATION).iter().count(), 1);
    }

    #[test]
    fn adapt_rejects_a_bad_uri() {
        let req = anonymous()
            .build("/api/v1/pods", "list", RequestOptions::default())
            .unwrap();
        let err = anonymous().adapt("http://[bad uri", req).unwrap_err();
        assert!(matches!(err, Error::InvalidUri(_)));
    }

    #[test]
    fn post_with_body_and_token_end_to_end() {
        let factory = RequestFactory::new(AuthConfig::token("abc"));
        let req = factory
            .build("/api/v1/pods", "post", RequestOptions::default().body(r#"{"a":1}"#))
            .unwrap();
        assert_eq!(req.method(), Method::POST);
        assert_eq!(req.headers()[CONTENT_TYPE], CONTENT_TYPE_JSON);
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer abc");
        assert_eq!(req.body(), br#"{"a":1}"#);
    }
}
