//! Authentication configuration consumed by the request factory.
//!
//! How these values get here (kubeconfig files, in-cluster service accounts,
//! environment) is an external concern; this module is the passive holder the
//! factory reads from. The factory never mutates it.
use secrecy::SecretString;

/// Which authentication semantic applies.
///
/// Exactly one applies at a time; credential fields outside the selected
/// semantic are ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthType {
    /// No Authorization header is written
    #[default]
    None,
    /// `Authorization: Bearer <token>`, skipped when the token is empty
    Token,
    /// `Authorization: Basic <base64(username:password)>`, always written
    Basic,
}

/// Credentials for talking to the API server.
#[derive(Clone, Debug, Default)]
pub struct AuthConfig {
    /// Selects which credential fields apply
    pub auth_type: AuthType,
    /// Bearer token, used when `auth_type` is [`AuthType::Token`]
    pub token: Option<SecretString>,
    /// Username, used when `auth_type` is [`AuthType::Basic`]
    pub username: Option<String>,
    /// Password, used when `auth_type` is [`AuthType::Basic`]
    pub password: Option<SecretString>,
}

impl AuthConfig {
    /// Anonymous access
    pub fn none() -> Self {
        Self::default()
    }

    /// Bearer token auth
    pub fn token(token: impl Into<String>) -> Self {
        Self {
            auth_type: AuthType::Token,
            token: Some(SecretString::from(token.into())),
            ..Self::default()
        }
    }

    /// Basic auth
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            auth_type: AuthType::Basic,
            username: Some(username.into()),
            password: Some(SecretString::from(password.into())),
            ..Self::default()
        }
    }
}
