use axum::http::{header::AUTHORIZATION, HeaderMap};
use thiserror::Error;

/// Paths that skip authentication when debug mode is on. Prefix match.
pub const NO_AUTH_DEBUG_ENDPOINTS: &[&str] = &["/docs", "/openapi.json"];

/// The one principal this API knows about.
pub const API_CLIENT: &str = "api_client";

pub const SCOPE_AUTHENTICATED: &str = "authenticated";
pub const SCOPE_DEBUG: &str = "debug";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("no `Authorization` header in request.")]
    MissingHeader,

    #[error("invalid credentials.")]
    InvalidCredentials,
}

/// What a request was granted. Inserted into the request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: &'static str,
    pub scopes: Vec<&'static str>,
}

impl Credentials {
    fn with_scope(scope: &'static str) -> Self {
        Self {
            username: API_CLIENT,
            scopes: vec![scope],
        }
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|granted| *granted == scope)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    Debug(Credentials),
    Authenticated(Credentials),
    Rejected(AuthError),
}

impl AuthResult {
    pub fn into_result(self) -> Result<Credentials, AuthError> {
        match self {
            AuthResult::Debug(credentials) | AuthResult::Authenticated(credentials) => Ok(credentials),
            AuthResult::Rejected(err) => Err(err),
        }
    }
}

/// Shared-secret bearer token check, configured once at startup.
pub struct TokenAuthentication {
    expected_auth_header: String,
    debug: bool,
}

impl TokenAuthentication {
    pub fn new(token: &str, debug: bool) -> Self {
        Self {
            expected_auth_header: format!("Bearer {token}"),
            debug,
        }
    }

    /// Decide whether a request may proceed. Never touches the network.
    pub fn authenticate(&self, path: &str, headers: &HeaderMap) -> AuthResult {
        if self.debug
            && NO_AUTH_DEBUG_ENDPOINTS
                .iter()
                .any(|endpoint| path.starts_with(endpoint))
        {
            return AuthResult::Debug(Credentials::with_scope(SCOPE_DEBUG));
        }

        let header = match headers.get(AUTHORIZATION) {
            Some(value) if !value.is_empty() => value,
            _ => return AuthResult::Rejected(AuthError::MissingHeader),
        };

        // Byte comparison, so non-UTF-8 values simply fail to match.
        if header.as_bytes() != self.expected_auth_header.as_bytes() {
            return AuthResult::Rejected(AuthError::InvalidCredentials);
        }

        AuthResult::Authenticated(Credentials::with_scope(SCOPE_AUTHENTICATED))
    }
}
