//! Current-user resolution from inbound requests.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::{HeaderMap, header::AUTHORIZATION, request::Parts};
use tracing::debug;

use super::{Claims, Role, TokenCodec};

/// Extract a bearer token from an `Authorization` header value.
///
/// The `Bearer ` prefix is matched case-sensitively; anything else is
/// treated as no token at all.
pub fn bearer_token_from_header(header_value: &str) -> Option<&str> {
    let token = header_value.strip_prefix("Bearer ")?;
    if token.is_empty() { None } else { Some(token) }
}

/// Authentication state shared across handlers.
#[derive(Debug, Clone)]
pub struct AuthState {
    codec: Arc<TokenCodec>,
}

impl AuthState {
    /// Create new auth state around a token codec.
    pub fn new(codec: TokenCodec) -> Self {
        Self {
            codec: Arc::new(codec),
        }
    }

    /// The token codec (used by the login endpoint to issue tokens).
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Resolve the current user from request headers.
    ///
    /// Returns `None` for a missing header, a malformed prefix, or any
    /// decode failure. Never errors: absence of a valid user is always
    /// representable, and every caller must branch on it.
    pub fn resolve(&self, headers: &HeaderMap) -> Option<CurrentUser> {
        let header_value = headers.get(AUTHORIZATION)?.to_str().ok()?;
        let token = bearer_token_from_header(header_value)?;

        match self.codec.decode(token) {
            Ok(claims) => Some(CurrentUser::from_claims(&claims)),
            Err(err) => {
                debug!("treating request as anonymous: {}", err);
                None
            }
        }
    }
}

/// Authenticated user resolved from a bearer token.
///
/// Constructed fresh per request from the decoded claims, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// User ID.
    pub id: i64,
    /// Username.
    pub username: String,
    /// Mapped role.
    pub role: Role,
}

impl CurrentUser {
    /// Build a current user from decoded claims, mapping the raw role
    /// code through the closed role enumeration.
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            id: claims.id,
            username: claims.username.clone(),
            role: claims.mapped_role(),
        }
    }

    /// Check if the user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Extractor yielding the current user, or `None` for anonymous requests.
///
/// Extraction is infallible by design: endpoints decide per-operation
/// whether anonymity is acceptable.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for MaybeUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthState::from_ref(state);
        Ok(MaybeUser(auth.resolve(&parts.headers)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn test_auth_state() -> AuthState {
        AuthState::new(TokenCodec::new(
            "test-secret-for-unit-tests-minimum-32-chars-long",
            3600,
        ))
    }

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_from_header_valid() {
        assert_eq!(
            bearer_token_from_header("Bearer abc.def.ghi"),
            Some("abc.def.ghi")
        );
    }

    #[test]
    fn test_bearer_token_from_header_invalid() {
        let cases = [
            "",
            "Bearer",
            "Bearer ",
            "bearer token",
            "BEARER token",
            "Token something",
            "Basic dXNlcjpwYXNz",
        ];

        for case in cases {
            assert!(
                bearer_token_from_header(case).is_none(),
                "{case:?} should yield no token"
            );
        }
    }

    #[test]
    fn test_resolve_no_header() {
        let auth = test_auth_state();
        assert_eq!(auth.resolve(&HeaderMap::new()), None);
    }

    #[test]
    fn test_resolve_malformed_prefix() {
        let auth = test_auth_state();
        let token = auth
            .codec()
            .encode(1, "john.doe", None, Role::Standard)
            .unwrap();

        // Valid token, wrong scheme casing: still anonymous.
        let headers = headers_with_auth(&format!("bearer {token}"));
        assert_eq!(auth.resolve(&headers), None);
    }

    #[test]
    fn test_resolve_invalid_token() {
        let auth = test_auth_state();
        let headers = headers_with_auth("Bearer not-a-real-token");
        assert_eq!(auth.resolve(&headers), None);
    }

    #[test]
    fn test_resolve_valid_token() {
        let auth = test_auth_state();
        let token = auth
            .codec()
            .encode(7, "john.doe", Some("john.doe@example.com"), Role::Admin)
            .unwrap();

        let headers = headers_with_auth(&format!("Bearer {token}"));
        let user = auth.resolve(&headers).unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.username, "john.doe");
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let auth = test_auth_state();
        let token = auth
            .codec()
            .encode(3, "jane", None, Role::Standard)
            .unwrap();
        let headers = headers_with_auth(&format!("Bearer {token}"));

        let first = auth.resolve(&headers);
        let second = auth.resolve(&headers);
        assert_eq!(first, second);
        assert!(first.is_some());
    }

    #[test]
    fn test_unknown_role_code_maps_to_standard() {
        let claims = Claims {
            id: 4,
            username: "mystery".to_string(),
            email: None,
            role: 99,
            exp: 0,
            iat: None,
        };
        let user = CurrentUser::from_claims(&claims);
        assert_eq!(user.role, Role::Standard);
        assert!(!user.is_admin());
    }
}
