/// Request authentication for Axum
///
/// This module provides the building blocks for Bearer-token authentication:
/// header parsing, token validation, and the stale-token guard that
/// re-resolves the subject against the users table on every request. The API
/// crate wires [`authenticate`] into an `axum::middleware::from_fn_with_state`
/// layer and inserts the resulting [`AuthContext`] into request extensions.
///
/// # Request Extensions
///
/// After successful authentication the request carries:
/// - `AuthContext`: user_id, email, and role of the authenticated principal
///
/// The context is built from the freshly loaded user row, not the token
/// claims, so role changes apply to outstanding tokens immediately.
///
/// # Example
///
/// ```no_run
/// use axum::http::HeaderMap;
/// use opsdesk_shared::auth::middleware::authenticate;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, headers: HeaderMap) -> Result<(), Box<dyn std::error::Error>> {
/// let auth = authenticate(&pool, "jwt-secret", &headers).await?;
/// println!("Authenticated {} as {}", auth.email, auth.role);
/// # Ok(())
/// # }
/// ```
use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::jwt::{validate_token, JwtError};
use crate::models::user::{User, UserRole};

/// Authenticated principal added to request extensions
///
/// Handlers extract it with Axum's `Extension` extractor.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use opsdesk_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {} ({})", auth.email, auth.role)
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Email address of the authenticated user
    pub email: String,

    /// Current role, read from storage at request time
    pub role: UserRole,
}

impl AuthContext {
    /// Builds the principal from a freshly loaded user row
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Error type for request authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Authorization header is not a Bearer token
    #[error("{0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("{0}")]
    InvalidToken(String),

    /// Token subject no longer exists
    #[error("User not found or token is invalid")]
    UnknownUser,

    /// Database error during principal lookup
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials
            | AuthError::InvalidFormat(_)
            | AuthError::InvalidToken(_)
            | AuthError::UnknownUser => {
                (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
            }
            AuthError::DatabaseError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Extracts the Bearer token from the Authorization header
///
/// # Errors
///
/// Returns `AuthError::MissingCredentials` if the header is absent and
/// `AuthError::InvalidFormat` if the scheme is not Bearer.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))
}

/// Authenticates a request and resolves its principal
///
/// Steps, in order:
/// 1. Extract the Bearer token from the Authorization header
/// 2. Validate signature, expiry, nbf, and issuer
/// 3. Re-resolve the subject against the users table (stale-token guard)
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `secret` - JWT secret for validation
/// * `headers` - Request headers
///
/// # Returns
///
/// The authenticated principal, built from the live user row
///
/// # Errors
///
/// Every failure before step 3 maps to 401; a user that no longer exists is
/// also 401 ("User not found or token is invalid"). Database failures map
/// to 500.
pub async fn authenticate(
    pool: &PgPool,
    secret: &str,
    headers: &HeaderMap,
) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers)?;

    let claims = validate_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer { .. } => AuthError::InvalidToken("Invalid issuer".to_string()),
        _ => AuthError::InvalidToken(format!("Invalid token: {}", e)),
    })?;

    // The token may outlive the account it was issued for
    let user = User::find_by_id(pool, claims.sub)
        .await
        .map_err(|e| AuthError::DatabaseError(format!("Database error: {}", e)))?
        .ok_or(AuthError::UnknownUser)?;

    Ok(AuthContext::from_user(&user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::Utc;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=65536,t=3,p=4$c2FsdA$aGFzaA".to_string(),
            role: UserRole::Employee,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_auth_context_from_user() {
        let user = sample_user();
        let context = AuthContext::from_user(&user);

        assert_eq!(context.user_id, user.id);
        assert_eq!(context.email, "jane@example.com");
        assert_eq!(context.role, UserRole::Employee);
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let headers = HeaderMap::new();
        let result = bearer_token(&headers);
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );

        let result = bearer_token(&headers);
        assert!(matches!(result, Err(AuthError::InvalidFormat(_))));
    }

    #[test]
    fn test_bearer_token_extracts_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );

        let token = bearer_token(&headers).expect("Should extract token");
        assert_eq!(token, "abc.def.ghi");
    }

    #[test]
    fn test_auth_error_into_response() {
        let err = AuthError::MissingCredentials;
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Non-Bearer schemes are an authentication failure, not a client
        // syntax error
        let err = AuthError::InvalidFormat("Expected Bearer token".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let err = AuthError::UnknownUser;
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let err = AuthError::DatabaseError("test".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
