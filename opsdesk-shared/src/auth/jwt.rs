/// JWT token generation and validation module
///
/// This module provides JWT (JSON Web Token) functionality for user
/// authentication. Tokens are signed using HS256 (HMAC-SHA256) and carry a
/// fixed-shape claims record: user ID, email, and role.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: Configurable (default 24 hours)
/// - **Validation**: Signature, expiration, nbf, and issuer checks
/// - **Secret Management**: Secrets should be at least 32 bytes (256 bits)
///
/// # Example
///
/// ```
/// use opsdesk_shared::auth::jwt::{create_token, validate_token, Claims};
/// use opsdesk_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
///
/// let claims = Claims::new(user_id, "admin@example.com".to_string(), UserRole::Admin);
/// let token = create_token(&claims, "your-secret-key")?;
///
/// let validated = validate_token(&token, "your-secret-key")?;
/// assert_eq!(validated.sub, user_id);
/// assert_eq!(validated.role, UserRole::Admin);
/// # Ok(())
/// # }
/// ```
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserRole;

/// Issuer claim stamped into and required of every token
pub const ISSUER: &str = "opsdesk";

/// Default token lifetime in hours
pub const DEFAULT_EXPIRY_HOURS: i64 = 24;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid token format
    #[error("Invalid token format: {0}")]
    InvalidFormat(String),

    /// Invalid issuer
    #[error("Invalid issuer: expected {expected}, got {actual}")]
    InvalidIssuer { expected: String, actual: String },
}

/// JWT claims structure
///
/// Contains standard JWT claims plus the OpsDesk principal claims.
///
/// # Standard Claims
///
/// - `sub`: Subject (user ID)
/// - `iss`: Issuer (always "opsdesk")
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp
/// - `nbf`: Not before timestamp
///
/// # Custom Claims
///
/// - `email`: User's email at issue time
/// - `role`: User's role at issue time (authorization re-reads the live role
///   from storage on every request, so this is informational)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Issuer - Always "opsdesk"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Email address (custom claim)
    pub email: String,

    /// Role at issue time (custom claim)
    pub role: UserRole,
}

impl Claims {
    /// Creates new claims with the default expiration
    ///
    /// # Arguments
    ///
    /// * `user_id` - User ID (subject)
    /// * `email` - User's email address
    /// * `role` - User's role at issue time
    ///
    /// # Example
    ///
    /// ```
    /// use opsdesk_shared::auth::jwt::Claims;
    /// use opsdesk_shared::models::user::UserRole;
    /// use uuid::Uuid;
    ///
    /// let claims = Claims::new(
    ///     Uuid::new_v4(),
    ///     "jane@example.com".to_string(),
    ///     UserRole::Employee,
    /// );
    /// ```
    pub fn new(user_id: Uuid, email: String, role: UserRole) -> Self {
        Self::with_expiration(user_id, email, role, Duration::hours(DEFAULT_EXPIRY_HOURS))
    }

    /// Creates claims with a custom expiration
    ///
    /// # Arguments
    ///
    /// * `user_id` - User ID
    /// * `email` - User's email address
    /// * `role` - User's role at issue time
    /// * `expires_in` - Custom expiration duration
    ///
    /// # Example
    ///
    /// ```
    /// use opsdesk_shared::auth::jwt::Claims;
    /// use opsdesk_shared::models::user::UserRole;
    /// use chrono::Duration;
    /// use uuid::Uuid;
    ///
    /// let claims = Claims::with_expiration(
    ///     Uuid::new_v4(),
    ///     "jane@example.com".to_string(),
    ///     UserRole::Employee,
    ///     Duration::hours(1), // 1 hour expiration
    /// );
    /// ```
    pub fn with_expiration(
        user_id: Uuid,
        email: String,
        role: UserRole,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            email,
            role,
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Gets time until expiration
    pub fn time_until_expiration(&self) -> Option<Duration> {
        let now = Utc::now().timestamp();
        if self.exp > now {
            Some(Duration::seconds(self.exp - now))
        } else {
            None
        }
    }
}

/// Creates a JWT token from claims
///
/// Signs the token using HS256 (HMAC-SHA256) with the provided secret.
///
/// # Arguments
///
/// * `claims` - Token claims
/// * `secret` - Secret key for signing (should be at least 32 bytes)
///
/// # Returns
///
/// Base64-encoded JWT token string
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token creation fails
///
/// # Security
///
/// The secret should be:
/// - At least 32 bytes (256 bits) for HS256
/// - Randomly generated
/// - Stored securely (environment variable or secret manager)
/// - Rotated periodically
///
/// # Example
///
/// ```
/// use opsdesk_shared::auth::jwt::{create_token, Claims};
/// use opsdesk_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(
///     Uuid::new_v4(),
///     "admin@example.com".to_string(),
///     UserRole::Admin,
/// );
///
/// let token = create_token(&claims, "your-secret-key-at-least-32-bytes")?;
/// assert!(!token.is_empty());
/// # Ok(())
/// # }
/// ```
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token and extracts claims
///
/// Verifies:
/// - Signature is valid
/// - Token hasn't expired
/// - Issuer is "opsdesk"
/// - Token is not used before nbf time
///
/// # Arguments
///
/// * `token` - JWT token string
/// * `secret` - Secret key used for signing
///
/// # Returns
///
/// Validated claims if token is valid
///
/// # Errors
///
/// Returns error if:
/// - Signature is invalid
/// - Token has expired
/// - Issuer doesn't match
/// - Token format is invalid
///
/// # Example
///
/// ```
/// use opsdesk_shared::auth::jwt::{create_token, validate_token, Claims};
/// use opsdesk_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "your-secret-key-at-least-32-bytes";
///
/// let claims = Claims::new(user_id, "jane@example.com".to_string(), UserRole::Employee);
/// let token = create_token(&claims, secret)?;
///
/// let validated = validate_token(&token, secret)?;
/// assert_eq!(validated.sub, user_id);
/// assert_eq!(validated.email, "jane@example.com");
/// # Ok(())
/// # }
/// ```
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
            jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer {
                expected: ISSUER.to_string(),
                actual: "unknown".to_string(),
            },
            _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
        }
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();

        let claims = Claims::new(user_id, "jane@example.com".to_string(), UserRole::Employee);

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "jane@example.com");
        assert_eq!(claims.role, UserRole::Employee);
        assert_eq!(claims.iss, "opsdesk");
        assert!(!claims.is_expired());
        assert_eq!(claims.exp - claims.iat, DEFAULT_EXPIRY_HOURS * 3600);
    }

    #[test]
    fn test_claims_with_custom_expiration() {
        let claims = Claims::with_expiration(
            Uuid::new_v4(),
            "jane@example.com".to_string(),
            UserRole::Employee,
            Duration::hours(1),
        );

        let time_left = claims.time_until_expiration().unwrap();
        assert!(time_left.num_seconds() > 3500); // ~1 hour minus a bit
        assert!(time_left.num_seconds() <= 3600); // <= 1 hour
    }

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();
        let secret = "test-secret-key-at-least-32-bytes-long";

        let claims = Claims::new(user_id, "admin@example.com".to_string(), UserRole::Admin);
        let token = create_token(&claims, secret).expect("Should create token");

        let validated = validate_token(&token, secret).expect("Should validate token");
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.email, "admin@example.com");
        assert_eq!(validated.role, UserRole::Admin);
        assert_eq!(validated.iss, "opsdesk");
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(
            Uuid::new_v4(),
            "jane@example.com".to_string(),
            UserRole::Employee,
        );
        let token = create_token(&claims, "secret1").expect("Should create token");

        let result = validate_token(&token, "wrong-secret");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let secret = "test-secret";

        // Create token that expired 1 hour ago
        let claims = Claims::with_expiration(
            Uuid::new_v4(),
            "jane@example.com".to_string(),
            UserRole::Employee,
            Duration::seconds(-3600), // Negative duration = already expired
        );

        assert!(claims.is_expired());
        assert!(claims.time_until_expiration().is_none());

        let token = create_token(&claims, secret).expect("Should create token");
        let result = validate_token(&token, secret);

        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), JwtError::Expired));
    }

    #[test]
    fn test_validate_wrong_issuer() {
        let secret = "test-secret";

        let mut claims = Claims::new(
            Uuid::new_v4(),
            "jane@example.com".to_string(),
            UserRole::Employee,
        );
        claims.iss = "someone-else".to_string();

        let token = create_token(&claims, secret).expect("Should create token");
        let result = validate_token(&token, secret);

        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            JwtError::InvalidIssuer { .. }
        ));
    }

    #[test]
    fn test_role_survives_roundtrip() {
        let secret = "test-secret-key-at-least-32-bytes-long";

        for role in [UserRole::Admin, UserRole::Employee] {
            let claims = Claims::new(Uuid::new_v4(), "who@example.com".to_string(), role);
            let token = create_token(&claims, secret).unwrap();
            let validated = validate_token(&token, secret).unwrap();
            assert_eq!(validated.role, role);
        }
    }
}
