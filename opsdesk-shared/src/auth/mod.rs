/// Authentication and authorization utilities
///
/// This module provides secure authentication primitives for OpsDesk:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT token generation and validation
/// - [`middleware`]: Bearer-token authentication and the request principal
/// - [`authorization`]: Role and ownership predicates
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **JWT Tokens**: HS256 signing with configurable expiration
/// - **Stale-token Protection**: principals are re-resolved from storage on
///   every request, so deleted users and role changes take effect immediately
/// - **Constant-time Comparison**: password verification uses constant-time
///   operations
///
/// # Example
///
/// ```no_run
/// use opsdesk_shared::auth::password::{hash_password, verify_password};
/// use opsdesk_shared::auth::jwt::{create_token, validate_token, Claims};
/// use opsdesk_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Password authentication
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// // JWT token generation
/// let claims = Claims::new(Uuid::new_v4(), "admin@example.com".to_string(), UserRole::Admin);
/// let token = create_token(&claims, "secret-key")?;
/// let decoded = validate_token(&token, "secret-key")?;
/// assert_eq!(decoded.sub, claims.sub);
/// # Ok(())
/// # }
/// ```

pub mod password;
pub mod jwt;
pub mod middleware;
pub mod authorization;
