/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration
/// - Login
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register new user
/// - `POST /v1/auth/login` - Login and get an access token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use opsdesk_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User, UserPublic, UserRole, UserSummary},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Role for the new account
    pub role: UserRole,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Access token (JWT)
    pub access_token: String,

    /// The authenticated user
    pub user: UserSummary,
}

/// Register a new user
///
/// Creates a new user account with the requested role. The password is
/// hashed with Argon2id before storage and never returned.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// {
///   "name": "Jane Doe",
///   "email": "jane@example.com",
///   "password": "SecureP@ss123",
///   "role": "EMPLOYEE"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "id": "uuid",
///   "name": "Jane Doe",
///   "email": "jane@example.com",
///   "role": "EMPLOYEE",
///   "created_at": "2025-08-10T12:00:00Z",
///   "updated_at": "2025-08-10T12:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Email already registered
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserPublic>)> {
    // Validate request
    req.validate()?;

    // Reject duplicates up front for a friendly message; the unique
    // index still backstops concurrent registrations
    if User::email_exists(&state.db, &req.email).await? {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    // Hash password
    let password_hash = password::hash_password(&req.password)?;

    // Create user
    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
            password_hash,
            role: req.role,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Login endpoint
///
/// Authenticates a user and returns a JWT access token.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/login
/// Content-Type: application/json
///
/// {
///   "email": "jane@example.com",
///   "password": "SecureP@ss123"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "access_token": "eyJ...",
///   "user": {
///     "id": "uuid",
///     "name": "Jane Doe",
///     "email": "jane@example.com",
///     "role": "EMPLOYEE"
///   }
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Invalid credentials
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    // Validate request
    req.validate()?;

    // Find user by email; unknown email and wrong password produce the
    // same response so the endpoint can't be used to enumerate accounts
    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    // Verify password
    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    // Generate token
    let claims = jwt::Claims::with_expiration(
        user.id,
        user.email.clone(),
        user.role,
        chrono::Duration::hours(state.config.jwt.expiry_hours),
    );
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        access_token,
        user: user.into(),
    }))
}
