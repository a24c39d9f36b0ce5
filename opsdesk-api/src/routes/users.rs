/// User directory endpoints (admin only)
///
/// # Endpoints
///
/// - `GET /v1/users` - List all users
/// - `GET /v1/users/:id` - Get user by ID
/// - `PATCH /v1/users/:id` - Change a user's role

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use opsdesk_shared::{
    auth::{
        authorization::{require_role, ADMIN_ONLY},
        middleware::AuthContext,
    },
    models::user::{User, UserPublic, UserRole},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User list response
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    /// All registered users
    pub users: Vec<UserPublic>,
}

/// Update user role request
#[derive(Debug, Deserialize)]
pub struct UpdateUserRoleRequest {
    /// New role
    pub role: UserRole,
}

/// List all users
///
/// # Endpoint
///
/// ```text
/// GET /v1/users
/// Authorization: Bearer <jwt_token>
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `403 Forbidden`: Caller is not an admin
pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<UserListResponse>> {
    require_role(&auth, ADMIN_ONLY)?;

    let users = User::list_all(&state.db)
        .await?
        .into_iter()
        .map(UserPublic::from)
        .collect();

    Ok(Json(UserListResponse { users }))
}

/// Get user by ID
///
/// # Endpoint
///
/// ```text
/// GET /v1/users/:id
/// Authorization: Bearer <jwt_token>
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: User not found
pub async fn get_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserPublic>> {
    require_role(&auth, ADMIN_ONLY)?;

    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User with ID {} not found", id)))?;

    Ok(Json(user.into()))
}

/// Update user role
///
/// Promotes or demotes a user. The change takes effect on the user's
/// next request because authentication re-reads the role from the
/// database rather than trusting the token.
///
/// # Endpoint
///
/// ```text
/// PATCH /v1/users/:id
/// Authorization: Bearer <jwt_token>
/// Content-Type: application/json
///
/// {
///   "role": "ADMIN"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: User not found
pub async fn update_user_role(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRoleRequest>,
) -> ApiResult<Json<UserPublic>> {
    require_role(&auth, ADMIN_ONLY)?;

    let user = User::update_role(&state.db, id, req.role)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User with ID {} not found", id)))?;

    Ok(Json(user.into()))
}
