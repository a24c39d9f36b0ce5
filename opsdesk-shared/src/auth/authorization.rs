/// Authorization predicates and role policies
///
/// This module provides role-based access control for OpsDesk handlers.
///
/// # Permission Model
///
/// OpsDesk uses a flat two-role model:
///
/// 1. **Role Gates**: each route names the roles allowed to call it
///    ([`ADMIN_ONLY`] or [`ADMIN_OR_EMPLOYEE`])
/// 2. **Ownership Checks**: task status updates additionally require the
///    caller to be the assignee, unless the caller is an admin
///
/// All checks are pure functions over [`AuthContext`]. The middleware has
/// already re-resolved the caller's role from storage, so no database access
/// happens here.
///
/// # Example
///
/// ```
/// use opsdesk_shared::auth::authorization::{require_role, ADMIN_ONLY};
/// use opsdesk_shared::auth::middleware::AuthContext;
/// use opsdesk_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// let auth = AuthContext {
///     user_id: Uuid::new_v4(),
///     email: "admin@example.com".to_string(),
///     role: UserRole::Admin,
/// };
///
/// assert!(require_role(&auth, ADMIN_ONLY).is_ok());
/// ```
use uuid::Uuid;

use super::middleware::AuthContext;
use crate::models::user::UserRole;

/// Routes restricted to admins
pub const ADMIN_ONLY: &[UserRole] = &[UserRole::Admin];

/// Routes open to any authenticated user
pub const ADMIN_OR_EMPLOYEE: &[UserRole] = &[UserRole::Admin, UserRole::Employee];

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Caller's role is not in the route's allowed set
    #[error("Insufficient permissions")]
    InsufficientRole {
        required: &'static [UserRole],
        actual: UserRole,
    },

    /// Caller is neither the assignee nor an admin
    #[error("You can only update tasks assigned to you")]
    NotAssignee,
}

/// Checks that the caller's role is in the allowed set
///
/// # Arguments
///
/// * `auth` - Authenticated principal
/// * `allowed` - Roles permitted on this route
///
/// # Returns
///
/// `Ok(())` if the role is allowed, error otherwise
///
/// # Errors
///
/// Returns `AuthzError::InsufficientRole` if the role is not in the set
///
/// # Example
///
/// ```
/// # use opsdesk_shared::auth::authorization::{require_role, ADMIN_OR_EMPLOYEE};
/// # use opsdesk_shared::auth::middleware::AuthContext;
/// # use opsdesk_shared::models::user::UserRole;
/// # use uuid::Uuid;
/// # let auth = AuthContext {
/// #     user_id: Uuid::new_v4(),
/// #     email: "employee@example.com".to_string(),
/// #     role: UserRole::Employee,
/// # };
/// require_role(&auth, ADMIN_OR_EMPLOYEE)?;
/// # Ok::<(), opsdesk_shared::auth::authorization::AuthzError>(())
/// ```
pub fn require_role(auth: &AuthContext, allowed: &'static [UserRole]) -> Result<(), AuthzError> {
    if !allowed.contains(&auth.role) {
        return Err(AuthzError::InsufficientRole {
            required: allowed,
            actual: auth.role,
        });
    }

    Ok(())
}

/// Checks that the caller may modify a task
///
/// Admins may modify any task; employees only tasks assigned to them.
///
/// # Arguments
///
/// * `auth` - Authenticated principal
/// * `assigned_to` - The task's assignee
///
/// # Returns
///
/// `Ok(())` if the caller is the assignee or an admin, error otherwise
///
/// # Errors
///
/// Returns `AuthzError::NotAssignee` if an employee targets someone else's
/// task
pub fn require_assignee_or_admin(
    auth: &AuthContext,
    assigned_to: Uuid,
) -> Result<(), AuthzError> {
    if auth.role == UserRole::Admin || auth.user_id == assigned_to {
        return Ok(());
    }

    Err(AuthzError::NotAssignee)
}
