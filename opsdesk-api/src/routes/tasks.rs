/// Task board endpoints
///
/// This module provides the task board: admins create tasks against a
/// customer and assign them to an employee; assignees move them through
/// the status workflow.
///
/// # Endpoints
///
/// - `POST /v1/tasks` - Create task (admin)
/// - `GET /v1/tasks` - List tasks (admins see all, employees see their own)
/// - `PATCH /v1/tasks/:id/status` - Update task status (assignee or admin)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use opsdesk_shared::{
    auth::{
        authorization::{require_assignee_or_admin, require_role, ADMIN_ONLY, ADMIN_OR_EMPLOYEE},
        middleware::AuthContext,
    },
    models::{
        customer::Customer,
        task::{CreateTask, Task, TaskDetail, TaskStatus},
        user::User,
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// User the task is assigned to (must be an employee)
    pub assigned_to: Uuid,

    /// Customer the task is for
    pub customer_id: Uuid,

    /// Initial status (defaults to PENDING)
    pub status: Option<TaskStatus>,
}

/// Task list response
#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    /// Tasks visible to the caller
    pub tasks: Vec<TaskDetail>,
}

/// Update task status request
#[derive(Debug, Deserialize)]
pub struct UpdateTaskStatusRequest {
    /// New status
    pub status: TaskStatus,
}

/// Create task
///
/// Creates a task assigned to an employee for a customer. Both the
/// assignee and customer must exist, and the assignee must hold the
/// EMPLOYEE role; admins coordinate work rather than receive it.
///
/// # Endpoint
///
/// ```text
/// POST /v1/tasks
/// Authorization: Bearer <jwt_token>
/// Content-Type: application/json
///
/// {
///   "title": "Quarterly check-in call",
///   "description": "Review open issues before renewal",
///   "assigned_to": "uuid",
///   "customer_id": "uuid",
///   "status": "PENDING"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, or assignee is not an employee
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: Assignee or customer not found
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskDetail>)> {
    require_role(&auth, ADMIN_ONLY)?;

    // Validate request
    req.validate()?;

    // Referential checks before insert so the client gets a precise
    // error instead of a foreign key violation
    let assignee = User::find_by_id(&state.db, req.assigned_to)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("User with ID {} not found", req.assigned_to))
        })?;

    if !assignee.role.is_assignable() {
        return Err(ApiError::BadRequest(
            "Tasks can only be assigned to users with EMPLOYEE role".to_string(),
        ));
    }

    if Customer::find_by_id(&state.db, req.customer_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound(format!(
            "Customer with ID {} not found",
            req.customer_id
        )));
    }

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description,
            status: req.status.unwrap_or(TaskStatus::Pending),
            assigned_to: req.assigned_to,
            customer_id: req.customer_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// List tasks
///
/// Admins see every task; employees see only tasks assigned to them.
/// Each task embeds its assignee and customer summaries.
///
/// # Endpoint
///
/// ```text
/// GET /v1/tasks
/// Authorization: Bearer <jwt_token>
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `500 Internal Server Error`: Server error
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<TaskListResponse>> {
    require_role(&auth, ADMIN_OR_EMPLOYEE)?;

    let tasks = if auth.role.can_view_all_tasks() {
        Task::list_all(&state.db).await?
    } else {
        Task::list_by_assignee(&state.db, auth.user_id).await?
    };

    Ok(Json(TaskListResponse { tasks }))
}

/// Update task status
///
/// Moves a task through the workflow. Only the assignee may update
/// their own task; admins may update any task.
///
/// # Endpoint
///
/// ```text
/// PATCH /v1/tasks/:id/status
/// Authorization: Bearer <jwt_token>
/// Content-Type: application/json
///
/// {
///   "status": "IN_PROGRESS"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `403 Forbidden`: Caller is neither the assignee nor an admin
/// - `404 Not Found`: Task not found
pub async fn update_task_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskStatusRequest>,
) -> ApiResult<Json<TaskDetail>> {
    require_role(&auth, ADMIN_OR_EMPLOYEE)?;

    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task with ID {} not found", id)))?;

    require_assignee_or_admin(&auth, task.assigned_to)?;

    let updated = Task::update_status(&state.db, id, req.status)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task with ID {} not found", id)))?;

    Ok(Json(updated))
}
