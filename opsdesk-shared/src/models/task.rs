/// Task model and database operations
///
/// This module provides the Task model backing the task board. Every task is
/// assigned to exactly one EMPLOYEE and attached to exactly one customer;
/// both references are fixed at creation time. Status moves freely between
/// PENDING, IN_PROGRESS, and DONE.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('PENDING', 'IN_PROGRESS', 'DONE');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'PENDING',
///     assigned_to UUID NOT NULL REFERENCES users(id),
///     customer_id UUID NOT NULL REFERENCES customers(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use opsdesk_shared::models::task::{Task, CreateTask, TaskStatus};
/// use opsdesk_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(assignee: Uuid, customer: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     title: "Follow up on renewal".to_string(),
///     description: None,
///     status: TaskStatus::Pending,
///     assigned_to: assignee,
///     customer_id: customer,
/// }).await?;
///
/// println!("Created task {} for {}", task.id, task.customer.name);
/// # Ok(())
/// # }
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::customer::CustomerSummary;
use crate::models::user::{UserRole, UserSummary};

/// Workflow states for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Created but not started yet (the default for new tasks)
    Pending,

    /// Currently being worked on
    InProgress,

    /// Completed
    Done,
}

impl TaskStatus {
    /// Converts status to its wire string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task model representing a board entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Short title shown on the board
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Current workflow status
    pub status: TaskStatus,

    /// ID of the employee responsible for this task
    pub assigned_to: Uuid,

    /// ID of the customer this task concerns
    pub customer_id: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Short title shown on the board
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Initial workflow status
    pub status: TaskStatus,

    /// ID of the employee responsible for this task
    pub assigned_to: Uuid,

    /// ID of the customer this task concerns
    pub customer_id: Uuid,
}

/// Task enriched with its assignee and customer for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDetail {
    /// Unique task ID
    pub id: Uuid,

    /// Short title shown on the board
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Current workflow status
    pub status: TaskStatus,

    /// ID of the employee responsible for this task
    pub assigned_to: Uuid,

    /// ID of the customer this task concerns
    pub customer_id: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,

    /// The assigned employee
    pub user: UserSummary,

    /// The customer this task concerns
    pub customer: CustomerSummary,
}

/// Flat row shape produced by the detail JOIN query
#[derive(Debug, sqlx::FromRow)]
struct TaskDetailRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    assigned_to: Uuid,
    customer_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    user_name: String,
    user_email: String,
    user_role: UserRole,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
}

impl From<TaskDetailRow> for TaskDetail {
    fn from(row: TaskDetailRow) -> Self {
        TaskDetail {
            id: row.id,
            title: row.title,
            description: row.description,
            status: row.status,
            assigned_to: row.assigned_to,
            customer_id: row.customer_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            user: UserSummary {
                id: row.assigned_to,
                name: row.user_name,
                email: row.user_email,
                role: row.user_role,
            },
            customer: CustomerSummary {
                id: row.customer_id,
                name: row.customer_name,
                email: row.customer_email,
                phone: row.customer_phone,
            },
        }
    }
}

/// Shared SELECT for the detail projection; callers append WHERE/ORDER BY
const DETAIL_QUERY: &str = r#"
    SELECT t.id, t.title, t.description, t.status, t.assigned_to, t.customer_id,
           t.created_at, t.updated_at,
           u.name AS user_name, u.email AS user_email, u.role AS user_role,
           c.name AS customer_name, c.email AS customer_email, c.phone AS customer_phone
    FROM tasks t
    JOIN users u ON u.id = t.assigned_to
    JOIN customers c ON c.id = t.customer_id
"#;

impl Task {
    /// Creates a new task and returns it with assignee and customer embedded
    ///
    /// Referential checks (assignee exists and is an EMPLOYEE, customer
    /// exists) belong to the caller; the INSERT itself only enforces the
    /// foreign keys.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `data` - Task creation data
    ///
    /// # Returns
    ///
    /// The newly created task as a [`TaskDetail`]
    ///
    /// # Errors
    ///
    /// Returns an error if a foreign key is violated or the database
    /// connection fails
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<TaskDetail, sqlx::Error> {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO tasks (title, description, status, assigned_to, customer_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.assigned_to)
        .bind(data.customer_id)
        .fetch_one(pool)
        .await?;

        let query = format!("{} WHERE t.id = $1", DETAIL_QUERY);
        let row = sqlx::query_as::<_, TaskDetailRow>(&query)
            .bind(id)
            .fetch_one(pool)
            .await?;

        Ok(row.into())
    }

    /// Finds a task by ID (bare row, no embedded relations)
    ///
    /// Used for ownership checks before mutating; list and detail responses
    /// go through the JOIN-backed methods instead.
    ///
    /// # Returns
    ///
    /// The task if found, None otherwise
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, assigned_to, customer_id,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists every task on the board with relations embedded
    ///
    /// # Returns
    ///
    /// Vector of [`TaskDetail`], ordered by creation date (newest first)
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn list_all(pool: &PgPool) -> Result<Vec<TaskDetail>, sqlx::Error> {
        let query = format!("{} ORDER BY t.created_at DESC", DETAIL_QUERY);
        let rows = sqlx::query_as::<_, TaskDetailRow>(&query)
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(TaskDetail::from).collect())
    }

    /// Lists tasks assigned to one employee with relations embedded
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `assignee` - User ID whose tasks to return
    ///
    /// # Returns
    ///
    /// Vector of [`TaskDetail`], ordered by creation date (newest first)
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn list_by_assignee(
        pool: &PgPool,
        assignee: Uuid,
    ) -> Result<Vec<TaskDetail>, sqlx::Error> {
        let query = format!(
            "{} WHERE t.assigned_to = $1 ORDER BY t.created_at DESC",
            DETAIL_QUERY
        );
        let rows = sqlx::query_as::<_, TaskDetailRow>(&query)
            .bind(assignee)
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(TaskDetail::from).collect())
    }

    /// Updates a task's status and returns the refreshed detail projection
    ///
    /// The `updated_at` timestamp is automatically set to the current time.
    /// Ownership checks belong to the caller.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `id` - ID of task to update
    /// * `status` - New workflow status
    ///
    /// # Returns
    ///
    /// The updated task if found, None if task doesn't exist
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use opsdesk_shared::models::task::{Task, TaskStatus};
    /// # use sqlx::PgPool;
    /// # use uuid::Uuid;
    /// # async fn example(pool: PgPool, task_id: Uuid) -> Result<(), sqlx::Error> {
    /// if let Some(task) = Task::update_status(&pool, task_id, TaskStatus::Done).await? {
    ///     println!("Task {} is now {}", task.id, task.status);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<Option<TaskDetail>, sqlx::Error> {
        let updated: Option<(Uuid,)> = sqlx::query_as(
            r#"
            UPDATE tasks
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await?;

        let Some((id,)) = updated else {
            return Ok(None);
        };

        let query = format!("{} WHERE t.id = $1", DETAIL_QUERY);
        let row = sqlx::query_as::<_, TaskDetailRow>(&query)
            .bind(id)
            .fetch_one(pool)
            .await?;

        Ok(Some(row.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_as_str() {
        assert_eq!(TaskStatus::Pending.as_str(), "PENDING");
        assert_eq!(TaskStatus::InProgress.as_str(), "IN_PROGRESS");
        assert_eq!(TaskStatus::Done.as_str(), "DONE");
    }

    #[test]
    fn test_task_status_serde_wire_format() {
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            serde_json::json!("IN_PROGRESS")
        );

        let status: TaskStatus = serde_json::from_str("\"DONE\"").unwrap();
        assert_eq!(status, TaskStatus::Done);

        // Lowercase and unknown variants are rejected
        assert!(serde_json::from_str::<TaskStatus>("\"pending\"").is_err());
        assert!(serde_json::from_str::<TaskStatus>("\"CANCELLED\"").is_err());
    }

    #[test]
    fn test_detail_row_nests_relations() {
        let assignee = Uuid::new_v4();
        let customer = Uuid::new_v4();
        let now = Utc::now();

        let row = TaskDetailRow {
            id: Uuid::new_v4(),
            title: "Follow up on renewal".to_string(),
            description: Some("Call before Friday".to_string()),
            status: TaskStatus::Pending,
            assigned_to: assignee,
            customer_id: customer,
            created_at: now,
            updated_at: now,
            user_name: "Eli Employee".to_string(),
            user_email: "eli@example.com".to_string(),
            user_role: UserRole::Employee,
            customer_name: "Acme Corp".to_string(),
            customer_email: "contact@acme.test".to_string(),
            customer_phone: "+15550100".to_string(),
        };

        let detail = TaskDetail::from(row);
        assert_eq!(detail.user.id, assignee);
        assert_eq!(detail.user.role, UserRole::Employee);
        assert_eq!(detail.customer.id, customer);
        assert_eq!(detail.customer.phone, "+15550100");

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["user"]["email"], "eli@example.com");
        assert_eq!(json["customer"]["name"], "Acme Corp");
        assert_eq!(json["status"], "PENDING");
    }

    // Integration tests for database operations live in opsdesk-api/tests/
}
