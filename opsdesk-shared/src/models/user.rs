/// User model and database operations
///
/// This module provides the User model and CRUD operations for managing staff
/// accounts. Every user carries exactly one role (ADMIN or EMPLOYEE) which
/// drives all authorization decisions.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('ADMIN', 'EMPLOYEE');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role user_role NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Roles
///
/// - **ADMIN**: Manages customers, tasks, and user roles; sees all tasks
/// - **EMPLOYEE**: Reads the customer directory; sees and updates own tasks
///
/// # Example
///
/// ```no_run
/// use opsdesk_shared::models::user::{User, CreateUser, UserRole};
/// use opsdesk_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// // Create a new user
/// let new_user = CreateUser {
///     name: "Jane Doe".to_string(),
///     email: "jane@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: UserRole::Employee,
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// println!("Created user: {}", user.id);
///
/// // Find by email
/// let found = User::find_by_email(&pool, "jane@example.com").await?;
/// # Ok(())
/// # }
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Staff roles driving all authorization decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// Can manage customers, tasks, and user roles; sees all tasks
    Admin,

    /// Can read customers; sees and updates only tasks assigned to them
    Employee,
}

impl UserRole {
    /// Converts role to its wire string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Employee => "EMPLOYEE",
        }
    }

    /// Can create, update, and delete customer records
    pub fn can_manage_customers(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Can list users and change their roles
    pub fn can_manage_users(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Can create tasks and assign them to employees
    pub fn can_create_tasks(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Can view every task on the board (not just own assignments)
    pub fn can_view_all_tasks(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Can be the assignment target of a task
    pub fn is_assignable(&self) -> bool {
        matches!(self, UserRole::Employee)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User model representing a staff account
///
/// Passwords are stored as Argon2id hashes, never in plaintext. Handlers must
/// respond with [`UserPublic`] or [`UserSummary`], which omit the hash.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address
    ///
    /// Must be unique across all users
    pub email: String,

    /// Argon2id password hash
    ///
    /// Never store plaintext passwords!
    /// Use `argon2` crate for hashing/verification
    pub password_hash: String,

    /// Role within the organization
    pub role: UserRole,

    /// When the user account was created
    pub created_at: DateTime<Utc>,

    /// When the user account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,

    /// Role to assign
    pub role: UserRole,
}

/// User projection safe for API responses
///
/// Identical to [`User`] minus the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPublic {
    /// Unique user ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Role within the organization
    pub role: UserRole,

    /// When the user account was created
    pub created_at: DateTime<Utc>,

    /// When the user account was last updated
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        UserPublic {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Compact user projection embedded in task responses and login payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    /// Unique user ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Role within the organization
    pub role: UserRole,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        UserSummary {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

impl User {
    /// Creates a new user in the database
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `data` - User creation data
    ///
    /// # Returns
    ///
    /// The newly created user with generated ID and timestamps
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Email already exists (unique constraint violation)
    /// - Database connection fails
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use opsdesk_shared::models::user::{User, CreateUser, UserRole};
    /// # use sqlx::PgPool;
    /// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
    /// let new_user = CreateUser {
    ///     name: "Jane Doe".to_string(),
    ///     email: "jane@example.com".to_string(),
    ///     password_hash: "$argon2id$...".to_string(),
    ///     role: UserRole::Employee,
    /// };
    ///
    /// let user = User::create(&pool, new_user).await?;
    /// println!("Created user: {}", user.id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `id` - User ID to search for
    ///
    /// # Returns
    ///
    /// The user if found, None otherwise
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `email` - Email address to search for
    ///
    /// # Returns
    ///
    /// The user if found, None otherwise
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use opsdesk_shared::models::user::User;
    /// # use sqlx::PgPool;
    /// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
    /// let user = User::find_by_email(&pool, "jane@example.com").await?;
    /// if let Some(u) = user {
    ///     println!("Found user: {}", u.id);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Checks whether any user already holds the given email
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `email` - Email address to check
    ///
    /// # Returns
    ///
    /// True if the email is taken, false otherwise
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE email = $1
            )
            "#,
        )
        .bind(email)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Updates a user's role
    ///
    /// The `updated_at` timestamp is automatically set to the current time.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `id` - ID of user to update
    /// * `role` - New role
    ///
    /// # Returns
    ///
    /// The updated user if found, None if user doesn't exist
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use opsdesk_shared::models::user::{User, UserRole};
    /// # use sqlx::PgPool;
    /// # use uuid::Uuid;
    /// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
    /// if let Some(user) = User::update_role(&pool, user_id, UserRole::Admin).await? {
    ///     println!("{} is now {}", user.email, user.role);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn update_role(
        pool: &PgPool,
        id: Uuid,
        role: UserRole,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(role)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists all users
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    ///
    /// # Returns
    ///
    /// Vector of users, ordered by creation date (newest first)
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=65536,t=3,p=4$c2FsdA$aGFzaA".to_string(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_role_as_str() {
        assert_eq!(UserRole::Admin.as_str(), "ADMIN");
        assert_eq!(UserRole::Employee.as_str(), "EMPLOYEE");
    }

    #[test]
    fn test_role_capabilities() {
        // Admin manages everything and sees the whole board
        assert!(UserRole::Admin.can_manage_customers());
        assert!(UserRole::Admin.can_manage_users());
        assert!(UserRole::Admin.can_create_tasks());
        assert!(UserRole::Admin.can_view_all_tasks());
        assert!(!UserRole::Admin.is_assignable());

        // Employee reads customers and works only their own tasks
        assert!(!UserRole::Employee.can_manage_customers());
        assert!(!UserRole::Employee.can_manage_users());
        assert!(!UserRole::Employee.can_create_tasks());
        assert!(!UserRole::Employee.can_view_all_tasks());
        assert!(UserRole::Employee.is_assignable());
    }

    #[test]
    fn test_role_serde_wire_format() {
        assert_eq!(
            serde_json::to_value(UserRole::Admin).unwrap(),
            serde_json::json!("ADMIN")
        );
        assert_eq!(
            serde_json::to_value(UserRole::Employee).unwrap(),
            serde_json::json!("EMPLOYEE")
        );

        let role: UserRole = serde_json::from_str("\"EMPLOYEE\"").unwrap();
        assert_eq!(role, UserRole::Employee);

        // Lowercase and unknown variants are rejected
        assert!(serde_json::from_str::<UserRole>("\"admin\"").is_err());
        assert!(serde_json::from_str::<UserRole>("\"MANAGER\"").is_err());
    }

    #[test]
    fn test_user_public_omits_password_hash() {
        let user = sample_user(UserRole::Employee);
        let public = UserPublic::from(user.clone());

        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "test@example.com");
        assert_eq!(json["role"], "EMPLOYEE");
        assert_eq!(public.id, user.id);
    }

    #[test]
    fn test_user_summary_fields() {
        let user = sample_user(UserRole::Admin);
        let summary = UserSummary::from(user.clone());

        assert_eq!(summary.id, user.id);
        assert_eq!(summary.name, user.name);
        assert_eq!(summary.email, user.email);
        assert_eq!(summary.role, UserRole::Admin);

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("created_at").is_none());
    }

    // Integration tests for database operations live in opsdesk-api/tests/
}
