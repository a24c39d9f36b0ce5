/// Database models for OpsDesk
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: Staff accounts with ADMIN/EMPLOYEE roles
/// - `customer`: Customer directory records
/// - `task`: Board tasks assigned to employees, attached to customers
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
/// let new_user = CreateUser {
///     name: "Jane Doe".to_string(),
///     email: "jane@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: UserRole::Employee,
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod customer;
pub mod task;
pub mod user;
