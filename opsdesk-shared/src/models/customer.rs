/// Customer model and database operations
///
/// This module provides the Customer model backing the customer directory.
/// Email and phone are unique across all customers; both are enforced by
/// UNIQUE constraints so concurrent writers cannot slip past the handler-level
/// pre-checks.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE customers (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     phone VARCHAR(32) NOT NULL UNIQUE,
///     company VARCHAR(255),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use opsdesk_shared::models::customer::{Customer, CreateCustomer};
/// use opsdesk_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let customer = Customer::create(&pool, CreateCustomer {
///     name: "Acme Corp".to_string(),
///     email: "contact@acme.test".to_string(),
///     phone: "+15550100".to_string(),
///     company: Some("Acme Corporation".to_string()),
/// }).await?;
///
/// // Search the directory, first page of 10
/// let hits = Customer::list(&pool, Some("acme"), 10, 0).await?;
/// # Ok(())
/// # }
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Customer model representing a directory record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    /// Unique customer ID (UUID v4)
    pub id: Uuid,

    /// Contact name
    pub name: String,

    /// Email address
    ///
    /// Must be unique across all customers
    pub email: String,

    /// Phone number
    ///
    /// Must be unique across all customers
    pub phone: String,

    /// Optional company name
    pub company: Option<String>,

    /// When the customer record was created
    pub created_at: DateTime<Utc>,

    /// When the customer record was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCustomer {
    /// Contact name
    pub name: String,

    /// Email address
    pub email: String,

    /// Phone number
    pub phone: String,

    /// Optional company name
    pub company: Option<String>,
}

/// Input for updating an existing customer
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCustomer {
    /// New contact name
    pub name: Option<String>,

    /// New email address
    pub email: Option<String>,

    /// New phone number
    pub phone: Option<String>,

    /// New company name (use Some(None) to clear)
    #[serde(default, deserialize_with = "double_option")]
    pub company: Option<Option<String>>,
}

/// Keeps an explicit JSON null (clear the column) distinct from an absent
/// field (leave the column untouched)
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Compact customer projection embedded in task responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSummary {
    /// Unique customer ID
    pub id: Uuid,

    /// Contact name
    pub name: String,

    /// Email address
    pub email: String,

    /// Phone number
    pub phone: String,
}

impl From<Customer> for CustomerSummary {
    fn from(customer: Customer) -> Self {
        CustomerSummary {
            id: customer.id,
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
        }
    }
}

/// Escapes ILIKE pattern characters so a search term matches literally
///
/// Backslash is rewritten first so it cannot re-escape the others.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

impl Customer {
    /// Creates a new customer in the database
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `data` - Customer creation data
    ///
    /// # Returns
    ///
    /// The newly created customer with generated ID and timestamps
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Email or phone already exists (unique constraint violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateCustomer) -> Result<Self, sqlx::Error> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, email, phone, company)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, phone, company, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.phone)
        .bind(data.company)
        .fetch_one(pool)
        .await?;

        Ok(customer)
    }

    /// Finds a customer by ID
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `id` - Customer ID to search for
    ///
    /// # Returns
    ///
    /// The customer if found, None otherwise
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, email, phone, company, created_at, updated_at
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(customer)
    }

    /// Checks whether another customer already holds the given email
    ///
    /// Pass `exclude` when updating so the record being edited does not count
    /// as a collision with itself.
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn email_exists(
        pool: &PgPool,
        email: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM customers
                WHERE email = $1 AND ($2::UUID IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Checks whether another customer already holds the given phone number
    ///
    /// Pass `exclude` when updating so the record being edited does not count
    /// as a collision with itself.
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn phone_exists(
        pool: &PgPool,
        phone: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM customers
                WHERE phone = $1 AND ($2::UUID IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(phone)
        .bind(exclude)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Updates an existing customer
    ///
    /// Only non-None fields in `data` will be updated. The `updated_at`
    /// timestamp is automatically set to the current time.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `id` - ID of customer to update
    /// * `data` - Fields to update (only non-None values are updated)
    ///
    /// # Returns
    ///
    /// The updated customer if found, None if customer doesn't exist
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Email or phone already exists for another customer
    /// - Database connection fails
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use opsdesk_shared::models::customer::{Customer, UpdateCustomer};
    /// # use sqlx::PgPool;
    /// # use uuid::Uuid;
    /// # async fn example(pool: PgPool, customer_id: Uuid) -> Result<(), sqlx::Error> {
    /// let update = UpdateCustomer {
    ///     phone: Some("+15550199".to_string()),
    ///     company: Some(None), // clear the company field
    ///     ..Default::default()
    /// };
    ///
    /// if let Some(customer) = Customer::update(&pool, customer_id, update).await? {
    ///     println!("Updated customer: {}", customer.email);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateCustomer,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE customers SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.email.is_some() {
            bind_count += 1;
            query.push_str(&format!(", email = ${}", bind_count));
        }
        if data.phone.is_some() {
            bind_count += 1;
            query.push_str(&format!(", phone = ${}", bind_count));
        }
        if data.company.is_some() {
            bind_count += 1;
            query.push_str(&format!(", company = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, name, email, phone, company, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Customer>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(phone) = data.phone {
            q = q.bind(phone);
        }
        if let Some(company_opt) = data.company {
            q = q.bind(company_opt);
        }

        let customer = q.fetch_optional(pool).await?;

        Ok(customer)
    }

    /// Deletes a customer by ID
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `id` - ID of customer to delete
    ///
    /// # Returns
    ///
    /// True if customer was deleted, false if customer didn't exist
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails or if foreign key
    /// constraints prevent deletion (tasks still reference the customer)
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists customers with optional search and pagination
    ///
    /// When `search` is given it matches case-insensitively as a substring
    /// against name, email, and company. `%` and `_` in the term match
    /// themselves, not as pattern wildcards.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `search` - Optional case-insensitive substring filter
    /// * `limit` - Maximum number of customers to return
    /// * `offset` - Number of customers to skip (for pagination)
    ///
    /// # Returns
    ///
    /// Vector of customers, ordered by creation date (newest first)
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use opsdesk_shared::models::customer::Customer;
    /// # use sqlx::PgPool;
    /// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
    /// // First page (10 customers), no filter
    /// let page1 = Customer::list(&pool, None, 10, 0).await?;
    ///
    /// // Second page of an "acme" search
    /// let page2 = Customer::list(&pool, Some("acme"), 10, 10).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, email, phone, company, created_at, updated_at
            FROM customers
            WHERE $1::TEXT IS NULL
               OR name ILIKE '%' || $1 || '%' ESCAPE '\'
               OR email ILIKE '%' || $1 || '%' ESCAPE '\'
               OR company ILIKE '%' || $1 || '%' ESCAPE '\'
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(search.map(escape_like))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(customers)
    }

    /// Counts customers matching the optional search filter
    ///
    /// Uses the same filter as [`Customer::list`] so callers can derive page
    /// counts for the envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn count(pool: &PgPool, search: Option<&str>) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM customers
            WHERE $1::TEXT IS NULL
               OR name ILIKE '%' || $1 || '%' ESCAPE '\'
               OR email ILIKE '%' || $1 || '%' ESCAPE '\'
               OR company ILIKE '%' || $1 || '%' ESCAPE '\'
            "#,
        )
        .bind(search.map(escape_like))
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_customer_struct() {
        let create = CreateCustomer {
            name: "Acme Corp".to_string(),
            email: "contact@acme.test".to_string(),
            phone: "+15550100".to_string(),
            company: None,
        };

        assert_eq!(create.name, "Acme Corp");
        assert!(create.company.is_none());
    }

    #[test]
    fn test_update_customer_default() {
        let update = UpdateCustomer::default();
        assert!(update.name.is_none());
        assert!(update.email.is_none());
        assert!(update.phone.is_none());
        assert!(update.company.is_none());
    }

    #[test]
    fn test_update_customer_company_null_vs_absent() {
        // Absent field leaves the column untouched
        let absent: UpdateCustomer = serde_json::from_str(r#"{"name": "New Name"}"#).unwrap();
        assert!(absent.company.is_none());

        // Explicit null clears the column
        let cleared: UpdateCustomer = serde_json::from_str(r#"{"company": null}"#).unwrap();
        assert_eq!(cleared.company, Some(None));

        let set: UpdateCustomer = serde_json::from_str(r#"{"company": "Acme"}"#).unwrap();
        assert_eq!(set.company, Some(Some("Acme".to_string())));
    }

    #[test]
    fn test_escape_like_neutralizes_pattern_characters() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like(r"back\slash"), r"back\\slash");

        // A backslash ahead of a wildcard stays its own literal
        assert_eq!(escape_like(r"\%"), r"\\\%");
    }

    #[test]
    fn test_customer_summary_fields() {
        let customer = Customer {
            id: Uuid::new_v4(),
            name: "Acme Corp".to_string(),
            email: "contact@acme.test".to_string(),
            phone: "+15550100".to_string(),
            company: Some("Acme Corporation".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let summary = CustomerSummary::from(customer.clone());

        assert_eq!(summary.id, customer.id);
        assert_eq!(summary.phone, customer.phone);

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("company").is_none());
        assert!(json.get("created_at").is_none());
    }

    // Integration tests for database operations live in opsdesk-api/tests/
}
