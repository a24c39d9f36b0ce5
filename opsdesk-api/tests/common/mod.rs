/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup and cleanup
/// - Seed admin and employee accounts
/// - JWT token generation
/// - Response body helpers

use opsdesk_api::app::{build_router, AppState};
use opsdesk_api::config::Config;
use opsdesk_shared::auth::jwt::{create_token, Claims};
use opsdesk_shared::auth::password::hash_password;
use opsdesk_shared::db::migrations::run_migrations;
use opsdesk_shared::models::customer::{CreateCustomer, Customer};
use opsdesk_shared::models::user::{CreateUser, User, UserRole};
use sqlx::PgPool;
use uuid::Uuid;

/// Password used for every seeded account
pub const TEST_PASSWORD: &str = "CorrectHorse9Battery!";

/// Test context containing all necessary resources
///
/// Each context seeds one admin and one employee tagged with a random
/// suffix, so concurrent tests on a shared database don't collide and
/// `cleanup` can delete exactly what this context created.
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub admin: User,
    pub employee: User,
    pub admin_token: String,
    pub employee_token: String,
    pub suffix: String,
}

impl TestContext {
    /// Creates a new test context against the configured database
    pub async fn new() -> anyhow::Result<Self> {
        // Load test configuration
        let config = Config::from_env()?;

        // Connect to database and apply migrations
        let db = PgPool::connect(&config.database.url).await?;
        run_migrations(&db).await?;

        let suffix = short_id();

        // One hash shared by both seeded accounts; hashing is the slow
        // part of setup
        let password_hash = hash_password(TEST_PASSWORD)?;

        let admin = User::create(
            &db,
            CreateUser {
                name: "Test Admin".to_string(),
                email: format!("admin-{}@example.com", suffix),
                password_hash: password_hash.clone(),
                role: UserRole::Admin,
            },
        )
        .await?;

        let employee = User::create(
            &db,
            CreateUser {
                name: "Test Employee".to_string(),
                email: format!("employee-{}@example.com", suffix),
                password_hash,
                role: UserRole::Employee,
            },
        )
        .await?;

        // Generate JWT tokens
        let admin_claims = Claims::new(admin.id, admin.email.clone(), admin.role);
        let admin_token = create_token(&admin_claims, &config.jwt.secret)?;

        let employee_claims = Claims::new(employee.id, employee.email.clone(), employee.role);
        let employee_token = create_token(&employee_claims, &config.jwt.secret)?;

        // Build app
        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            admin,
            employee,
            admin_token,
            employee_token,
            suffix,
        })
    }

    /// Returns authorization header value for the seeded admin
    pub fn admin_auth(&self) -> String {
        format!("Bearer {}", self.admin_token)
    }

    /// Returns authorization header value for the seeded employee
    pub fn employee_auth(&self) -> String {
        format!("Bearer {}", self.employee_token)
    }

    /// Mints a token for an arbitrary user
    pub fn token_for(&self, user: &User) -> anyhow::Result<String> {
        let claims = Claims::new(user.id, user.email.clone(), user.role);
        Ok(create_token(&claims, &self.config.jwt.secret)?)
    }

    /// Email unique to this context, matched by `cleanup`
    pub fn unique_email(&self, prefix: &str) -> String {
        format!("{}-{}-{}@example.com", prefix, self.suffix, short_id())
    }

    /// Phone number unlikely to collide across runs
    pub fn unique_phone(&self) -> String {
        format!("+1-{}-{}", self.suffix, short_id())
    }

    /// Deletes everything this context created
    ///
    /// Tasks go first so customer and user deletes don't trip foreign
    /// keys.
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        let marker = format!("%{}%", self.suffix);

        sqlx::query(
            "DELETE FROM tasks WHERE assigned_to IN (SELECT id FROM users WHERE email LIKE $1)",
        )
        .bind(&marker)
        .execute(&self.db)
        .await?;

        sqlx::query("DELETE FROM customers WHERE email LIKE $1")
            .bind(&marker)
            .execute(&self.db)
            .await?;

        sqlx::query("DELETE FROM users WHERE email LIKE $1")
            .bind(&marker)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}

/// Eight hex characters from a fresh UUID
fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Creates a customer directly in the database
pub async fn create_customer_fixture(ctx: &TestContext, name: &str) -> anyhow::Result<Customer> {
    let customer = Customer::create(
        &ctx.db,
        CreateCustomer {
            name: name.to_string(),
            email: ctx.unique_email("customer"),
            phone: ctx.unique_phone(),
            company: None,
        },
    )
    .await?;

    Ok(customer)
}

/// Creates an extra employee directly in the database
///
/// The placeholder hash is fine because fixture users authenticate with
/// minted tokens, never passwords.
pub async fn create_employee_fixture(ctx: &TestContext, name: &str) -> anyhow::Result<User> {
    let user = User::create(
        &ctx.db,
        CreateUser {
            name: name.to_string(),
            email: ctx.unique_email("employee"),
            password_hash: "unused-fixture-hash".to_string(),
            role: UserRole::Employee,
        },
    )
    .await?;

    Ok(user)
}

/// Reads a response body as JSON
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("response body is JSON")
}
