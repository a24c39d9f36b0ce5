/// Customer directory endpoints
///
/// This module provides CRUD endpoints for the customer directory.
/// All endpoints require JWT authentication; mutations are admin only
/// while reads are open to any authenticated user.
///
/// # Endpoints
///
/// - `POST /v1/customers` - Create customer (admin)
/// - `GET /v1/customers` - List customers with pagination and search
/// - `GET /v1/customers/:id` - Get customer by ID
/// - `PATCH /v1/customers/:id` - Update customer (admin)
/// - `DELETE /v1/customers/:id` - Delete customer (admin)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use opsdesk_shared::{
    auth::{
        authorization::{require_role, ADMIN_ONLY, ADMIN_OR_EMPLOYEE},
        middleware::AuthContext,
    },
    models::customer::{CreateCustomer, Customer, UpdateCustomer},
};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create customer request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    /// Customer name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Email address (unique across the directory)
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Phone number (unique across the directory)
    #[validate(length(min = 1, max = 32, message = "Phone must be 1-32 characters"))]
    pub phone: String,

    /// Optional company name
    #[validate(length(max = 255, message = "Company must be at most 255 characters"))]
    pub company: Option<String>,
}

/// Update customer request
///
/// All fields are optional; only supplied fields are changed. `company`
/// distinguishes "absent" from "explicitly null" so it can be cleared.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    /// New customer name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New phone number
    #[validate(length(min = 1, max = 32, message = "Phone must be 1-32 characters"))]
    pub phone: Option<String>,

    /// New company name; `null` clears the field
    #[serde(default, deserialize_with = "double_option")]
    pub company: Option<Option<String>>,
}

/// Maps a present-but-null JSON field to `Some(None)` instead of `None`
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// List customers query parameters
#[derive(Debug, Deserialize)]
pub struct ListCustomersQuery {
    /// Page number (1-based, defaults to 1)
    pub page: Option<i64>,

    /// Page size (defaults to 10, capped at 100)
    pub limit: Option<i64>,

    /// Case-insensitive substring match on name, email, or company
    pub search: Option<String>,
}

/// Paginated customer list response
#[derive(Debug, Serialize)]
pub struct CustomerListResponse {
    /// Current page
    pub page: i64,

    /// Page size
    pub limit: i64,

    /// Total matching records
    pub total_records: i64,

    /// Total pages at this page size
    pub total_pages: i64,

    /// Records for this page
    pub data: Vec<Customer>,
}

/// Delete customer response
#[derive(Debug, Serialize)]
pub struct DeleteCustomerResponse {
    /// Whether the customer was deleted
    pub deleted: bool,
}

/// Number of pages needed to hold `total_records` rows at `limit` per page
///
/// Zero records means zero pages.
fn page_count(total_records: i64, limit: i64) -> i64 {
    (total_records + limit - 1) / limit
}

/// Create customer
///
/// Creates a new customer record. Email and phone must be unique;
/// email is checked first so a payload that collides on both reports
/// the email conflict.
///
/// # Endpoint
///
/// ```text
/// POST /v1/customers
/// Authorization: Bearer <jwt_token>
/// Content-Type: application/json
///
/// {
///   "name": "Acme Corp",
///   "email": "contact@acme.example.com",
///   "phone": "+1-555-0100",
///   "company": "Acme Corporation"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `403 Forbidden`: Caller is not an admin
/// - `409 Conflict`: Email or phone already exists
pub async fn create_customer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateCustomerRequest>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    require_role(&auth, ADMIN_ONLY)?;

    // Validate request
    req.validate()?;

    // Uniqueness pre-checks; email first
    if Customer::email_exists(&state.db, &req.email, None).await? {
        return Err(ApiError::Conflict("Email already exists".to_string()));
    }
    if Customer::phone_exists(&state.db, &req.phone, None).await? {
        return Err(ApiError::Conflict("Phone number already exists".to_string()));
    }

    let customer = Customer::create(
        &state.db,
        CreateCustomer {
            name: req.name,
            email: req.email,
            phone: req.phone,
            company: req.company,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

/// List customers
///
/// Returns a page of customers ordered newest first, with an optional
/// case-insensitive search across name, email, and company.
///
/// # Endpoint
///
/// ```text
/// GET /v1/customers?page=1&limit=10&search=acme
/// Authorization: Bearer <jwt_token>
/// ```
///
/// # Response
///
/// ```json
/// {
///   "page": 1,
///   "limit": 10,
///   "total_records": 42,
///   "total_pages": 5,
///   "data": [ ... ]
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `500 Internal Server Error`: Server error
pub async fn list_customers(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListCustomersQuery>,
) -> ApiResult<Json<CustomerListResponse>> {
    require_role(&auth, ADMIN_OR_EMPLOYEE)?;

    // Out-of-range paging values are normalized rather than rejected
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * limit;

    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let total_records = Customer::count(&state.db, search).await?;
    let data = Customer::list(&state.db, search, limit, offset).await?;

    Ok(Json(CustomerListResponse {
        page,
        limit,
        total_records,
        total_pages: page_count(total_records, limit),
        data,
    }))
}

/// Get customer by ID
///
/// # Endpoint
///
/// ```text
/// GET /v1/customers/:id
/// Authorization: Bearer <jwt_token>
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `404 Not Found`: Customer not found
pub async fn get_customer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Customer>> {
    require_role(&auth, ADMIN_OR_EMPLOYEE)?;

    let customer = Customer::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Customer with ID {} not found", id)))?;

    Ok(Json(customer))
}

/// Update customer
///
/// Partially updates a customer. Changed email or phone values are
/// checked for uniqueness against every other customer.
///
/// # Endpoint
///
/// ```text
/// PATCH /v1/customers/:id
/// Authorization: Bearer <jwt_token>
/// Content-Type: application/json
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: Customer not found
/// - `409 Conflict`: Email or phone already exists
pub async fn update_customer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCustomerRequest>,
) -> ApiResult<Json<Customer>> {
    require_role(&auth, ADMIN_ONLY)?;

    // Validate request
    req.validate()?;

    // Existence check up front so a missing record reports 404, not 409
    if Customer::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound(format!(
            "Customer with ID {} not found",
            id
        )));
    }

    // Uniqueness checks exclude the customer being updated, so
    // re-submitting the current email or phone is not a conflict
    if let Some(email) = &req.email {
        if Customer::email_exists(&state.db, email, Some(id)).await? {
            return Err(ApiError::Conflict("Email already exists".to_string()));
        }
    }
    if let Some(phone) = &req.phone {
        if Customer::phone_exists(&state.db, phone, Some(id)).await? {
            return Err(ApiError::Conflict("Phone number already exists".to_string()));
        }
    }

    let customer = Customer::update(
        &state.db,
        id,
        UpdateCustomer {
            name: req.name,
            email: req.email,
            phone: req.phone,
            company: req.company,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Customer with ID {} not found", id)))?;

    Ok(Json(customer))
}

/// Delete customer
///
/// # Endpoint
///
/// ```text
/// DELETE /v1/customers/:id
/// Authorization: Bearer <jwt_token>
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: Customer not found
/// - `409 Conflict`: Customer still has tasks referencing it
pub async fn delete_customer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteCustomerResponse>> {
    require_role(&auth, ADMIN_ONLY)?;

    let deleted = Customer::delete(&state.db, id).await?;

    if !deleted {
        return Err(ApiError::NotFound(format!(
            "Customer with ID {} not found",
            id
        )));
    }

    Ok(Json(DeleteCustomerResponse { deleted }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_rounds_up() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(3, 2), 2);
        assert_eq!(page_count(100, 100), 1);
    }

    #[test]
    fn test_update_request_distinguishes_null_from_absent() {
        let req: UpdateCustomerRequest = serde_json::from_str(r#"{"name": "Acme"}"#).unwrap();
        assert_eq!(req.company, None);

        let req: UpdateCustomerRequest = serde_json::from_str(r#"{"company": null}"#).unwrap();
        assert_eq!(req.company, Some(None));

        let req: UpdateCustomerRequest =
            serde_json::from_str(r#"{"company": "Acme Corp"}"#).unwrap();
        assert_eq!(req.company, Some(Some("Acme Corp".to_string())));
    }
}
