/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login)
/// - `customers`: Customer directory endpoints
/// - `tasks`: Task board endpoints
/// - `users`: User directory endpoints (admin only)

pub mod health;
pub mod auth;
pub mod customers;
pub mod tasks;
pub mod users;
