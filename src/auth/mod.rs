//! Authentication module
//!
//! This module provides authentication functionality including:
//! - User registration and login
//! - Session token issuance and verification
//! - Password hashing and verification
//! - Authentication middleware

pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;

pub use handlers::{login, protected, register};
pub use jwt::{AuthError, Claims, TokenService, DEFAULT_TOKEN_TTL};
pub use middleware::authenticate;
pub use models::{AuthenticatedIdentity, LoginRequest, LoginResponse, RegistrationRequest};
pub use password::PasswordHasher;
pub use service::AuthService;
