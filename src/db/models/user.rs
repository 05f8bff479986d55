//! Accounts, sessions, identity profiles and roles.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::common::AppRole;

/// Login credentials. `id` is the `user_id` referenced everywhere else.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Identity record created at sign-up
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: String,
    pub user_id: String,
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRole {
    pub id: String,
    pub user_id: String,
    pub role: String,
    pub created_at: String,
}

impl UserRole {
    /// Get the role as an AppRole enum
    pub fn role_enum(&self) -> Option<AppRole> {
        self.role.parse().ok()
    }
}

/// The authenticated caller, resolved from a bearer token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
    pub role: AppRole,
    /// Hash of the presented token, used to end the session on sign-out
    pub token_hash: String,
}

impl AuthUser {
    pub fn is_student(&self) -> bool {
        self.role == AppRole::Student
    }
}

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: AppRole,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: AppRole,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub profile: Profile,
    pub role: AppRole,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoleResponse {
    pub user_id: String,
    pub role: AppRole,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAvatarRequest {
    pub avatar_url: Option<String>,
}
