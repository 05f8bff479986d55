use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use rand::Rng;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{info, warn};

use crate::db::{
    self, now_timestamp, AppRole, AuthResponse, AuthUser, MeResponse, Profile, RoleResponse,
    SignInRequest, SignUpRequest, User, UserResponse,
};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_email, validate_full_name, validate_password};

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Generate a random session token
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

/// Hash a token for storage; only the hash is persisted
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Extract the bearer token from request headers
fn extract_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Expiry of a session created now, or `None` if the lifetime is out of range
fn session_expiry(ttl_hours: i64) -> Option<String> {
    let ttl = chrono::Duration::try_hours(ttl_hours)?;
    chrono::Utc::now()
        .checked_add_signed(ttl)
        .map(|t| t.to_rfc3339_opts(chrono::SecondsFormat::Micros, true))
}

/// Create a session for `user_id` and return the plaintext token
async fn create_session(state: &AppState, user_id: &str) -> Result<String, ApiError> {
    let token = generate_token();
    let token_hash = hash_token(&token);

    let expires_at = session_expiry(state.config.auth.session_ttl_hours).ok_or_else(|| {
        tracing::error!(
            ttl_hours = state.config.auth.session_ttl_hours,
            "Session lifetime is out of range"
        );
        ApiError::internal("Failed to create session")
    })?;

    sqlx::query(
        "INSERT INTO sessions (id, user_id, token_hash, expires_at, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(&token_hash)
    .bind(&expires_at)
    .bind(now_timestamp())
    .execute(&state.db)
    .await?;

    Ok(token)
}

/// Resolve a bearer token to the user behind a live session
pub async fn resolve_session(pool: &db::DbPool, token: &str) -> Result<Option<AuthUser>, ApiError> {
    let token_hash = hash_token(token);

    let row: Option<(String, String, String)> = sqlx::query_as(
        r#"
        SELECT s.user_id, u.email, r.role
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        JOIN user_roles r ON r.user_id = s.user_id
        WHERE s.token_hash = ? AND s.expires_at > ?
        "#,
    )
    .bind(&token_hash)
    .bind(now_timestamp())
    .fetch_optional(pool)
    .await?;

    Ok(row.and_then(|(user_id, email, role)| {
        let role = role.parse::<AppRole>().ok()?;
        Some(AuthUser {
            user_id,
            email,
            role,
            token_hash,
        })
    }))
}

/// Delete sessions past their expiry. Returns the number removed.
pub async fn purge_expired_sessions(pool: &db::DbPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
        .bind(now_timestamp())
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

fn validate_signup(req: &SignUpRequest, min_password_length: usize) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    errors.check("email", validate_email(req.email.trim()));
    errors.check("password", validate_password(&req.password, min_password_length));
    errors.check("full_name", validate_full_name(&req.full_name));
    errors.finish()
}

/// Create an account, its identity profile and role, then sign in.
///
/// POST /api/auth/signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    validate_signup(&req, state.config.auth.min_password_length)?;

    let email = normalize_email(&req.email);
    let full_name = req.full_name.trim().to_string();

    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::conflict(
            "This email is already registered. Please sign in instead.",
        ));
    }

    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!(error = %e, "Failed to hash password");
        ApiError::internal("Failed to create account")
    })?;

    let user_id = uuid::Uuid::new_v4().to_string();
    let now = now_timestamp();

    let mut tx = state.db.begin().await?;

    sqlx::query(
        "INSERT INTO users (id, email, password_hash, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&user_id)
    .bind(&email)
    .bind(&password_hash)
    .bind(&now)
    .bind(&now)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO profiles (id, user_id, email, full_name, avatar_url, created_at, updated_at)
        VALUES (?, ?, ?, ?, NULL, ?, ?)
        "#,
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(&user_id)
    .bind(&email)
    .bind(&full_name)
    .bind(&now)
    .bind(&now)
    .execute(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO user_roles (id, user_id, role, created_at) VALUES (?, ?, ?, ?)")
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(&user_id)
        .bind(req.role.as_str())
        .bind(&now)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(user_id = %user_id, role = %req.role, "User signed up");

    let token = create_session(&state, &user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserResponse {
                id: user_id,
                email,
                full_name,
                role: req.role,
            },
        }),
    ))
}

/// POST /api/auth/signin
pub async fn signin(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignInRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = normalize_email(&req.email);

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await?;

    let user = match user {
        Some(u) if verify_password(&req.password, &u.password_hash) => u,
        _ => {
            warn!(email = %email, "Failed sign-in attempt");
            return Err(ApiError::unauthorized("Invalid email or password"));
        }
    };

    let profile: Profile = sqlx::query_as("SELECT * FROM profiles WHERE user_id = ?")
        .bind(&user.id)
        .fetch_one(&state.db)
        .await?;

    let role = db::get_user_role(&state.db, &user.id)
        .await?
        .ok_or_else(|| ApiError::internal("Account has no role assigned"))?;

    let token = create_session(&state, &user.id).await?;

    info!(user_id = %user.id, "User signed in");

    Ok(Json(AuthResponse {
        token,
        user: UserResponse {
            id: user.id,
            email: user.email,
            full_name: profile.full_name,
            role,
        },
    }))
}

/// End the caller's current session.
///
/// POST /api/auth/signout
pub async fn signout(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<StatusCode, ApiError> {
    sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
        .bind(&user.token_hash)
        .execute(&state.db)
        .await?;

    info!(user_id = %user.user_id, "User signed out");
    Ok(StatusCode::NO_CONTENT)
}

/// Identity profile and role of the caller.
///
/// GET /api/auth/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<MeResponse>, ApiError> {
    let profile: Profile = sqlx::query_as("SELECT * FROM profiles WHERE user_id = ?")
        .bind(&user.user_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;

    Ok(Json(MeResponse {
        profile,
        role: user.role,
    }))
}

/// GET /api/users/:id/role
pub async fn user_role(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<RoleResponse>, ApiError> {
    let role = db::get_user_role(&state.db, &user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(RoleResponse { user_id, role }))
}

/// Auth middleware: resolves the bearer token once and stores the
/// caller in request extensions for the `AuthUser` extractor
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = extract_token(request.headers()).map(str::to_string) else {
        return ApiError::unauthorized("Authentication required").into_response();
    };

    match resolve_session(&state.db, &token).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(None) => ApiError::unauthorized("Session is invalid or has expired").into_response(),
        Err(e) => e.into_response(),
    }
}

/// Extractor for the authenticated caller placed by `auth_middleware`
#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
        assert!(!verify_password("correct horse", "not-a-hash"));
    }

    #[test]
    fn test_tokens_are_random_and_hashed() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
        assert_eq!(hash_token(&a), hash_token(&a));
        assert_ne!(hash_token(&a), a);
    }

    #[test]
    fn test_extract_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), None);

        headers.insert("Authorization", "Bearer abc123".parse().unwrap());
        assert_eq!(extract_token(&headers), Some("abc123"));

        headers.insert("Authorization", "Basic abc123".parse().unwrap());
        assert_eq!(extract_token(&headers), None);
    }

    #[test]
    fn test_session_expiry_rejects_out_of_range_lifetime() {
        assert!(session_expiry(24).is_some());
        assert!(session_expiry(i64::MAX).is_none());
        assert!(session_expiry(i64::MAX / 3600).is_none());
    }

    async fn insert_session(pool: &db::DbPool, id: &str, expires_at: &str) {
        sqlx::query(
            "INSERT INTO sessions (id, user_id, token_hash, expires_at, created_at) VALUES (?, 'u1', ?, ?, ?)",
        )
        .bind(id)
        .bind(hash_token(id))
        .bind(expires_at)
        .bind(now_timestamp())
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_purge_removes_only_expired_sessions() {
        let pool = db::init_memory().await.unwrap();
        let now = now_timestamp();
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, created_at, updated_at) VALUES ('u1', 'u1@example.edu', 'x', ?, ?)",
        )
        .bind(&now)
        .bind(&now)
        .execute(&pool)
        .await
        .unwrap();

        insert_session(&pool, "old", "2000-01-01T00:00:00.000000Z").await;
        insert_session(&pool, "live", &session_expiry(1).unwrap()).await;

        assert_eq!(purge_expired_sessions(&pool).await.unwrap(), 1);

        let remaining: Vec<(String,)> = sqlx::query_as("SELECT id FROM sessions")
            .fetch_all(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, vec![("live".to_string(),)]);
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Asha@College.EDU "), "asha@college.edu");
    }
}
