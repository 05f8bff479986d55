//! Connection request endpoints.
//!
//! Students send requests to alumni with complete profiles; the addressed
//! alumnus answers each pending request once.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::db::{
    self, non_blank, now_timestamp, AlumniProfileRow, AppRole, AuthUser, Connection,
    ConnectionJoinRow, ConnectionStatus, ConnectionWithProfile, CreateConnectionRequest,
    RequestStatus, UpdateConnectionStatusRequest,
};
use crate::{AppState, DbPool};

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_optional_length, validate_uuid, MAX_MESSAGE_LENGTH};

#[derive(Debug, Default, Deserialize)]
pub struct ListConnectionsQuery {
    pub status: Option<ConnectionStatus>,
}

/// Column holding the caller's id for their side of a request
pub(crate) fn own_column(user: &AuthUser) -> &'static str {
    match user.role {
        AppRole::Student => "student_id",
        AppRole::Alumni => "alumni_id",
    }
}

/// Column holding the other party's id, from the caller's point of view
pub(crate) fn other_column(user: &AuthUser) -> &'static str {
    match user.role {
        AppRole::Student => "alumni_id",
        AppRole::Alumni => "student_id",
    }
}

/// Identity of the other party, joined as `profiles p`
pub(crate) const OTHER_PARTY_COLUMNS: &str = "p.user_id AS other_user_id, \
     p.full_name AS other_full_name, p.email AS other_email, p.avatar_url AS other_avatar_url";

/// Validate the common parts of a new request and clean its message
pub(crate) fn validate_new_request(
    user: &AuthUser,
    alumni_id: &str,
    message: &Option<String>,
    kind: &str,
) -> Result<Option<String>, ApiError> {
    if !user.is_student() {
        return Err(ApiError::forbidden(format!("Only students can send {} requests", kind)));
    }

    let message = non_blank(message);
    let mut errors = ValidationErrorBuilder::new();
    errors.check("alumni_id", validate_uuid(alumni_id, "alumni_id"));
    errors.check(
        "message",
        validate_optional_length(&message, MAX_MESSAGE_LENGTH, "Message"),
    );
    errors.finish()?;

    Ok(message)
}

/// Look up an alumnus that can receive requests: alumni role and a complete profile
pub(crate) async fn find_request_target(
    pool: &DbPool,
    alumni_id: &str,
) -> Result<AlumniProfileRow, ApiError> {
    if !db::has_role(pool, alumni_id, AppRole::Alumni).await? {
        return Err(ApiError::not_found("Alumni not found"));
    }

    let target: Option<AlumniProfileRow> =
        sqlx::query_as("SELECT * FROM alumni_profiles WHERE user_id = ? AND is_profile_complete = 1")
            .bind(alumni_id)
            .fetch_optional(pool)
            .await?;

    target.ok_or_else(|| ApiError::not_found("Alumni not found"))
}

/// The caller's connections, newest first. `limit = None` returns all.
pub(crate) async fn list_connections_for(
    pool: &DbPool,
    user: &AuthUser,
    status: Option<ConnectionStatus>,
    limit: Option<i64>,
) -> Result<Vec<ConnectionWithProfile>, sqlx::Error> {
    let sql = format!(
        "SELECT c.*, {} FROM connections c \
         LEFT JOIN profiles p ON p.user_id = c.{} \
         WHERE c.{} = ? AND (? IS NULL OR c.status = ?) \
         ORDER BY c.created_at DESC, c.rowid DESC LIMIT ?",
        OTHER_PARTY_COLUMNS,
        other_column(user),
        own_column(user)
    );
    let status = status.map(|s| s.to_string());

    let rows = sqlx::query_as::<_, ConnectionJoinRow>(&sql)
        .bind(&user.user_id)
        .bind(&status)
        .bind(&status)
        .bind(limit.unwrap_or(-1))
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(ConnectionWithProfile::from).collect())
}

/// GET /api/connections
pub async fn list_connections(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<ListConnectionsQuery>,
) -> Result<Json<Vec<ConnectionWithProfile>>, ApiError> {
    Ok(Json(
        list_connections_for(&state.db, &user, query.status, None).await?,
    ))
}

/// Send a connection request to an alumnus.
///
/// POST /api/connections
pub async fn create_connection(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<CreateConnectionRequest>,
) -> Result<(StatusCode, Json<Connection>), ApiError> {
    let message = validate_new_request(&user, &req.alumni_id, &req.message, "connection")?;
    find_request_target(&state.db, &req.alumni_id).await?;

    let existing: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM connections WHERE student_id = ? AND alumni_id = ?")
            .bind(&user.user_id)
            .bind(&req.alumni_id)
            .fetch_one(&state.db)
            .await?;
    if existing.0 > 0 {
        return Err(ApiError::conflict(
            "You have already sent a connection request to this alumnus",
        ));
    }

    let now = now_timestamp();
    let connection = Connection {
        id: Uuid::new_v4().to_string(),
        student_id: user.user_id.clone(),
        alumni_id: req.alumni_id,
        status: ConnectionStatus::Pending.to_string(),
        message,
        created_at: now.clone(),
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO connections (id, student_id, alumni_id, status, message, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&connection.id)
    .bind(&connection.student_id)
    .bind(&connection.alumni_id)
    .bind(&connection.status)
    .bind(&connection.message)
    .bind(&connection.created_at)
    .bind(&connection.updated_at)
    .execute(&state.db)
    .await?;

    info!(
        connection_id = %connection.id,
        student_id = %connection.student_id,
        alumni_id = %connection.alumni_id,
        "Connection request sent"
    );

    Ok((StatusCode::CREATED, Json(connection)))
}

/// Accept or reject a pending connection addressed to the caller.
///
/// PUT /api/connections/:id/status
pub async fn update_connection_status(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateConnectionStatusRequest>,
) -> Result<Json<Connection>, ApiError> {
    let connection = sqlx::query_as::<_, Connection>("SELECT * FROM connections WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await?
        .filter(|c| c.alumni_id == user.user_id || c.student_id == user.user_id)
        .ok_or_else(|| ApiError::not_found("Connection not found"))?;

    if connection.alumni_id != user.user_id {
        return Err(ApiError::forbidden(
            "Only the addressed alumnus can respond to this request",
        ));
    }

    let current = connection.status_enum()?;
    let next = current.transition_to(req.status)?;

    let result = sqlx::query(
        "UPDATE connections SET status = ?, updated_at = ? WHERE id = ? AND status = ?",
    )
    .bind(next.to_string())
    .bind(now_timestamp())
    .bind(&id)
    .bind(ConnectionStatus::PENDING.to_string())
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::conflict("Request has already been answered"));
    }

    let updated: Connection = sqlx::query_as("SELECT * FROM connections WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    info!(connection_id = %id, status = %next, "Connection request answered");

    Ok(Json(updated))
}
