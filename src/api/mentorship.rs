//! Mentorship request endpoints.

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
    normalize_string_set, now_timestamp, serialize_string_set, AuthUser, CreateMentorshipRequest,
    MentorshipJoinRow, MentorshipRequest, MentorshipRequestRow, MentorshipStatus,
    MentorshipWithProfile, RequestStatus, UpdateMentorshipStatusRequest,
};
use crate::{AppState, DbPool};

use super::connections::{
    find_request_target, other_column, own_column, validate_new_request, OTHER_PARTY_COLUMNS,
};
use super::error::ApiError;
use super::validation::validate_string_set;

#[derive(Debug, Default, Deserialize)]
pub struct ListMentorshipQuery {
    pub status: Option<MentorshipStatus>,
}

async fn fetch_request(pool: &DbPool, id: &str) -> Result<Option<MentorshipRequest>, sqlx::Error> {
    let row: Option<MentorshipRequestRow> =
        sqlx::query_as("SELECT * FROM mentorship_requests WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(MentorshipRequest::from))
}

/// The caller's mentorship requests, newest first. `limit = None` returns all.
pub(crate) async fn list_mentorship_for(
    pool: &DbPool,
    user: &AuthUser,
    status: Option<MentorshipStatus>,
    limit: Option<i64>,
) -> Result<Vec<MentorshipWithProfile>, sqlx::Error> {
    let sql = format!(
        "SELECT m.*, {} FROM mentorship_requests m \
         LEFT JOIN profiles p ON p.user_id = m.{} \
         WHERE m.{} = ? AND (? IS NULL OR m.status = ?) \
         ORDER BY m.created_at DESC, m.rowid DESC LIMIT ?",
        OTHER_PARTY_COLUMNS,
        other_column(user),
        own_column(user)
    );
    let status = status.map(|s| s.to_string());

    let rows = sqlx::query_as::<_, MentorshipJoinRow>(&sql)
        .bind(&user.user_id)
        .bind(&status)
        .bind(&status)
        .bind(limit.unwrap_or(-1))
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(MentorshipWithProfile::from).collect())
}

/// GET /api/mentorship-requests
pub async fn list_mentorship_requests(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<ListMentorshipQuery>,
) -> Result<Json<Vec<MentorshipWithProfile>>, ApiError> {
    Ok(Json(
        list_mentorship_for(&state.db, &user, query.status, None).await?,
    ))
}

/// Ask an alumnus who mentors for guidance.
///
/// POST /api/mentorship-requests
pub async fn create_mentorship_request(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<CreateMentorshipRequest>,
) -> Result<(StatusCode, Json<MentorshipRequest>), ApiError> {
    let message = validate_new_request(&user, &req.alumni_id, &req.message, "mentorship")?;

    let areas_of_interest = normalize_string_set(&req.areas_of_interest);
    if let Err(e) = validate_string_set(&areas_of_interest, "areas of interest") {
        return Err(ApiError::validation_field("areas_of_interest", e));
    }

    let target = find_request_target(&state.db, &req.alumni_id).await?;
    if !target.willing_to_mentor {
        return Err(ApiError::forbidden(
            "This alumnus is not accepting mentorship requests",
        ));
    }

    let existing: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM mentorship_requests WHERE student_id = ? AND alumni_id = ?",
    )
    .bind(&user.user_id)
    .bind(&req.alumni_id)
    .fetch_one(&state.db)
    .await?;
    if existing.0 > 0 {
        return Err(ApiError::conflict(
            "You have already sent a mentorship request to this alumnus",
        ));
    }

    let now = now_timestamp();
    let request = MentorshipRequest {
        id: Uuid::new_v4().to_string(),
        student_id: user.user_id.clone(),
        alumni_id: req.alumni_id,
        status: MentorshipStatus::Pending.to_string(),
        message,
        areas_of_interest,
        created_at: now.clone(),
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO mentorship_requests
            (id, student_id, alumni_id, status, message, areas_of_interest, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&request.id)
    .bind(&request.student_id)
    .bind(&request.alumni_id)
    .bind(&request.status)
    .bind(&request.message)
    .bind(serialize_string_set(&request.areas_of_interest))
    .bind(&request.created_at)
    .bind(&request.updated_at)
    .execute(&state.db)
    .await?;

    info!(
        request_id = %request.id,
        student_id = %request.student_id,
        alumni_id = %request.alumni_id,
        "Mentorship request sent"
    );

    Ok((StatusCode::CREATED, Json(request)))
}

/// Approve or reject a pending mentorship request addressed to the caller.
///
/// PUT /api/mentorship-requests/:id/status
pub async fn update_mentorship_status(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateMentorshipStatusRequest>,
) -> Result<Json<MentorshipRequest>, ApiError> {
    let request = fetch_request(&state.db, &id)
        .await?
        .filter(|r| r.alumni_id == user.user_id || r.student_id == user.user_id)
        .ok_or_else(|| ApiError::not_found("Mentorship request not found"))?;

    if request.alumni_id != user.user_id {
        return Err(ApiError::forbidden(
            "Only the addressed alumnus can respond to this request",
        ));
    }

    let current = request.status_enum()?;
    let next = current.transition_to(req.status)?;

    let result = sqlx::query(
        "UPDATE mentorship_requests SET status = ?, updated_at = ? WHERE id = ? AND status = ?",
    )
    .bind(next.to_string())
    .bind(now_timestamp())
    .bind(&id)
    .bind(MentorshipStatus::PENDING.to_string())
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::conflict("Request has already been answered"));
    }

    let updated = fetch_request(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Mentorship request not found"))?;

    info!(request_id = %id, status = %next, "Mentorship request answered");

    Ok(Json(updated))
}
