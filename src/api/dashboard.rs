//! Dashboard endpoint: the caller's recent requests and status counts.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::db::{
    AuthUser, ConnectionStatus, DashboardResponse, MentorshipStatus, Profile, RequestStats,
};
use crate::{AppState, DbPool};

use super::connections::{list_connections_for, own_column};
use super::error::ApiError;
use super::mentorship::list_mentorship_for;
use super::profiles::load_role_profile;

/// Count the caller's requests by status across all of their rows
async fn request_stats(pool: &DbPool, user: &AuthUser) -> Result<RequestStats, sqlx::Error> {
    let column = own_column(user);

    let connections: Vec<(String,)> =
        sqlx::query_as(&format!("SELECT status FROM connections WHERE {} = ?", column))
            .bind(&user.user_id)
            .fetch_all(pool)
            .await?;

    let mentorships: Vec<(String,)> = sqlx::query_as(&format!(
        "SELECT status FROM mentorship_requests WHERE {} = ?",
        column
    ))
    .bind(&user.user_id)
    .fetch_all(pool)
    .await?;

    Ok(RequestStats::from_statuses(
        connections
            .iter()
            .filter_map(|(s,)| s.parse::<ConnectionStatus>().ok()),
        mentorships
            .iter()
            .filter_map(|(s,)| s.parse::<MentorshipStatus>().ok()),
    ))
}

/// GET /api/dashboard
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<DashboardResponse>, ApiError> {
    let profile: Profile = sqlx::query_as("SELECT * FROM profiles WHERE user_id = ?")
        .bind(&user.user_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;

    let profile_complete = load_role_profile(&state.db, &user)
        .await?
        .is_profile_complete();

    let limit = Some(state.config.dashboard.recent_limit);
    let recent_connections = list_connections_for(&state.db, &user, None, limit).await?;
    let recent_mentorship_requests = list_mentorship_for(&state.db, &user, None, limit).await?;
    let stats = request_stats(&state.db, &user).await?;

    Ok(Json(DashboardResponse {
        role: user.role,
        full_name: profile.full_name,
        profile_complete,
        stats,
        recent_connections,
        recent_mentorship_requests,
    }))
}
