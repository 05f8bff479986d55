//! Alumni directory endpoint.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use crate::db::{AlumniWithProfile, AuthUser};
use crate::directory::{DirectoryFilter, DirectoryQuery, FilterOptions};
use crate::{AppState, DbPool};

use super::error::ApiError;

/// One directory card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryEntry {
    #[serde(flatten)]
    pub alumni: AlumniWithProfile,
    /// The caller already sent a connection request to this alumnus
    pub connection_requested: bool,
    /// The caller already sent a mentorship request to this alumnus
    pub mentorship_requested: bool,
    /// Whether a mentorship request may be offered on this card
    pub can_request_mentorship: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DirectoryResponse {
    pub alumni: Vec<DirectoryEntry>,
    /// Complete alumni profiles before filtering
    pub total: usize,
    pub filters: FilterOptions,
}

/// Every complete alumni profile with its identity, in creation order
pub(crate) async fn fetch_complete_alumni(pool: &DbPool) -> Result<Vec<AlumniWithProfile>, sqlx::Error> {
    sqlx::query_as::<_, AlumniWithProfile>(
        r#"
        SELECT a.*, p.full_name, p.email, p.avatar_url
        FROM alumni_profiles a
        JOIN profiles p ON p.user_id = a.user_id
        WHERE a.is_profile_complete = 1
        ORDER BY a.created_at ASC, a.rowid ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Alumni ids the student has already sent a request of the given kind to
async fn requested_alumni(
    pool: &DbPool,
    table: RequestTable,
    student_id: &str,
) -> Result<HashSet<String>, sqlx::Error> {
    let sql = match table {
        RequestTable::Connections => "SELECT alumni_id FROM connections WHERE student_id = ?",
        RequestTable::Mentorship => "SELECT alumni_id FROM mentorship_requests WHERE student_id = ?",
    };
    let rows: Vec<(String,)> = sqlx::query_as(sql).bind(student_id).fetch_all(pool).await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

#[derive(Debug, Clone, Copy)]
enum RequestTable {
    Connections,
    Mentorship,
}

/// GET /api/directory
pub async fn list_directory(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<DirectoryQuery>,
) -> Result<Json<DirectoryResponse>, ApiError> {
    let filter = DirectoryFilter::from_query(query)
        .map_err(|e| ApiError::validation_field("graduation_year", e))?;

    let alumni = fetch_complete_alumni(&state.db).await?;
    let total = alumni.len();
    let filters = FilterOptions::from_alumni(&alumni);

    let (connected, mentored) = if user.is_student() {
        (
            requested_alumni(&state.db, RequestTable::Connections, &user.user_id).await?,
            requested_alumni(&state.db, RequestTable::Mentorship, &user.user_id).await?,
        )
    } else {
        (HashSet::new(), HashSet::new())
    };

    let entries = filter
        .apply(alumni)
        .into_iter()
        .map(|alumni| {
            let id = alumni.alumni.user_id.as_str();
            let connection_requested = connected.contains(id);
            let mentorship_requested = mentored.contains(id);
            let can_request_mentorship =
                user.is_student() && alumni.alumni.willing_to_mentor && !mentorship_requested;
            DirectoryEntry {
                alumni,
                connection_requested,
                mentorship_requested,
                can_request_mentorship,
            }
        })
        .collect();

    Ok(Json(DirectoryResponse {
        alumni: entries,
        total,
        filters,
    }))
}
