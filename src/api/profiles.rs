//! Profile endpoints: the caller's role-specific profile and avatar.
//!
//! `is_profile_complete` is always derived from the submitted fields at save
//! time and stored with the record; a value sent by the client is ignored.

use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::db::{
    now_timestamp, serialize_string_set, AlumniProfile, AlumniProfileRow, AppRole, AuthUser,
    Profile, RoleProfile, SaveAlumniProfile, SaveProfileRequest, SaveStudentProfile,
    StudentProfile, StudentProfileRow, UpdateAvatarRequest,
};
use crate::{AppState, DbPool};

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{
    validate_graduation_year, validate_length, validate_optional_length, validate_string_set,
    validate_url, validate_years_of_experience, MAX_BIO_LENGTH, MAX_FIELD_LENGTH,
};

fn validate_student(req: &SaveStudentProfile) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    errors.check("branch", validate_length(&req.branch, MAX_FIELD_LENGTH, "Branch"));
    errors.check("graduation_year", validate_graduation_year(req.graduation_year));
    errors.check("skills", validate_string_set(&req.skills, "skills"));
    errors.check("interests", validate_string_set(&req.interests, "interests"));
    errors.check("linkedin_url", validate_url(&req.linkedin_url));
    errors.check("github_url", validate_url(&req.github_url));
    errors.check("bio", validate_optional_length(&req.bio, MAX_BIO_LENGTH, "Bio"));
    errors.finish()
}

fn validate_alumni(req: &SaveAlumniProfile) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    errors.check("graduation_year", validate_graduation_year(req.graduation_year));
    errors.check(
        "current_company",
        validate_length(&req.current_company, MAX_FIELD_LENGTH, "Company"),
    );
    errors.check("job_role", validate_length(&req.job_role, MAX_FIELD_LENGTH, "Job role"));
    errors.check("industry", validate_length(&req.industry, MAX_FIELD_LENGTH, "Industry"));
    errors.check("linkedin_url", validate_url(&req.linkedin_url));
    errors.check(
        "years_of_experience",
        validate_years_of_experience(req.years_of_experience),
    );
    errors.check(
        "location",
        validate_optional_length(&req.location, MAX_FIELD_LENGTH, "Location"),
    );
    errors.check("bio", validate_optional_length(&req.bio, MAX_BIO_LENGTH, "Bio"));
    errors.finish()
}

pub(crate) async fn fetch_student_profile(
    pool: &DbPool,
    user_id: &str,
) -> Result<Option<StudentProfile>, sqlx::Error> {
    let row: Option<StudentProfileRow> =
        sqlx::query_as("SELECT * FROM student_profiles WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(StudentProfile::from))
}

pub(crate) async fn fetch_alumni_profile(
    pool: &DbPool,
    user_id: &str,
) -> Result<Option<AlumniProfile>, sqlx::Error> {
    let row: Option<AlumniProfileRow> =
        sqlx::query_as("SELECT * FROM alumni_profiles WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(AlumniProfile::from))
}

/// The caller's stored profile, or form defaults if never saved
pub(crate) async fn load_role_profile(pool: &DbPool, user: &AuthUser) -> Result<RoleProfile, sqlx::Error> {
    Ok(match user.role {
        AppRole::Student => RoleProfile::Student(
            fetch_student_profile(pool, &user.user_id)
                .await?
                .unwrap_or_else(|| StudentProfile::unsaved(&user.user_id)),
        ),
        AppRole::Alumni => RoleProfile::Alumni(
            fetch_alumni_profile(pool, &user.user_id)
                .await?
                .unwrap_or_else(|| AlumniProfile::unsaved(&user.user_id)),
        ),
    })
}

async fn upsert_student(
    pool: &DbPool,
    user_id: &str,
    req: &SaveStudentProfile,
) -> Result<StudentProfile, ApiError> {
    let now = now_timestamp();
    let complete = req.is_complete();

    sqlx::query(
        r#"
        INSERT INTO student_profiles (
            id, user_id, branch, graduation_year, skills, interests,
            linkedin_url, github_url, bio, is_profile_complete, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            branch = excluded.branch,
            graduation_year = excluded.graduation_year,
            skills = excluded.skills,
            interests = excluded.interests,
            linkedin_url = excluded.linkedin_url,
            github_url = excluded.github_url,
            bio = excluded.bio,
            is_profile_complete = excluded.is_profile_complete,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(&req.branch)
    .bind(req.graduation_year)
    .bind(serialize_string_set(&req.skills))
    .bind(serialize_string_set(&req.interests))
    .bind(&req.linkedin_url)
    .bind(&req.github_url)
    .bind(&req.bio)
    .bind(complete)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    fetch_student_profile(pool, user_id)
        .await?
        .ok_or_else(|| ApiError::internal("Saved profile could not be read back"))
}

async fn upsert_alumni(
    pool: &DbPool,
    user_id: &str,
    req: &SaveAlumniProfile,
) -> Result<AlumniProfile, ApiError> {
    let now = now_timestamp();
    let complete = req.is_complete();

    sqlx::query(
        r#"
        INSERT INTO alumni_profiles (
            id, user_id, graduation_year, current_company, job_role, industry,
            willing_to_mentor, linkedin_url, years_of_experience, location, bio,
            is_profile_complete, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            graduation_year = excluded.graduation_year,
            current_company = excluded.current_company,
            job_role = excluded.job_role,
            industry = excluded.industry,
            willing_to_mentor = excluded.willing_to_mentor,
            linkedin_url = excluded.linkedin_url,
            years_of_experience = excluded.years_of_experience,
            location = excluded.location,
            bio = excluded.bio,
            is_profile_complete = excluded.is_profile_complete,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(req.graduation_year)
    .bind(&req.current_company)
    .bind(&req.job_role)
    .bind(&req.industry)
    .bind(req.willing_to_mentor)
    .bind(&req.linkedin_url)
    .bind(req.years_of_experience)
    .bind(&req.location)
    .bind(&req.bio)
    .bind(complete)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    fetch_alumni_profile(pool, user_id)
        .await?
        .ok_or_else(|| ApiError::internal("Saved profile could not be read back"))
}

/// GET /api/profile
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<RoleProfile>, ApiError> {
    Ok(Json(load_role_profile(&state.db, &user).await?))
}

/// Create or replace the caller's role-specific profile.
///
/// PUT /api/profile
pub async fn save_profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<SaveProfileRequest>,
) -> Result<Json<RoleProfile>, ApiError> {
    if req.role() != user.role {
        return Err(ApiError::forbidden(format!(
            "Your account is registered as {}",
            user.role
        )));
    }

    let saved = match req {
        SaveProfileRequest::Student(p) => {
            let p = p.normalized();
            validate_student(&p)?;
            RoleProfile::Student(upsert_student(&state.db, &user.user_id, &p).await?)
        }
        SaveProfileRequest::Alumni(p) => {
            let p = p.normalized();
            validate_alumni(&p)?;
            RoleProfile::Alumni(upsert_alumni(&state.db, &user.user_id, &p).await?)
        }
    };

    info!(
        user_id = %user.user_id,
        role = %user.role,
        complete = saved.is_profile_complete(),
        "Profile saved"
    );

    Ok(Json(saved))
}

/// PUT /api/profile/avatar
pub async fn update_avatar(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<UpdateAvatarRequest>,
) -> Result<Json<Profile>, ApiError> {
    let avatar_url = crate::db::non_blank(&req.avatar_url);
    if let Err(e) = validate_url(&avatar_url) {
        return Err(ApiError::validation_field("avatar_url", e));
    }

    let result = sqlx::query("UPDATE profiles SET avatar_url = ?, updated_at = ? WHERE user_id = ?")
        .bind(&avatar_url)
        .bind(now_timestamp())
        .bind(&user.user_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Profile not found"));
    }

    let profile: Profile = sqlx::query_as("SELECT * FROM profiles WHERE user_id = ?")
        .bind(&user.user_id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(profile))
}
