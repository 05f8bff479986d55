//! Alumni profile extension and directory entries.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::common::{is_present, non_blank};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct AlumniProfileRow {
    pub id: String,
    pub user_id: String,
    pub graduation_year: Option<i64>,
    pub current_company: String,
    pub job_role: String,
    pub industry: String,
    pub willing_to_mentor: bool,
    pub linkedin_url: Option<String>,
    pub years_of_experience: Option<i64>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub is_profile_complete: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Alumni profile as returned by the API.
///
/// `id` and the timestamps are `None` until the profile is first saved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlumniProfile {
    pub id: Option<String>,
    pub user_id: String,
    pub graduation_year: Option<i64>,
    pub current_company: String,
    pub job_role: String,
    pub industry: String,
    pub willing_to_mentor: bool,
    pub linkedin_url: Option<String>,
    pub years_of_experience: Option<i64>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub is_profile_complete: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl AlumniProfile {
    /// Form defaults for an alumnus who has never saved a profile
    pub fn unsaved(user_id: &str) -> Self {
        Self {
            id: None,
            user_id: user_id.to_string(),
            graduation_year: Some(i64::from(chrono::Utc::now().year()) - 1),
            current_company: String::new(),
            job_role: String::new(),
            industry: String::new(),
            willing_to_mentor: false,
            linkedin_url: None,
            years_of_experience: Some(0),
            location: None,
            bio: None,
            is_profile_complete: false,
            created_at: None,
            updated_at: None,
        }
    }
}

impl From<AlumniProfileRow> for AlumniProfile {
    fn from(row: AlumniProfileRow) -> Self {
        Self {
            id: Some(row.id),
            user_id: row.user_id,
            graduation_year: row.graduation_year,
            current_company: row.current_company,
            job_role: row.job_role,
            industry: row.industry,
            willing_to_mentor: row.willing_to_mentor,
            linkedin_url: row.linkedin_url,
            years_of_experience: row.years_of_experience,
            location: row.location,
            bio: row.bio,
            is_profile_complete: row.is_profile_complete,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

/// Editable alumni fields, sent on every save
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveAlumniProfile {
    #[serde(default)]
    pub graduation_year: Option<i64>,
    #[serde(default)]
    pub current_company: String,
    #[serde(default)]
    pub job_role: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub willing_to_mentor: bool,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub years_of_experience: Option<i64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl SaveAlumniProfile {
    pub fn normalized(self) -> Self {
        Self {
            graduation_year: self.graduation_year,
            current_company: self.current_company.trim().to_string(),
            job_role: self.job_role.trim().to_string(),
            industry: self.industry.trim().to_string(),
            willing_to_mentor: self.willing_to_mentor,
            linkedin_url: non_blank(&self.linkedin_url),
            years_of_experience: self.years_of_experience,
            location: non_blank(&self.location),
            bio: non_blank(&self.bio),
        }
    }

    /// An alumni profile is complete when company, role, industry and
    /// graduation year are all set
    pub fn is_complete(&self) -> bool {
        is_present(&self.current_company)
            && is_present(&self.job_role)
            && is_present(&self.industry)
            && self.graduation_year.is_some_and(|y| y != 0)
    }
}

/// Directory row: a complete alumni profile joined with the identity profile
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct AlumniWithProfile {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub alumni: AlumniProfileRow,
    pub full_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> SaveAlumniProfile {
        SaveAlumniProfile {
            graduation_year: Some(2018),
            current_company: "Acme".to_string(),
            job_role: "Engineer".to_string(),
            industry: "Software".to_string(),
            willing_to_mentor: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_alumni_profile() {
        assert!(complete().is_complete());
    }

    #[test]
    fn test_missing_industry_is_incomplete() {
        let mut p = complete();
        p.industry = String::new();
        assert!(!p.is_complete());
    }

    #[test]
    fn test_each_required_field_flips_completeness() {
        let mut p = complete();
        p.current_company = " ".to_string();
        assert!(!p.is_complete());

        let mut p = complete();
        p.job_role = String::new();
        assert!(!p.is_complete());

        let mut p = complete();
        p.graduation_year = None;
        assert!(!p.is_complete());
    }

    #[test]
    fn test_bio_and_mentoring_are_optional() {
        let mut p = complete();
        p.bio = None;
        p.willing_to_mentor = false;
        assert!(p.is_complete());
    }

    #[test]
    fn test_unsaved_defaults_to_last_year() {
        let p = AlumniProfile::unsaved("u1");
        assert_eq!(p.graduation_year, Some(i64::from(chrono::Utc::now().year()) - 1));
        assert_eq!(p.years_of_experience, Some(0));
        assert!(!p.willing_to_mentor);
    }
}
