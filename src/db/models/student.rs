//! Student profile extension.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::common::{is_present, non_blank, normalize_string_set, parse_string_set};

/// Raw `student_profiles` row; list columns are JSON text
#[derive(Debug, Clone, FromRow)]
pub struct StudentProfileRow {
    pub id: String,
    pub user_id: String,
    pub branch: String,
    pub graduation_year: Option<i64>,
    pub skills: String,
    pub interests: String,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub bio: Option<String>,
    pub is_profile_complete: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Student profile as returned by the API.
///
/// `id` and the timestamps are `None` until the profile is first saved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentProfile {
    pub id: Option<String>,
    pub user_id: String,
    pub branch: String,
    pub graduation_year: Option<i64>,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub bio: Option<String>,
    pub is_profile_complete: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl StudentProfile {
    /// Form defaults for a student who has never saved a profile
    pub fn unsaved(user_id: &str) -> Self {
        Self {
            id: None,
            user_id: user_id.to_string(),
            branch: String::new(),
            graduation_year: Some(i64::from(chrono::Utc::now().year()) + 1),
            skills: Vec::new(),
            interests: Vec::new(),
            linkedin_url: None,
            github_url: None,
            bio: None,
            is_profile_complete: false,
            created_at: None,
            updated_at: None,
        }
    }
}

impl From<StudentProfileRow> for StudentProfile {
    fn from(row: StudentProfileRow) -> Self {
        Self {
            id: Some(row.id),
            user_id: row.user_id,
            branch: row.branch,
            graduation_year: row.graduation_year,
            skills: parse_string_set(&row.skills),
            interests: parse_string_set(&row.interests),
            linkedin_url: row.linkedin_url,
            github_url: row.github_url,
            bio: row.bio,
            is_profile_complete: row.is_profile_complete,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

/// Editable student fields, sent on every save
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveStudentProfile {
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub graduation_year: Option<i64>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl SaveStudentProfile {
    /// Trim text, drop blank optionals and dedupe the skill/interest sets
    pub fn normalized(self) -> Self {
        Self {
            branch: self.branch.trim().to_string(),
            graduation_year: self.graduation_year,
            skills: normalize_string_set(&self.skills),
            interests: normalize_string_set(&self.interests),
            linkedin_url: non_blank(&self.linkedin_url),
            github_url: non_blank(&self.github_url),
            bio: non_blank(&self.bio),
        }
    }

    /// A student profile is complete when branch, graduation year and bio are set
    pub fn is_complete(&self) -> bool {
        is_present(&self.branch)
            && self.graduation_year.is_some_and(|y| y != 0)
            && self.bio.as_deref().is_some_and(is_present)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> SaveStudentProfile {
        SaveStudentProfile {
            branch: "Computer Science".to_string(),
            graduation_year: Some(2026),
            skills: vec!["rust".to_string()],
            interests: vec![],
            linkedin_url: None,
            github_url: None,
            bio: Some("Final year student".to_string()),
        }
    }

    #[test]
    fn test_complete_when_required_fields_present() {
        assert!(complete().is_complete());
    }

    #[test]
    fn test_each_required_field_flips_completeness() {
        let mut p = complete();
        p.branch = String::new();
        assert!(!p.is_complete());

        let mut p = complete();
        p.graduation_year = None;
        assert!(!p.is_complete());

        let mut p = complete();
        p.graduation_year = Some(0);
        assert!(!p.is_complete());

        let mut p = complete();
        p.bio = Some("   ".to_string());
        assert!(!p.is_complete());
    }

    #[test]
    fn test_optional_fields_do_not_affect_completeness() {
        let mut p = complete();
        p.skills.clear();
        p.linkedin_url = None;
        assert!(p.is_complete());
    }

    #[test]
    fn test_normalized_cleans_input() {
        let p = SaveStudentProfile {
            branch: "  ECE ".to_string(),
            skills: vec!["go".to_string(), " go".to_string(), "".to_string()],
            github_url: Some("   ".to_string()),
            ..Default::default()
        }
        .normalized();

        assert_eq!(p.branch, "ECE");
        assert_eq!(p.skills, vec!["go"]);
        assert_eq!(p.github_url, None);
    }

    #[test]
    fn test_unsaved_defaults_to_next_year() {
        let p = StudentProfile::unsaved("u1");
        let next_year = i64::from(chrono::Utc::now().year()) + 1;
        assert_eq!(p.graduation_year, Some(next_year));
        assert!(p.id.is_none());
        assert!(!p.is_profile_complete);
    }
}
