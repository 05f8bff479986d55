//! Role-tagged profile payloads.
//!
//! The role decides which extension record a user owns, so reads and writes
//! carry a `"role"` tag alongside the role-specific fields.

use serde::{Deserialize, Serialize};

use super::alumni::{AlumniProfile, SaveAlumniProfile};
use super::common::AppRole;
use super::student::{SaveStudentProfile, StudentProfile};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleProfile {
    Student(StudentProfile),
    Alumni(AlumniProfile),
}

impl RoleProfile {
    pub fn is_profile_complete(&self) -> bool {
        match self {
            RoleProfile::Student(p) => p.is_profile_complete,
            RoleProfile::Alumni(p) => p.is_profile_complete,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum SaveProfileRequest {
    Student(SaveStudentProfile),
    Alumni(SaveAlumniProfile),
}

impl SaveProfileRequest {
    pub fn role(&self) -> AppRole {
        match self {
            SaveProfileRequest::Student(_) => AppRole::Student,
            SaveProfileRequest::Alumni(_) => AppRole::Alumni,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_request_is_tagged_by_role() {
        let body = r#"{"role":"alumni","current_company":"Acme","job_role":"SRE","industry":"Cloud","graduation_year":2019}"#;
        let req: SaveProfileRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.role(), AppRole::Alumni);
        match req {
            SaveProfileRequest::Alumni(p) => assert!(p.is_complete()),
            SaveProfileRequest::Student(_) => panic!("expected alumni payload"),
        }
    }

    #[test]
    fn test_unknown_role_tag_is_rejected() {
        let body = r#"{"role":"admin"}"#;
        assert!(serde_json::from_str::<SaveProfileRequest>(body).is_err());
    }

    #[test]
    fn test_role_profile_serializes_tag() {
        let profile = RoleProfile::Student(StudentProfile::unsaved("u1"));
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["role"], "student");
        assert_eq!(json["user_id"], "u1");
        assert!(!profile.is_profile_complete());
    }
}
