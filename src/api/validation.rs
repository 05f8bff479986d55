//! Input validation for API requests.
//!
//! Field validators return `Err(message)`; handlers collect them with
//! `ValidationErrorBuilder` from the `error` module.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Pragmatic email shape check: something@something.tld
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[^\s@]+@[^\s@]+\.[^\s@]+$"
    ).unwrap();

    /// Regex for validating HTTP/HTTPS profile links
    static ref HTTP_URL_REGEX: Regex = Regex::new(
        r"^https?://[a-zA-Z0-9][-a-zA-Z0-9]*(\.[a-zA-Z0-9][-a-zA-Z0-9]*)*(:\d+)?(/[^\s]*)?$"
    ).unwrap();
}

pub const MIN_GRADUATION_YEAR: i64 = 1950;
pub const MAX_GRADUATION_YEAR: i64 = 2100;
pub const MAX_YEARS_OF_EXPERIENCE: i64 = 80;
pub const MAX_BIO_LENGTH: usize = 2000;
pub const MAX_MESSAGE_LENGTH: usize = 1000;
pub const MAX_FIELD_LENGTH: usize = 200;
pub const MAX_SET_ENTRIES: usize = 50;

pub fn validate_email(email: &str) -> Result<(), String> {
    if email.len() > 254 || !EMAIL_REGEX.is_match(email) {
        return Err("Please enter a valid email address".to_string());
    }
    Ok(())
}

pub fn validate_password(password: &str, min_length: usize) -> Result<(), String> {
    if password.chars().count() < min_length {
        return Err(format!("Password must be at least {} characters", min_length));
    }
    if password.len() > 1024 {
        return Err("Password is too long".to_string());
    }
    Ok(())
}

pub fn validate_full_name(name: &str) -> Result<(), String> {
    let len = name.trim().chars().count();
    if len < 2 {
        return Err("Name must be at least 2 characters".to_string());
    }
    if len > 100 {
        return Err("Name is too long".to_string());
    }
    Ok(())
}

/// Validate an optional profile link (LinkedIn, GitHub, avatar)
pub fn validate_url(url: &Option<String>) -> Result<(), String> {
    if let Some(u) = url {
        if u.len() > 2048 {
            return Err("URL is too long (max 2048 characters)".to_string());
        }
        if !HTTP_URL_REGEX.is_match(u) {
            return Err("URL must start with http:// or https://".to_string());
        }
    }
    Ok(())
}

pub fn validate_graduation_year(year: Option<i64>) -> Result<(), String> {
    if let Some(y) = year {
        if !(MIN_GRADUATION_YEAR..=MAX_GRADUATION_YEAR).contains(&y) {
            return Err(format!(
                "Graduation year must be between {} and {}",
                MIN_GRADUATION_YEAR, MAX_GRADUATION_YEAR
            ));
        }
    }
    Ok(())
}

pub fn validate_years_of_experience(years: Option<i64>) -> Result<(), String> {
    if let Some(y) = years {
        if !(0..=MAX_YEARS_OF_EXPERIENCE).contains(&y) {
            return Err(format!(
                "Years of experience must be between 0 and {}",
                MAX_YEARS_OF_EXPERIENCE
            ));
        }
    }
    Ok(())
}

/// Validate the length of a free-text field
pub fn validate_length(value: &str, max: usize, label: &str) -> Result<(), String> {
    if value.chars().count() > max {
        return Err(format!("{} is too long (max {} characters)", label, max));
    }
    Ok(())
}

pub fn validate_optional_length(value: &Option<String>, max: usize, label: &str) -> Result<(), String> {
    match value {
        Some(v) => validate_length(v, max, label),
        None => Ok(()),
    }
}

/// Validate a set of tags such as skills or interests
pub fn validate_string_set(values: &[String], label: &str) -> Result<(), String> {
    if values.len() > MAX_SET_ENTRIES {
        return Err(format!("Too many {} (max {})", label, MAX_SET_ENTRIES));
    }
    if values.iter().any(|v| v.chars().count() > 100) {
        return Err(format!("Each of the {} must be at most 100 characters", label));
    }
    Ok(())
}

/// Validate a UUID string
pub fn validate_uuid(id: &str, field_name: &str) -> Result<(), String> {
    if id.is_empty() {
        return Err(format!("{} is required", field_name));
    }

    if uuid::Uuid::parse_str(id).is_err() {
        return Err(format!("Invalid {} format", field_name));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("asha@college.edu").is_ok());
        assert!(validate_email("first.last+tag@mail.example.org").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("two@@example.com").is_err());
        assert!(validate_email("spaces in@example.com").is_err());
        assert!(validate_email("missing@tld").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret", 6).is_ok());
        assert!(validate_password("short", 6).is_err());
        assert!(validate_password("longer-password", 12).is_ok());
    }

    #[test]
    fn test_validate_full_name() {
        assert!(validate_full_name("Al").is_ok());
        assert!(validate_full_name("A").is_err());
        assert!(validate_full_name("  A  ").is_err());
        assert!(validate_full_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url(&None).is_ok());
        assert!(validate_url(&Some("https://linkedin.com/in/asha".to_string())).is_ok());
        assert!(validate_url(&Some("http://github.com/asha?tab=repos".to_string())).is_ok());

        assert!(validate_url(&Some("linkedin.com/in/asha".to_string())).is_err());
        assert!(validate_url(&Some("javascript:alert(1)".to_string())).is_err());
    }

    #[test]
    fn test_validate_graduation_year() {
        assert!(validate_graduation_year(None).is_ok());
        assert!(validate_graduation_year(Some(2023)).is_ok());
        assert!(validate_graduation_year(Some(1949)).is_err());
        assert!(validate_graduation_year(Some(2101)).is_err());
    }

    #[test]
    fn test_validate_years_of_experience() {
        assert!(validate_years_of_experience(Some(0)).is_ok());
        assert!(validate_years_of_experience(Some(-1)).is_err());
        assert!(validate_years_of_experience(Some(81)).is_err());
    }

    #[test]
    fn test_validate_lengths_and_sets() {
        assert!(validate_optional_length(&Some("x".repeat(MAX_BIO_LENGTH)), MAX_BIO_LENGTH, "Bio").is_ok());
        assert!(validate_optional_length(&Some("x".repeat(MAX_BIO_LENGTH + 1)), MAX_BIO_LENGTH, "Bio").is_err());

        let many: Vec<String> = (0..=MAX_SET_ENTRIES).map(|i| i.to_string()).collect();
        assert!(validate_string_set(&many, "skills").is_err());
        assert!(validate_string_set(&["rust".to_string()], "skills").is_ok());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000", "alumni_id").is_ok());
        assert!(validate_uuid("", "alumni_id").is_err());
        assert!(validate_uuid("not-a-uuid", "alumni_id").is_err());
    }
}
