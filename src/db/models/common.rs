//! Common types and utilities shared across models.

use serde::{Deserialize, Serialize};

/// Role a user signs up with. Assigned once and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppRole {
    Student,
    Alumni,
}

impl AppRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppRole::Student => "student",
            AppRole::Alumni => "alumni",
        }
    }
}

impl std::fmt::Display for AppRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AppRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(AppRole::Student),
            "alumni" => Ok(AppRole::Alumni),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Current time formatted for storage.
///
/// Fixed-width RFC 3339 in UTC, so timestamps sort correctly as text.
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

/// Helper to parse a JSON string-set column from the database
pub fn parse_string_set(json: &str) -> Vec<String> {
    serde_json::from_str(json).unwrap_or_default()
}

/// Helper to serialize a string set to JSON for the database
pub fn serialize_string_set(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

/// Trim entries, drop empty ones and remove duplicates, keeping the
/// first occurrence of each value in its original position.
pub fn normalize_string_set(values: &[String]) -> Vec<String> {
    let mut result: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() || result.iter().any(|v| v == trimmed) {
            continue;
        }
        result.push(trimmed.to_string());
    }
    result
}

/// Treat blank optional strings as absent.
pub fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub(crate) fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}
