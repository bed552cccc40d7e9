//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Store-assigned identifier
    #[schema(example = 1)]
    pub id: i64,
    /// Display name
    #[schema(example = "Jane Doe")]
    pub name: String,
    /// Email address (unique)
    #[schema(example = "jane@example.com")]
    pub email: String,
    /// Creation timestamp, immutable once assigned
    pub created_at: DateTime<Utc>,
}

/// User creation data transfer object
///
/// Missing fields deserialize as empty strings so that presence is checked
/// by validation rather than by the JSON decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    /// User display name
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Jane Doe")]
    pub name: String,
    /// User email address
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    #[schema(example = "jane@example.com")]
    pub email: String,
}

impl CreateUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// User update data transfer object
///
/// Empty strings mean "leave unchanged", same as an absent field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct UpdateUser {
    /// New display name
    #[serde(default)]
    #[schema(example = "Jane Smith")]
    pub name: Option<String>,
    /// New email address
    #[serde(default)]
    #[schema(example = "jane.smith@example.com")]
    pub email: Option<String>,
}

impl UpdateUser {
    /// Drop empty fields so only real changes remain.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.filter(|v| !v.is_empty()),
            email: self.email.filter(|v| !v.is_empty()),
        }
    }

    /// Whether at least one field carries a non-empty value.
    pub fn has_changes(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.name) || present(&self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_requires_both_fields() {
        assert!(CreateUser::new("Jane", "jane@example.com").validate().is_ok());
        assert!(CreateUser::new("", "jane@example.com").validate().is_err());
        assert!(CreateUser::new("Jane", "").validate().is_err());
    }

    #[test]
    fn create_user_missing_fields_deserialize_empty() {
        let input: CreateUser = serde_json::from_str(r#"{"name":"Jane"}"#).unwrap();
        assert_eq!(input.email, "");
        assert!(input.validate().is_err());
    }

    #[test]
    fn update_user_empty_strings_are_not_changes() {
        let update = UpdateUser {
            name: Some(String::new()),
            email: None,
        };
        assert!(!update.has_changes());
        assert_eq!(update.normalized(), UpdateUser::default());
    }

    #[test]
    fn update_user_normalized_keeps_non_empty_fields() {
        let update = UpdateUser {
            name: Some("Jane".to_string()),
            email: Some(String::new()),
        }
        .normalized();

        assert!(update.has_changes());
        assert_eq!(update.name.as_deref(), Some("Jane"));
        assert!(update.email.is_none());
    }

    #[test]
    fn user_serializes_expected_fields() {
        let user = User {
            id: 7,
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&user).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 4);
        assert_eq!(object["id"], 7);
        assert!(object["created_at"].is_string());
    }
}
