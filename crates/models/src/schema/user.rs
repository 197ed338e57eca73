use std::fmt;

use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::{not_blank, required, Role, Schema, ValidationFailure};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    #[validate(
        required,
        length(min = 3, max = 64, message = "username must be at least 3 characters"),
        custom = "username_text"
    )]
    pub username: Option<String>,
    #[validate(
        required,
        email(message = "email must be a valid address"),
        length(max = 255, message = "email must be at most 255 characters")
    )]
    pub email: Option<String>,
    #[validate(required, length(min = 6, message = "password must be at least 6 characters"))]
    pub password: Option<String>,
    #[validate(custom = "role_name")]
    pub role: Option<String>,
    #[validate(custom = "not_blank", length(max = 128, message = "full name must be at most 128 characters"))]
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
}

fn username_text(value: &str) -> Result<(), ValidationError> {
    if value.contains('@') {
        let mut err = ValidationError::new("username");
        err.message = Some("username must not contain @".into());
        return Err(err);
    }
    Ok(())
}

fn role_name(value: &str) -> Result<(), ValidationError> {
    value.parse::<Role>().map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("enum");
        err.message = Some("role must be one of user, expert, provider, admin".into());
        err
    })
}

/// A registration that passed every rule. `password` is still plain text;
/// hashing belongs to the auth service.
#[derive(Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub languages: Vec<String>,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl Schema for NewUser {
    type Input = UserInput;

    fn from_input(input: UserInput) -> Result<Self, ValidationFailure> {
        let role = match input.role.as_deref() {
            Some(text) => text
                .parse::<Role>()
                .map_err(|e| ValidationFailure::single("role", "enum", e.to_string()))?,
            None => Role::default(),
        };
        Ok(NewUser {
            username: required("username", input.username)?.trim().to_string(),
            email: required("email", input.email)?.trim().to_lowercase(),
            password: required("password", input.password)?,
            role,
            full_name: input.full_name.map(|s| s.trim().to_string()),
            bio: input.bio,
            avatar: input.avatar,
            languages: input.languages.into_iter().map(|l| l.trim().to_string()).filter(|l| !l.is_empty()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_registration_defaults_role_and_languages() {
        let user = NewUser::parse(&json!({
            "username": "alice",
            "email": "Alice@Example.com",
            "password": "secret1"
        }))
        .unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.email, "alice@example.com");
        assert!(user.languages.is_empty());
    }

    #[test]
    fn every_broken_rule_is_reported() {
        let err = NewUser::parse(&json!({
            "username": "al",
            "email": "not-an-email",
            "password": "123",
            "role": "superuser"
        }))
        .unwrap_err();
        let fields: Vec<&str> = err.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "password", "role", "username"]);
    }

    #[test]
    fn wrong_type_does_not_hide_other_rules() {
        let err = NewUser::parse(&json!({"username": 12, "email": "not-an-email", "password": "1"})).unwrap_err();
        let found: Vec<(&str, &str)> = err.violations.iter().map(|v| (v.field.as_str(), v.code.as_str())).collect();
        assert_eq!(found, vec![("email", "email"), ("password", "length"), ("username", "invalid_type")]);
    }

    #[test]
    fn text_longer_than_its_column_fails() {
        let err = NewUser::parse(&json!({
            "username": "alice",
            "email": format!("{}@example.com", "a".repeat(250)),
            "password": "secret1",
            "fullName": "n".repeat(129)
        }))
        .unwrap_err();
        assert!(err.has_field("email"));
        assert!(err.has_field("fullName"));
        assert!(!err.has_field("username"));
    }

    #[test]
    fn username_cannot_look_like_an_email() {
        let err = NewUser::parse(&json!({"username": "a@b.co", "email": "a@b.co", "password": "secret1"})).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].field, "username");
        assert_eq!(err.violations[0].code, "username");
    }

    #[test]
    fn missing_fields_are_required() {
        let err = NewUser::parse(&json!({})).unwrap_err();
        assert!(err.violations.iter().all(|v| v.code == "required"));
        assert_eq!(err.violations.len(), 3);
    }

    #[test]
    fn debug_output_hides_password() {
        let user = NewUser::parse(&json!({
            "username": "bob",
            "email": "bob@example.com",
            "password": "hunter22",
            "role": "provider"
        }))
        .unwrap();
        let printed = format!("{user:?}");
        assert!(!printed.contains("hunter22"));
        assert_eq!(user.role, Role::Provider);
    }
}
