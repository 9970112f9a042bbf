//! Authentication models

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Role granted to every newly registered user
pub const ROLE_USER: &str = "ROLE_USER";
/// Role for administrative operations
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// Stored user record. Ids are assigned by the user store on first save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier, 0 until saved
    pub id: i64,
    /// Username for login
    pub username: String,
    pub email: String,
    /// bcrypt hash of the password
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Whether the account is active
    pub enabled: bool,
    /// Names of the granted roles
    pub roles: BTreeSet<String>,
}

impl User {
    /// Create a new, unsaved, enabled user with no roles
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: 0,
            username,
            email,
            password_hash,
            first_name: None,
            last_name: None,
            enabled: true,
            roles: BTreeSet::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// First and last name joined by a space
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }
}

/// Named permission grouping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Canonical name, e.g. `ROLE_ADMIN`
    pub name: String,
    pub description: String,
}

impl Role {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Login credentials
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Registration payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl SignUpRequest {
    /// Field checks run before any store access
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::Error;

        let username = self.username.trim();
        if username.is_empty() {
            return Err(Error::Validation("Username must not be blank".to_string()));
        }
        let len = username.chars().count();
        if !(3..=50).contains(&len) {
            return Err(Error::Validation(
                "Username must be between 3 and 50 characters".to_string(),
            ));
        }
        if username.chars().any(char::is_control) {
            return Err(Error::Validation(
                "Username must not contain control characters".to_string(),
            ));
        }

        let email = self.email.trim();
        if email.is_empty() {
            return Err(Error::Validation("Email must not be blank".to_string()));
        }
        if email.chars().count() > 60 {
            return Err(Error::Validation(
                "Email must be at most 60 characters".to_string(),
            ));
        }
        if !is_email_shaped(email) {
            return Err(Error::Validation(
                "Email must be a well-formed email address".to_string(),
            ));
        }

        let len = self.password.chars().count();
        if self.password.trim().is_empty() || !(6..=20).contains(&len) {
            return Err(Error::Validation(
                "Password must be between 6 and 20 characters".to_string(),
            ));
        }

        for (field, value) in [("First name", &self.first_name), ("Last name", &self.last_name)] {
            if value.as_ref().is_some_and(|v| v.chars().count() > 50) {
                return Err(Error::Validation(format!(
                    "{} must be at most 50 characters",
                    field
                )));
            }
        }

        Ok(())
    }
}

fn is_email_shaped(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Sign-in response with token
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
        }
    }
}

/// Short view of the calling user
#[derive(Debug, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub name: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.display_name(),
        }
    }
}

/// Public profile of any user
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        }
    }
}
