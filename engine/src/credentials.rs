//! Login credentials.

use crate::validation::{check_text, Field, FieldError, Validate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum username length in characters.
pub const MIN_USERNAME_LEN: usize = 3;

/// Minimum password length in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Username and password as posted to the auth endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Never print the password
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Validate for Credentials {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_text(
            &mut errors,
            Field::Username,
            "Username",
            &self.username,
            MIN_USERNAME_LEN,
        );
        check_text(
            &mut errors,
            Field::Password,
            "Password",
            &self.password,
            MIN_PASSWORD_LEN,
        );
        errors
    }
}
