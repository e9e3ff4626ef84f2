//! Field validation for user-submitted data.
//!
//! Validation runs before anything is sent to the remote catalog. Messages
//! are user-facing and match what the forms display next to each field.

use crate::{error::Result, Error, ProductDraft};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum title length in characters.
pub const MIN_TITLE_LEN: usize = 3;

/// Minimum description length in characters.
pub const MIN_DESCRIPTION_LEN: usize = 10;

/// A validated field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Price,
    Description,
    Category,
    Image,
    Username,
    Password,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Title => "title",
            Field::Price => "price",
            Field::Description => "description",
            Field::Category => "category",
            Field::Image => "image",
            Field::Username => "username",
            Field::Password => "password",
        };
        f.write_str(name)
    }
}

/// A single failing field with its message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl From<FieldError> for Error {
    fn from(err: FieldError) -> Self {
        Error::Validation {
            field: err.field,
            reason: err.message,
        }
    }
}

/// Types that can be checked field by field.
pub trait Validate {
    /// Every failing field, in form order.
    fn field_errors(&self) -> Vec<FieldError>;

    /// Fail with the first failing field.
    fn validate(&self) -> Result<()> {
        match self.field_errors().into_iter().next() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    fn is_valid(&self) -> bool {
        self.field_errors().is_empty()
    }
}

/// Check a required text field with a minimum length.
///
/// Emptiness is judged on the trimmed value, length on the raw value.
pub(crate) fn check_text(
    errors: &mut Vec<FieldError>,
    field: Field,
    label: &str,
    value: &str,
    min_len: usize,
) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, format!("{label} is required")));
    } else if value.chars().count() < min_len {
        errors.push(FieldError::new(
            field,
            format!("{label} must be at least {min_len} characters"),
        ));
    }
}

impl Validate for ProductDraft {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        check_text(&mut errors, Field::Title, "Title", &self.title, MIN_TITLE_LEN);

        if self.price.is_nan() || self.price <= 0.0 {
            errors.push(FieldError::new(Field::Price, "Price must be greater than 0"));
        }

        check_text(
            &mut errors,
            Field::Description,
            "Description",
            &self.description,
            MIN_DESCRIPTION_LEN,
        );

        if self.category.as_str().is_empty() {
            errors.push(FieldError::new(Field::Category, "Category is required"));
        } else if !self.category.is_known() {
            errors.push(FieldError::new(
                Field::Category,
                format!("Unknown category '{}'", self.category),
            ));
        }

        if self.image.trim().is_empty() {
            errors.push(FieldError::new(Field::Image, "Image URL is required"));
        } else if !is_valid_url(&self.image) {
            errors.push(FieldError::new(Field::Image, "Please enter a valid URL"));
        }

        errors
    }
}

/// Whether `input` parses as an absolute URL under the WHATWG rules browsers use.
pub fn is_valid_url(input: &str) -> bool {
    url::Url::parse(input.trim()).is_ok()
}
