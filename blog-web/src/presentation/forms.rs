use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::post::{Post, PostDraft};

/// First error message per field, ready for the templates.
pub type FieldErrors = BTreeMap<String, String>;

pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", err.code));
                (field.to_string(), message)
            })
        })
        .collect()
}

/// Passwords are hashed as typed, so blankness is checked without trimming.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Runs the form's validation rules, returning the errors keyed by field.
pub fn check<T: Validate>(form: &T) -> Result<(), FieldErrors> {
    form.validate().map_err(|errors| field_errors(&errors))
}

#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct RegisterForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Please Enter a name"))]
    pub name: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "This field is required."),
        email(message = "Enter a valid email address")
    )]
    pub email: String,
    #[serde(default, skip_serializing)]
    #[validate(
        custom(function = "not_blank", message = "This field is required."),
        length(
            min = 4,
            max = 24,
            message = "Password length should be at least 4 and maximum 24"
        )
    )]
    pub password: String,
}

impl RegisterForm {
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "This field is required."),
        email(message = "Enter a valid email address")
    )]
    pub email: String,
    #[serde(default, skip_serializing)]
    #[validate(custom(function = "not_blank", message = "This field is required."))]
    pub password: String,
}

impl LoginForm {
    pub fn trimmed(self) -> Self {
        Self {
            email: self.email.trim().to_string(),
            password: self.password,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct CommentForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "write some comment"))]
    pub comment: String,
}

impl CommentForm {
    pub fn trimmed(self) -> Self {
        Self {
            comment: self.comment.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct PostForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub subtitle: String,
    #[serde(default)]
    #[validate(url(message = "Invalid URL."))]
    pub img_url: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub body: String,
}

impl PostForm {
    pub fn trimmed(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            subtitle: self.subtitle.trim().to_string(),
            img_url: self.img_url.trim().to_string(),
            body: self.body.trim().to_string(),
        }
    }

    pub fn into_draft(self) -> PostDraft {
        PostDraft {
            title: self.title,
            subtitle: self.subtitle,
            img_url: self.img_url,
            body: self.body,
        }
    }
}

impl From<&Post> for PostForm {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            img_url: post.img_url.clone(),
            body: post.body.clone(),
        }
    }
}
