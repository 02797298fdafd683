use std::fmt;

use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid id format: {0}")]
    InvalidFormat(String),
}

/// Error for UserName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserNameError {
    #[error("Please tell us your name")]
    Empty,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Please provide your email")]
    Empty,

    #[error("Email is invalid")]
    InvalidFormat(String),
}

/// Error for Role parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("`{0}` is not a valid role")]
    Unknown(String),
}

/// Error for new-password input checks
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordConfirmError {
    #[error("Please provide a password")]
    Missing,

    #[error("Please confirm your password")]
    MissingConfirmation,

    #[error("Passwords are not the same")]
    Mismatch,
}

/// One failing field of a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every failing field of a write, collected before anything is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, error: impl ToString) {
        self.0.push(FieldError {
            field,
            message: error.to_string(),
        });
    }

    /// Unwrap a field result, recording its error under `field`.
    pub fn check<T, E: ToString>(&mut self, field: &'static str, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.push(field, e);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// `Ok(value)` when nothing failed.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validation failed: ")?;
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Top-level error for all account operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid id: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    // Domain-level errors
    #[error("No document found with that ID")]
    NotFound(String),

    #[error("Duplicate field value: name `{0}` already exists")]
    NameAlreadyExists(String),

    #[error("Duplicate field value: email `{0}` already exists")]
    EmailAlreadyExists(String),

    #[error("Please provide email and password")]
    MissingCredentials,

    #[error("incorrect email or password")]
    InvalidCredentials,

    #[error("Your current password is wrong.")]
    WrongCurrentPassword,

    #[error("This route is not for password updates. Please use /updatePassword.")]
    PasswordUpdateNotAllowed,

    // Infrastructure errors
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<auth::PasswordError> for UserError {
    fn from(err: auth::PasswordError) -> Self {
        UserError::Hashing(err.to_string())
    }
}
