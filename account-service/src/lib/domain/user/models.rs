use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::PasswordConfirmError;
use crate::user::errors::RoleError;
use crate::user::errors::UserError;
use crate::user::errors::UserIdError;
use crate::user::errors::UserNameError;
use crate::user::errors::ValidationErrors;

/// User aggregate entity.
///
/// `password_hash` is the only stored form of the password; it is loaded with the
/// record so login and password changes can verify against it, and never leaves
/// the service through a response type.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: UserName,
    pub email: EmailAddress,
    pub password_hash: String,
    pub password_changed_at: Option<DateTime<Utc>>,
    pub password_reset_token: Option<String>,
    pub password_reset_expires: Option<DateTime<Utc>>,
    pub role: Role,
    pub created_by: Option<String>,
    pub name_changed_credit: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// New ordinary account with store defaults for every optional field.
    pub fn new(name: UserName, email: EmailAddress, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            name,
            email,
            password_hash,
            password_changed_at: None,
            password_reset_token: None,
            password_reset_expires: None,
            role: Role::default(),
            created_by: None,
            name_changed_credit: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name value type
///
/// Any non-blank string, stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    /// # Errors
    /// * `Empty` - Name is empty or whitespace only
    pub fn new(name: String) -> Result<Self, UserNameError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(UserNameError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validated with an RFC 5322 parser, stored trimmed and lower-cased so the
/// uniqueness constraint is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// # Errors
    /// * `Empty` - Email is empty
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let normalized = email.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(EmailError::Empty);
        }
        email_address::EmailAddress::from_str(&normalized)
            .map(|_| EmailAddress(normalized))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Capability class of an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A plaintext password that has passed its confirmation check.
///
/// Only exists between request parsing and hashing; the confirmation value is
/// dropped on construction.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPassword(String);

impl NewPassword {
    /// # Errors
    /// * `Missing` - No password (or an empty one) was supplied
    /// * `MissingConfirmation` - No confirmation was supplied
    /// * `Mismatch` - Confirmation differs from the password
    pub fn confirmed(
        password: Option<String>,
        confirmation: Option<String>,
    ) -> Result<Self, PasswordConfirmError> {
        let password = password
            .filter(|p| !p.is_empty())
            .ok_or(PasswordConfirmError::Missing)?;
        let confirmation = confirmation
            .filter(|c| !c.is_empty())
            .ok_or(PasswordConfirmError::MissingConfirmation)?;

        if password != confirmation {
            return Err(PasswordConfirmError::Mismatch);
        }
        Ok(Self(password))
    }

    /// Like [`NewPassword::confirmed`], but records a failure in `errors` under
    /// `password` or `passwordConfirm`.
    pub fn check(
        errors: &mut ValidationErrors,
        password: Option<String>,
        confirmation: Option<String>,
    ) -> Option<Self> {
        match Self::confirmed(password, confirmation) {
            Ok(password) => Some(password),
            Err(e @ PasswordConfirmError::Missing) => {
                errors.push("password", e);
                None
            }
            Err(e) => {
                errors.push("passwordConfirm", e);
                None
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NewPassword(..)")
    }
}

/// Command to register a new account
#[derive(Debug)]
pub struct SignupCommand {
    pub name: UserName,
    pub email: EmailAddress,
    pub password: NewPassword,
}

/// Credentials presented at login.
#[derive(Debug)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

impl LoginCommand {
    /// Both fields must be present and non-empty.
    ///
    /// # Errors
    /// * `MissingCredentials` - Email or password absent
    pub fn new(email: Option<String>, password: Option<String>) -> Result<Self, UserError> {
        match (
            email.filter(|e| !e.trim().is_empty()),
            password.filter(|p| !p.is_empty()),
        ) {
            (Some(email), Some(password)) => Ok(Self {
                email: email.trim().to_lowercase(),
                password,
            }),
            _ => Err(UserError::MissingCredentials),
        }
    }
}

/// Command to replace the caller's password.
///
/// The new password stays unconfirmed until the current one has been verified.
pub struct ChangePasswordCommand {
    pub current_password: String,
    pub new_password: Option<String>,
    pub new_password_confirm: Option<String>,
}

impl fmt::Debug for ChangePasswordCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChangePasswordCommand(..)")
    }
}

/// Partial update of the fields a user may change on their own record.
///
/// Carries no password field: this path is never allowed to touch the digest.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProfileChanges {
    pub name: Option<UserName>,
    pub email: Option<EmailAddress>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

/// Unrestricted update issued by an administrator.
///
/// Only provided fields will be updated. A password, when present, is re-hashed.
#[derive(Debug, Default)]
pub struct AdminUpdateCommand {
    pub name: Option<UserName>,
    pub email: Option<EmailAddress>,
    pub role: Option<Role>,
    pub created_by: Option<String>,
    pub name_changed_credit: Option<i32>,
    pub password: Option<NewPassword>,
}
