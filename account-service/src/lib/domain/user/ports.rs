use async_trait::async_trait;

use crate::domain::user::models::AdminUpdateCommand;
use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::ProfileChanges;
use crate::domain::user::models::SignupCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for account use-cases.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new ordinary account.
    ///
    /// # Errors
    /// * `NameAlreadyExists` / `EmailAlreadyExists` - Uniqueness violated
    /// * `Hashing` - Password hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn signup(&self, command: SignupCommand) -> Result<User, UserError>;

    /// Check credentials and return the matching account.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<User, UserError>;

    /// Replace the password of `id` after verifying the current one.
    ///
    /// # Returns
    /// Saved account with the new digest
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `WrongCurrentPassword` - Current password does not verify
    /// * `DatabaseError` - Database operation failed
    async fn change_password(
        &self,
        id: &UserId,
        command: ChangePasswordCommand,
    ) -> Result<User, UserError>;

    /// Retrieve account by identifier.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Look up the account a session token points at.
    ///
    /// # Returns
    /// `None` when the account no longer exists
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn resolve_session(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Apply a name/email change to the caller's own account.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `NameAlreadyExists` / `EmailAlreadyExists` - Uniqueness violated
    /// * `DatabaseError` - Database operation failed
    async fn update_profile(&self, id: &UserId, changes: ProfileChanges)
        -> Result<User, UserError>;

    /// Apply an unrestricted administrative update to any account.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `NameAlreadyExists` / `EmailAlreadyExists` - Uniqueness violated
    /// * `Hashing` - Password hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn admin_update(
        &self,
        id: &UserId,
        command: AdminUpdateCommand,
    ) -> Result<User, UserError>;

    /// Hard-delete an account.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_user(&self, id: &UserId) -> Result<(), UserError>;
}

/// Persistence operations for the user aggregate.
///
/// Implementations enforce uniqueness of `name` and `email`.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `NameAlreadyExists` / `EmailAlreadyExists` - Uniqueness violated
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by normalized email address, digest included.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Write every field of an existing record, digest included.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `NameAlreadyExists` / `EmailAlreadyExists` - Uniqueness violated
    /// * `DatabaseError` - Database operation failed
    async fn save(&self, user: User) -> Result<User, UserError>;

    /// Apply a partial name/email update and return the updated record.
    ///
    /// # Returns
    /// Updated user, or None if no record has this id
    ///
    /// # Errors
    /// * `NameAlreadyExists` / `EmailAlreadyExists` - Uniqueness violated
    /// * `DatabaseError` - Database operation failed
    async fn update_profile(
        &self,
        id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<Option<User>, UserError>;

    /// Remove user from storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;
}
