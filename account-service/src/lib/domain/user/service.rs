use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::user::models::AdminUpdateCommand;
use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::NewPassword;
use crate::domain::user::models::ProfileChanges;
use crate::domain::user::models::SignupCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::errors::ValidationErrors;
use crate::user::ports::AccountServicePort;
use crate::user::ports::UserRepository;

/// Domain service implementation for account operations.
///
/// Password hashing and verification run on the blocking pool so a slow hash
/// never holds up other requests.
pub struct AccountService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> AccountService<UR>
where
    UR: UserRepository,
{
    /// Create a new account service with the default hashing work factor.
    pub fn new(repository: Arc<UR>) -> Self {
        Self::with_password_hasher(repository, auth::PasswordHasher::new())
    }

    pub fn with_password_hasher(repository: Arc<UR>, password_hasher: auth::PasswordHasher) -> Self {
        Self {
            repository,
            password_hasher,
        }
    }

    async fn hash_password(&self, password: &NewPassword) -> Result<String, UserError> {
        let hasher = self.password_hasher.clone();
        let password = password.as_str().to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| UserError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(UserError::from)
    }

    async fn verify_password(&self, candidate: &str, digest: &str) -> Result<bool, UserError> {
        let hasher = self.password_hasher.clone();
        let candidate = candidate.to_string();
        let digest = digest.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&candidate, &digest))
            .await
            .map_err(|e| UserError::Unknown(format!("Password verification task failed: {}", e)))?
            .map_err(UserError::from)
    }

    async fn find_existing(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl<UR> AccountServicePort for AccountService<UR>
where
    UR: UserRepository,
{
    #[tracing::instrument(skip_all, fields(email = %command.email))]
    async fn signup(&self, command: SignupCommand) -> Result<User, UserError> {
        let password_hash = self.hash_password(&command.password).await?;

        let user = User::new(command.name, command.email, password_hash);
        let created_user = self.repository.create(user).await?;

        tracing::info!(user_id = %created_user.id, "Account created");
        Ok(created_user)
    }

    #[tracing::instrument(skip_all, fields(email = %command.email))]
    async fn login(&self, command: LoginCommand) -> Result<User, UserError> {
        let Some(user) = self.repository.find_by_email(&command.email).await? else {
            tracing::debug!("Login for unknown email");
            return Err(UserError::InvalidCredentials);
        };

        if !self
            .verify_password(&command.password, &user.password_hash)
            .await?
        {
            tracing::debug!(user_id = %user.id, "Login with wrong password");
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }

    #[tracing::instrument(skip(self, command))]
    async fn change_password(
        &self,
        id: &UserId,
        command: ChangePasswordCommand,
    ) -> Result<User, UserError> {
        let mut user = self.find_existing(id).await?;

        if !self
            .verify_password(&command.current_password, &user.password_hash)
            .await?
        {
            return Err(UserError::WrongCurrentPassword);
        }

        let mut errors = ValidationErrors::new();
        let new_password = NewPassword::check(
            &mut errors,
            command.new_password,
            command.new_password_confirm,
        )
        .ok_or(UserError::Validation(errors))?;

        let now = Utc::now();
        user.password_hash = self.hash_password(&new_password).await?;
        user.password_changed_at = Some(now);
        user.updated_at = now;

        // Full save: the digest only ever reaches the store through this path.
        let saved = self.repository.save(user).await?;

        tracing::info!(user_id = %saved.id, "Password changed");
        Ok(saved)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.find_existing(id).await
    }

    async fn resolve_session(&self, id: &UserId) -> Result<Option<User>, UserError> {
        self.repository.find_by_id(id).await
    }

    #[tracing::instrument(skip(self))]
    async fn update_profile(
        &self,
        id: &UserId,
        changes: ProfileChanges,
    ) -> Result<User, UserError> {
        self.repository
            .update_profile(id, &changes)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    #[tracing::instrument(skip(self, command))]
    async fn admin_update(
        &self,
        id: &UserId,
        command: AdminUpdateCommand,
    ) -> Result<User, UserError> {
        let mut user = self.find_existing(id).await?;
        let now = Utc::now();

        if let Some(name) = command.name {
            user.name = name;
        }
        if let Some(email) = command.email {
            user.email = email;
        }
        if let Some(role) = command.role {
            user.role = role;
        }
        if let Some(created_by) = command.created_by {
            user.created_by = Some(created_by);
        }
        if let Some(credit) = command.name_changed_credit {
            user.name_changed_credit = credit;
        }
        if let Some(password) = command.password {
            user.password_hash = self.hash_password(&password).await?;
            user.password_changed_at = Some(now);
        }
        user.updated_at = now;

        let saved = self.repository.save(user).await?;

        tracing::info!(user_id = %saved.id, role = %saved.role, "Account updated by admin");
        Ok(saved)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.repository.delete(id).await?;

        tracing::info!(user_id = %id, "Account deleted");
        Ok(())
    }
}
