use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::user::models::ProfileChanges;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-local user store, selected with a `memory://` database url.
///
/// Enforces the same name/email uniqueness as the `users` table. Contents are
/// lost when the process exits.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_unique(
    users: &HashMap<UserId, User>,
    id: &UserId,
    name: &str,
    email: &str,
) -> Result<(), UserError> {
    for other in users.values().filter(|u| u.id != *id) {
        if other.name.as_str() == name {
            return Err(UserError::NameAlreadyExists(name.to_string()));
        }
        if other.email.as_str() == email {
            return Err(UserError::EmailAlreadyExists(email.to_string()));
        }
    }
    Ok(())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;
        check_unique(&users, &user.id, user.name.as_str(), user.email.as_str())?;

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn save(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id.to_string()));
        }
        check_unique(&users, &user.id, user.name.as_str(), user.email.as_str())?;

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<Option<User>, UserError> {
        let mut users = self.users.write().await;
        let Some(current) = users.get(id) else {
            return Ok(None);
        };

        let mut updated = current.clone();
        if let Some(name) = &changes.name {
            updated.name = name.clone();
        }
        if let Some(email) = &changes.email {
            updated.email = email.clone();
        }
        check_unique(&users, id, updated.name.as_str(), updated.email.as_str())?;
        updated.updated_at = Utc::now();

        users.insert(*id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        self.users
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or(UserError::NotFound(id.to_string()))
    }
}
