//! In-memory store implementations

use crate::auth::models::{Role, User};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{RoleStore, UserStore};

/// User store backed by a shared map, keyed by id
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<i64, User>>>,
    next_id: Arc<AtomicI64>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryUserStore {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .any(|u| u.username == username))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(email)))
    }

    async fn save(&self, mut user: User) -> Result<User> {
        let mut users = self.users.write().await;

        // Uniqueness is checked under the write lock so concurrent sign-ups
        // cannot both claim the same username.
        for existing in users.values().filter(|u| u.id != user.id) {
            if existing.username == user.username {
                return Err(Error::UsernameTaken);
            }
            if existing.email.eq_ignore_ascii_case(&user.email) {
                return Err(Error::EmailTaken);
            }
        }

        if user.id == 0 {
            user.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, user: &User) -> Result<()> {
        self.users.write().await.remove(&user.id);
        Ok(())
    }
}

/// Role store backed by a shared map, keyed by name
pub struct MemoryRoleStore {
    roles: Arc<RwLock<HashMap<String, Role>>>,
}

impl MemoryRoleStore {
    pub fn new() -> Self {
        Self {
            roles: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryRoleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryRoleStore {
    fn clone(&self) -> Self {
        Self {
            roles: Arc::clone(&self.roles),
        }
    }
}

#[async_trait]
impl RoleStore for MemoryRoleStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>> {
        Ok(self.roles.read().await.get(name).cloned())
    }

    async fn save(&self, role: Role) -> Result<Role> {
        self.roles
            .write()
            .await
            .insert(role.name.clone(), role.clone());
        Ok(role)
    }
}
