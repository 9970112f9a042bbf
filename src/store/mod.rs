//! User and role persistence seams
//!
//! The authentication core only talks to these traits. Implementations
//! provide their own concurrency safety; callers never hold a lock across
//! a store call.

mod memory;

pub use memory::{MemoryRoleStore, MemoryUserStore};

use crate::auth::models::{Role, User};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    async fn exists_by_username(&self, username: &str) -> Result<bool>;

    async fn exists_by_email(&self, email: &str) -> Result<bool>;

    /// Insert or update. Assigns an id when `user.id` is 0.
    async fn save(&self, user: User) -> Result<User>;

    async fn delete(&self, user: &User) -> Result<()>;
}

#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>>;

    async fn save(&self, role: Role) -> Result<Role>;
}
