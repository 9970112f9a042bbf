//! Authenticated identity for a single request

use crate::auth::jwt::Claims;
use crate::error::{Error, Result};
use crate::store::UserStore;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Identity and roles resolved from a validated token. Built fresh for
/// every request and dropped with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticationContext {
    pub user_id: i64,
    pub username: String,
    pub roles: BTreeSet<String>,
    pub authenticated: bool,
}

impl AuthenticationContext {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// True when the context holds at least one of `roles`
    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        roles.iter().any(|r| self.has_role(r.as_ref()))
    }
}

/// Turns validated claims into an [`AuthenticationContext`]
#[derive(Clone)]
pub struct ContextBuilder {
    users: Arc<dyn UserStore>,
}

impl ContextBuilder {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Resolve the subject live. Roles come from the store, never the token,
    /// so a role change or a disabled account takes effect on the next
    /// request.
    pub async fn build(&self, claims: &Claims) -> Result<AuthenticationContext> {
        let id = claims.user_id().ok_or(Error::UserNotFound)?;

        let user = self
            .users
            .find_by_id(id)
            .await?
            .filter(|u| u.enabled)
            .ok_or(Error::UserNotFound)?;

        Ok(AuthenticationContext {
            user_id: user.id,
            username: user.username,
            roles: user.roles,
            authenticated: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::{User, ROLE_ADMIN, ROLE_USER};
    use crate::store::MemoryUserStore;

    fn claims_for(id: &str) -> Claims {
        Claims {
            sub: id.to_string(),
            iat: 0,
            exp: i64::MAX,
        }
    }

    #[tokio::test]
    async fn test_build_loads_current_roles() {
        let store = Arc::new(MemoryUserStore::new());
        let alice = store
            .save(User::new("alice".into(), "alice@x.com".into(), String::new()).with_role(ROLE_USER))
            .await
            .unwrap();
        let builder = ContextBuilder::new(store.clone());

        let ctx = builder.build(&claims_for(&alice.id.to_string())).await.unwrap();
        assert_eq!(ctx.user_id, alice.id);
        assert_eq!(ctx.username, "alice");
        assert!(ctx.authenticated);
        assert!(ctx.has_role(ROLE_USER));
        assert!(!ctx.has_role(ROLE_ADMIN));

        let promoted = alice.with_role(ROLE_ADMIN);
        store.save(promoted).await.unwrap();

        let ctx = builder.build(&claims_for("1")).await.unwrap();
        assert!(ctx.has_any_role(&[ROLE_ADMIN]));
    }

    #[tokio::test]
    async fn test_build_unknown_subject() {
        let builder = ContextBuilder::new(Arc::new(MemoryUserStore::new()));
        assert!(matches!(
            builder.build(&claims_for("7")).await,
            Err(Error::UserNotFound)
        ));
        assert!(matches!(
            builder.build(&claims_for("alice")).await,
            Err(Error::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_build_disabled_user() {
        let store = Arc::new(MemoryUserStore::new());
        let mut alice = store
            .save(User::new("alice".into(), "alice@x.com".into(), String::new()))
            .await
            .unwrap();
        alice.enabled = false;
        store.save(alice.clone()).await.unwrap();

        let builder = ContextBuilder::new(store);
        assert!(matches!(
            builder.build(&claims_for(&alice.id.to_string())).await,
            Err(Error::UserNotFound)
        ));
    }
}
