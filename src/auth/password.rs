//! Password hashing and credential verification

use crate::auth::models::User;
use crate::error::{Error, Result};
use crate::store::UserStore;
use std::sync::Arc;

/// Hash a password with bcrypt at the given cost
pub async fn hash_password(password: &str, cost: u32) -> Result<String> {
    let password = password.to_owned();
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hash)
}

/// Checks submitted username/password pairs against the user store
#[derive(Clone)]
pub struct CredentialVerifier {
    users: Arc<dyn UserStore>,
    // Hash compared against when the username is unknown, so a miss costs
    // the same bcrypt work as a hit. Computed once, in `new`.
    dummy_hash: Arc<str>,
}

impl CredentialVerifier {
    /// Runs one bcrypt hash at `cost`; call at startup, not per request
    pub fn new(users: Arc<dyn UserStore>, cost: u32) -> Result<Self> {
        let dummy_hash = bcrypt::hash("authgate-dummy-password", cost)?;
        Ok(Self {
            users,
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Return the user when the pair matches. Unknown usernames, wrong
    /// passwords and disabled accounts all fail with `InvalidCredentials`.
    pub async fn verify(&self, username: &str, password: &str) -> Result<User> {
        let user = self.users.find_by_username(username).await?;

        let hash = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.dummy_hash.to_string(),
        };

        let password = password.to_owned();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await?
            .unwrap_or(false);

        match user {
            Some(user) if matches && user.enabled => Ok(user),
            Some(user) if matches => {
                tracing::info!(user_id = user.id, "Sign-in refused for disabled account");
                Err(Error::InvalidCredentials)
            }
            _ => Err(Error::InvalidCredentials),
        }
    }
}
