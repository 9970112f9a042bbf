//! Sign-in and sign-up

use crate::auth::jwt::TokenCodec;
use crate::auth::models::{Credentials, SignUpRequest, User, ROLE_USER};
use crate::auth::password::{hash_password, CredentialVerifier};
use crate::error::{Error, Result};
use crate::store::{RoleStore, UserStore};
use std::sync::Arc;

/// Entry points used by the HTTP layer
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    roles: Arc<dyn RoleStore>,
    verifier: CredentialVerifier,
    codec: Arc<TokenCodec>,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        roles: Arc<dyn RoleStore>,
        codec: Arc<TokenCodec>,
        bcrypt_cost: u32,
    ) -> Result<Self> {
        Ok(Self {
            verifier: CredentialVerifier::new(users.clone(), bcrypt_cost)?,
            users,
            roles,
            codec,
            bcrypt_cost,
        })
    }

    pub fn codec(&self) -> &Arc<TokenCodec> {
        &self.codec
    }

    pub fn users(&self) -> &Arc<dyn UserStore> {
        &self.users
    }

    /// Verify credentials and issue a token
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<String> {
        let user = self
            .verifier
            .verify(&credentials.username, &credentials.password)
            .await
            .inspect_err(|_| tracing::info!("Failed sign-in attempt"))?;

        let token = self.codec.issue(&user)?;
        tracing::info!(user_id = user.id, username = %user.username, "User signed in");
        Ok(token)
    }

    /// Register a new enabled user with `ROLE_USER`
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<User> {
        request.validate()?;

        let username = request.username.trim();
        let email = request.email.trim();

        if self.users.exists_by_username(username).await? {
            return Err(Error::UsernameTaken);
        }
        if self.users.exists_by_email(email).await? {
            return Err(Error::EmailTaken);
        }

        let role = self
            .roles
            .find_by_name(ROLE_USER)
            .await?
            .ok_or_else(|| Error::RoleNotFound(ROLE_USER.to_string()))?;

        let password_hash = hash_password(&request.password, self.bcrypt_cost).await?;
        let mut user = User::new(username.to_string(), email.to_string(), password_hash)
            .with_role(role.name);
        user.first_name = request.first_name.clone();
        user.last_name = request.last_name.clone();

        let user = self.users.save(user).await?;
        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }
}
