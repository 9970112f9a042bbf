//! Startup data seeding

use crate::auth::models::{Role, User, ROLE_ADMIN, ROLE_USER};
use crate::auth::password::hash_password;
use crate::config::SeedConfig;
use crate::error::{Error, Result};
use crate::store::{RoleStore, UserStore};

/// Create the default roles and the admin account when missing. Safe to run
/// on every start.
pub async fn seed(
    users: &dyn UserStore,
    roles: &dyn RoleStore,
    config: &SeedConfig,
    bcrypt_cost: u32,
) -> Result<()> {
    ensure_role(roles, ROLE_USER, "Regular user role").await?;
    ensure_role(roles, ROLE_ADMIN, "Administrator role").await?;

    if !config.enabled || users.exists_by_username(&config.admin_username).await? {
        return Ok(());
    }

    let admin_role = roles
        .find_by_name(ROLE_ADMIN)
        .await?
        .ok_or_else(|| Error::RoleNotFound(ROLE_ADMIN.to_string()))?;
    let user_role = roles
        .find_by_name(ROLE_USER)
        .await?
        .ok_or_else(|| Error::RoleNotFound(ROLE_USER.to_string()))?;

    let password_hash = hash_password(&config.admin_password, bcrypt_cost).await?;
    let mut admin = User::new(
        config.admin_username.clone(),
        config.admin_email.clone(),
        password_hash,
    )
    .with_role(admin_role.name)
    .with_role(user_role.name);
    admin.first_name = Some("Admin".to_string());
    admin.last_name = Some("User".to_string());

    let admin = users.save(admin).await?;
    tracing::info!(user_id = admin.id, username = %admin.username, "Created admin user");
    Ok(())
}

async fn ensure_role(roles: &dyn RoleStore, name: &str, description: &str) -> Result<()> {
    if roles.find_by_name(name).await?.is_none() {
        roles.save(Role::new(name, description)).await?;
        tracing::info!(role = name, "Created role");
    }
    Ok(())
}
