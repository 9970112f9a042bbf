//! Role-based authorization

use crate::auth::context::AuthenticationContext;
use crate::auth::models::{ROLE_ADMIN, ROLE_USER};
use crate::error::{Error, Result};

/// Roles an operation requires; holding any one of them is enough.
/// An empty set admits every authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleRequirement(pub &'static [&'static str]);

impl RoleRequirement {
    pub const AUTHENTICATED: RoleRequirement = RoleRequirement(&[]);
    pub const USER: RoleRequirement = RoleRequirement(&[ROLE_USER]);
    pub const ADMIN: RoleRequirement = RoleRequirement(&[ROLE_ADMIN]);

    pub fn roles(&self) -> &'static [&'static str] {
        self.0
    }
}

/// Allow or deny an operation for the request's context
pub fn authorize<'a>(
    context: Option<&'a AuthenticationContext>,
    requirement: RoleRequirement,
) -> Result<&'a AuthenticationContext> {
    let context = match context {
        Some(ctx) if ctx.authenticated => ctx,
        _ => return Err(Error::Unauthenticated),
    };

    if requirement.roles().is_empty() || context.has_any_role(requirement.roles()) {
        Ok(context)
    } else {
        tracing::debug!(
            user_id = context.user_id,
            required = ?requirement.roles(),
            "Access denied"
        );
        Err(Error::Forbidden)
    }
}
