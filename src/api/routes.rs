//! API route handlers

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::server::SharedState;
use crate::auth::models::{TokenResponse, UserProfile, UserSummary};
use crate::auth::{Credentials, CurrentUser, RoleRequirement, SignUpRequest};
use crate::error::{Error, Result};
use crate::store::UserStore;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidCredentials | Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::UsernameTaken | Error::EmailTaken | Error::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ApiResponse::err(message))).into_response()
    }
}

// Health check

pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok("healthy"))
}

// Auth routes

pub async fn sign_in(
    State(state): State<SharedState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<TokenResponse>> {
    let token = state.auth.sign_in(&credentials).await?;
    Ok(Json(TokenResponse::bearer(token)))
}

pub async fn sign_up(
    State(state): State<SharedState>,
    Json(request): Json<SignUpRequest>,
) -> Result<impl IntoResponse> {
    let user = state.auth.sign_up(&request).await?;
    let location = format!("/api/users/{}", user.username);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ApiResponse::ok("User registered successfully")),
    ))
}

// User routes

pub async fn current_user(
    State(state): State<SharedState>,
    current: CurrentUser,
) -> Result<Json<UserSummary>> {
    let ctx = current.require(RoleRequirement::USER)?;

    let user = state
        .auth
        .users()
        .find_by_id(ctx.user_id)
        .await?
        .ok_or_else(|| Error::ResourceNotFound(format!("User not found with username: {}", ctx.username)))?;

    Ok(Json(UserSummary::from(&user)))
}

pub async fn user_profile(
    State(state): State<SharedState>,
    Path(username): Path<String>,
) -> Result<Json<UserProfile>> {
    let user = find_user(&state, &username).await?;
    Ok(Json(UserProfile::from(user)))
}

pub async fn delete_user(
    State(state): State<SharedState>,
    current: CurrentUser,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse>> {
    let ctx = current.require(RoleRequirement::ADMIN)?;

    let user = find_user(&state, &username).await?;
    state.auth.users().delete(&user).await?;
    tracing::info!(deleted = %user.username, by = %ctx.username, "User deleted");

    Ok(Json(ApiResponse::ok("User deleted successfully")))
}

async fn find_user(state: &SharedState, username: &str) -> Result<crate::auth::User> {
    state
        .auth
        .users()
        .find_by_username(username)
        .await?
        .ok_or_else(|| Error::ResourceNotFound(format!("User not found with username: {}", username)))
}
