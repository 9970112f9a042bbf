//! Error types for Authgate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found. Run 'authgate init' first.")]
    ConfigNotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Token encoding error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Wrong username or password. Never says which one.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Malformed token")]
    Malformed,

    #[error("Token signature is invalid")]
    SignatureInvalid,

    #[error("Token has expired")]
    Expired,

    /// The token subject no longer resolves to an enabled user
    #[error("User not found")]
    UserNotFound,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Access Denied")]
    Forbidden,

    #[error("Username is already taken!")]
    UsernameTaken,

    #[error("Email is already in use!")]
    EmailTaken,

    #[error("{0}")]
    Validation(String),

    #[error("Role '{0}' not found")]
    RoleNotFound(String),

    #[error("{0}")]
    ResourceNotFound(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Failures that the request interception layer collapses into
    /// "proceed unauthenticated".
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            Error::Malformed | Error::SignatureInvalid | Error::Expired | Error::UserNotFound
        )
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Other(format!("Background task failed: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
