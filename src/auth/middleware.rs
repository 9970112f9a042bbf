//! Authentication middleware and extractors
//!
//! Every request passes through [`authenticate`]. A missing or rejected
//! token never aborts the request; it simply proceeds without an
//! [`AuthenticationContext`] and handlers decide through the gate.

use crate::auth::context::{AuthenticationContext, ContextBuilder};
use crate::auth::gate::{self, RoleRequirement};
use crate::auth::jwt::TokenCodec;
use crate::config::AuthConfig;
use crate::error::{Error, Result};
use crate::store::UserStore;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, HeaderName},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use std::sync::Arc;

/// Extracts, validates and resolves request tokens
#[derive(Clone)]
pub struct RequestAuthenticator {
    codec: Arc<TokenCodec>,
    contexts: ContextBuilder,
    header: HeaderName,
    prefix: String,
    cookie: Option<String>,
}

impl RequestAuthenticator {
    pub fn new(
        codec: Arc<TokenCodec>,
        users: Arc<dyn UserStore>,
        config: &AuthConfig,
    ) -> Result<Self> {
        let header = HeaderName::from_bytes(config.header.trim().to_ascii_lowercase().as_bytes())
            .map_err(|e| Error::Config(format!("Invalid auth.header '{}': {}", config.header, e)))?;

        Ok(Self {
            codec,
            contexts: ContextBuilder::new(users),
            header,
            prefix: config.prefix.clone(),
            cookie: config.cookie.clone(),
        })
    }

    /// Find the raw token in the configured header, falling back to the
    /// configured cookie. A header without the prefix carries no token.
    pub fn extract_token<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        if let Some(value) = headers.get(&self.header) {
            if let Ok(value) = value.to_str() {
                if let Some(token) = value.strip_prefix(self.prefix.as_str()) {
                    let token = token.trim();
                    if !token.is_empty() {
                        return Some(token);
                    }
                }
            }
        }

        let cookie_name = self.cookie.as_deref()?;
        for cookie_header in headers.get_all(header::COOKIE) {
            let Ok(cookie_str) = cookie_header.to_str() else {
                continue;
            };
            for cookie in cookie_str.split(';') {
                if let Some((name, value)) = cookie.trim().split_once('=') {
                    if name == cookie_name && !value.is_empty() {
                        return Some(value);
                    }
                }
            }
        }

        None
    }

    /// Validate a token and resolve its subject
    pub async fn resolve(&self, token: &str) -> Result<AuthenticationContext> {
        let claims = self.codec.validate(token)?;
        self.contexts.build(&claims).await
    }

    /// Context for the request, or `None` when it proceeds unauthenticated
    pub async fn authenticate_headers(&self, headers: &HeaderMap) -> Option<AuthenticationContext> {
        let Some(token) = self.extract_token(headers) else {
            tracing::debug!("No token on request");
            return None;
        };

        match self.resolve(token).await {
            Ok(ctx) => {
                tracing::debug!(user_id = ctx.user_id, "Request authenticated");
                Some(ctx)
            }
            Err(e) if e.is_token_rejection() => {
                tracing::warn!(reason = %e, "Rejected token, continuing unauthenticated");
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "Could not set user authentication");
                None
            }
        }
    }
}

/// Middleware installing the request's [`AuthenticationContext`]
pub async fn authenticate(
    State(auth): State<Arc<RequestAuthenticator>>,
    mut req: Request,
    next: Next,
) -> Response {
    // Never trust a context that did not come from this layer
    req.extensions_mut().remove::<AuthenticationContext>();

    if let Some(ctx) = auth.authenticate_headers(req.headers()).await {
        req.extensions_mut().insert(ctx);
    }
    next.run(req).await
}

/// The context installed for this request, if any. Never rejects.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<AuthenticationContext>);

impl CurrentUser {
    pub fn context(&self) -> Option<&AuthenticationContext> {
        self.0.as_ref()
    }

    /// Run the authorization gate for an operation
    pub fn require(&self, requirement: RoleRequirement) -> Result<&AuthenticationContext> {
        gate::authorize(self.context(), requirement)
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> std::result::Result<Self, Self::Rejection> {
        Ok(CurrentUser(parts.extensions.get::<AuthenticationContext>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::{User, ROLE_USER};
    use crate::store::MemoryUserStore;
    use axum::http::HeaderValue;

    fn authenticator(store: Arc<MemoryUserStore>, cookie: Option<&str>) -> (RequestAuthenticator, Arc<TokenCodec>) {
        let config = AuthConfig {
            secret: "test-secret".into(),
            cookie: cookie.map(String::from),
            ..AuthConfig::default()
        };
        let codec = Arc::new(TokenCodec::from_config(&config).unwrap());
        (RequestAuthenticator::new(codec.clone(), store, &config).unwrap(), codec)
    }

    fn headers(name: &'static str, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_no_token() {
        let (auth, _) = authenticator(Arc::new(MemoryUserStore::new()), None);
        assert!(auth.extract_token(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_extract_strips_prefix() {
        let (auth, _) = authenticator(Arc::new(MemoryUserStore::new()), None);
        let h = headers("authorization", "Bearer abc.def.ghi ");
        assert_eq!(auth.extract_token(&h), Some("abc.def.ghi"));
    }

    #[test]
    fn test_extract_requires_prefix() {
        let (auth, _) = authenticator(Arc::new(MemoryUserStore::new()), None);
        assert!(auth.extract_token(&headers("authorization", "Basic abc")).is_none());
        assert!(auth.extract_token(&headers("authorization", "Bearer ")).is_none());
    }

    #[test]
    fn test_extract_from_cookie() {
        let (auth, _) = authenticator(Arc::new(MemoryUserStore::new()), Some("authgate_token"));
        let h = headers("cookie", "theme=dark; authgate_token=abc.def.ghi");
        assert_eq!(auth.extract_token(&h), Some("abc.def.ghi"));

        let (no_cookie, _) = authenticator(Arc::new(MemoryUserStore::new()), None);
        assert!(no_cookie.extract_token(&h).is_none());
    }

    #[tokio::test]
    async fn test_authenticate_valid_token() {
        let store = Arc::new(MemoryUserStore::new());
        let alice = store
            .save(User::new("alice".into(), "alice@x.com".into(), String::new()).with_role(ROLE_USER))
            .await
            .unwrap();
        let (auth, codec) = authenticator(store, None);
        let token = codec.issue(&alice).unwrap();

        let ctx = auth
            .authenticate_headers(&headers("authorization", &format!("Bearer {}", token)))
            .await
            .expect("context should be installed");
        assert_eq!(ctx.username, "alice");
        assert!(ctx.has_role(ROLE_USER));
    }

    #[tokio::test]
    async fn test_authenticate_bad_token_proceeds_unauthenticated() {
        let (auth, _) = authenticator(Arc::new(MemoryUserStore::new()), None);
        let ctx = auth
            .authenticate_headers(&headers("authorization", "Bearer invalid.token.here"))
            .await;
        assert!(ctx.is_none());
    }

    #[tokio::test]
    async fn test_resolve_deleted_user() {
        let store = Arc::new(MemoryUserStore::new());
        let alice = store
            .save(User::new("alice".into(), "alice@x.com".into(), String::new()))
            .await
            .unwrap();
        let (auth, codec) = authenticator(store.clone(), None);
        let token = codec.issue(&alice).unwrap();
        store.delete(&alice).await.unwrap();

        assert!(matches!(auth.resolve(&token).await, Err(Error::UserNotFound)));
    }

    #[test]
    fn test_invalid_header_name_rejected() {
        let config = AuthConfig {
            secret: "test-secret".into(),
            header: "bad header".into(),
            ..AuthConfig::default()
        };
        let codec = Arc::new(TokenCodec::from_config(&config).unwrap());
        let result = RequestAuthenticator::new(codec, Arc::new(MemoryUserStore::new()), &config);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_current_user_require() {
        assert!(matches!(
            CurrentUser(None).require(RoleRequirement::USER),
            Err(Error::Unauthenticated)
        ));
    }
}
