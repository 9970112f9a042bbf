//! Token-based authentication and role-based authorization

pub mod clock;
pub mod context;
pub mod gate;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod seed;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use context::{AuthenticationContext, ContextBuilder};
pub use gate::{authorize, RoleRequirement};
pub use jwt::{Claims, TokenCodec};
pub use middleware::{authenticate, CurrentUser, RequestAuthenticator};
pub use models::{Credentials, Role, SignUpRequest, User, ROLE_ADMIN, ROLE_USER};
pub use password::{hash_password, CredentialVerifier};
pub use service::AuthService;
