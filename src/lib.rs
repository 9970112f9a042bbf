//! Authgate - username/password login with signed, stateless session tokens
//!
//! Credentials are verified against a [`store::UserStore`], a signed token is
//! issued, and every later request is re-authenticated from that token. The
//! resulting [`auth::AuthenticationContext`] lives for one request and is
//! checked against each operation's role requirement by [`auth::authorize`].

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod store;

pub use config::Config;
pub use error::Error;
