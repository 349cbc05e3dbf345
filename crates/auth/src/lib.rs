//! `profdash-auth` — authentication boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it knows how
//! to check the admin credential pair and how to mint/verify bearer tokens,
//! nothing else. Secrets and credentials are injected by the caller.

pub mod claims;
pub mod credentials;
pub mod token;

pub use claims::Claims;
pub use credentials::AdminCredentials;
pub use token::{AuthError, Hs256TokenService, TokenVerifier};
