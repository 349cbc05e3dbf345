//! Bearer-token claims model (transport-agnostic).

use serde::{Deserialize, Serialize};

/// The minimal claim set carried by an issued token.
///
/// `iat`/`exp` are unix timestamps in seconds, the registered-claim wire
/// format every JWT consumer expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the logged-in username.
    pub sub: String,

    /// Issued-at timestamp.
    pub iat: i64,

    /// Expiration timestamp.
    pub exp: i64,
}
