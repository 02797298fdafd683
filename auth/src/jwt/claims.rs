use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by a session token.
///
/// `id` is the identity of the account the token was issued for. `iat` and `exp`
/// are Unix timestamps in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Account identifier
    pub id: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Create claims for an account, valid from now for `lifetime`.
    pub fn for_user(user_id: impl ToString, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self::issued_at(user_id, now.timestamp(), lifetime)
    }

    /// Create claims with an explicit issue instant.
    pub fn issued_at(user_id: impl ToString, iat: i64, lifetime: Duration) -> Self {
        Self {
            id: user_id.to_string(),
            iat,
            exp: iat + lifetime.num_seconds(),
        }
    }

    /// Check if the claims are expired at `current_timestamp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
