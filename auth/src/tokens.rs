use chrono::Duration;

use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::SessionClaims;

/// Issues and verifies session tokens.
///
/// Signing secret and token lifetime are fixed at construction. Tokens are
/// stateless: nothing here can revoke a token before its `exp`.
pub struct TokenService {
    jwt_handler: JwtHandler,
    lifetime: Duration,
}

impl TokenService {
    /// Create a new token service.
    ///
    /// # Arguments
    /// * `secret` - Secret key for HS256 signing
    /// * `lifetime` - Validity window of every issued token
    pub fn new(secret: &[u8], lifetime: Duration) -> Self {
        Self {
            jwt_handler: JwtHandler::new(secret),
            lifetime,
        }
    }

    /// Lifetime applied to issued tokens.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a signed token for `user_id`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token generation failed
    pub fn issue(&self, user_id: impl ToString) -> Result<String, JwtError> {
        let claims = SessionClaims::for_user(user_id, self.lifetime);
        self.jwt_handler.encode(&claims)
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// # Errors
    /// * `TokenExpired` - Token lifetime has elapsed
    /// * `InvalidSignature` - Token was signed with another secret
    /// * `Malformed` - Token could not be parsed
    pub fn verify(&self, token: &str) -> Result<SessionClaims, JwtError> {
        self.jwt_handler.decode(token)
    }
}
