use std::sync::Arc;

use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::inbound::http::cookies::find_cookie;
use crate::inbound::http::cookies::SESSION_COOKIE;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::INTERNAL_ERROR_MESSAGE;
use crate::inbound::http::router::AppState;

pub const NOT_LOGGED_IN: &str = "You are not logged in! Please log in to get access.";
pub const INVALID_TOKEN: &str = "Invalid token. Please log in again!";
pub const EXPIRED_TOKEN: &str = "Your token has expired! Please log in again.";
pub const USER_GONE: &str = "User belongs to this token no longer exists";
pub const FORBIDDEN: &str = "You do not have permission to perform this action";

/// Extension holding the account resolved from the request's session token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Middleware that resolves the session token into a [`CurrentUser`] extension.
///
/// The token is read from `Authorization: Bearer` first and from the `jwt` cookie second.
pub async fn protect(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(req.headers())
        .ok_or_else(|| ApiError::Unauthorized(NOT_LOGGED_IN.to_string()))?;

    let token_service = Arc::clone(&state.token_service);
    let claims = tokio::task::spawn_blocking(move || token_service.verify(&token))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Token verification task failed");
            ApiError::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
        })?
        .map_err(|e| {
            tracing::debug!(error = %e, "Session token rejected");
            match e {
                auth::JwtError::TokenExpired => ApiError::Unauthorized(EXPIRED_TOKEN.to_string()),
                _ => ApiError::Unauthorized(INVALID_TOKEN.to_string()),
            }
        })?;

    let user_id = UserId::from_string(&claims.id).map_err(|e| {
        tracing::warn!(error = %e, "Session token carries a malformed id");
        ApiError::Unauthorized(INVALID_TOKEN.to_string())
    })?;

    let user = state
        .account_service
        .resolve_session(&user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(USER_GONE.to_string()))?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// A `Bearer` header, even one without a token, means the cookie is never read.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .filter(|value| value.starts_with("Bearer"));

    let token = match bearer {
        Some(value) => value.split(' ').nth(1).filter(|token| !token.is_empty()),
        None => headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|cookies| find_cookie(cookies, SESSION_COOKIE)),
    };

    token.map(str::to_string)
}

/// Set of roles allowed through [`restrict_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    user: bool,
    admin: bool,
}

impl AccessPolicy {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        roles.into_iter().fold(
            Self {
                user: false,
                admin: false,
            },
            |policy, role| match role {
                Role::User => Self {
                    user: true,
                    ..policy
                },
                Role::Admin => Self {
                    admin: true,
                    ..policy
                },
            },
        )
    }

    pub fn permits(&self, role: Role) -> bool {
        match role {
            Role::User => self.user,
            Role::Admin => self.admin,
        }
    }
}

/// Role gate. Must be layered inside [`protect`].
pub async fn restrict_to(
    State(policy): State<AccessPolicy>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(CurrentUser(user)) = req.extensions().get::<CurrentUser>() else {
        return Err(ApiError::Unauthorized(NOT_LOGGED_IN.to_string()));
    };

    if !policy.permits(user.role) {
        tracing::debug!(user_id = %user.id, role = %user.role, "Role not permitted");
        return Err(ApiError::Forbidden(FORBIDDEN.to_string()));
    }

    Ok(next.run(req).await)
}
