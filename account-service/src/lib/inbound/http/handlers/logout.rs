use axum::extract::State;
use axum::http::StatusCode;

use super::ApiSuccess;
use super::NoContent;
use super::WithSessionCookie;
use crate::inbound::http::router::AppState;

/// Overwrite the session cookie. The token itself stays valid until it expires.
pub async fn logout(State(state): State<AppState>) -> WithSessionCookie<NoContent> {
    WithSessionCookie {
        cookie: state.cookies.logout_cookie(),
        body: ApiSuccess::new(StatusCode::OK, NoContent {}),
    }
}
