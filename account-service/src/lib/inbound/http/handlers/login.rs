use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::session_response;
use super::ApiError;
use super::SessionResponseData;
use super::WithSessionCookie;
use crate::domain::user::models::LoginCommand;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<WithSessionCookie<SessionResponseData>, ApiError> {
    let Json(body) = body?;
    let command = LoginCommand::new(body.email, body.password)?;

    let user = state.account_service.login(command).await?;

    session_response(&state, &user, StatusCode::OK)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}
