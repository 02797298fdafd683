use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::session_response;
use super::ApiError;
use super::SessionResponseData;
use super::WithSessionCookie;
use crate::domain::user::errors::ValidationErrors;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewPassword;
use crate::domain::user::models::SignupCommand;
use crate::domain::user::models::UserName;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn signup(
    State(state): State<AppState>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<WithSessionCookie<SessionResponseData>, ApiError> {
    let Json(body) = body?;
    let command = body.try_into_command().map_err(UserError::from)?;

    let user = state.account_service.signup(command).await?;

    session_response(&state, &user, StatusCode::CREATED)
}

/// HTTP request body for signing up (raw JSON)
///
/// A `role` in the body is ignored: every signup is an ordinary user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    password_confirm: Option<String>,
}

impl SignupRequest {
    fn try_into_command(self) -> Result<SignupCommand, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = errors.check("name", UserName::new(self.name.unwrap_or_default()));
        let email = errors.check("email", EmailAddress::new(self.email.unwrap_or_default()));
        let password = NewPassword::check(&mut errors, self.password, self.password_confirm);

        match (name, email, password) {
            (Some(name), Some(email), Some(password)) if errors.is_empty() => Ok(SignupCommand {
                name,
                email,
                password,
            }),
            _ => Err(errors),
        }
    }
}
