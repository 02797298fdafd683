use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::session_response;
use super::ApiError;
use super::SessionResponseData;
use super::WithSessionCookie;
use crate::domain::user::models::ChangePasswordCommand;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

pub async fn update_password(
    State(state): State<AppState>,
    Extension(CurrentUser(current_user)): Extension<CurrentUser>,
    body: Result<Json<UpdatePasswordRequest>, JsonRejection>,
) -> Result<WithSessionCookie<SessionResponseData>, ApiError> {
    let Json(body) = body?;

    let user = state
        .account_service
        .change_password(&current_user.id, body.into_command())
        .await?;

    session_response(&state, &user, StatusCode::OK)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    current_password: Option<String>,
    new_password: Option<String>,
    #[serde(alias = "NewPasswordConfirm")]
    new_password_confirm: Option<String>,
}

impl UpdatePasswordRequest {
    fn into_command(self) -> ChangePasswordCommand {
        ChangePasswordCommand {
            // An absent current password simply fails verification.
            current_password: self.current_password.unwrap_or_default(),
            new_password: self.new_password,
            new_password_confirm: self.new_password_confirm,
        }
    }
}
