use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::domain::user::errors::ValidationErrors;
use crate::domain::user::models::AdminUpdateCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewPassword;
use crate::domain::user::models::Role;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserName;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::Data;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// HTTP request body for an administrative update (raw JSON)
///
/// Every field is optional and applied unfiltered.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub created_by: Option<String>,
    pub name_changed_credit: Option<i32>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<AdminUpdateCommand, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = self
            .name
            .and_then(|name| errors.check("name", UserName::new(name)));
        let email = self
            .email
            .and_then(|email| errors.check("email", EmailAddress::new(email)));
        let role = self
            .role
            .and_then(|role| errors.check("role", role.parse::<Role>()));
        let password = if self.password.is_some() || self.password_confirm.is_some() {
            NewPassword::check(&mut errors, self.password, self.password_confirm)
        } else {
            None
        };

        errors.into_result(|| AdminUpdateCommand {
            name,
            email,
            role,
            created_by: self.created_by,
            name_changed_credit: self.name_changed_credit,
            password,
        })
    }
}

/// Admin updates answer every failure except a missing record with a 500.
fn admin_update_error(err: UserError) -> ApiError {
    match err {
        UserError::Validation(errors) => ApiError::InternalServerError(errors.to_string()),
        UserError::NameAlreadyExists(_)
        | UserError::EmailAlreadyExists(_)
        | UserError::PasswordUpdateNotAllowed => {
            ApiError::InternalServerError(format!("Validation failed: {}", err))
        }
        other => ApiError::from(other),
    }
}

fn admin_body_error(rejection: JsonRejection) -> ApiError {
    tracing::debug!(error = %rejection, "Admin update body rejected");
    ApiError::InternalServerError(format!("Validation failed: {}", rejection.body_text()))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    req: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<ApiSuccess<Data<Data<UserData>>>, ApiError> {
    let user_id = UserId::from_string(&id).map_err(UserError::from)?;
    let Json(req) = req.map_err(admin_body_error)?;
    let command = req
        .try_into_command()
        .map_err(|e| admin_update_error(e.into()))?;

    state
        .account_service
        .admin_update(&user_id, command)
        .await
        .map_err(admin_update_error)
        .map(|ref user| {
            ApiSuccess::new(
                StatusCode::OK,
                Data {
                    data: Data { data: user.into() },
                },
            )
        })
}
