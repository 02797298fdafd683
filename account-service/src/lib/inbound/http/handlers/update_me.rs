use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;

use super::ApiError;
use super::ApiSuccess;
use super::Data;
use super::UserEnvelope;
use crate::domain::user::errors::ValidationErrors;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::ProfileChanges;
use crate::domain::user::models::UserName;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

const PASSWORD_FIELDS: [&str; 2] = ["password", "passwordConfirm"];

pub async fn update_me(
    State(state): State<AppState>,
    Extension(CurrentUser(current_user)): Extension<CurrentUser>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<ApiSuccess<Data<UserEnvelope>>, ApiError> {
    let Json(body) = body?;
    let changes = UpdateMeRequest::from_body(body)?.try_into_changes()?;

    state
        .account_service
        .update_profile(&current_user.id, changes)
        .await
        .map_err(ApiError::from)
        .map(|ref user| {
            ApiSuccess::new(
                StatusCode::OK,
                Data {
                    data: UserEnvelope { user: user.into() },
                },
            )
        })
}

/// HTTP request body for a self-service profile update (raw JSON)
///
/// Only `name` and `email` are applied; any other field is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeRequest {
    name: Option<String>,
    email: Option<String>,
}

impl UpdateMeRequest {
    /// A set `password` or `passwordConfirm` rejects the request before any
    /// other field is looked at, whatever its type.
    fn from_body(body: Map<String, Value>) -> Result<Self, ApiError> {
        if PASSWORD_FIELDS
            .iter()
            .any(|field| body.get(*field).is_some_and(is_set))
        {
            return Err(UserError::PasswordUpdateNotAllowed.into());
        }

        serde_json::from_value(Value::Object(body))
            .map_err(|e| ApiError::BadRequest(format!("Invalid input data. {}", e)))
    }

    fn try_into_changes(self) -> Result<ProfileChanges, UserError> {
        let mut errors = ValidationErrors::new();
        let name = self
            .name
            .and_then(|name| errors.check("name", UserName::new(name)));
        let email = self
            .email
            .and_then(|email| errors.check("email", EmailAddress::new(email)));

        errors
            .into_result(|| ProfileChanges { name, email })
            .map_err(UserError::from)
    }
}

/// `null`, `false`, `0` and `""` count as absent.
fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
