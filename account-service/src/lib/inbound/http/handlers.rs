use axum::extract::rejection::JsonRejection;
use axum::http::header;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub mod delete_me;
pub mod delete_user;
pub mod get_me;
pub mod get_user;
pub mod login;
pub mod logout;
pub mod signup;
pub mod update_me;
pub mod update_password;
pub mod update_user;

/// Message sent for every failure whose cause must stay server-side.
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went very wrong!";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::success(data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Successful response that also (re)sets the session cookie.
#[derive(Debug, Clone, PartialEq)]
pub struct WithSessionCookie<T: Serialize + PartialEq> {
    pub cookie: String,
    pub body: ApiSuccess<T>,
}

impl<T: Serialize + PartialEq> IntoResponse for WithSessionCookie<T> {
    fn into_response(self) -> Response {
        ([(header::SET_COOKIE, self.cookie)], self.body).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Validation(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ApiErrorBody::new(status, message))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(_) => ApiError::Validation(err.to_string()),
            UserError::InvalidUserId(_)
            | UserError::NameAlreadyExists(_)
            | UserError::EmailAlreadyExists(_)
            | UserError::MissingCredentials
            | UserError::PasswordUpdateNotAllowed => ApiError::BadRequest(err.to_string()),
            UserError::InvalidCredentials | UserError::WrongCurrentPassword => {
                ApiError::Unauthorized(err.to_string())
            }
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::Hashing(_) | UserError::DatabaseError(_) | UserError::Unknown(_) => {
                tracing::error!(error = %err, "Request failed");
                ApiError::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
            }
        }
    }
}

/// A body that is not a JSON object of the expected shape is a client error.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Request body rejected");
        ApiError::BadRequest(format!("Invalid input data. {}", rejection.body_text()))
    }
}

impl From<auth::JwtError> for ApiError {
    fn from(err: auth::JwtError) -> Self {
        tracing::error!(error = %err, "Token handling failed");
        ApiError::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status: &'static str,
    #[serde(flatten)]
    body: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn success(body: T) -> Self {
        Self {
            status: "success",
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub status: &'static str,
    pub message: String,
}

impl ApiErrorBody {
    /// `fail` for client errors, `error` for server errors.
    pub fn new(status_code: StatusCode, message: String) -> Self {
        let status = if status_code.is_server_error() {
            "error"
        } else {
            "fail"
        };
        Self { status, message }
    }
}

/// `{"data": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Data<T> {
    pub data: T,
}

/// `{"user": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserEnvelope {
    pub user: UserData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoContent {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResponseData {
    pub token: String,
    pub data: UserEnvelope,
}

/// Public view of a user record. The digest and reset fields never appear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    pub name_changed_credit: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_changed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserData {
    pub fn without_role(self) -> Self {
        Self { role: None, ..self }
    }
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.as_str().to_string(),
            email: user.email.as_str().to_string(),
            role: Some(user.role),
            created_by: user.created_by.clone(),
            name_changed_credit: user.name_changed_credit,
            password_changed_at: user.password_changed_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Issue a token for `user` and answer with it in both the body and the cookie.
pub(crate) fn session_response(
    state: &AppState,
    user: &User,
    status: StatusCode,
) -> Result<WithSessionCookie<SessionResponseData>, ApiError> {
    let token = state.token_service.issue(user.id)?;

    Ok(WithSessionCookie {
        cookie: state.cookies.session_cookie(&token),
        body: ApiSuccess::new(
            status,
            SessionResponseData {
                token,
                data: UserEnvelope { user: user.into() },
            },
        ),
    })
}
