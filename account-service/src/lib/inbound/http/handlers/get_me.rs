use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::Data;
use super::UserData;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

/// The caller's own record, read fresh from the store. `role` is left out.
pub async fn get_me(
    State(state): State<AppState>,
    Extension(CurrentUser(current_user)): Extension<CurrentUser>,
) -> Result<ApiSuccess<Data<Data<UserData>>>, ApiError> {
    state
        .account_service
        .get_user(&current_user.id)
        .await
        .map_err(ApiError::from)
        .map(|ref user| {
            ApiSuccess::new(
                StatusCode::OK,
                Data {
                    data: Data {
                        data: UserData::from(user).without_role(),
                    },
                },
            )
        })
}
