//! User CRUD endpoints.
//!
//! Provides:
//! - `POST /createUser`
//! - `GET /getAllUsers`
//! - `GET /getUserById/:id`
//! - `PUT /updateUser/:id`
//! - `DELETE /deleteUserById/:id`

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use user_api_common::{CreateUserRequest, UpdateUserRequest, User, UserId};

use crate::error::{ApiError, ErrorResponse, Result};
use crate::AppState;

/// Unwrap a JSON payload. A request without a JSON content type carries no
/// parsed body and is treated as `{}`.
fn json_body<T: Default>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(rejection.into()),
    }
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/createUser",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "The user is successfully created", body = User),
        (status = 400, description = "The body is not valid JSON", body = ErrorResponse),
        (status = 500, description = "Validation, body shape or server error", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<User>> {
    let request = json_body(payload)?;
    let user = request.validate()?;
    let created = state.store.create(user).await?;
    Ok(Json(created))
}

/// Returns the list of all the users
#[utoipa::path(
    get,
    path = "/getAllUsers",
    tag = "Users",
    responses(
        (status = 200, description = "The list of the users", body = Vec<User>),
        (status = 500, description = "Some server error", body = ErrorResponse)
    )
)]
pub async fn get_all_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>> {
    let users = state.store.find_all().await?;
    Ok(Json(users))
}

/// Get a user by id
///
/// Responds with `null` when no user has the given id.
#[utoipa::path(
    get,
    path = "/getUserById/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "The user id")),
    responses(
        (status = 200, description = "The user, or null when not found", body = User),
        (status = 500, description = "Malformed id or server error", body = ErrorResponse)
    )
)]
pub async fn get_user_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Option<User>>> {
    let id: UserId = id.parse()?;
    let user = state.store.find_by_id(&id).await?;
    Ok(Json(user))
}

/// Update a user by id
#[utoipa::path(
    put,
    path = "/updateUser/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "The user id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "The user has been updated", body = User),
        (status = 400, description = "The body is not valid JSON", body = ErrorResponse),
        (status = 404, description = "The user was not found", body = ErrorResponse),
        (status = 500, description = "Some error happened", body = ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    payload: std::result::Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<User>> {
    let id: UserId = raw_id.parse()?;
    let request = json_body(payload)?;
    let patch = request.validate()?;

    let updated = state
        .store
        .update_by_id(&id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User with ID {} not found", raw_id)))?;

    Ok(Json(updated))
}

/// Delete user by id
///
/// The record is gone once this returns, so a successful response carries
/// `null`.
#[utoipa::path(
    delete,
    path = "/deleteUserById/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "The user id")),
    responses(
        (status = 200, description = "The user has been deleted"),
        (status = 404, description = "The user was not found", body = ErrorResponse),
        (status = 500, description = "Malformed id or server error", body = ErrorResponse)
    )
)]
pub async fn delete_user_by_id(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Option<User>>> {
    let id: UserId = raw_id.parse()?;

    state
        .store
        .delete_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("cannot find any user with ID {}", raw_id)))?;

    Ok(Json(None))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/createUser", post(create_user))
        .route("/getAllUsers", get(get_all_users))
        .route("/getUserById/:id", get(get_user_by_id))
        .route("/updateUser/:id", put(update_user))
        .route("/deleteUserById/:id", delete(delete_user_by_id))
        .with_state(state)
}
