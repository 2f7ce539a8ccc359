use axum::{extract::State, http::StatusCode, Json};

use crate::{
    app_state::AppState,
    error::{AppError, AppResult},
    infrastructure::{DeleteResult, DocId, UpdateResult},
    models::{Credentials, User, UserPatch, UserProfile},
    routes::extract::{ApiJson, ApiPath},
};

pub async fn find_all_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.users.find_all_users().await?))
}

pub async fn find_user_by_id(
    State(state): State<AppState>,
    ApiPath(uid): ApiPath<DocId>,
) -> AppResult<Json<User>> {
    state
        .users
        .find_user_by_id(uid)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", uid)))
}

pub async fn find_user_by_username(
    State(state): State<AppState>,
    ApiPath(username): ApiPath<String>,
) -> AppResult<Json<User>> {
    state
        .users
        .find_user_by_username(&username)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", username)))
}

pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(profile): ApiJson<UserProfile>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = state.users.create_user(profile).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    ApiPath(uid): ApiPath<DocId>,
    ApiJson(patch): ApiJson<UserPatch>,
) -> AppResult<Json<UpdateResult>> {
    Ok(Json(state.users.update_user(uid, &patch).await?))
}

pub async fn delete_user(
    State(state): State<AppState>,
    ApiPath(uid): ApiPath<DocId>,
) -> AppResult<Json<DeleteResult>> {
    Ok(Json(state.users.delete_user(uid).await?))
}

pub async fn delete_all_users(State(state): State<AppState>) -> AppResult<Json<DeleteResult>> {
    Ok(Json(state.users.delete_all_users().await?))
}

pub async fn delete_users_by_username(
    State(state): State<AppState>,
    ApiPath(username): ApiPath<String>,
) -> AppResult<Json<DeleteResult>> {
    Ok(Json(state.users.delete_users_by_username(&username).await?))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> AppResult<Json<User>> {
    state
        .users
        .find_user_by_credentials(&credentials.username, &credentials.password)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))
}
