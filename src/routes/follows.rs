use axum::{extract::State, http::StatusCode, Json};

use crate::{
    app_state::AppState,
    error::AppResult,
    infrastructure::{DeleteResult, DocId},
    models::Follow,
    routes::extract::ApiPath,
};

pub async fn follow(
    State(state): State<AppState>,
    ApiPath((uid, following)): ApiPath<(DocId, DocId)>,
) -> AppResult<(StatusCode, Json<Follow>)> {
    let edge = state.follows.follow(uid, following).await?;
    Ok((StatusCode::CREATED, Json(edge)))
}

pub async fn unfollow(
    State(state): State<AppState>,
    ApiPath((uid, following)): ApiPath<(DocId, DocId)>,
) -> AppResult<Json<DeleteResult>> {
    Ok(Json(state.follows.unfollow(uid, following).await?))
}

pub async fn user_following(
    State(state): State<AppState>,
    ApiPath(uid): ApiPath<DocId>,
) -> AppResult<Json<Vec<Follow>>> {
    Ok(Json(state.follows.user_following(uid).await?))
}

pub async fn view_followers(
    State(state): State<AppState>,
    ApiPath(uid): ApiPath<DocId>,
) -> AppResult<Json<Vec<Follow>>> {
    Ok(Json(state.follows.view_followers(uid).await?))
}
