// HTTP routing layer - each route maps to exactly one service call

pub mod bookmarks;
pub mod extract;
pub mod follows;
pub mod likes;
pub mod messages;
pub mod tuits;
pub mod users;

use axum::{
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::app_state::AppState;

pub use extract::{ApiJson, ApiPath};

async fn hello() -> &'static str {
    "Welcome to Tuiter!"
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "service": "tuiter"}))
}

pub fn create_tuiter_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(hello))
        .route("/api/health", get(health))
        // Users
        .route(
            "/api/users",
            get(users::find_all_users)
                .post(users::create_user)
                .delete(users::delete_all_users),
        )
        .route(
            "/api/users/{uid}",
            get(users::find_user_by_id)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/api/users/username/{username}",
            get(users::find_user_by_username).delete(users::delete_users_by_username),
        )
        .route("/api/login", post(users::login))
        // Tuits
        .route(
            "/api/tuits",
            get(tuits::find_all_tuits).post(tuits::create_tuit),
        )
        .route(
            "/api/tuits/{tid}",
            get(tuits::find_tuit_by_id)
                .put(tuits::update_tuit)
                .delete(tuits::delete_tuit),
        )
        .route(
            "/api/users/{uid}/tuits",
            get(tuits::find_tuits_by_user)
                .post(tuits::create_tuit_by_user)
                .delete(tuits::delete_tuits_by_user),
        )
        // Likes
        .route("/api/users/{uid}/likes/{tid}", post(likes::user_likes_tuit))
        .route("/api/users/{uid}/unlikes/{tid}", delete(likes::user_unlikes_tuit))
        .route("/api/users/{uid}/likes", get(likes::find_all_tuits_liked_by_user))
        .route(
            "/api/tuits/{tid}/likes",
            get(likes::find_all_users_that_liked_tuit).delete(likes::delete_likes_of_tuit),
        )
        // Follows
        .route(
            "/api/users/{uid}/follows/{followingid}",
            post(follows::follow).delete(follows::unfollow),
        )
        .route("/api/users/{uid}/follows", get(follows::user_following))
        .route("/api/users/{uid}/follows/fans", get(follows::view_followers))
        // Bookmarks
        .route("/api/users/{uid}/bookmarks/{tid}", put(bookmarks::bookmark))
        .route(
            "/api/users/{uid}/bookmarks/remove/{tid}",
            put(bookmarks::unbookmark),
        )
        .route("/api/users/{uid}/bookmarks", get(bookmarks::view_bookmarks))
        // Messages
        .route("/api/users/{uid}/messages/{receiveid}", post(messages::send))
        .route("/api/messages/{msgid}", delete(messages::delete))
        .route("/api/users/{uid}/messages", get(messages::view_received))
        .route("/api/users/{uid}/messages/sent", get(messages::view_sent))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
