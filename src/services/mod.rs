// Store services - one thin CRUD facade per collection, each call maps to a
// single document store query (plus reference expansion where noted)

pub mod bookmark_service;
pub mod follow_service;
pub mod like_service;
pub mod message_service;
pub mod tuit_service;
pub mod user_service;

pub use bookmark_service::BookmarkService;
pub use follow_service::FollowService;
pub use like_service::LikeService;
pub use message_service::MessageService;
pub use tuit_service::TuitService;
pub use user_service::UserService;

use serde::de::DeserializeOwned;

use crate::error::AppResult;
use crate::infrastructure::{from_document, Document};

fn decode_all<T: DeserializeOwned>(docs: Vec<Document>) -> AppResult<Vec<T>> {
    docs.into_iter().map(from_document).collect()
}

fn decode_one<T: DeserializeOwned>(doc: Option<Document>) -> AppResult<Option<T>> {
    doc.map(from_document).transpose()
}
