use std::sync::Arc;
use tracing::info;

use crate::error::AppResult;
use crate::infrastructure::{
    populate, Collection, DocId, DocumentStore, Filter, Update, UpdateResult, ID_FIELD,
};
use crate::models::Bookmarks;
use crate::services::decode_one;

const BOOKMARKS_FIELD: &str = "bookmarks";

/// Bookmark operations on the User Store: bookmarks live as an array of tuit
/// ids inside each user document.
#[derive(Clone)]
pub struct BookmarkService {
    store: Arc<dyn DocumentStore>,
}

impl BookmarkService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn bookmark(&self, uid: DocId, tid: DocId) -> AppResult<UpdateResult> {
        info!("User {} bookmarks tuit {}", uid, tid);
        self.store
            .update_one(
                Collection::Users,
                &Filter::by_id(uid),
                &Update::push(BOOKMARKS_FIELD, tid),
            )
            .await
    }

    pub async fn unbookmark(&self, uid: DocId, tid: DocId) -> AppResult<UpdateResult> {
        info!("User {} removes bookmark on tuit {}", uid, tid);
        self.store
            .update_one(
                Collection::Users,
                &Filter::by_id(uid),
                &Update::pull(BOOKMARKS_FIELD, tid),
            )
            .await
    }

    /// The user's bookmarks with every tuit expanded; bookmarks of deleted
    /// tuits are skipped.
    pub async fn view_bookmarks(&self, uid: DocId) -> AppResult<Option<Bookmarks>> {
        let Some(user) = self.store.find_by_id(Collection::Users, uid).await? else {
            return Ok(None);
        };

        let mut selected = user;
        selected.retain(|field, _| field == ID_FIELD || field == BOOKMARKS_FIELD);
        let mut docs = [selected];
        populate(self.store.as_ref(), &mut docs, BOOKMARKS_FIELD, Collection::Tuits).await?;
        let [doc] = docs;
        decode_one(Some(doc))
    }
}
