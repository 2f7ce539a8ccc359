use std::sync::Arc;
use tracing::{debug, info};

use crate::error::AppResult;
use crate::infrastructure::{
    from_document, populate, to_document, Collection, DeleteResult, DocId, DocumentStore,
    Filter, Update, UpdateResult,
};
use crate::models::{Tuit, TuitContent, TuitPatch};
use crate::services::{decode_all, decode_one};

/// Tuit Store: CRUD over the `tuits` collection. Updates and deletes are
/// addressed by tuit id.
#[derive(Clone)]
pub struct TuitService {
    store: Arc<dyn DocumentStore>,
}

impl TuitService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn find_all_tuits(&self) -> AppResult<Vec<Tuit>> {
        decode_all(self.store.find(Collection::Tuits, &Filter::all()).await?)
    }

    pub async fn find_tuits_by_user(&self, uid: DocId) -> AppResult<Vec<Tuit>> {
        let filter = Filter::all().eq("postedBy", uid);
        decode_all(self.store.find(Collection::Tuits, &filter).await?)
    }

    /// Fetches one tuit with its author expanded.
    pub async fn find_tuit_by_id(&self, tid: DocId) -> AppResult<Option<Tuit>> {
        debug!("Finding tuit {}", tid);
        let Some(doc) = self.store.find_by_id(Collection::Tuits, tid).await? else {
            return Ok(None);
        };

        let mut docs = [doc];
        populate(self.store.as_ref(), &mut docs, "postedBy", Collection::Users).await?;
        let [doc] = docs;
        decode_one(Some(doc))
    }

    pub async fn create_tuit(&self, uid: DocId, content: TuitContent) -> AppResult<Tuit> {
        info!("Creating tuit for user {}", uid);
        let mut doc = to_document(&content)?;
        doc.insert("postedBy".to_string(), uid.into());

        let tuit: Tuit = from_document(self.store.insert_one(Collection::Tuits, doc).await?)?;
        info!("Created tuit {} for user {}", tuit.id, uid);
        Ok(tuit)
    }

    pub async fn update_tuit(&self, tid: DocId, patch: &TuitPatch) -> AppResult<UpdateResult> {
        info!("Updating tuit {}", tid);
        self.store
            .update_one(Collection::Tuits, &Filter::by_id(tid), &Update::set(patch)?)
            .await
    }

    /// Removes the tuit only; likes and bookmarks that reference it remain.
    pub async fn delete_tuit(&self, tid: DocId) -> AppResult<DeleteResult> {
        info!("Deleting tuit {}", tid);
        self.store
            .delete_one(Collection::Tuits, &Filter::by_id(tid))
            .await
    }

    pub async fn delete_tuits_by_user(&self, uid: DocId) -> AppResult<DeleteResult> {
        info!("Deleting all tuits of user {}", uid);
        self.store
            .delete_many(Collection::Tuits, &Filter::all().eq("postedBy", uid))
            .await
    }
}
