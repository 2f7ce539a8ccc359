use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::AppResult;
use crate::infrastructure::document_store::{
    apply_update, Collection, DeleteResult, Document, DocumentStore, Filter, Update,
    UpdateResult, ID_FIELD,
};
use crate::infrastructure::id_generator::{DocId, IdGenerator};

/// In-memory document store, used by tests and `DATABASE_URL=memory`.
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
    ids: Arc<IdGenerator>,
}

impl MemoryDocumentStore {
    pub fn new(ids: Arc<IdGenerator>) -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            ids,
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert_one(&self, collection: Collection, mut doc: Document) -> AppResult<Document> {
        doc.insert(ID_FIELD.to_string(), self.ids.next_id().into());
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .push(doc.clone());
        Ok(doc)
    }

    async fn find(&self, collection: Collection, filter: &Filter) -> AppResult<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|doc| filter.matches(doc)).cloned().collect())
            .unwrap_or_default())
    }

    async fn find_by_id(&self, collection: Collection, id: DocId) -> AppResult<Option<Document>> {
        self.find_one(collection, &Filter::by_id(id)).await
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        update: &Update,
    ) -> AppResult<UpdateResult> {
        let mut collections = self.collections.write().await;
        let Some(doc) = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| filter.matches(doc)))
        else {
            return Ok(UpdateResult::new(0, 0));
        };

        // Work on a copy so a rejected update leaves the document untouched.
        let mut updated = doc.clone();
        let modified = apply_update(&mut updated, update)?;
        if modified {
            *doc = updated;
        }
        Ok(UpdateResult::new(1, modified as u64))
    }

    async fn delete_one(&self, collection: Collection, filter: &Filter) -> AppResult<DeleteResult> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(DeleteResult::new(0));
        };
        match docs.iter().position(|doc| filter.matches(doc)) {
            Some(index) => {
                docs.remove(index);
                Ok(DeleteResult::new(1))
            }
            None => Ok(DeleteResult::new(0)),
        }
    }

    async fn delete_many(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> AppResult<DeleteResult> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(DeleteResult::new(0));
        };
        let before = docs.len();
        docs.retain(|doc| !filter.matches(doc));
        Ok(DeleteResult::new((before - docs.len()) as u64))
    }
}
