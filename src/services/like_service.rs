use std::sync::Arc;
use tracing::info;

use crate::error::AppResult;
use crate::infrastructure::{
    from_document, populate, Collection, DeleteResult, DocId, Document, DocumentStore, Filter,
};
use crate::models::Like;
use crate::services::decode_all;

/// Like Relation Store: edges between a user and a tuit. Duplicate likes are
/// kept and tuit stats are not touched.
#[derive(Clone)]
pub struct LikeService {
    store: Arc<dyn DocumentStore>,
}

impl LikeService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Likes of a tuit with each liking user expanded.
    pub async fn find_all_users_that_liked_tuit(&self, tid: DocId) -> AppResult<Vec<Like>> {
        let mut docs = self
            .store
            .find(Collection::Likes, &Filter::all().eq("tuit", tid))
            .await?;
        populate(self.store.as_ref(), &mut docs, "likedBy", Collection::Users).await?;
        decode_all(docs)
    }

    /// Likes by a user with each liked tuit expanded.
    pub async fn find_all_tuits_liked_by_user(&self, uid: DocId) -> AppResult<Vec<Like>> {
        let mut docs = self
            .store
            .find(Collection::Likes, &Filter::all().eq("likedBy", uid))
            .await?;
        populate(self.store.as_ref(), &mut docs, "tuit", Collection::Tuits).await?;
        decode_all(docs)
    }

    pub async fn user_likes_tuit(&self, uid: DocId, tid: DocId) -> AppResult<Like> {
        info!("User {} likes tuit {}", uid, tid);
        let mut doc = Document::new();
        doc.insert("tuit".to_string(), tid.into());
        doc.insert("likedBy".to_string(), uid.into());
        from_document(self.store.insert_one(Collection::Likes, doc).await?)
    }

    pub async fn user_unlikes_tuit(&self, uid: DocId, tid: DocId) -> AppResult<DeleteResult> {
        info!("User {} unlikes tuit {}", uid, tid);
        let filter = Filter::all().eq("tuit", tid).eq("likedBy", uid);
        self.store.delete_one(Collection::Likes, &filter).await
    }

    /// Removes every like that references a deleted tuit.
    pub async fn tuit_deleted(&self, tid: DocId) -> AppResult<DeleteResult> {
        info!("Removing likes of tuit {}", tid);
        self.store
            .delete_many(Collection::Likes, &Filter::all().eq("tuit", tid))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{IdGenerator, MemoryDocumentStore};
    use crate::models::{TuitContent, UserProfile};
    use crate::services::{TuitService, UserService};

    #[tokio::test]
    async fn likes_expand_the_other_side() {
        let ids = Arc::new(IdGenerator::new(0).unwrap());
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new(ids));
        let users = UserService::new(store.clone());
        let tuits = TuitService::new(store.clone());
        let likes = LikeService::new(store);

        let alice = users.create_user(UserProfile::new("alice", "pw")).await.unwrap();
        let tuit = tuits.create_tuit(alice.id, TuitContent::new("likeable")).await.unwrap();
        likes.user_likes_tuit(alice.id, tuit.id).await.unwrap();

        let liked = likes.find_all_tuits_liked_by_user(alice.id).await.unwrap();
        assert_eq!(liked.len(), 1);
        assert_eq!(liked[0].tuit.populated().unwrap().content.tuit, "likeable");
        assert_eq!(liked[0].liked_by.id(), Some(alice.id));

        let likers = likes.find_all_users_that_liked_tuit(tuit.id).await.unwrap();
        assert_eq!(likers[0].liked_by.populated().unwrap().profile.username, "alice");

        assert_eq!(likes.tuit_deleted(tuit.id).await.unwrap().deleted_count, 1);
        assert!(likes.find_all_tuits_liked_by_user(alice.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unlike_removes_a_single_edge() {
        let ids = Arc::new(IdGenerator::new(0).unwrap());
        let likes = LikeService::new(Arc::new(MemoryDocumentStore::new(ids.clone())));
        let (uid, tid) = (ids.next_id(), ids.next_id());

        likes.user_likes_tuit(uid, tid).await.unwrap();
        likes.user_likes_tuit(uid, tid).await.unwrap();
        assert_eq!(likes.user_unlikes_tuit(uid, tid).await.unwrap().deleted_count, 1);

        // Neither side exists, so the remaining edge expands to null
        let remaining = likes.find_all_users_that_liked_tuit(tid).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(remaining[0].liked_by.is_dangling());
    }
}
