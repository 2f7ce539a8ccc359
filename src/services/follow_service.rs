use std::sync::Arc;
use tracing::info;

use crate::error::AppResult;
use crate::infrastructure::{
    from_document, populate, Collection, DeleteResult, DocId, Document, DocumentStore, Filter,
};
use crate::models::Follow;
use crate::services::decode_all;

/// Follow Relation Store: directed user-to-user edges. Self-follows and
/// duplicate follows are stored as given.
#[derive(Clone)]
pub struct FollowService {
    store: Arc<dyn DocumentStore>,
}

impl FollowService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn follow(&self, follower: DocId, following: DocId) -> AppResult<Follow> {
        info!("User {} follows {}", follower, following);
        let mut doc = Document::new();
        doc.insert("follower".to_string(), follower.into());
        doc.insert("following".to_string(), following.into());
        from_document(self.store.insert_one(Collection::Follows, doc).await?)
    }

    pub async fn unfollow(&self, follower: DocId, following: DocId) -> AppResult<DeleteResult> {
        info!("User {} unfollows {}", follower, following);
        let filter = Filter::all()
            .eq("follower", follower)
            .eq("following", following);
        self.store.delete_one(Collection::Follows, &filter).await
    }

    /// Users that `uid` follows, expanded.
    pub async fn user_following(&self, uid: DocId) -> AppResult<Vec<Follow>> {
        let mut docs = self
            .store
            .find(Collection::Follows, &Filter::all().eq("follower", uid))
            .await?;
        populate(self.store.as_ref(), &mut docs, "following", Collection::Users).await?;
        decode_all(docs)
    }

    /// Users following `uid`, expanded.
    pub async fn view_followers(&self, uid: DocId) -> AppResult<Vec<Follow>> {
        let mut docs = self
            .store
            .find(Collection::Follows, &Filter::all().eq("following", uid))
            .await?;
        populate(self.store.as_ref(), &mut docs, "follower", Collection::Users).await?;
        decode_all(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{IdGenerator, MemoryDocumentStore};
    use crate::models::UserProfile;
    use crate::services::UserService;

    #[tokio::test]
    async fn follow_edges_are_directed() {
        let ids = Arc::new(IdGenerator::new(0).unwrap());
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new(ids));
        let users = UserService::new(store.clone());
        let follows = FollowService::new(store);

        let alice = users.create_user(UserProfile::new("alice", "pw")).await.unwrap();
        let bob = users.create_user(UserProfile::new("bob", "pw")).await.unwrap();
        follows.follow(alice.id, bob.id).await.unwrap();

        let following = follows.user_following(alice.id).await.unwrap();
        assert_eq!(following.len(), 1);
        assert_eq!(following[0].following.populated().unwrap().profile.username, "bob");
        assert_eq!(following[0].follower.id(), Some(alice.id));

        let fans = follows.view_followers(bob.id).await.unwrap();
        assert_eq!(fans[0].follower.populated().unwrap().profile.username, "alice");

        assert!(follows.user_following(bob.id).await.unwrap().is_empty());
        assert!(follows.view_followers(alice.id).await.unwrap().is_empty());

        assert_eq!(follows.unfollow(alice.id, bob.id).await.unwrap().deleted_count, 1);
        assert_eq!(follows.unfollow(alice.id, bob.id).await.unwrap().deleted_count, 0);
    }

    #[tokio::test]
    async fn self_follow_is_allowed() {
        let ids = Arc::new(IdGenerator::new(0).unwrap());
        let follows = FollowService::new(Arc::new(MemoryDocumentStore::new(ids.clone())));
        let uid = ids.next_id();

        follows.follow(uid, uid).await.unwrap();
        assert_eq!(follows.view_followers(uid).await.unwrap().len(), 1);
        assert_eq!(follows.user_following(uid).await.unwrap().len(), 1);
    }
}
