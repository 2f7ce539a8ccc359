use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::AppResult;
use crate::infrastructure::{
    from_document, to_document, Collection, DeleteResult, DocId, DocumentStore, Filter, Update,
    UpdateResult,
};
use crate::models::{User, UserPatch, UserProfile};
use crate::services::{decode_all, decode_one};

/// User Store: CRUD over the `users` collection.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn DocumentStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn find_all_users(&self) -> AppResult<Vec<User>> {
        let docs = self.store.find(Collection::Users, &Filter::all()).await?;
        decode_all(docs)
    }

    pub async fn find_user_by_id(&self, uid: DocId) -> AppResult<Option<User>> {
        debug!("Finding user {}", uid);
        decode_one(self.store.find_by_id(Collection::Users, uid).await?)
    }

    pub async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let filter = Filter::all().eq("username", username);
        decode_one(self.store.find_one(Collection::Users, &filter).await?)
    }

    /// Plaintext username and password match.
    pub async fn find_user_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> AppResult<Option<User>> {
        let filter = Filter::all()
            .eq("username", username)
            .eq("password", password);
        decode_one(self.store.find_one(Collection::Users, &filter).await?)
    }

    pub async fn create_user(&self, profile: UserProfile) -> AppResult<User> {
        info!("Creating user: {}", profile.username);
        let mut doc = to_document(&profile)?;
        doc.insert("bookmarks".to_string(), Value::Array(Vec::new()));

        let user: User = from_document(self.store.insert_one(Collection::Users, doc).await?)?;
        info!("Created user: {} (ID: {})", user.profile.username, user.id);
        Ok(user)
    }

    pub async fn update_user(&self, uid: DocId, patch: &UserPatch) -> AppResult<UpdateResult> {
        info!("Updating user {}", uid);
        self.store
            .update_one(Collection::Users, &Filter::by_id(uid), &Update::set(patch)?)
            .await
    }

    /// Removes the user document only; likes, follows and messages that
    /// reference it are left in place.
    pub async fn delete_user(&self, uid: DocId) -> AppResult<DeleteResult> {
        info!("Deleting user {}", uid);
        self.store
            .delete_one(Collection::Users, &Filter::by_id(uid))
            .await
    }

    pub async fn delete_all_users(&self) -> AppResult<DeleteResult> {
        info!("Deleting all users");
        self.store.delete_many(Collection::Users, &Filter::all()).await
    }

    pub async fn delete_users_by_username(&self, username: &str) -> AppResult<DeleteResult> {
        info!("Deleting users named {}", username);
        self.store
            .delete_many(Collection::Users, &Filter::all().eq("username", username))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{IdGenerator, MemoryDocumentStore};

    fn service() -> UserService {
        let ids = Arc::new(IdGenerator::new(0).unwrap());
        UserService::new(Arc::new(MemoryDocumentStore::new(ids)))
    }

    #[tokio::test]
    async fn credentials_must_match_exactly() {
        let users = service();
        users
            .create_user(UserProfile::new("alice", "s3cret"))
            .await
            .unwrap();

        assert!(users
            .find_user_by_credentials("alice", "s3cret")
            .await
            .unwrap()
            .is_some());
        assert!(users
            .find_user_by_credentials("alice", "wrong")
            .await
            .unwrap()
            .is_none());
        assert!(users
            .find_user_by_credentials("bob", "s3cret")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn usernames_are_not_unique() {
        let users = service();
        users.create_user(UserProfile::new("dup", "a")).await.unwrap();
        users.create_user(UserProfile::new("dup", "b")).await.unwrap();
        users.create_user(UserProfile::new("other", "c")).await.unwrap();

        let first = users.find_user_by_username("dup").await.unwrap().unwrap();
        assert_eq!(first.profile.password, "a");

        let deleted = users.delete_users_by_username("dup").await.unwrap();
        assert_eq!(deleted.deleted_count, 2);
        assert_eq!(users.find_all_users().await.unwrap().len(), 1);

        assert_eq!(users.delete_all_users().await.unwrap().deleted_count, 1);
        assert!(users.find_all_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn new_users_start_without_bookmarks() {
        let users = service();
        let user = users.create_user(UserProfile::new("carol", "pw")).await.unwrap();
        assert!(user.bookmarks.is_empty());

        let fetched = users.find_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(fetched, user);
    }
}
